//! Token verification with key rotation.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde_json::{Map, Value};
use tracing::debug;

use tessera_core::config::auth::AuthConfig;
use tessera_core::error::AppError;

use super::claims::{TokenClaims, TokenData};
use crate::error::TokenError;

/// Verifies tokens against every accepted key.
///
/// HMAC tokens are checked against the current secret, then the previous
/// one. RSA tokens are checked against the configured public key only.
#[derive(Clone)]
pub struct TokenDecoder {
    current: DecodingKey,
    previous: Option<DecodingKey>,
    public: Option<DecodingKey>,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("previous", &self.previous.is_some())
            .field("public", &self.public.is_some())
            .finish()
    }
}

impl TokenDecoder {
    /// Build a decoder from an HMAC secret only.
    pub fn new(secret: &str) -> Self {
        Self {
            current: DecodingKey::from_secret(secret.as_bytes()),
            previous: None,
            public: None,
        }
    }

    /// Also accept tokens signed with a retired secret.
    pub fn with_previous_secret(mut self, secret: &str) -> Self {
        self.previous = Some(DecodingKey::from_secret(secret.as_bytes()));
        self
    }

    /// Also accept RSA-signed tokens verified by this PEM public key.
    pub fn with_public_key_pem(mut self, pem: &str) -> Result<Self, AppError> {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| {
            AppError::configuration(format!("auth.public_key is not a valid RSA PEM: {e}"))
        })?;
        self.public = Some(key);
        Ok(self)
    }

    /// Build a decoder from auth configuration. An unparseable public key is fatal.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let mut decoder = Self::new(&config.api_secret);
        if let Some(previous) = config.previous_secret.as_deref().filter(|s| !s.is_empty()) {
            decoder = decoder.with_previous_secret(previous);
        }
        if let Some(pem) = config.public_key.as_deref().filter(|s| !s.trim().is_empty()) {
            decoder = decoder.with_public_key_pem(pem)?;
        }
        Ok(decoder)
    }

    /// Verify a token now.
    pub fn verify(&self, token: &str) -> Result<TokenData, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature, claims, and expiry as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenData, TokenError> {
        let header = decode_header(token).map_err(|_| TokenError::Malformed)?;

        let payload = match header.alg {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                let mut keys = std::iter::once(&self.current).chain(self.previous.as_ref());
                self.first_verifying(token, header.alg, &mut keys)?
            }
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => {
                let mut keys = self.public.iter();
                self.first_verifying(token, header.alg, &mut keys)?
            }
            _ => return Err(TokenError::SignatureInvalid),
        };

        let claims = TokenClaims::from_wire(&payload)?;
        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(TokenData::verified(&claims))
    }

    /// Try each key in order; a malformed token stops the search.
    fn first_verifying<'a>(
        &self,
        token: &str,
        alg: Algorithm,
        keys: &mut dyn Iterator<Item = &'a DecodingKey>,
    ) -> Result<Map<String, Value>, TokenError> {
        let validation = signature_only(alg);
        let mut last = TokenError::SignatureInvalid;
        for (attempt, key) in keys.enumerate() {
            match decode::<Map<String, Value>>(token, key, &validation) {
                Ok(data) => {
                    if attempt > 0 {
                        debug!(attempt, "Token verified with a rotated key");
                    }
                    return Ok(data.claims);
                }
                Err(e) => {
                    last = classify(e.kind());
                    if last == TokenError::Malformed {
                        break;
                    }
                }
            }
        }
        Err(last)
    }
}

/// Signature check only; claims and expiry are checked by hand.
fn signature_only(alg: Algorithm) -> Validation {
    let mut validation = Validation::new(alg);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

fn classify(kind: &JwtErrorKind) -> TokenError {
    match kind {
        JwtErrorKind::InvalidSignature
        | JwtErrorKind::InvalidAlgorithm
        | JwtErrorKind::InvalidKeyFormat
        | JwtErrorKind::InvalidRsaKey(_)
        | JwtErrorKind::InvalidEcdsaKey => TokenError::SignatureInvalid,
        _ => TokenError::Malformed,
    }
}
