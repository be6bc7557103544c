//! Typed failures for each engine component.
//!
//! Flows match on these to pick the boundary reason; anything that escapes
//! unmatched converts into [`AppError`] with a default classification.

use thiserror::Error;

use tessera_core::error::{AppError, ErrorKind};
use tessera_core::types::status::StatusReason;

/// Failure to construct a token.
#[derive(Debug, Error)]
pub enum MintError {
    #[error("no subject was given for the token")]
    EmptySubject,
    #[error("token duration must be positive, got {0} seconds")]
    NonPositiveDuration(i64),
    #[error("token duration of {0} seconds puts the expiry out of range")]
    ExpiryOutOfRange(i64),
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Failure to verify a presented token.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Not a well-formed token, or claims missing or of the wrong type.
    #[error("token is malformed")]
    Malformed,
    /// Signature did not verify under any accepted key.
    #[error("token signature is invalid")]
    SignatureInvalid,
    /// Signature verified but the expiry has passed.
    #[error("token has expired")]
    Expired,
}

/// Why a presented token is not honored.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidToken {
    #[error(transparent)]
    Verification(#[from] TokenError),
    /// Cryptographically valid, but no live session record exists.
    #[error("token has been revoked")]
    Revoked,
}

/// Failure in the token lifecycle.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no session token was presented")]
    NoToken,
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] InvalidToken),
    #[error("token creation failed: {0}")]
    TokenCreationFailed(#[source] CreationFailure),
    #[error("session store unavailable: {0}")]
    StoreUnavailable(#[source] AppError),
}

/// Which half of token creation failed.
#[derive(Debug, Error)]
pub enum CreationFailure {
    #[error(transparent)]
    Mint(#[from] MintError),
    #[error("failed to persist session record: {0}")]
    Persist(#[source] AppError),
}

/// Failure talking to the permission graph.
#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("permission lookup failed: {0}")]
    LookupFailed(#[source] AppError),
    #[error("permission update for {subject} failed: {source}")]
    UpdateFailed {
        subject: String,
        #[source]
        source: AppError,
    },
}

impl From<MintError> for AppError {
    fn from(err: MintError) -> Self {
        let message = err.to_string();
        AppError::with_source(ErrorKind::Internal, message, err)
            .with_reason(StatusReason::ErrGeneratingToken)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::with_source(ErrorKind::Unauthorized, err.to_string(), err)
            .with_reason(StatusReason::NoToken)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let (kind, reason) = match &err {
            SessionError::NoToken | SessionError::InvalidToken(_) => {
                (ErrorKind::Unauthorized, StatusReason::NoToken)
            }
            SessionError::TokenCreationFailed(_) => {
                (ErrorKind::Internal, StatusReason::ErrGeneratingToken)
            }
            SessionError::StoreUnavailable(_) => {
                (ErrorKind::ExternalService, StatusReason::GetstatusErr)
            }
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err).with_reason(reason)
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        let reason = match &err {
            PermissionError::LookupFailed(_) => StatusReason::ErrFindingUsr,
            PermissionError::UpdateFailed { .. } => StatusReason::ErrUpdatingUsr,
        };
        let message = err.to_string();
        AppError::with_source(ErrorKind::ExternalService, message, err).with_reason(reason)
    }
}
