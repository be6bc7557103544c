//! HTTP client for the identity-federation introspection endpoint.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;

use tessera_core::error::AppError;
use tessera_core::result::AppResult;
use tessera_core::traits::identity::{IdentityProvider, Introspection};

const SERVICE: &str = "introspection";

/// Upstream response body. `sub` is accepted as the user id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionResponse {
    #[serde(default)]
    active: bool,
    #[serde(default, alias = "sub")]
    user_id: Option<String>,
    #[serde(default)]
    auth_user_id: Option<String>,
}

/// Posts `{"token": ...}` to the configured endpoint.
#[derive(Debug, Clone)]
pub struct IntrospectionClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl IntrospectionClient {
    pub fn new(endpoint: &str, http: reqwest::Client) -> AppResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            AppError::configuration(format!("clients.introspection_url is invalid: {e}"))
        })?;
        Ok(Self { endpoint, http })
    }
}

#[async_trait]
impl IdentityProvider for IntrospectionClient {
    async fn introspect(&self, token: &str) -> AppResult<Introspection> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&json!({ "token": token }))
            .send()
            .await
            .map_err(|e| crate::upstream(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "{SERVICE} responded with {status}"
            )));
        }
        let body: IntrospectionResponse = response
            .json()
            .await
            .map_err(|e| crate::upstream(SERVICE, e))?;

        Ok(Introspection {
            active: body.active,
            user_id: body.user_id.unwrap_or_default(),
            auth_user_id: body.auth_user_id,
        })
    }
}
