//! HTTP client for the permission-graph (gatekeeper) service.
//!
//! Routes:
//! - `GET  /access/{group}` → every member's permissions
//! - `GET  /access/{group}/{subject}` → one member's permissions (404 = none)
//! - `POST /access/{group}/{subject}` → replace one member's permissions
//!
//! Every call carries this service's own server token.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::debug;

use tessera_core::error::AppError;
use tessera_core::result::AppResult;
use tessera_core::traits::permission::{GroupMembers, PermissionService};
use tessera_core::traits::token_provider::ServerTokenProvider;
use tessera_core::types::permission::PermissionSet;

/// Header carrying the session token on upstream calls.
const SESSION_TOKEN_HEADER: &str = "x-tidepool-session-token";

const SERVICE: &str = "gatekeeper";

#[derive(Debug, Clone)]
pub struct GatekeeperClient {
    base: Url,
    http: reqwest::Client,
    tokens: Arc<dyn ServerTokenProvider>,
}

impl GatekeeperClient {
    pub fn new(
        base_url: &str,
        http: reqwest::Client,
        tokens: Arc<dyn ServerTokenProvider>,
    ) -> AppResult<Self> {
        let base = Url::parse(base_url).map_err(|e| {
            AppError::configuration(format!("clients.gatekeeper_url is invalid: {e}"))
        })?;
        if base.cannot_be_a_base() {
            return Err(AppError::configuration(
                "clients.gatekeeper_url must be a hierarchical URL",
            ));
        }
        Ok(Self { base, http, tokens })
    }

    fn access_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("access").extend(segments);
        }
        url
    }

    async fn get(&self, url: Url) -> AppResult<reqwest::Response> {
        let token = self.tokens.server_token().await?;
        self.http
            .get(url)
            .header(SESSION_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| crate::upstream(SERVICE, e))
    }
}

/// Decode a successful response body, or turn a bad status into an error.
async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::external_service(format!(
            "{SERVICE} responded with {status}"
        )));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| crate::upstream(SERVICE, e))
}

#[async_trait]
impl PermissionService for GatekeeperClient {
    async fn user_in_group(&self, subject: &str, group: &str) -> AppResult<PermissionSet> {
        let response = self.get(self.access_url(&[group, subject])).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(subject, group, "No permissions on group");
            return Ok(PermissionSet::new());
        }
        decode(response).await
    }

    async fn users_in_group(&self, group: &str) -> AppResult<GroupMembers> {
        let response = self.get(self.access_url(&[group])).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(GroupMembers::new());
        }
        decode(response).await
    }

    async fn set_permissions(
        &self,
        subject: &str,
        group: &str,
        permissions: &PermissionSet,
    ) -> AppResult<PermissionSet> {
        let token = self.tokens.server_token().await?;
        let response = self
            .http
            .post(self.access_url(&[group, subject]))
            .header(SESSION_TOKEN_HEADER, token)
            .json(permissions)
            .send()
            .await
            .map_err(|e| crate::upstream(SERVICE, e))?;
        decode(response).await
    }
}
