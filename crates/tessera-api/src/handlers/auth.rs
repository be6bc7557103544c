//! Auth handlers: login variants, refresh, check-token, logout.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;

use tessera_auth::Credentials;

use crate::dto::response::FederatedLoginResponse;
use crate::error::ApiError;
use crate::extractors::{AuthorizationHeader, DurationOverride, ServerCredentials, SessionToken};
use crate::handlers::with_session_token;
use crate::state::AppState;

fn basic_credentials(authorization: &AuthorizationHeader) -> Option<Credentials> {
    authorization.as_deref().and_then(Credentials::from_basic_header)
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    authorization: AuthorizationHeader,
    DurationOverride(duration): DurationOverride,
) -> Result<Response, ApiError> {
    let outcome = state
        .flows
        .password_login(basic_credentials(&authorization), duration)
        .await?;
    with_session_token(&outcome.issued.token, Json(outcome.user))
}

/// POST /login/{longtermkey}
pub async fn long_term_login(
    State(state): State<AppState>,
    Path(key): Path<String>,
    authorization: AuthorizationHeader,
    DurationOverride(duration): DurationOverride,
) -> Result<Response, ApiError> {
    let outcome = state
        .flows
        .long_term_login(&key, basic_credentials(&authorization), duration)
        .await?;
    with_session_token(&outcome.issued.token, Json(outcome.user))
}

/// GET /login
pub async fn refresh(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Response, ApiError> {
    let issued = state.flows.refresh(token.as_deref()).await?;
    with_session_token(&issued.token, Json(issued.data))
}

/// POST /serverlogin
pub async fn server_login(
    State(state): State<AppState>,
    server: ServerCredentials,
    DurationOverride(duration): DurationOverride,
) -> Result<Response, ApiError> {
    let issued = state
        .flows
        .server_login(server.name.as_deref(), server.secret.as_deref(), duration)
        .await?;
    with_session_token(&issued.token, ())
}

/// POST /oauthlogin
pub async fn oauth_login(
    State(state): State<AppState>,
    authorization: AuthorizationHeader,
) -> Result<Response, ApiError> {
    let outcome = state.flows.federated_login(authorization.as_deref()).await?;
    with_session_token(
        &outcome.issued.token,
        Json(FederatedLoginResponse {
            oauth_user: outcome.user,
            oauth_target: outcome.target,
        }),
    )
}

/// GET /token/{token}
pub async fn check_token(
    State(state): State<AppState>,
    Path(target): Path<String>,
    caller: SessionToken,
) -> Result<Json<tessera_auth::TokenData>, ApiError> {
    let data = state.flows.check_token(caller.as_deref(), &target).await?;
    Ok(Json(data))
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, token: SessionToken) {
    state.flows.logout(token.as_deref()).await;
}
