//! User lookup handlers.

use axum::Json;
use axum::extract::{Path, State};

use tessera_core::types::user::PublicUser;

use crate::error::ApiError;
use crate::extractors::SessionToken;
use crate::state::AppState;

/// GET /user
pub async fn current_user(
    State(state): State<AppState>,
    token: SessionToken,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.flows.user_info(token.as_deref(), None).await?;
    Ok(Json(user))
}

/// GET /user/{userid}
pub async fn get_user(
    State(state): State<AppState>,
    Path(userid): Path<String>,
    token: SessionToken,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.flows.user_info(token.as_deref(), Some(userid.as_str())).await?;
    Ok(Json(user))
}
