//! Route definitions for the Tessera HTTP API.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router and thread `state` through every route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Login variants, refresh, check-token, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            post(handlers::auth::login).get(handlers::auth::refresh),
        )
        .route("/login/{longtermkey}", post(handlers::auth::long_term_login))
        .route("/oauthlogin", post(handlers::auth::oauth_login))
        .route("/serverlogin", post(handlers::auth::server_login))
        .route("/token/{token}", get(handlers::auth::check_token))
        .route("/logout", post(handlers::auth::logout))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(handlers::user::current_user))
        .route("/user/{userid}", get(handlers::user::get_user))
}

fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::health::status))
        .route("/metrics", get(handlers::health::metrics))
}
