//! Tessera Server: session tokens and authorization for internal services.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use tessera_api::{AppState, CounterSink, build_app};
use tessera_auth::{
    AuthFlows, FlowConfig, PermissionResolver, ServerTokenSource, SessionManager, TokenDecoder,
    TokenEncoder,
};
use tessera_client::{GatekeeperClient, IntrospectionClient, http_client};
use tessera_core::config::AppConfig;
use tessera_core::config::store::StoreConfig;
use tessera_core::error::AppError;
use tessera_core::types::user::UserRecord;
use tessera_store::{MemorySessionStore, MemoryUserStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("TESSERA_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Tessera v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Stores ───────────────────────────────────────────
    let session_store = Arc::new(MemorySessionStore::new());
    let user_store = Arc::new(load_users(&config.store).await?);

    // ── Step 2: Token engine ─────────────────────────────────────
    let encoder = Arc::new(TokenEncoder::from_config(&config.auth));
    let decoder = Arc::new(TokenDecoder::from_config(&config.auth)?);
    let sessions = SessionManager::new(encoder, decoder, session_store);

    // ── Step 3: Upstream clients ─────────────────────────────────
    let http = http_client(&config.clients)?;
    let server_tokens = Arc::new(ServerTokenSource::new(
        sessions.clone(),
        config.clients.server_name.clone(),
    ));
    let gatekeeper = Arc::new(GatekeeperClient::new(
        &config.clients.gatekeeper_url,
        http.clone(),
        server_tokens,
    )?);

    // ── Step 4: Flows ────────────────────────────────────────────
    let metrics = Arc::new(CounterSink::new());
    let mut flows = AuthFlows::new(
        sessions,
        PermissionResolver::new(gatekeeper),
        user_store,
        metrics.clone(),
        FlowConfig::from_config(&config.auth),
    );
    match config
        .clients
        .introspection_url
        .as_deref()
        .filter(|url| !url.is_empty())
    {
        Some(url) => {
            flows = flows.with_identity_provider(Arc::new(IntrospectionClient::new(url, http)?));
            tracing::info!(url, "Federated login enabled");
        }
        None => tracing::info!("Federated login disabled (no introspection_url)"),
    }

    // ── Step 5: HTTP server ──────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        flows: Arc::new(flows),
        metrics,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Tessera listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Tessera server shut down gracefully");
    Ok(())
}

/// Seed the user store from `store.users_file`, if set.
async fn load_users(config: &StoreConfig) -> Result<MemoryUserStore, AppError> {
    let Some(path) = config.users_file.as_deref() else {
        tracing::warn!("No store.users_file configured; starting with an empty user store");
        return Ok(MemoryUserStore::new());
    };

    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::configuration(format!("Failed to read users file '{path}': {e}")))?;
    let users: Vec<UserRecord> = serde_json::from_slice(&raw)
        .map_err(|e| AppError::configuration(format!("Invalid users file '{path}': {e}")))?;

    tracing::info!(count = users.len(), path, "Loaded users");
    Ok(MemoryUserStore::with_users(users))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
