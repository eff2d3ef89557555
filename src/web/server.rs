//! Web server for campus.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::auth::{AccessGate, HashParams, TokenService};
use crate::config::Config;
use crate::{CampusError, Result};

use super::handlers::{AppState, SharedDatabase};
use super::middleware::RateLimitState;
use super::openapi::create_swagger_router;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Bearer token gate.
    gate: Arc<AccessGate>,
    /// Login throttling state.
    rate_limit: Arc<RateLimitState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server from configuration.
    pub fn new(config: &Config, db: SharedDatabase) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| CampusError::Config(format!("invalid server address: {e}")))?;

        let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_expiry_secs);
        let app_state = AppState::new(db.clone(), tokens.clone())
            .with_hash_params(HashParams::from_config(&config.auth))
            .with_self_registration_roles(config.auth.self_registration_roles()?);

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            gate: Arc::new(AccessGate::new(db, tokens)),
            rate_limit: Arc::new(
                RateLimitState::new(config.server.login_rate_limit)
                    .with_proxy_headers(config.server.trust_proxy_headers),
            ),
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the complete router: API, health check and Swagger UI.
    pub fn router(&self) -> Router {
        create_router(
            self.app_state.clone(),
            self.gate.clone(),
            self.rate_limit.clone(),
            &self.cors_origins,
        )
        .merge(create_health_router())
        .merge(create_swagger_router())
    }

    async fn bind(&self) -> std::io::Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        self.rate_limit.clone().start_cleanup_task();
        tracing::info!("Web server listening on http://{}", local_addr);
        Ok((listener, local_addr))
    }

    /// Run the web server until Ctrl-C.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.router();
        let (listener, _) = self.bind().await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let router = self.router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
