use std::sync::Arc;

use tokio::net::TcpListener;

use drover_sdk::Drover;

use crate::config::ServerConfig;
use crate::handler::AppState;
use crate::identity::AllowAllIdentity;
use crate::router::build_router;

/// The Drover HTTP server.
pub struct DroverServer {
    config: ServerConfig,
    state: AppState,
}

impl DroverServer {
    /// A server over a fresh, empty system with the default identity
    /// provider.
    pub fn new(config: ServerConfig) -> Self {
        let state = AppState::new(
            Arc::new(Drover::new()),
            Arc::new(AllowAllIdentity),
            config.clone(),
        );
        Self { config, state }
    }

    /// A server over an existing system (shared with other components).
    pub fn with_drover(config: ServerConfig, drover: Arc<Drover>) -> Self {
        let state = AppState::new(drover, Arc::new(AllowAllIdentity), config.clone());
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> std::io::Result<()> {
        let app = build_router(self.state);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("drover server listening on {}", self.config.bind_addr);
        axum::serve(listener, app).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = DroverServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "127.0.0.1:7410".parse().unwrap());
    }

    #[test]
    fn router_builds() {
        let server = DroverServer::new(ServerConfig::default());
        let _router = server.router();
    }
}
