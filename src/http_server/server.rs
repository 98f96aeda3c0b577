//! # HTTP Server
//!
//! Combines the person and health routers into one Axum app with CORS
//! and per-request tracing, then binds and serves it.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::service::{PersonService, PersonServiceImpl};
use crate::store::{Database, SqlPersonStore};

use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::person_routes::{person_routes, PersonState};

/// HTTP Server for the person API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Server over an arbitrary service; `db` is threaded into each request context
    pub fn new(
        config: HttpServerConfig,
        service: Arc<dyn PersonService>,
        db: Option<Database>,
    ) -> Self {
        let router = Self::build_router(&config, service, db);
        Self { config, router }
    }

    /// Production wiring: SQL store behind the person service
    pub fn with_database(config: HttpServerConfig, db: Database) -> Self {
        let service = Arc::new(PersonServiceImpl::new(SqlPersonStore::new()));
        Self::new(config, service, Some(db))
    }

    /// Build the combined router with all endpoints
    fn build_router(
        config: &HttpServerConfig,
        service: Arc<dyn PersonService>,
        db: Option<Database>,
    ) -> Router {
        let person_state = Arc::new(PersonState::new(
            service,
            db.clone(),
            config.request_timeout(),
        ));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes(db))
            .merge(person_routes(person_state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "person-api listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("person-api stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
