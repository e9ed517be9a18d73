//! HTTP API server for the concierge gateway

pub mod admin;
pub mod assistant;
mod auth;
pub mod health;
pub mod rate_limit;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, Method, header};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::concierge::Concierge;
use crate::config::ApiServerConfig;
use crate::db::{ConversationRepo, DbPool};

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub db: DbPool,
    pub conversations: ConversationRepo,
    pub concierge: Arc<Concierge>,
    pub api_key: Option<String>,
    pub rate_limiter: Option<rate_limit::SharedLimiter>,
}

impl ApiState {
    /// State with no admin key and no rate limit
    #[must_use]
    pub fn new(db: DbPool, concierge: Arc<Concierge>) -> Self {
        Self {
            conversations: ConversationRepo::new(db.clone()),
            db,
            concierge,
            api_key: None,
            rate_limiter: None,
        }
    }
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    db: DbPool,
    concierge: Arc<Concierge>,
    host: String,
    port: u16,
    api_key: Option<String>,
    static_dir: Option<PathBuf>,
    rate_limit_per_minute: Option<u32>,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(db: DbPool, concierge: Arc<Concierge>) -> Self {
        let defaults = ApiServerConfig::default();
        Self {
            db,
            concierge,
            host: defaults.host,
            port: defaults.port,
            api_key: None,
            static_dir: None,
            rate_limit_per_minute: None,
        }
    }

    /// Apply every server setting from configuration
    #[must_use]
    pub fn server_config(mut self, config: &ApiServerConfig) -> Self {
        self.host.clone_from(&config.host);
        self.port = config.port;
        self.api_key.clone_from(&config.api_key);
        self.static_dir.clone_from(&config.static_dir);
        self.rate_limit_per_minute = config.rate_limit_per_minute;
        self
    }

    /// Set the port to listen on
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the API key for admin endpoints
    #[must_use]
    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    /// Set the static files directory for serving the browser front-end
    #[must_use]
    pub fn static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Limit total requests per minute
    #[must_use]
    pub const fn rate_limit(mut self, requests_per_minute: Option<u32>) -> Self {
        self.rate_limit_per_minute = requests_per_minute;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let rate_limiter = self.rate_limit_per_minute.map(rate_limit::create_limiter);

        let state = Arc::new(ApiState {
            api_key: self.api_key,
            rate_limiter,
            ..ApiState::new(self.db, self.concierge)
        });

        ApiServer {
            state,
            addr: format!("{}:{}", self.host, self.port),
            static_dir: self.static_dir,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    addr: String,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Shared handler state
    #[must_use]
    pub const fn state(&self) -> &Arc<ApiState> {
        &self.state
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .nest("/api/admin", admin::router(self.state.clone()))
            .merge(assistant::router(self.state.clone()))
            .merge(health::router())
            .merge(health::ready_router(self.state.clone()));

        // Serve the browser front-end if configured; unknown paths get the index page
        if let Some(static_dir) = &self.static_dir {
            let index_file = static_dir.join("index.html");
            let serve_dir = ServeDir::new(static_dir).fallback(ServeFile::new(&index_file));

            router = router.fallback_service(serve_dir);
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        let router = router.layer(axum::middleware::from_fn_with_state(
            self.state.clone(),
            rate_limit::rate_limit_middleware,
        ));

        router.layer(cors_layer()).layer(TraceLayer::new_for_http())
    }

    /// Run the API server on the configured address
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        self.serve(listener).await
    }

    /// Run the API server on an already-bound listener
    ///
    /// # Errors
    ///
    /// Returns error if the server fails while running
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }

    /// Run the API server in a background task
    #[must_use]
    pub fn spawn(self, listener: TcpListener) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.serve(listener).await })
    }
}

/// CORS policy for browser clients on any origin
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}
