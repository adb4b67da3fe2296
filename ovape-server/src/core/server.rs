//! Server Implementation
//!
//! Router assembly and the HTTP serve loop

use std::time::Duration;

use axum::Router;
use axum::middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::{Config, Result, ServerState};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// uuid v4 request ids
#[derive(Clone, Default)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Public
        .merge(crate::api::health::router())
        // Customer directory + stamp ledger
        .merge(crate::api::customers::router())
        .merge(crate::api::stamps::router())
        // Audit log
        .merge(crate::api::logs::router())
        // After-service tickets
        .merge(crate::api::after_services::router())
}

/// Fully configured application (used by the server and by tests)
pub fn build_app(state: &ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_router()
        // JWT auth: resolves CurrentUser for every /api/ route
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_app(&state);
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("OVAPE stamp server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        state.pool.close().await;
        tracing::info!("Server stopped");
        Ok(())
    }
}
