//! HTTP server for chorus

use crate::routes;
use axum::Router;
use chorus_application::ModelInvoker;
use chorus_domain::Strategy;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
///
/// Holds no per-job state: each request gets its own orchestration run and
/// nothing survives the request/response cycle.
pub struct AppState {
    /// Invoker every job goes through
    pub invoker: Arc<dyn ModelInvoker>,
    /// Strategy applied when a request does not name one
    pub default_strategy: Strategy,
}

impl AppState {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self {
            invoker,
            default_strategy: Strategy::default(),
        }
    }

    pub fn with_default_strategy(mut self, strategy: Strategy) -> Self {
        self.default_strategy = strategy;
        self
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::job_routes())
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server on the given address until the listener fails
pub async fn run(state: AppState, addr: &str) -> std::io::Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await
}
