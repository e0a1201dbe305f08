#![deny(missing_docs)]
//! REST surface for the Reddit tools.
//!
//! Every tool is reachable as `POST /api/{tool}` with the argument object as
//! the JSON body. Calls go through an MCP [`Session`], so the REST layer
//! sees exactly what any other MCP client sees. A lost session is reopened
//! on the next request.
//!
//! | Route | Answer |
//! |-------|--------|
//! | `GET /` | service banner |
//! | `GET /api/health` | `{"status": "healthy", "tools": n}` |
//! | `POST /api/{tool}` | `{"success": true, "data": ...}` or `{"success": false, "error": {...}}` |

mod error;
mod response;
mod routes;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::RestError;
pub use response::{ApiError, ApiResponse, status_for};
pub use session::Session;

/// Shared state of the REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The MCP session every request goes through.
    pub session: Arc<Session>,
}

/// Build the router.
pub fn router(session: Arc<Session>) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { session })
}

/// Bind `addr` and serve until the listener fails.
///
/// # Errors
///
/// [`RestError::Bind`] if the address cannot be bound, [`RestError::Serve`]
/// if serving stops with an error.
pub async fn serve(addr: SocketAddr, session: Arc<Session>) -> Result<(), RestError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| RestError::Bind { addr, source })?;
    tracing::info!(%addr, "REST server listening");
    axum::serve(listener, router(session))
        .await
        .map_err(RestError::Serve)
}
