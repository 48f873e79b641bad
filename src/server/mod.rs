//! HTTP server.
//!
//! Builds the axum [`Router`] around a shared [`IssueStore`] and runs it.
//!
//! # Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/api/issues/:project` | [`handlers::list_issues`] |
//! | POST | `/api/issues/:project` | [`handlers::create_issue`] |
//! | PUT | `/api/issues/:project` | [`handlers::update_issue`] |
//! | DELETE | `/api/issues/:project` | [`handlers::delete_issue`] |
//! | GET | `/healthz` | [`handlers::health`] |

pub mod body;
pub mod handlers;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::storage::IssueStore;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<IssueStore>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<IssueStore>) -> Self {
        Self {
            config,
            store,
            started_at: Utc::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route(
            "/api/issues/:project",
            get(handlers::list_issues)
                .post(handlers::create_issue)
                .put(handlers::update_issue)
                .delete(handlers::delete_issue),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Router over a fresh, empty store.
pub fn build_app(config: ServerConfig) -> Router {
    build_router(AppState::new(config, IssueStore::shared()))
}

/// Bind `config.bind_addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns [`Error::Io`] if the address cannot be bound or the server fails.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(
        service = %config.service_name,
        bind_addr = %local_addr,
        "issue tracker listening"
    );

    axum::serve(listener, build_app(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("issue tracker stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_request_error() {
            debug!(error = %self, "Rejected request");
            StatusCode::OK
        } else if matches!(self, Self::InvalidBody(_)) {
            debug!(error = %self, "Malformed request body");
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(self.to_body())).into_response()
    }
}
