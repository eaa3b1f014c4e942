//! # FZ152 API
//!
//! HTTP layer - routes, handlers and the server entry point.
//!
//! This crate contains:
//! - Handlers for `/anonymize`, `/audit` and `/health`
//! - Application context (dependency injection)
//! - Error to status-code mapping
//!
//! ## Architecture
//! - Depends on `domain`, `core` and `infra`
//! - Wires configuration into the privacy filter service
//! - Runs the CPU-bound pipeline off the async executor

pub mod commands;
pub mod context;
pub mod error;
pub mod utils;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

pub use context::AppContext;
pub use error::{ApiError, ApiResult};

/// Create the application router
pub fn create_router(context: Arc<AppContext>) -> Router {
    let body_limit = context.config.server.max_body_bytes;

    Router::new()
        .route("/anonymize", post(commands::anonymize))
        .route("/audit", post(commands::audit))
        .route("/health", get(commands::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(context)
}
