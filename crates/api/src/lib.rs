//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - the media storage endpoints (`/storage/*`)
//! - the health endpoints (`/health`, `/health/database`)
//! - the application state and router

pub mod routes;

use axum::Router;
use courier_core::media::Gateway;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Media storage gateway.
    pub media: Arc<Gateway>,
    /// Deployment environment label reported by the health endpoint.
    pub environment: String,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
