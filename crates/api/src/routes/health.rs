//! Health check endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::AppState;

/// Creates the health routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(liveness))
        .route("/health/database", get(database))
}

/// Liveness response.
#[derive(Serialize)]
struct LivenessResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    environment: String,
}

/// GET `/health`
///
/// Constant-time liveness check; no external calls.
async fn liveness(State(state): State<AppState>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "healthy",
        timestamp: Utc::now(),
        environment: state.environment.clone(),
    })
}

/// GET `/health/database`
///
/// Probes database connectivity with a bounded timeout and enumerates
/// applied and pending migrations. Probe failures become a structured
/// 503 body; they never crash the process.
async fn database(State(state): State<AppState>) -> impl IntoResponse {
    match courier_db::health::probe(&state.db).await {
        Ok(status) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": {
                    "connected": true,
                    "provider": status.provider,
                    "appliedMigrations": status.applied_migrations.len(),
                    "pendingMigrations": status.pending_migrations.len(),
                    "migrations": {
                        "applied": status.applied_migrations,
                        "pending": status.pending_migrations,
                    },
                },
                "timestamp": Utc::now(),
            })),
        ),
        Err(e) => {
            error!(error = %e, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "message": "Database connection failed",
                    "error": e.to_string(),
                    "timestamp": Utc::now(),
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use axum::body::Body;
    use axum::http::Request;
    use courier_core::media::MediaGateway;
    use courier_shared::StorageSettings;
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::default()),
            media: Arc::new(MediaGateway::from_settings(StorageSettings::default())),
            environment: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn liveness_reports_healthy_with_environment_label() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["environment"], "test");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn database_probe_failure_yields_structured_unhealthy_body() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health/database")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["message"], "Database connection failed");
        assert!(json["error"].is_string());
    }
}
