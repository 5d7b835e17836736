//! Media storage endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use courier_core::media::{MediaError, UploadRequest};

use crate::AppState;

/// Folder used when the multipart request carries no `folder` field.
const DEFAULT_FOLDER: &str = "uploads";

/// Creates the storage routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/storage/config", get(config_status))
        .route("/storage/upload", post(upload))
        .route("/storage/delete", delete(delete_file))
}

/// Response for a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    url: String,
    file_name: String,
    file_size: i64,
    folder: String,
    timestamp: DateTime<Utc>,
}

/// Response for a delete request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    success: bool,
    message: &'static str,
    file_url: String,
    timestamp: DateTime<Utc>,
}

/// Query parameters for the delete endpoint.
#[derive(Debug, Deserialize)]
struct DeleteParams {
    #[serde(rename = "fileUrl", default)]
    file_url: Option<String>,
}

/// GET `/storage/config`
///
/// Reports the masked storage configuration status. The full API key
/// and the secret value are never included.
async fn config_status(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.media.config_status();

    Json(json!({
        "configured": status.configured,
        "cloudName": status.cloud_name,
        "apiKeyMasked": status.api_key_masked,
        "hasApiSecret": status.has_api_secret,
        "timestamp": Utc::now(),
    }))
}

/// Multipart fields accepted by the upload endpoint.
struct UploadForm {
    content: Bytes,
    file_name: String,
    folder: String,
}

/// Reads the `file` and `folder` fields from the multipart body.
async fn read_upload_form(multipart: &mut Multipart) -> Result<Option<UploadForm>, String> {
    let mut file: Option<(Bytes, String)> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| e.to_string())?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("file").to_string();
                let content = field.bytes().await.map_err(|e| e.to_string())?;
                file = Some((content, file_name));
            }
            Some("folder") => {
                folder = Some(field.text().await.map_err(|e| e.to_string())?);
            }
            _ => {}
        }
    }

    Ok(file.map(|(content, file_name)| UploadForm {
        content,
        file_name,
        folder: folder
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
    }))
}

/// POST `/storage/upload`
///
/// Uploads a multipart file to the media provider.
async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> impl IntoResponse {
    let form = match read_upload_form(&mut multipart).await {
        Ok(Some(form)) if !form.content.is_empty() => form,
        Ok(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "No file provided" })),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Malformed multipart body", "error": e })),
            )
                .into_response();
        }
    };

    info!(
        file_name = %form.file_name,
        size = form.content.len(),
        folder = %form.folder,
        "uploading file"
    );

    let request = UploadRequest {
        content: form.content,
        file_name: form.file_name,
        folder: form.folder,
    };

    match state.media.upload(request).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(UploadResponse {
                success: true,
                url: receipt.secure_url,
                file_name: receipt.file_name,
                file_size: receipt.size_bytes,
                folder: receipt.folder,
                timestamp: receipt.uploaded_at,
            }),
        )
            .into_response(),
        Err(MediaError::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": msg })),
        )
            .into_response(),
        Err(e @ MediaError::Unconfigured) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "message": "Media storage is not configured",
                "error": e.to_string(),
            })),
        )
            .into_response(),
        Err(MediaError::Provider(detail)) => {
            error!(error = %detail, "upload failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Upload failed", "error": detail })),
            )
                .into_response()
        }
    }
}

/// DELETE `/storage/delete?fileUrl=`
///
/// Best-effort deletion of a previously uploaded file. Provider
/// failures are logged by the gateway and never surfaced here.
async fn delete_file(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> impl IntoResponse {
    let Some(file_url) = params.file_url.filter(|u| !u.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "File URL is required" })),
        )
            .into_response();
    };

    match state.media.delete(&file_url).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteResponse {
                success: true,
                message: "File deleted successfully",
                file_url,
                timestamp: Utc::now(),
            }),
        )
            .into_response(),
        Err(MediaError::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": msg })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, url = %file_url, "delete failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Delete failed", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use axum::body::Body;
    use axum::http::{Request, header::CONTENT_TYPE};
    use courier_core::media::MediaGateway;
    use courier_shared::StorageSettings;
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with_settings(settings: StorageSettings) -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::default()),
            media: Arc::new(MediaGateway::from_settings(settings)),
            environment: "test".to_string(),
        }
    }

    fn unconfigured_state() -> AppState {
        state_with_settings(StorageSettings::default())
    }

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        const BOUNDARY: &str = "courier-test-boundary";
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/storage/upload")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn config_masks_the_api_key_and_omits_the_secret() {
        let app = create_router(state_with_settings(StorageSettings {
            cloud_name: Some("demo".to_string()),
            api_key: Some("abcd1234".to_string()),
            api_secret: Some("s3cret".to_string()),
        }));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/storage/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("abcd1234"));
        assert!(!text.contains("s3cret"));

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["configured"], true);
        assert_eq!(json["cloudName"], "demo");
        assert_eq!(json["apiKeyMasked"], "abcd****");
        assert_eq!(json["hasApiSecret"], true);
    }

    #[tokio::test]
    async fn upload_without_a_file_part_is_a_bad_request() {
        let app = create_router(unconfigured_state());

        let response = app
            .oneshot(multipart_request(&[("folder", None, "uploads")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "No file provided");
    }

    #[tokio::test]
    async fn upload_with_an_empty_file_is_a_bad_request() {
        let app = create_router(unconfigured_state());

        let response = app
            .oneshot(multipart_request(&[("file", Some("empty.png"), "")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_unconfigured_is_service_unavailable() {
        let app = create_router(unconfigured_state());

        let response = app
            .oneshot(multipart_request(&[("file", Some("photo.png"), "bytes")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Media storage is not configured");
    }

    #[tokio::test]
    async fn delete_without_file_url_is_a_bad_request() {
        let app = create_router(unconfigured_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/storage/delete")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "File URL is required");
    }

    #[tokio::test]
    async fn delete_with_unaddressable_url_still_succeeds() {
        let app = create_router(unconfigured_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/storage/delete?fileUrl=https://example.com/no/marker.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["fileUrl"], "https://example.com/no/marker.jpg");
    }
}
