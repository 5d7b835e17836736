//! HTTP client for the media provider's upload and destroy API.

use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::config::MediaCredentials;

/// Transformation hints requesting automatic quality and format
/// optimization on upload.
const TRANSFORMATION: &str = "q_auto,f_auto";

/// Signature algorithm advertised to the provider.
const SIGNATURE_ALGORITHM: &str = "sha256";

/// Errors returned by the provider client.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider reported a failure in its own error payload.
    #[error("provider rejected the request: {0}")]
    Api(String),

    /// The network round-trip itself failed.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a body the client could not interpret.
    #[error("unexpected provider response: {0}")]
    Response(String),
}

/// Outcome of a delete call.
///
/// Both `Deleted` and `NotFound` are success from the caller's
/// perspective; `Other` carries the provider's verbatim result string
/// and is logged as a warning by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The provider removed the file.
    Deleted,
    /// The provider had no file under that id.
    NotFound,
    /// Any other provider result string.
    Other(String),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: Option<String>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Thin adapter over the provider's network API.
///
/// Holds an immutable connection handle and credentials; safe for
/// concurrent use. Performs no retry or backoff.
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    credentials: MediaCredentials,
}

impl CloudinaryClient {
    /// Creates a client for the given credentials.
    #[must_use]
    pub fn new(credentials: MediaCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/{}",
            self.credentials.cloud_name, action
        )
    }

    /// Signs the request parameters: `k=v` pairs sorted by key, joined
    /// with `&`, with the API secret appended, hashed with SHA-256.
    fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let joined = sorted
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        hex::encode(Sha256::digest(format!("{joined}{api_secret}").as_bytes()))
    }

    /// Uploads content to the provider and returns the secure URL.
    ///
    /// The upload requests automatic quality/format optimization and
    /// overwrites any prior content under the same target name.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport fails or the provider reports
    /// a failure payload.
    pub async fn upload(
        &self,
        content: Bytes,
        file_name: &str,
        folder: &str,
    ) -> Result<String, ProviderError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::sign(
            &[
                ("folder", folder),
                ("overwrite", "true"),
                ("timestamp", &timestamp),
                ("transformation", TRANSFORMATION),
            ],
            &self.credentials.api_secret,
        );

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::stream(content).file_name(file_name.to_string()),
            )
            .text("folder", folder.to_string())
            .text("overwrite", "true")
            .text("transformation", TRANSFORMATION)
            .text("timestamp", timestamp)
            .text("api_key", self.credentials.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", SIGNATURE_ALGORITHM);

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|_| ProviderError::Response(format!("status {status}: {body}")))?;

        if let Some(error) = parsed.error {
            return Err(ProviderError::Api(error.message));
        }

        parsed
            .secure_url
            .ok_or_else(|| ProviderError::Response(format!("status {status}: missing secure_url")))
    }

    /// Deletes the file addressed by `public_id`.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport fails or the provider reports
    /// a failure payload; result strings other than `ok` / `not found`
    /// are surfaced as [`DeleteOutcome::Other`], not as errors.
    pub async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, ProviderError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = Self::sign(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.credentials.api_secret,
        );

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.credentials.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", SIGNATURE_ALGORITHM);

        let response = self
            .http
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: DestroyResponse = serde_json::from_str(&body)
            .map_err(|_| ProviderError::Response(format!("status {status}: {body}")))?;

        if let Some(error) = parsed.error {
            return Err(ProviderError::Api(error.message));
        }

        Ok(
            match parsed.result.as_deref() {
                Some("ok") => DeleteOutcome::Deleted,
                Some("not found") => DeleteOutcome::NotFound,
                Some(other) => DeleteOutcome::Other(other.to_string()),
                None => DeleteOutcome::Other("missing result".to_string()),
            },
        )
    }
}
