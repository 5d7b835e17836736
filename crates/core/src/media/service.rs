//! Media gateway orchestration.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use courier_shared::StorageSettings;
use tracing::{error, warn};

use super::client::{CloudinaryClient, DeleteOutcome, ProviderError};
use super::config::{ConfigStatus, MediaCredentials};
use super::error::MediaError;
use super::public_id::extract_public_id;

/// Provider backend trait.
///
/// Implemented by [`CloudinaryClient`] for the real provider; tests
/// substitute in-memory stubs.
pub trait MediaBackend: Send + Sync {
    /// Uploads content and returns the provider's secure URL.
    fn upload(
        &self,
        content: Bytes,
        file_name: &str,
        folder: &str,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;

    /// Deletes the file addressed by `public_id`.
    fn delete(
        &self,
        public_id: &str,
    ) -> impl std::future::Future<Output = Result<DeleteOutcome, ProviderError>> + Send;
}

impl MediaBackend for CloudinaryClient {
    async fn upload(
        &self,
        content: Bytes,
        file_name: &str,
        folder: &str,
    ) -> Result<String, ProviderError> {
        Self::upload(self, content, file_name, folder).await
    }

    async fn delete(&self, public_id: &str) -> Result<DeleteOutcome, ProviderError> {
        Self::delete(self, public_id).await
    }
}

/// Request to upload a file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File content.
    pub content: Bytes,
    /// Original filename, echoed back in the receipt.
    pub file_name: String,
    /// Target folder on the provider.
    pub folder: String,
}

/// Receipt produced on a successful upload.
///
/// Ownership transfers entirely to the caller; the gateway retains no
/// state about uploaded files.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// The provider-issued, externally addressable URL.
    pub secure_url: String,
    /// Original filename.
    pub file_name: String,
    /// Uploaded content length in bytes.
    pub size_bytes: i64,
    /// Folder the file was uploaded into.
    pub folder: String,
    /// When the upload completed.
    pub uploaded_at: DateTime<Utc>,
}

enum ProviderState<B> {
    Configured(B),
    Unconfigured,
}

/// Media storage gateway.
///
/// Stateless per call: both operations are single-shot, with no
/// cross-request shared mutable state beyond the immutable credentials
/// and the client's connection handle.
pub struct MediaGateway<B> {
    provider: ProviderState<B>,
    settings: StorageSettings,
}

impl MediaGateway<CloudinaryClient> {
    /// Builds the gateway from raw storage settings, resolving
    /// credentials once. Logs a warning when credentials are missing;
    /// the gateway still constructs and reports `Unconfigured` on
    /// upload attempts.
    #[must_use]
    pub fn from_settings(settings: StorageSettings) -> Self {
        let provider = match MediaCredentials::resolve(&settings) {
            Some(credentials) => ProviderState::Configured(CloudinaryClient::new(credentials)),
            None => {
                warn!("media storage configuration is missing; file uploads will fail");
                ProviderState::Unconfigured
            }
        };

        Self { provider, settings }
    }
}

impl<B: MediaBackend> MediaGateway<B> {
    /// Builds a gateway around an already-constructed backend.
    #[must_use]
    pub fn with_backend(backend: B, settings: StorageSettings) -> Self {
        Self {
            provider: ProviderState::Configured(backend),
            settings,
        }
    }

    /// Builds an unconfigured gateway.
    #[must_use]
    pub fn unconfigured(settings: StorageSettings) -> Self {
        Self {
            provider: ProviderState::Unconfigured,
            settings,
        }
    }

    /// Whether provider credentials were resolved at startup.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self.provider, ProviderState::Configured(_))
    }

    /// Masked configuration status for operational monitoring.
    #[must_use]
    pub fn config_status(&self) -> ConfigStatus {
        ConfigStatus::from_settings(&self.settings)
    }

    /// Uploads a file to the provider.
    ///
    /// Validation and configuration are checked before any network
    /// attempt.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Validation`] for empty content,
    /// [`MediaError::Unconfigured`] when credentials are missing, and
    /// [`MediaError::Provider`] when the provider call fails.
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, MediaError> {
        if request.content.is_empty() {
            return Err(MediaError::validation("file is empty"));
        }

        let ProviderState::Configured(backend) = &self.provider else {
            return Err(MediaError::Unconfigured);
        };

        let size_bytes = i64::try_from(request.content.len()).unwrap_or(i64::MAX);

        let secure_url = backend
            .upload(request.content, &request.file_name, &request.folder)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    file_name = %request.file_name,
                    folder = %request.folder,
                    "media upload failed"
                );
                MediaError::provider(e.to_string())
            })?;

        Ok(UploadReceipt {
            secure_url,
            file_name: request.file_name,
            size_bytes,
            folder: request.folder,
            uploaded_at: Utc::now(),
        })
    }

    /// Deletes the file behind a previously issued secure URL.
    ///
    /// Deletion is best-effort: URLs with no derivable public id,
    /// not-found results, anomalous provider results, and transport
    /// failures all resolve to success after logging. Only an empty URL
    /// is an error.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Validation`] when `file_url` is empty.
    pub async fn delete(&self, file_url: &str) -> Result<(), MediaError> {
        if file_url.is_empty() {
            return Err(MediaError::validation("file URL is required"));
        }

        let Some(public_id) = extract_public_id(file_url) else {
            // Nothing addressable to delete.
            return Ok(());
        };

        let ProviderState::Configured(backend) = &self.provider else {
            return Ok(());
        };

        match backend.delete(&public_id).await {
            Ok(DeleteOutcome::Deleted | DeleteOutcome::NotFound) => {}
            Ok(DeleteOutcome::Other(result)) => {
                warn!(%result, %public_id, "provider did not confirm media deletion");
            }
            Err(e) => {
                error!(error = %e, url = %file_url, "media delete failed");
            }
        }

        Ok(())
    }
}
