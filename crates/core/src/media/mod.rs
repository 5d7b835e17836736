//! Media storage gateway.
//!
//! Uploads files to, and deletes files from, a Cloudinary-style remote
//! media provider:
//! - credentials are resolved once at startup (configured iff cloud
//!   name, API key, and API secret are all present),
//! - uploads return the provider's canonical secure URL,
//! - deletes address the provider by a public id derived from that URL
//!   and are best-effort: failures are logged, never surfaced.

mod client;
mod config;
mod error;
mod public_id;
mod service;

pub use client::{CloudinaryClient, DeleteOutcome, ProviderError};
pub use config::{ConfigStatus, MediaCredentials};
pub use error::MediaError;
pub use public_id::extract_public_id;
pub use service::{MediaBackend, MediaGateway, UploadReceipt, UploadRequest};

/// Gateway wired to the real provider client.
pub type Gateway = MediaGateway<CloudinaryClient>;
