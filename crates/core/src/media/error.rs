//! Media gateway error types.

use thiserror::Error;

/// Errors surfaced by the media gateway's public operations.
///
/// Expected conditions (empty input, missing credentials) are explicit
/// variants, not exceptions; only genuine provider faults carry a
/// forwarded message.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Malformed or empty input; detected before any network attempt.
    #[error("validation error: {0}")]
    Validation(String),

    /// Provider credentials are missing; detected before any network attempt.
    #[error("media storage is not configured")]
    Unconfigured,

    /// The provider returned an error payload or the transport failed.
    #[error("provider failure: {0}")]
    Provider(String),
}

impl MediaError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a provider failure carrying the underlying message.
    #[must_use]
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unconfigured => 503,
            Self::Provider(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        assert_eq!(MediaError::validation("empty").status_code(), 400);
        assert_eq!(MediaError::Unconfigured.status_code(), 503);
        assert_eq!(MediaError::provider("boom").status_code(), 500);
    }
}
