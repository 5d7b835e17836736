//! Provider credential resolution and masked status reporting.

use courier_shared::StorageSettings;
use serde::Serialize;

/// Mask marker appended to the visible prefix of the API key.
const MASK: &str = "****";

/// Validated provider credentials.
///
/// All three values are non-empty by construction. Resolved once at
/// startup and immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct MediaCredentials {
    /// Provider cloud name (tenant identifier).
    pub cloud_name: String,
    /// Provider API key.
    pub api_key: String,
    /// Provider API secret.
    pub api_secret: String,
}

impl MediaCredentials {
    /// Resolves credentials from raw settings.
    ///
    /// Returns `None` when any of the three values is missing or empty.
    /// Absence is a normal state, not an error.
    #[must_use]
    pub fn resolve(settings: &StorageSettings) -> Option<Self> {
        let cloud_name = non_empty(settings.cloud_name.as_deref())?;
        let api_key = non_empty(settings.api_key.as_deref())?;
        let api_secret = non_empty(settings.api_secret.as_deref())?;

        Some(Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Masked view of the storage configuration for operational monitoring.
///
/// The API key is reduced to its first four characters plus a mask
/// marker; the secret is reported only as present or absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatus {
    /// Whether all three credential values are present.
    pub configured: bool,
    /// The cloud name, visible as-is.
    pub cloud_name: Option<String>,
    /// Masked API key, e.g. `abcd****`; the bare mask marker when no
    /// key is configured.
    pub api_key_masked: String,
    /// Whether an API secret is present. The value itself is never included.
    pub has_api_secret: bool,
}

impl ConfigStatus {
    /// Builds the masked status view from raw settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self {
            configured: MediaCredentials::resolve(settings).is_some(),
            cloud_name: settings.cloud_name.clone().filter(|v| !v.is_empty()),
            api_key_masked: mask_api_key(settings.api_key.as_deref().unwrap_or("")),
            has_api_secret: non_empty(settings.api_secret.as_deref()).is_some(),
        }
    }
}

/// Masks an API key down to at most its first four characters.
fn mask_api_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{visible}{MASK}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(
        cloud_name: Option<&str>,
        api_key: Option<&str>,
        api_secret: Option<&str>,
    ) -> StorageSettings {
        StorageSettings {
            cloud_name: cloud_name.map(String::from),
            api_key: api_key.map(String::from),
            api_secret: api_secret.map(String::from),
        }
    }

    #[test]
    fn resolve_requires_all_three_values() {
        let full = settings(Some("demo"), Some("abcd1234"), Some("s3cret"));
        assert!(MediaCredentials::resolve(&full).is_some());

        assert!(MediaCredentials::resolve(&settings(None, Some("k"), Some("s"))).is_none());
        assert!(MediaCredentials::resolve(&settings(Some("c"), None, Some("s"))).is_none());
        assert!(MediaCredentials::resolve(&settings(Some("c"), Some("k"), None)).is_none());
    }

    #[test]
    fn resolve_treats_empty_strings_as_absent() {
        let partial = settings(Some(""), Some("abcd1234"), Some("s3cret"));
        assert!(MediaCredentials::resolve(&partial).is_none());
    }

    #[test]
    fn mask_reveals_at_most_four_characters() {
        assert_eq!(mask_api_key("abcd1234"), "abcd****");
        assert_eq!(mask_api_key("ab"), "ab****");
        assert_eq!(mask_api_key("abcd"), "abcd****");
        assert_eq!(mask_api_key(""), "****");
    }

    #[test]
    fn status_never_contains_the_secret() {
        let full = settings(Some("demo"), Some("abcd1234"), Some("s3cret"));
        let status = ConfigStatus::from_settings(&full);

        assert!(status.configured);
        assert_eq!(status.cloud_name.as_deref(), Some("demo"));
        assert_eq!(status.api_key_masked, "abcd****");
        assert!(status.has_api_secret);

        let body = serde_json::to_string(&status).unwrap();
        assert!(!body.contains("s3cret"));
        assert!(!body.contains("abcd1234"));
    }

    #[test]
    fn status_reports_partial_configuration() {
        let partial = settings(Some("demo"), None, None);
        let status = ConfigStatus::from_settings(&partial);

        assert!(!status.configured);
        assert_eq!(status.cloud_name.as_deref(), Some("demo"));
        assert_eq!(status.api_key_masked, "****");
        assert!(!status.has_api_secret);
    }
}
