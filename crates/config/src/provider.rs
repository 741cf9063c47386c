//! Per-request solver configuration
//!
//! Issuers attach an opaque JSON blob to each challenge. It names the
//! provider account and points at the secret holding the API key:
//!
//! ```json
//! {
//!   "username": "SL123456",
//!   "apiKeySecretRef": { "name": "softlayer-credentials", "key": "api-key" }
//! }
//! ```
//!
//! The blob never carries the API key itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Malformed per-request configuration
#[derive(Debug, Error)]
#[error("error decoding solver config: {source}")]
pub struct ConfigDecodeError {
    #[from]
    source: serde_json::Error,
}

/// Reference to one key of a namespaced secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretKeySelector {
    /// Secret name within the request's namespace
    pub name: String,
    /// Key inside the secret's data
    pub key: String,
}

/// Typed provider configuration decoded from a challenge request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Provider account identifier
    pub username: String,
    /// Where to find the provider API key
    pub api_key_secret_ref: SecretKeySelector,
}

impl ProviderConfig {
    /// Decode the configuration blob of a challenge request
    ///
    /// An absent blob (or a JSON `null`) yields a zero-valued config, which
    /// lets issuers that need no per-issuer configuration omit it entirely.
    pub fn decode(blob: Option<&[u8]>) -> Result<Self, ConfigDecodeError> {
        let Some(raw) = blob else {
            trace!("No solver config provided, using defaults");
            return Ok(Self::default());
        };

        let decoded: Option<Self> = serde_json::from_slice(raw)?;
        Ok(decoded.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_config_is_zero_valued() {
        let config = ProviderConfig::decode(None).unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert!(config.username.is_empty());
        assert!(config.api_key_secret_ref.name.is_empty());
    }

    #[test]
    fn test_null_config_is_zero_valued() {
        let config = ProviderConfig::decode(Some(b"null")).unwrap();
        assert_eq!(config, ProviderConfig::default());
    }

    #[test]
    fn test_decode_full_config() {
        let raw = br#"{
            "username": "SL123456",
            "apiKeySecretRef": { "name": "softlayer-credentials", "key": "api-key" }
        }"#;

        let config = ProviderConfig::decode(Some(raw)).unwrap();
        assert_eq!(config.username, "SL123456");
        assert_eq!(config.api_key_secret_ref.name, "softlayer-credentials");
        assert_eq!(config.api_key_secret_ref.key, "api-key");
    }

    #[test]
    fn test_missing_fields_default() {
        let config = ProviderConfig::decode(Some(br#"{"username": "SL1"}"#)).unwrap();
        assert_eq!(config.username, "SL1");
        assert_eq!(config.api_key_secret_ref, SecretKeySelector::default());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let raw = br#"{"username": "SL1", "region": "dal10"}"#;
        assert!(ProviderConfig::decode(Some(raw)).is_ok());
    }

    #[test]
    fn test_malformed_json_fails() {
        let err = ProviderConfig::decode(Some(br#"{"username": "#)).unwrap_err();
        assert!(err.to_string().contains("error decoding solver config"));
    }

    #[test]
    fn test_schema_mismatch_fails() {
        let inputs: [&[u8]; 3] = [
            br#"{"username": 42}"#,
            br#""SL1""#,
            br#"{"apiKeySecretRef": "x"}"#,
        ];
        for raw in inputs {
            assert!(ProviderConfig::decode(Some(raw)).is_err());
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_decode_arbitrary_bytes_never_panics(
            bytes in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..256)
        ) {
            let _ = ProviderConfig::decode(Some(&bytes));
        }
    }
}
