//! Provider credential resolution
//!
//! Credentials live in a namespaced secret store, referenced from the
//! per-request config by secret name and key. Backends:
//!
//! - [`DirectorySecretStore`] - mounted secret volumes on disk
//! - `MemoryCredentialStore` - in-process map, behind the `test-util` feature

mod directory;
#[cfg(any(test, feature = "test-util"))]
mod memory;

pub use directory::DirectorySecretStore;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryCredentialStore;

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use dns01_config::ProviderConfig;

use crate::api::{DnsApi, DnsSession};
use crate::error::{SolverError, SolverResult};

/// Errors reported by a credential store
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    /// No secret with that name exists in the namespace
    #[error("secret not found")]
    NotFound,

    /// The store could not be queried
    #[error("credential store error: {0}")]
    Backend(String),
}

/// Key-value payload of a secret
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretData(BTreeMap<String, Vec<u8>>);

impl SecretData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Values are credentials; only the keys are printed.
impl Debug for SecretData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for SecretData
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Namespaced secret storage
#[async_trait]
pub trait CredentialStore: Send + Sync + Debug {
    /// Fetch the secret `name` from `namespace`
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData, CredentialStoreError>;
}

/// Turns a credential reference into an authenticated provider session
#[derive(Debug, Clone, Copy)]
pub struct CredentialResolver<'a> {
    store: &'a dyn CredentialStore,
    dns: &'a dyn DnsApi,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(store: &'a dyn CredentialStore, dns: &'a dyn DnsApi) -> Self {
        Self { store, dns }
    }

    /// Fetch the raw API key referenced by `config` from `namespace`
    pub async fn api_key(&self, config: &ProviderConfig, namespace: &str) -> SolverResult<Vec<u8>> {
        let selector = &config.api_key_secret_ref;

        let secret = self
            .store
            .get(namespace, &selector.name)
            .await
            .map_err(|e| SolverError::SecretNotFound {
                namespace: namespace.to_string(),
                name: selector.name.clone(),
                reason: e.to_string(),
            })?;

        let value = secret
            .get(&selector.key)
            .ok_or_else(|| SolverError::SecretKeyNotFound {
                key: selector.key.clone(),
                name: selector.name.clone(),
                namespace: namespace.to_string(),
            })?;

        debug!(
            namespace = %namespace,
            secret = %selector.name,
            key = %selector.key,
            "Resolved provider API key"
        );

        Ok(value.to_vec())
    }

    /// Resolve the API key and open a session for the configured account
    pub async fn open_session(
        &self,
        config: &ProviderConfig,
        namespace: &str,
    ) -> SolverResult<Box<dyn DnsSession>> {
        let raw = self.api_key(config, namespace).await?;

        let api_key = String::from_utf8(raw).map_err(|_| SolverError::Session {
            username: config.username.clone(),
            message: format!(
                "API key in secret '{}/{}' is not valid UTF-8",
                namespace, config.api_key_secret_ref.name
            ),
        })?;

        self.dns
            .authenticate(&config.username, &api_key)
            .map_err(|e| SolverError::Session {
                username: config.username.clone(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryDns;
    use dns01_config::SecretKeySelector;

    fn config(name: &str, key: &str) -> ProviderConfig {
        ProviderConfig {
            username: "SL123456".to_string(),
            api_key_secret_ref: SecretKeySelector {
                name: name.to_string(),
                key: key.to_string(),
            },
        }
    }

    fn store() -> MemoryCredentialStore {
        MemoryCredentialStore::new().with_secret(
            "cert-manager",
            "softlayer",
            [("api-key", "s3cr3t"), ("other", "x")],
        )
    }

    #[test]
    fn test_secret_data_debug_hides_values() {
        let data: SecretData = [("api-key", "s3cr3t")].into_iter().collect();
        let printed = format!("{:?}", data);
        assert!(printed.contains("api-key"));
        assert!(!printed.contains("s3cr3t"));
    }

    #[tokio::test]
    async fn test_resolve_api_key() {
        let store = store();
        let dns = MemoryDns::new();
        let resolver = CredentialResolver::new(&store, &dns);

        let key = resolver
            .api_key(&config("softlayer", "api-key"), "cert-manager")
            .await
            .unwrap();
        assert_eq!(key, b"s3cr3t");
    }

    #[tokio::test]
    async fn test_missing_secret() {
        let store = store();
        let dns = MemoryDns::new();
        let resolver = CredentialResolver::new(&store, &dns);

        let err = resolver
            .api_key(&config("missing", "api-key"), "cert-manager")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SolverError::SecretNotFound { ref name, ref namespace, .. }
                if name == "missing" && namespace == "cert-manager"
        ));

        // Secrets are namespace scoped
        let err = resolver
            .api_key(&config("softlayer", "api-key"), "other-namespace")
            .await
            .unwrap_err();
        assert!(matches!(err, SolverError::SecretNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let store = store();
        let dns = MemoryDns::new();
        let resolver = CredentialResolver::new(&store, &dns);

        let err = resolver
            .api_key(&config("softlayer", "token"), "cert-manager")
            .await
            .unwrap_err();
        match err {
            SolverError::SecretKeyNotFound {
                key,
                name,
                namespace,
            } => {
                assert_eq!(key, "token");
                assert_eq!(name, "softlayer");
                assert_eq!(namespace, "cert-manager");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_open_session() {
        let store = store();
        let dns = MemoryDns::new();
        let resolver = CredentialResolver::new(&store, &dns);

        let session = resolver
            .open_session(&config("softlayer", "api-key"), "cert-manager")
            .await
            .unwrap();
        assert_eq!(session.account(), "SL123456");
    }

    #[tokio::test]
    async fn test_open_session_rejected_credentials() {
        let store = store();
        let dns = MemoryDns::new().require_credentials("SL123456", "different");
        let resolver = CredentialResolver::new(&store, &dns);

        let err = resolver
            .open_session(&config("softlayer", "api-key"), "cert-manager")
            .await
            .unwrap_err();
        assert!(
            matches!(err, SolverError::Session { ref username, .. } if username == "SL123456")
        );
    }

    #[tokio::test]
    async fn test_open_session_non_utf8_key() {
        let store = MemoryCredentialStore::new().with_secret(
            "cert-manager",
            "softlayer",
            [("api-key", vec![0xff, 0xfe])],
        );
        let dns = MemoryDns::new();
        let resolver = CredentialResolver::new(&store, &dns);

        let err = resolver
            .open_session(&config("softlayer", "api-key"), "cert-manager")
            .await
            .unwrap_err();
        assert!(matches!(err, SolverError::Session { .. }));
    }
}
