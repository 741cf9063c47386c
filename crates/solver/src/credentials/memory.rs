//! In-memory credential store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use super::{CredentialStore, CredentialStoreError, SecretData};

/// Credential store backed by an in-process map
///
/// Clones share the same secrets.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    /// Map of (namespace, name) -> secret payload
    secrets: Arc<RwLock<HashMap<(String, String), SecretData>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, builder style
    pub fn with_secret<I, K, V>(self, namespace: &str, name: &str, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        self.insert(namespace, name, data.into_iter().collect());
        self
    }

    /// Add or replace a secret
    pub fn insert(&self, namespace: &str, name: &str, data: SecretData) {
        self.secrets
            .write()
            .insert((namespace.to_string(), name.to_string()), data);
    }

    /// Remove a secret, returning whether it existed
    pub fn remove(&self, namespace: &str, name: &str) -> bool {
        self.secrets
            .write()
            .remove(&(namespace.to_string(), name.to_string()))
            .is_some()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData, CredentialStoreError> {
        let secrets = self.secrets.read();
        let found = secrets.get(&(namespace.to_string(), name.to_string()));
        trace!(
            namespace = %namespace,
            name = %name,
            found = found.is_some(),
            "Memory secret lookup"
        );
        found.cloned().ok_or(CredentialStoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = MemoryCredentialStore::new().with_secret("ns", "creds", [("key", "value")]);

        let data = store.get("ns", "creds").await.unwrap();
        assert_eq!(data.get("key"), Some(&b"value"[..]));

        assert!(store.remove("ns", "creds"));
        assert!(!store.remove("ns", "creds"));
        assert!(matches!(
            store.get("ns", "creds").await,
            Err(CredentialStoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store1 = MemoryCredentialStore::new();
        let store2 = store1.clone();

        store1.insert("ns", "creds", [("key", "value")].into_iter().collect());

        assert!(store2.get("ns", "creds").await.is_ok());
    }
}
