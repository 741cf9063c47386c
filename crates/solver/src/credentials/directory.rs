//! Mounted secret volumes
//!
//! Reads secrets laid out the way a Kubernetes secret volume is mounted:
//!
//! ```text
//! root/
//! └── cert-manager/            # namespace
//!     └── softlayer/           # secret name
//!         ├── api-key          # one file per key
//!         └── ..data -> ...    # kubelet bookkeeping, skipped
//! ```

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, trace, warn};

use super::{CredentialStore, CredentialStoreError, SecretData};

/// Credential store reading secrets from a directory tree
#[derive(Debug, Clone)]
pub struct DirectorySecretStore {
    root: PathBuf,
}

impl DirectorySecretStore {
    /// Open a store rooted at `root`
    ///
    /// # Errors
    ///
    /// Fails if `root` is not an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CredentialStoreError> {
        let root = root.into();
        let metadata = std::fs::metadata(&root).map_err(|e| {
            CredentialStoreError::Backend(format!(
                "secrets directory '{}' is not readable: {}",
                root.display(),
                e
            ))
        })?;

        if !metadata.is_dir() {
            return Err(CredentialStoreError::Backend(format!(
                "secrets path '{}' is not a directory",
                root.display()
            )));
        }

        debug!(root = %root.display(), "Opened secret directory");
        Ok(Self { root })
    }

    fn secret_dir(&self, namespace: &str, name: &str) -> Result<PathBuf, CredentialStoreError> {
        if namespace.is_empty() || name.is_empty() {
            return Err(CredentialStoreError::NotFound);
        }
        for component in [namespace, name] {
            if !is_plain_component(component) {
                return Err(CredentialStoreError::Backend(format!(
                    "invalid secret path component '{}'",
                    component
                )));
            }
        }
        Ok(self.root.join(namespace).join(name))
    }
}

/// A single path component that cannot escape the store root
fn is_plain_component(component: &str) -> bool {
    component != "."
        && component != ".."
        && !component.contains('/')
        && !component.contains('\\')
        && !component.contains('\0')
}

#[async_trait]
impl CredentialStore for DirectorySecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretData, CredentialStoreError> {
        let dir = self.secret_dir(namespace, name)?;

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                trace!(path = %dir.display(), "Secret directory not found");
                return Err(CredentialStoreError::NotFound);
            }
            Err(e) => return Err(backend_error(&dir, e)),
        };

        let mut data = SecretData::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| backend_error(&dir, e))?
        {
            let file_name = entry.file_name();
            let Some(key) = file_name.to_str() else {
                warn!(path = %entry.path().display(), "Skipping secret key with non UTF-8 name");
                continue;
            };
            if key.starts_with('.') {
                continue;
            }

            // Follows symlinks, which is how mounted keys are exposed
            let path = entry.path();
            let metadata = fs::metadata(&path)
                .await
                .map_err(|e| backend_error(&path, e))?;
            if !metadata.is_file() {
                continue;
            }

            let value = fs::read(&path).await.map_err(|e| backend_error(&path, e))?;
            data.insert(key, value);
        }

        debug!(
            namespace = %namespace,
            name = %name,
            keys = data.len(),
            "Loaded secret from directory"
        );
        Ok(data)
    }
}

fn backend_error(path: &Path, e: io::Error) -> CredentialStoreError {
    CredentialStoreError::Backend(format!("failed to read '{}': {}", path.display(), e))
}
