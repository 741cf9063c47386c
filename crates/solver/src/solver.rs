//! Host-facing solver capability
//!
//! A host drives a solver through four calls: `name`, `initialize`,
//! `present` and `cleanup`. Present must tolerate being called repeatedly
//! with the same request. CleanUp must only remove the record whose value
//! matches the request's key, so several validations for one name can run
//! at once.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use dns01_config::SolverSettings;

use crate::api::DnsApi;
use crate::credentials::{CredentialStore, DirectorySecretStore};
use crate::error::{SolverError, SolverResult};
use crate::providers::softlayer_from_settings;
use crate::reconciler::RecordReconciler;
use crate::request::ChallengeRequest;

/// Name the SoftLayer solver is registered under
pub const SOLVER_NAME: &str = "softlayer-solver";

/// A DNS-01 challenge solver as driven by the host
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Name used to reference this solver; unique within its group
    fn name(&self) -> &'static str;

    /// Build collaborators from process settings
    ///
    /// Called once before any challenge is handled.
    async fn initialize(&mut self, settings: &SolverSettings) -> SolverResult<()>;

    /// Publish the challenge TXT record
    async fn present(&self, request: &ChallengeRequest) -> SolverResult<()>;

    /// Remove the challenge TXT record
    async fn cleanup(&self, request: &ChallengeRequest) -> SolverResult<()>;
}

/// DNS-01 solver for SoftLayer DNS
#[derive(Debug)]
pub struct SoftLayerSolver {
    dns: Arc<dyn DnsApi>,
    reconciler: Option<RecordReconciler>,
}

impl SoftLayerSolver {
    /// Create an uninitialized solver using `dns`
    ///
    /// Credentials come from the secret directory configured at
    /// [`ChallengeSolver::initialize`].
    pub fn new(dns: Arc<dyn DnsApi>) -> Self {
        Self {
            dns,
            reconciler: None,
        }
    }

    /// Create a ready solver with an explicit credential store
    pub fn with_credential_store(
        dns: Arc<dyn DnsApi>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let reconciler = RecordReconciler::new(credentials, Arc::clone(&dns));
        Self {
            dns,
            reconciler: Some(reconciler),
        }
    }

    /// Create and initialize a solver talking to the SoftLayer API
    pub async fn from_settings(settings: &SolverSettings) -> SolverResult<Self> {
        let api = softlayer_from_settings(settings)
            .map_err(|e| SolverError::Initialize(e.to_string()))?;
        let mut solver = Self::new(Arc::new(api));
        solver.initialize(settings).await?;
        Ok(solver)
    }

    pub fn is_initialized(&self) -> bool {
        self.reconciler.is_some()
    }

    /// The reconciler behind this solver
    pub fn reconciler(&self) -> SolverResult<&RecordReconciler> {
        self.reconciler.as_ref().ok_or(SolverError::NotInitialized)
    }
}

#[async_trait]
impl ChallengeSolver for SoftLayerSolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    async fn initialize(&mut self, settings: &SolverSettings) -> SolverResult<()> {
        info!(
            group_name = %settings.group_name,
            secrets_dir = %settings.secrets_dir.display(),
            provider = %self.dns.name(),
            "Initializing SoftLayer solver"
        );

        let store = DirectorySecretStore::open(&settings.secrets_dir)
            .map_err(|e| SolverError::Initialize(e.to_string()))?;

        let reconciler = RecordReconciler::new(Arc::new(store), Arc::clone(&self.dns));
        self.reconciler = Some(reconciler);
        Ok(())
    }

    async fn present(&self, request: &ChallengeRequest) -> SolverResult<()> {
        self.reconciler()?.present(request).await.map(|_| ())
    }

    async fn cleanup(&self, request: &ChallengeRequest) -> SolverResult<()> {
        self.reconciler()?.cleanup(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryDns;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str =
        r#"{"username":"SL123456","apiKeySecretRef":{"name":"softlayer","key":"api-key"}}"#;

    fn settings(secrets_dir: &std::path::Path) -> SolverSettings {
        SolverSettings::from_vars([
            ("GROUP_NAME".to_string(), "acme.example.com".to_string()),
            ("SECRETS_DIR".to_string(), secrets_dir.display().to_string()),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_uninitialized_solver_refuses_work() {
        let solver = SoftLayerSolver::new(Arc::new(MemoryDns::new()));
        assert_eq!(solver.name(), "softlayer-solver");
        assert!(!solver.is_initialized());

        let request =
            ChallengeRequest::new("_acme-challenge.example.com.", "example.com.", "k", "ns");
        assert!(matches!(
            solver.present(&request).await,
            Err(SolverError::NotInitialized)
        ));
        assert!(matches!(
            solver.cleanup(&request).await,
            Err(SolverError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_initialize_reads_mounted_secrets() {
        let root = TempDir::new().unwrap();
        let secret = root.path().join("cert-manager").join("softlayer");
        fs::create_dir_all(&secret).unwrap();
        fs::write(secret.join("api-key"), "s3cr3t").unwrap();

        let dns = MemoryDns::new().require_credentials("SL123456", "s3cr3t");
        let zone = dns.add_zone("example.com");
        dns.add_record(zone, "@", "soa", "ns1.softlayer.com.");

        let mut solver = SoftLayerSolver::new(Arc::new(dns.clone()));
        solver.initialize(&settings(root.path())).await.unwrap();
        assert!(solver.is_initialized());

        let request = ChallengeRequest::new(
            "_acme-challenge.example.com.",
            "example.com.",
            "abc123",
            "cert-manager",
        )
        .with_config(CONFIG);

        solver.present(&request).await.unwrap();
        assert_eq!(dns.txt_values(zone, "_acme-challenge"), vec!["abc123"]);

        solver.cleanup(&request).await.unwrap();
        assert!(dns.txt_values(zone, "_acme-challenge").is_empty());
    }

    #[tokio::test]
    async fn test_initialize_fails_without_secrets_dir() {
        let mut solver = SoftLayerSolver::new(Arc::new(MemoryDns::new()));
        let result = solver
            .initialize(&settings(std::path::Path::new("/nonexistent/secrets")))
            .await;

        assert!(matches!(result, Err(SolverError::Initialize(_))));
        assert!(!solver.is_initialized());
    }
}
