//! SoftLayer DNS-01 challenge solver
//!
//! Publishes and retracts ACME DNS-01 challenge TXT records in SoftLayer DNS
//! zones on behalf of a challenge-orchestration host.
//!
//! # Architecture
//!
//! - [`ProviderConfig`](dns01_config::ProviderConfig) - decodes the
//!   per-request config blob
//! - [`CredentialResolver`] - fetches the API key from a [`CredentialStore`]
//!   and opens a [`DnsSession`]
//! - [`ZoneLocator`] - finds the single hosted zone for a domain
//! - [`RecordFinder`] - finds TXT records matching (host, value) exactly
//! - [`RecordReconciler`] - Present (add if missing) and CleanUp (delete
//!   matching only)
//! - [`SoftLayerSolver`] - the [`ChallengeSolver`] the host drives
//!
//! # Challenge Flow
//!
//! For `_acme-challenge.example.com.` in zone `example.com.` with key
//! `abc123`:
//!
//! 1. The API key is read from the secret named in the request config
//! 2. The zone `example.com` is looked up in the account
//! 3. Present creates `_acme-challenge TXT "abc123"` (ttl 60) unless it exists
//! 4. CleanUp deletes every `_acme-challenge TXT "abc123"` record and nothing
//!    else
//!
//! # Features
//!
//! - `test-util` - exports `MemoryDns` and `MemoryCredentialStore`, in-memory
//!   collaborators for exercising the solver without a SoftLayer account

pub mod api;
pub mod credentials;
pub mod error;
pub mod providers;
pub mod reconciler;
pub mod records;
pub mod request;
pub mod solver;
pub mod zone;

pub use api::{DnsApi, DnsApiError, DnsResult, DnsSession};
pub use credentials::{
    CredentialResolver, CredentialStore, CredentialStoreError, DirectorySecretStore, SecretData,
};
pub use error::{SolverError, SolverResult};
pub use providers::SoftLayerApi;
pub use reconciler::{CleanupOutcome, PresentOutcome, RecordReconciler};
pub use records::RecordFinder;
pub use request::ChallengeRequest;
pub use solver::{ChallengeSolver, SoftLayerSolver, SOLVER_NAME};
pub use zone::ZoneLocator;

#[cfg(any(test, feature = "test-util"))]
pub use credentials::MemoryCredentialStore;
#[cfg(any(test, feature = "test-util"))]
pub use providers::{CallCounts, MemoryDns, MemoryFaults};
