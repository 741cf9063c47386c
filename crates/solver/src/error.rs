//! Solver error types

use thiserror::Error;

use dns01_common::ZoneId;
use dns01_config::ConfigDecodeError;

use crate::api::DnsApiError;

/// Result type for solver operations
pub type SolverResult<T> = Result<T, SolverError>;

/// Errors that can occur while presenting or cleaning up a challenge
///
/// Every variant carries enough context to diagnose the failure without
/// retrying. None of them is fatal to the process.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The per-request configuration blob could not be decoded
    #[error("Unable to load config: {0}")]
    ConfigDecode(#[from] ConfigDecodeError),

    /// The referenced secret does not exist or could not be fetched
    #[error("Unable to get secret '{namespace}/{name}': {reason}")]
    SecretNotFound {
        namespace: String,
        name: String,
        reason: String,
    },

    /// The secret exists but lacks the referenced key
    #[error("Key '{key}' not found in secret '{namespace}/{name}'")]
    SecretKeyNotFound {
        key: String,
        name: String,
        namespace: String,
    },

    /// An authenticated provider session could not be built
    #[error("Unable to open provider session for account '{username}': {message}")]
    Session { username: String, message: String },

    /// The domain listing call failed
    #[error("Unable to look up hosted zone for domain '{domain}': {source}")]
    ZoneLookup {
        domain: String,
        #[source]
        source: DnsApiError,
    },

    /// No hosted zone manages the domain
    #[error("No matching hosted zone found for domain '{domain}'")]
    ZoneNotFound { domain: String },

    /// More than one hosted zone claims the domain
    #[error("Too many hosted zones ({count}) found for domain '{domain}'")]
    AmbiguousZone { domain: String, count: usize },

    /// The zone returned no records before a mutation was attempted
    #[error("Unable to get resource records of zone {zone_id}: {reason}")]
    ZoneEmpty { zone_id: ZoneId, reason: String },

    /// Listing challenge records failed
    #[error("Unable to list TXT records '{host}' in zone {zone_id}: {source}")]
    RecordQuery {
        zone_id: ZoneId,
        host: String,
        #[source]
        source: DnsApiError,
    },

    /// Creating the challenge record failed
    #[error("Unable to create TXT record '{host}' in zone {zone_id}: {source}")]
    RecordCreate {
        zone_id: ZoneId,
        host: String,
        #[source]
        source: DnsApiError,
    },

    /// Deleting challenge records failed or was refused by the provider
    #[error("Unable to delete {count} TXT record(s) '{host}' in zone {zone_id}: {reason}")]
    RecordDelete {
        zone_id: ZoneId,
        host: String,
        count: usize,
        reason: String,
    },

    /// The solver was used before `initialize()`
    #[error("Solver not initialized - call initialize() first")]
    NotInitialized,

    /// Initialization could not build the solver's collaborators
    #[error("Unable to initialize solver: {0}")]
    Initialize(String),
}
