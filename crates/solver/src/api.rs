//! DNS provider API seam
//!
//! The solver talks to the provider through two traits:
//!
//! - [`DnsApi`] - authenticates an account and hands out a session
//! - [`DnsSession`] - the authenticated operations on zones and records
//!
//! A session belongs to exactly one Present or CleanUp call and is dropped
//! when the call returns.

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use dns01_common::{HostedZone, RecordFilter, RecordId, ResourceRecord, ZoneId};

/// Result type for DNS API operations
pub type DnsResult<T> = Result<T, DnsApiError>;

/// Errors reported by a DNS API implementation
#[derive(Debug, Error)]
pub enum DnsApiError {
    /// Credentials were rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The request could not be sent or the connection failed
    #[error("API request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status
    #[error("API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Failed to decode API response: {0}")]
    Decode(String),

    /// Request timeout
    #[error("Request timed out after {elapsed_secs}s")]
    Timeout { elapsed_secs: u64 },

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Authenticated operations against one provider account
///
/// Implementations must be thread-safe; concurrent calls for different
/// challenges each use their own session.
#[async_trait]
pub trait DnsSession: Send + Sync + Debug {
    /// Account this session is authenticated as
    fn account(&self) -> &str;

    /// List hosted zones whose name equals `name` exactly
    async fn find_domains(&self, name: &str) -> DnsResult<Vec<HostedZone>>;

    /// List resource records of a zone
    ///
    /// The filter is a hint. Implementations may return records outside it.
    async fn resource_records(
        &self,
        zone: ZoneId,
        filter: &RecordFilter,
    ) -> DnsResult<Vec<ResourceRecord>>;

    /// Create a TXT record and return it as stored by the provider
    async fn create_txt_record(
        &self,
        zone: ZoneId,
        host: &str,
        data: &str,
        ttl: u32,
    ) -> DnsResult<ResourceRecord>;

    /// Delete records by id in a single call
    ///
    /// Returns the provider's verdict; `false` means nothing is guaranteed
    /// to have been deleted.
    async fn delete_records(&self, ids: &[RecordId]) -> DnsResult<bool>;
}

/// Entry point to a DNS provider
pub trait DnsApi: Send + Sync + Debug {
    /// Returns the provider name (e.g., "softlayer")
    fn name(&self) -> &'static str;

    /// Build an authenticated session for an account
    ///
    /// No network round-trip is required; bad credentials may only surface
    /// on the first session call.
    fn authenticate(&self, username: &str, api_key: &str) -> DnsResult<Box<dyn DnsSession>>;
}
