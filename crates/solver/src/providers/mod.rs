//! DNS provider implementations
//!
//! Available providers:
//! - [`SoftLayerApi`] - SoftLayer REST API
//! - `MemoryDns` - in-memory account, behind the `test-util` feature

#[cfg(any(test, feature = "test-util"))]
mod memory;
mod softlayer;

#[cfg(any(test, feature = "test-util"))]
pub use memory::{CallCounts, MemoryDns, MemoryFaults, MemorySession};
pub use softlayer::{SoftLayerApi, SoftLayerSession};

use dns01_config::SolverSettings;

use crate::api::DnsResult;

/// Create the SoftLayer provider from process settings
pub fn softlayer_from_settings(settings: &SolverSettings) -> DnsResult<SoftLayerApi> {
    SoftLayerApi::new(
        settings.softlayer_endpoint.clone(),
        settings.softlayer_timeout(),
    )
}
