//! Challenge requests as handed over by the host

use dns01_common::host_entry;

/// A single DNS-01 challenge to present or clean up
///
/// Built by the host for each call; the solver never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeRequest {
    /// Fully-qualified challenge name (e.g. "_acme-challenge.example.com.")
    pub resolved_fqdn: String,
    /// Zone the challenge name lives in (e.g. "example.com.")
    pub resolved_zone: String,
    /// TXT value to publish
    pub key: String,
    /// Namespace that scopes the credential secret
    pub resource_namespace: String,
    /// Opaque solver configuration (JSON), if the issuer supplied one
    pub config: Option<Vec<u8>>,
}

impl ChallengeRequest {
    pub fn new(
        resolved_fqdn: impl Into<String>,
        resolved_zone: impl Into<String>,
        key: impl Into<String>,
        resource_namespace: impl Into<String>,
    ) -> Self {
        Self {
            resolved_fqdn: resolved_fqdn.into(),
            resolved_zone: resolved_zone.into(),
            key: key.into(),
            resource_namespace: resource_namespace.into(),
            config: None,
        }
    }

    /// Attach a configuration blob
    pub fn with_config(mut self, config: impl Into<Vec<u8>>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// The challenge label relative to the zone (e.g. "_acme-challenge")
    pub fn host_entry(&self) -> String {
        host_entry(&self.resolved_fqdn, &self.resolved_zone)
    }
}
