//! Hosted zone lookup

use tracing::debug;

use dns01_common::{normalize_domain, ZoneId};

use crate::api::DnsSession;
use crate::error::{SolverError, SolverResult};

/// Finds the single hosted zone managing a domain
#[derive(Debug, Clone, Copy)]
pub struct ZoneLocator<'a> {
    session: &'a dyn DnsSession,
}

impl<'a> ZoneLocator<'a> {
    pub fn new(session: &'a dyn DnsSession) -> Self {
        Self { session }
    }

    /// Resolve `domain` (with or without a trailing dot) to its zone id
    ///
    /// Exactly one zone must match. Zero matches is `ZoneNotFound`, more than
    /// one is `AmbiguousZone`; neither is resolved by guessing.
    pub async fn locate(&self, domain: &str) -> SolverResult<ZoneId> {
        let name = normalize_domain(domain);

        let lookup = self.session.find_domains(name).await;
        let zones = lookup.map_err(|source| SolverError::ZoneLookup {
            domain: name.to_string(),
            source,
        })?;

        match zones.as_slice() {
            [] => Err(SolverError::ZoneNotFound {
                domain: name.to_string(),
            }),
            [zone] => {
                debug!(domain = %name, zone_id = %zone.id, "Found hosted zone for domain");
                Ok(zone.id)
            }
            _ => Err(SolverError::AmbiguousZone {
                domain: name.to_string(),
                count: zones.len(),
            }),
        }
    }
}
