//! Challenge record lookup

use tracing::{debug, trace};

use dns01_common::{RecordFilter, ResourceRecord, ZoneId};

use crate::api::DnsSession;
use crate::error::{SolverError, SolverResult};

/// Finds the TXT records that exactly match a challenge
#[derive(Debug, Clone, Copy)]
pub struct RecordFinder<'a> {
    session: &'a dyn DnsSession,
}

impl<'a> RecordFinder<'a> {
    pub fn new(session: &'a dyn DnsSession) -> Self {
        Self { session }
    }

    /// Return every TXT record in `zone` with host `entry` and value `value`
    ///
    /// The provider is asked to filter by type and host, but each returned
    /// record is checked again here: records on the same host carrying a
    /// different value belong to other challenges and must never match.
    pub async fn find(
        &self,
        zone: ZoneId,
        entry: &str,
        value: &str,
    ) -> SolverResult<Vec<ResourceRecord>> {
        let listing = self
            .session
            .resource_records(zone, &RecordFilter::txt(entry))
            .await;
        let candidates = listing.map_err(|source| SolverError::RecordQuery {
            zone_id: zone,
            host: entry.to_string(),
            source,
        })?;

        let total = candidates.len();
        let found: Vec<ResourceRecord> = candidates
            .into_iter()
            .filter(|r| r.is_challenge(entry, value))
            .collect();

        trace!(zone_id = %zone, host = %entry, candidates = total, "Filtered TXT candidates");
        debug!(
            zone_id = %zone,
            host = %entry,
            matches = found.len(),
            "Looked up challenge records"
        );

        Ok(found)
    }
}
