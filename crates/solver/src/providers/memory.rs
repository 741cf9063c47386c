//! In-memory DNS provider
//!
//! Models a provider account holding hosted zones and resource records.
//! Only compiled for tests and with the `test-util` feature. Faults can be
//! injected per call type to exercise error paths.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use dns01_common::{HostedZone, RecordFilter, RecordId, ResourceRecord, ZoneId};

use crate::api::{DnsApi, DnsApiError, DnsResult, DnsSession};

/// TTL given to records seeded with [`MemoryDns::add_record`]
const SEEDED_TTL: u32 = 900;

/// Faults to inject into session calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryFaults {
    /// `find_domains` fails
    pub fail_domains: bool,
    /// `resource_records` fails
    pub fail_listing: bool,
    /// `create_txt_record` fails
    pub fail_create: bool,
    /// `delete_records` fails
    pub fail_delete: bool,
    /// `delete_records` deletes nothing and reports `false`
    pub reject_delete: bool,
    /// `resource_records` ignores the filter and returns the whole zone
    pub ignore_filters: bool,
}

/// Number of session calls made, per call type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub sessions: usize,
    pub domain_lookups: usize,
    pub listings: usize,
    pub creates: usize,
    pub deletes: usize,
}

#[derive(Debug, Default)]
struct AccountState {
    zones: Vec<HostedZone>,
    records: Vec<ResourceRecord>,
    next_id: u64,
    credentials: Option<(String, String)>,
    faults: MemoryFaults,
    calls: CallCounts,
}

impl AccountState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory provider account
///
/// Clones share the same account.
#[derive(Debug, Clone, Default)]
pub struct MemoryDns {
    state: Arc<Mutex<AccountState>>,
}

impl MemoryDns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject faults, builder style
    pub fn with_faults(self, faults: MemoryFaults) -> Self {
        self.set_faults(faults);
        self
    }

    /// Only accept sessions for this username / API key pair
    pub fn require_credentials(self, username: &str, api_key: &str) -> Self {
        self.state.lock().credentials = Some((username.to_string(), api_key.to_string()));
        self
    }

    pub fn set_faults(&self, faults: MemoryFaults) {
        self.state.lock().faults = faults;
    }

    /// Add a hosted zone; duplicate names are allowed
    pub fn add_zone(&self, name: &str) -> ZoneId {
        let mut state = self.state.lock();
        let id = ZoneId::new(state.allocate_id());
        state.zones.push(HostedZone::new(id, name));
        id
    }

    /// Seed a record of any type
    pub fn add_record(&self, zone: ZoneId, host: &str, record_type: &str, data: &str) -> RecordId {
        let mut state = self.state.lock();
        let id = RecordId::new(state.allocate_id());
        state.records.push(ResourceRecord {
            id,
            zone_id: zone,
            host: host.to_string(),
            record_type: record_type.to_string(),
            data: data.to_string(),
            ttl: SEEDED_TTL,
        });
        id
    }

    /// All records of a zone
    pub fn records(&self, zone: ZoneId) -> Vec<ResourceRecord> {
        self.state
            .lock()
            .records
            .iter()
            .filter(|r| r.zone_id == zone)
            .cloned()
            .collect()
    }

    /// Values of the TXT records on `host`, in creation order
    pub fn txt_values(&self, zone: ZoneId, host: &str) -> Vec<String> {
        self.records(zone)
            .into_iter()
            .filter(|r| r.is_txt() && r.host == host)
            .map(|r| r.data)
            .collect()
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }
}

impl DnsApi for MemoryDns {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn authenticate(&self, username: &str, api_key: &str) -> DnsResult<Box<dyn DnsSession>> {
        let mut state = self.state.lock();
        if let Some((expected_user, expected_key)) = &state.credentials {
            if expected_user != username || expected_key != api_key {
                return Err(DnsApiError::Authentication(format!(
                    "invalid credentials for account '{}'",
                    username
                )));
            }
        }
        state.calls.sessions += 1;

        Ok(Box::new(MemorySession {
            account: username.to_string(),
            state: Arc::clone(&self.state),
        }))
    }
}

/// Session on a [`MemoryDns`] account
#[derive(Debug)]
pub struct MemorySession {
    account: String,
    state: Arc<Mutex<AccountState>>,
}

fn injected(call: &str) -> DnsApiError {
    DnsApiError::Request(format!("injected {} failure", call))
}

#[async_trait]
impl DnsSession for MemorySession {
    fn account(&self) -> &str {
        &self.account
    }

    async fn find_domains(&self, name: &str) -> DnsResult<Vec<HostedZone>> {
        let mut state = self.state.lock();
        state.calls.domain_lookups += 1;
        if state.faults.fail_domains {
            return Err(injected("domain lookup"));
        }

        let zones = state.zones.iter().filter(|z| z.name == name);
        Ok(zones.cloned().collect())
    }

    async fn resource_records(
        &self,
        zone: ZoneId,
        filter: &RecordFilter,
    ) -> DnsResult<Vec<ResourceRecord>> {
        let mut state = self.state.lock();
        state.calls.listings += 1;
        if state.faults.fail_listing {
            return Err(injected("record listing"));
        }

        let honour_filter = !state.faults.ignore_filters;
        let records: Vec<ResourceRecord> = state
            .records
            .iter()
            .filter(|r| r.zone_id == zone)
            .filter(|r| !honour_filter || filter.matches(r))
            .cloned()
            .collect();

        trace!(zone_id = %zone, count = records.len(), "Memory record listing");
        Ok(records)
    }

    async fn create_txt_record(
        &self,
        zone: ZoneId,
        host: &str,
        data: &str,
        ttl: u32,
    ) -> DnsResult<ResourceRecord> {
        let mut state = self.state.lock();
        state.calls.creates += 1;
        if state.faults.fail_create {
            return Err(injected("record creation"));
        }
        if !state.zones.iter().any(|z| z.id == zone) {
            return Err(DnsApiError::Status {
                status: 404,
                message: format!("zone {} does not exist", zone),
            });
        }

        let record = ResourceRecord {
            id: RecordId::new(state.allocate_id()),
            zone_id: zone,
            host: host.to_string(),
            record_type: "txt".to_string(),
            data: data.to_string(),
            ttl,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn delete_records(&self, ids: &[RecordId]) -> DnsResult<bool> {
        let mut state = self.state.lock();
        state.calls.deletes += 1;
        if state.faults.fail_delete {
            return Err(injected("record deletion"));
        }
        if state.faults.reject_delete {
            return Ok(false);
        }

        let before = state.records.len();
        state.records.retain(|r| !ids.contains(&r.id));
        Ok(before - state.records.len() == ids.len())
    }
}
