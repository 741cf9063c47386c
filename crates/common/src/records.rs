//! Hosted zone and resource record model.
//!
//! A challenge record is identified by the triple (host, type, value), not by
//! its provider id: two TXT records on `_acme-challenge` carrying different
//! values belong to different challenges and must coexist.

use serde::{Deserialize, Serialize};

use crate::ids::{RecordId, ZoneId};

/// Record type of every challenge record
pub const TXT_RECORD_TYPE: &str = "TXT";

/// TTL for challenge records (60 seconds)
pub const CHALLENGE_TTL: u32 = 60;

/// Host label addressing the zone apex
pub const APEX_HOST: &str = "@";

/// A domain managed by the provider account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    pub id: ZoneId,
    /// Domain name without a trailing dot (e.g. "example.com")
    pub name: String,
}

impl HostedZone {
    pub fn new(id: impl Into<ZoneId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A resource record inside a hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub id: RecordId,
    pub zone_id: ZoneId,
    /// Label relative to the zone apex (e.g. "_acme-challenge")
    pub host: String,
    /// Record type as reported by the provider ("TXT", "txt", "A", ...)
    pub record_type: String,
    /// Record payload; for TXT records, the challenge key
    pub data: String,
    pub ttl: u32,
}

impl ResourceRecord {
    /// Whether this is a TXT record, ignoring ASCII case
    pub fn is_txt(&self) -> bool {
        self.record_type.eq_ignore_ascii_case(TXT_RECORD_TYPE)
    }

    /// Whether this record is the TXT record `host` = `value`
    pub fn is_challenge(&self, host: &str, value: &str) -> bool {
        self.is_txt() && self.host == host && self.data == value
    }
}

/// Server-side filter hint for record listings
///
/// Providers may or may not honour it; callers that need exact results must
/// re-check every returned record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub record_type: Option<String>,
    pub host: Option<String>,
}

impl RecordFilter {
    /// No filtering: every record of the zone
    pub fn all() -> Self {
        Self::default()
    }

    /// TXT records on a single host
    pub fn txt(host: impl Into<String>) -> Self {
        Self {
            record_type: Some(TXT_RECORD_TYPE.to_string()),
            host: Some(host.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_type.is_none() && self.host.is_none()
    }

    /// Whether a record passes this filter
    pub fn matches(&self, record: &ResourceRecord) -> bool {
        let type_ok = self
            .record_type
            .as_deref()
            .map_or(true, |t| record.record_type.eq_ignore_ascii_case(t));
        let host_ok = self.host.as_deref().map_or(true, |h| record.host == h);
        type_ok && host_ok
    }
}

/// Strip a single trailing dot from a domain name
///
/// `example.com.` and `example.com` name the same zone.
pub fn normalize_domain(domain: &str) -> &str {
    domain.strip_suffix('.').unwrap_or(domain)
}

/// Compute the host entry of a challenge FQDN relative to its zone
///
/// For `_acme-challenge.example.com.` in zone `example.com.`, returns
/// `_acme-challenge`. An FQDN equal to the zone maps to the apex label `@`;
/// an FQDN outside the zone is returned unchanged (minus a trailing dot).
pub fn host_entry(fqdn: &str, zone: &str) -> String {
    let fqdn = normalize_domain(fqdn);
    let zone = normalize_domain(zone);

    if fqdn == zone {
        return APEX_HOST.to_string();
    }

    match fqdn
        .strip_suffix(zone)
        .and_then(|rest| rest.strip_suffix('.'))
    {
        Some(entry) if !entry.is_empty() => entry.to_string(),
        _ => fqdn.to_string(),
    }
}
