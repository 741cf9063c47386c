//! Common types shared by the DNS-01 solver crates.

pub mod ids;
pub mod records;

pub use ids::{RecordId, ZoneId};
pub use records::{
    host_entry, normalize_domain, HostedZone, RecordFilter, ResourceRecord, APEX_HOST,
    CHALLENGE_TTL, TXT_RECORD_TYPE,
};
