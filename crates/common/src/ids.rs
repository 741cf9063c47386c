//! Type-safe identifier newtypes for provider objects.
//!
//! Hosted zones and resource records are both addressed by plain integers on
//! the provider side. Wrapping them keeps a record id from being passed where
//! a zone id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hosted zone identifier.
///
/// Identifies a domain managed by the provider account. Obtained from a
/// domain lookup and used to scope every record operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(u64);

impl ZoneId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ZoneId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Resource record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
