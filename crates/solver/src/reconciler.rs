//! Challenge record reconciliation
//!
//! Present and CleanUp share the same preamble:
//!
//! 1. Decode the per-request config
//! 2. Resolve the API key and open a session
//! 3. Locate the hosted zone and compute the host entry
//!
//! Present then adds the challenge value if it is missing; CleanUp deletes
//! exactly the records carrying the challenge value. Neither touches TXT
//! records on the same host that carry other values, so concurrent
//! challenges for one name can coexist. Both operations are idempotent and
//! safe to retry from the top.

use std::sync::Arc;

use tracing::{debug, info, warn};

use dns01_common::{RecordFilter, RecordId, ZoneId, CHALLENGE_TTL};
use dns01_config::ProviderConfig;

use crate::api::{DnsApi, DnsSession};
use crate::credentials::{CredentialResolver, CredentialStore};
use crate::error::{SolverError, SolverResult};
use crate::records::RecordFinder;
use crate::request::ChallengeRequest;
use crate::zone::ZoneLocator;

/// Result of a successful Present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// A new TXT record was created
    Created(RecordId),
    /// The challenge value was already published
    AlreadyPresent,
}

/// Result of a successful CleanUp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// This many matching records were deleted
    Deleted(usize),
    /// No record carried the challenge value
    AlreadyAbsent,
}

/// Session, zone and host entry resolved for one request
#[derive(Debug)]
struct ChallengeTarget {
    session: Box<dyn DnsSession>,
    zone_id: ZoneId,
    entry: String,
}

/// Orchestrates Present and CleanUp for single challenges
#[derive(Debug, Clone)]
pub struct RecordReconciler {
    credentials: Arc<dyn CredentialStore>,
    dns: Arc<dyn DnsApi>,
}

impl RecordReconciler {
    pub fn new(credentials: Arc<dyn CredentialStore>, dns: Arc<dyn DnsApi>) -> Self {
        Self { credentials, dns }
    }

    /// Get the DNS provider name
    pub fn provider_name(&self) -> &'static str {
        self.dns.name()
    }

    async fn target(&self, request: &ChallengeRequest) -> SolverResult<ChallengeTarget> {
        let config = ProviderConfig::decode(request.config.as_deref())?;

        let session = CredentialResolver::new(self.credentials.as_ref(), self.dns.as_ref())
            .open_session(&config, &request.resource_namespace)
            .await?;

        let zone_id = ZoneLocator::new(session.as_ref())
            .locate(&request.resolved_zone)
            .await?;

        Ok(ChallengeTarget {
            session,
            zone_id,
            entry: request.host_entry(),
        })
    }

    /// Publish the challenge value, unless it already is
    ///
    /// Never replaces or removes TXT records carrying other values.
    pub async fn present(&self, request: &ChallengeRequest) -> SolverResult<PresentOutcome> {
        info!(
            namespace = %request.resource_namespace,
            zone = %request.resolved_zone,
            fqdn = %request.resolved_fqdn,
            provider = %self.provider_name(),
            "Presenting DNS-01 challenge record"
        );

        let target = self.target(request).await?;
        let session = target.session.as_ref();

        // The zone must look healthy before anything is written to it
        match session
            .resource_records(target.zone_id, &RecordFilter::all())
            .await
        {
            Ok(records) if !records.is_empty() => {
                debug!(
                    zone_id = %target.zone_id,
                    records = records.len(),
                    "Zone has resource records"
                );
            }
            Ok(_) => {
                return Err(SolverError::ZoneEmpty {
                    zone_id: target.zone_id,
                    reason: "zone returned no resource records".to_string(),
                });
            }
            Err(e) => {
                return Err(SolverError::ZoneEmpty {
                    zone_id: target.zone_id,
                    reason: e.to_string(),
                });
            }
        }

        let existing = RecordFinder::new(session)
            .find(target.zone_id, &target.entry, &request.key)
            .await?;

        if !existing.is_empty() {
            debug!(
                zone_id = %target.zone_id,
                host = %target.entry,
                records = existing.len(),
                "Challenge record already present"
            );
            return Ok(PresentOutcome::AlreadyPresent);
        }

        let created = session
            .create_txt_record(target.zone_id, &target.entry, &request.key, CHALLENGE_TTL)
            .await;
        let record = created.map_err(|source| SolverError::RecordCreate {
            zone_id: target.zone_id,
            host: target.entry.clone(),
            source,
        })?;

        info!(
            zone_id = %target.zone_id,
            host = %target.entry,
            record_id = %record.id,
            "DNS-01 challenge record created"
        );

        Ok(PresentOutcome::Created(record.id))
    }

    /// Delete the records carrying this challenge's value
    ///
    /// TXT records on the same host with other values are left alone.
    pub async fn cleanup(&self, request: &ChallengeRequest) -> SolverResult<CleanupOutcome> {
        info!(
            namespace = %request.resource_namespace,
            zone = %request.resolved_zone,
            fqdn = %request.resolved_fqdn,
            provider = %self.provider_name(),
            "Cleaning up DNS-01 challenge record"
        );

        let target = self.target(request).await?;
        let session = target.session.as_ref();

        let matches = RecordFinder::new(session)
            .find(target.zone_id, &target.entry, &request.key)
            .await?;

        if matches.is_empty() {
            debug!(
                zone_id = %target.zone_id,
                host = %target.entry,
                "No challenge record to clean up"
            );
            return Ok(CleanupOutcome::AlreadyAbsent);
        }

        let ids: Vec<RecordId> = matches.iter().map(|r| r.id).collect();
        let delete_error = |reason: String| SolverError::RecordDelete {
            zone_id: target.zone_id,
            host: target.entry.clone(),
            count: ids.len(),
            reason,
        };

        match session.delete_records(&ids).await {
            Ok(true) => {
                info!(
                    zone_id = %target.zone_id,
                    host = %target.entry,
                    deleted = ids.len(),
                    "DNS-01 challenge record cleaned up"
                );
                Ok(CleanupOutcome::Deleted(ids.len()))
            }
            Ok(false) => {
                warn!(
                    zone_id = %target.zone_id,
                    host = %target.entry,
                    "Provider refused record deletion"
                );
                Err(delete_error("provider refused the deletion".to_string()))
            }
            Err(e) => Err(delete_error(e.to_string())),
        }
    }
}
