//! SoftLayer DNS provider implementation
//!
//! Uses the SoftLayer REST API (v3.1) to manage TXT records. Requests are
//! authenticated with HTTP basic auth (account username + API key).
//!
//! | Operation | Request |
//! |-----------|---------|
//! | find domains | `GET SoftLayer_Account/getDomains?objectFilter=...` |
//! | list records | `GET SoftLayer_Dns_Domain/{id}/getResourceRecords?objectFilter=...` |
//! | create TXT | `POST SoftLayer_Dns_Domain/{id}/createTxtRecord` |
//! | bulk delete | `POST SoftLayer_Dns_Domain_ResourceRecord/deleteObjects` |
//!
//! API documentation: <https://sldn.softlayer.com/reference/services/SoftLayer_Dns_Domain/>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, trace};

use dns01_common::{HostedZone, RecordFilter, RecordId, ResourceRecord, ZoneId};

use crate::api::{DnsApi, DnsApiError, DnsResult, DnsSession};

/// Object mask for domain lookups
const DOMAIN_MASK: &str = "mask[id,name]";

/// SoftLayer DNS provider
#[derive(Debug, Clone)]
pub struct SoftLayerApi {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl SoftLayerApi {
    /// Create a new SoftLayer API client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - REST base URL (e.g. `https://api.softlayer.com/rest/v3.1`)
    /// * `timeout` - Per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> DnsResult<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            DnsApiError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        let endpoint = endpoint.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DnsApi for SoftLayerApi {
    fn name(&self) -> &'static str {
        "softlayer"
    }

    fn authenticate(&self, username: &str, api_key: &str) -> DnsResult<Box<dyn DnsSession>> {
        if username.is_empty() {
            return Err(DnsApiError::Authentication(
                "SoftLayer username is empty".to_string(),
            ));
        }
        if api_key.is_empty() {
            return Err(DnsApiError::Authentication(
                "SoftLayer API key is empty".to_string(),
            ));
        }

        Ok(Box::new(SoftLayerSession {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            timeout: self.timeout,
            username: username.to_string(),
            api_key: api_key.to_string(),
        }))
    }
}

/// Authenticated SoftLayer session
pub struct SoftLayerSession {
    client: Client,
    endpoint: String,
    timeout: Duration,
    username: String,
    api_key: String,
}

impl std::fmt::Debug for SoftLayerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftLayerSession")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl SoftLayerSession {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    /// Send an authenticated request and decode the JSON response
    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> DnsResult<T> {
        let response = request
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DnsApiError::Timeout {
                        elapsed_secs: self.timeout.as_secs(),
                    }
                } else {
                    DnsApiError::Request(format!("Failed to {}: {}", action, e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(DnsApiError::Authentication(error_message(&body)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DnsApiError::Status {
                status: status.as_u16(),
                message: format!("Failed to {}: {}", action, error_message(&body)),
            });
        }

        response.json().await.map_err(|e| {
            DnsApiError::Decode(format!("Failed to parse {} response: {}", action, e))
        })
    }
}

#[async_trait]
impl DnsSession for SoftLayerSession {
    fn account(&self) -> &str {
        &self.username
    }

    async fn find_domains(&self, name: &str) -> DnsResult<Vec<HostedZone>> {
        let filter = domain_filter(name);
        trace!(filter = %filter, "Querying SoftLayer domains");

        let request = self
            .client
            .get(self.url("SoftLayer_Account/getDomains"))
            .query(&[
                ("objectMask", DOMAIN_MASK.to_string()),
                ("objectFilter", filter.to_string()),
            ]);

        let domains: Vec<SlDomain> = self.call(request, "list domains").await?;

        debug!(domain = %name, matches = domains.len(), "SoftLayer domain lookup complete");
        Ok(domains
            .into_iter()
            .map(|d| HostedZone::new(d.id, d.name))
            .collect())
    }

    async fn resource_records(
        &self,
        zone: ZoneId,
        filter: &RecordFilter,
    ) -> DnsResult<Vec<ResourceRecord>> {
        let path = format!("SoftLayer_Dns_Domain/{}/getResourceRecords", zone);
        let mut request = self.client.get(self.url(&path));

        if let Some(object_filter) = record_filter(filter) {
            trace!(zone_id = %zone, filter = %object_filter, "Filtering resource records");
            request = request.query(&[("objectFilter", object_filter.to_string())]);
        }

        let records: Vec<SlResourceRecord> = self.call(request, "list resource records").await?;
        Ok(records.into_iter().map(|r| r.into_record(zone)).collect())
    }

    async fn create_txt_record(
        &self,
        zone: ZoneId,
        host: &str,
        data: &str,
        ttl: u32,
    ) -> DnsResult<ResourceRecord> {
        debug!(zone_id = %zone, host = %host, ttl, "Creating SoftLayer TXT record");

        let body = ParametersRequest {
            parameters: json!([host, data, ttl]),
        };
        let path = format!("SoftLayer_Dns_Domain/{}/createTxtRecord", zone);
        let request = self.client.post(self.url(&path)).json(&body);

        let record: SlResourceRecord = self.call(request, "create TXT record").await?;
        debug!(zone_id = %zone, record_id = record.id, "SoftLayer TXT record created");
        Ok(record.into_record(zone))
    }

    async fn delete_records(&self, ids: &[RecordId]) -> DnsResult<bool> {
        debug!(count = ids.len(), "Deleting SoftLayer resource records");

        let objects: Vec<Value> = ids.iter().map(|id| json!({ "id": id.get() })).collect();
        let body = ParametersRequest {
            parameters: json!([objects]),
        };
        let request = self
            .client
            .post(self.url("SoftLayer_Dns_Domain_ResourceRecord/deleteObjects"))
            .json(&body);

        self.call(request, "delete resource records").await
    }
}

/// `objectFilter` selecting domains by exact name
fn domain_filter(name: &str) -> Value {
    json!({ "domains": { "name": { "operation": name } } })
}

/// `objectFilter` for a record listing, if the filter restricts anything
fn record_filter(filter: &RecordFilter) -> Option<Value> {
    if filter.is_empty() {
        return None;
    }

    let mut fields = serde_json::Map::new();
    if let Some(record_type) = &filter.record_type {
        // SoftLayer stores record types in lower case
        fields.insert(
            "type".to_string(),
            json!({ "operation": record_type.to_ascii_lowercase() }),
        );
    }
    if let Some(host) = &filter.host {
        fields.insert("host".to_string(), json!({ "operation": host }));
    }

    Some(json!({ "resourceRecords": fields }))
}

/// Extract the `error` field of a SoftLayer error body, or the raw body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<SlError>(body) {
        Ok(err) => match err.code {
            Some(code) => format!("{} ({})", err.error, code),
            None => err.error,
        },
        Err(_) if body.is_empty() => "empty response body".to_string(),
        Err(_) => body.to_string(),
    }
}

// SoftLayer API types

#[derive(Debug, Serialize)]
struct ParametersRequest {
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct SlDomain {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlResourceRecord {
    id: u64,
    #[serde(default)]
    host: Option<String>,
    #[serde(rename = "type", default)]
    record_type: Option<String>,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    ttl: Option<u32>,
    #[serde(default)]
    domain_id: Option<u64>,
}

impl SlResourceRecord {
    fn into_record(self, zone: ZoneId) -> ResourceRecord {
        ResourceRecord {
            id: RecordId::new(self.id),
            zone_id: self.domain_id.map(ZoneId::new).unwrap_or(zone),
            host: self.host.unwrap_or_default(),
            record_type: self.record_type.unwrap_or_default(),
            data: self.data.unwrap_or_default(),
            ttl: self.ttl.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SlError {
    error: String,
    #[serde(default)]
    code: Option<String>,
}
