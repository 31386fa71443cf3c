use crate::config::UpdateRequest;
use crate::core::RecordSetOutcome;
use crate::errors::DynDnsError;
use crate::providers::DnsRecordStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

const DEFAULT_MANAGEMENT_URL: &str = "https://management.azure.com";
const API_VERSION: &str = "2018-05-01";
const CREATED_BY: &str = "azure-dyndns";

/// Record set upsert against the Azure DNS management API.
#[derive(Debug)]
pub struct AzureDnsStore<'a> {
    base_url: String,
    bearer_token: String,
    client: &'a reqwest::Client,
}

impl<'a> AzureDnsStore<'a> {
    pub fn new(client: &'a reqwest::Client, bearer_token: String) -> Self {
        Self::with_base_url(client, bearer_token, DEFAULT_MANAGEMENT_URL)
    }

    pub fn with_base_url(
        client: &'a reqwest::Client,
        bearer_token: String,
        base_url: impl Into<String>,
    ) -> Self {
        AzureDnsStore {
            base_url: base_url.into(),
            bearer_token,
            client,
        }
    }

    fn record_set_url(&self, request: &UpdateRequest) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/dnsZones/{}/A/{}?api-version={}",
            self.base_url.trim_end_matches('/'),
            request.subscription_id,
            request.resource_group,
            request.zone_name,
            request.record_name,
            API_VERSION,
        )
    }
}

#[derive(Debug, Serialize)]
struct RecordSetUpdate {
    properties: UpdateProperties,
}

#[derive(Debug, Serialize)]
struct UpdateProperties {
    #[serde(rename = "TTL")]
    ttl: i64,
    #[serde(rename = "ARecords")]
    a_records: Vec<ARecordValue>,
    metadata: BTreeMap<&'static str, String>,
}

#[derive(Debug, Serialize)]
struct ARecordValue {
    #[serde(rename = "ipv4Address")]
    ipv4_address: String,
}

#[derive(Debug, Deserialize)]
struct RecordSet {
    properties: RecordSetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordSetProperties {
    fqdn: Option<String>,
    provisioning_state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// Failures usually arrive as an `{"error": {"code", "message"}}` envelope,
/// but not every response body is JSON (gateways answer in plain text).
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: Some(detail),
        }) => {
            let code = detail.code.unwrap_or_default();
            let message = detail.message.unwrap_or_default();
            if code.is_empty() {
                message
            } else {
                format!("{code}: {message}")
            }
        }
        _ => body.trim().to_string(),
    }
}

impl DnsRecordStore for AzureDnsStore<'_> {
    async fn upsert_a_record(
        &self,
        request: &UpdateRequest,
        addr: Ipv4Addr,
    ) -> Result<RecordSetOutcome, DynDnsError> {
        let url = self.record_set_url(request);

        // The metadata annotation is cosmetic; the record is correct without it
        let mut metadata = BTreeMap::new();
        metadata.insert("createdBy", String::from(CREATED_BY));
        metadata.insert("updated", Utc::now().to_rfc3339());

        let body = RecordSetUpdate {
            properties: UpdateProperties {
                ttl: request.ttl_seconds,
                a_records: vec![ARecordValue {
                    ipv4_address: addr.to_string(),
                }],
                metadata,
            },
        };

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DynDnsError::send_http(&url, "record set upsert", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DynDnsError::update(status.as_u16(), provider_message(&text)));
        }

        let record_set: RecordSet = response
            .json()
            .await
            .map_err(|e| DynDnsError::deserialize(&url, "record set upsert", e))?;

        // Azure reports the fqdn with a trailing dot
        let fqdn = record_set
            .properties
            .fqdn
            .map(|f| f.trim_end_matches('.').to_string())
            .unwrap_or_else(|| format!("{}.{}", request.record_name, request.zone_name));
        let provisioning_state = record_set
            .properties
            .provisioning_state
            .unwrap_or_else(|| String::from("Unknown"));

        Ok(RecordSetOutcome {
            fqdn,
            addr,
            provisioning_state,
        })
    }
}
