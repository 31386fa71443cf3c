mod azure;

pub use azure::AzureDnsStore;

use crate::config::UpdateRequest;
use crate::core::RecordSetOutcome;
use crate::errors::DynDnsError;
use std::net::Ipv4Addr;

/// A DNS management backend that can create or replace a single A record.
/// The operation is a full-value upsert, so re-running it with the same
/// address is safe.
pub trait DnsRecordStore {
    async fn upsert_a_record(
        &self,
        request: &UpdateRequest,
        addr: Ipv4Addr,
    ) -> Result<RecordSetOutcome, DynDnsError>;
}
