use crate::config::UpdateRequest;
use crate::providers::DnsRecordStore;
use crate::resolvers::IpResolver;
use anyhow::Result;
use log::info;
use std::fmt;
use std::net::Ipv4Addr;

/// Final state of the record after one pass, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSetOutcome {
    pub fqdn: String,
    pub addr: Ipv4Addr,
    pub provisioning_state: String,
}

impl fmt::Display for RecordSetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {}",
            self.fqdn, self.addr, self.provisioning_state
        )
    }
}

/// Runs one discover-then-upsert pass. Strictly sequential: the record store
/// is never contacted when discovery fails.
pub async fn run_update<R, S>(
    request: &UpdateRequest,
    resolver: &R,
    store: &S,
) -> Result<RecordSetOutcome>
where
    R: IpResolver,
    S: DnsRecordStore,
{
    let addr = resolver.wan_ipv4().await?;
    info!("resolved wan address to {addr}");

    let outcome = store.upsert_a_record(request, addr).await?;
    info!(
        "record set {} is {}",
        outcome.fqdn, outcome.provisioning_state
    );

    Ok(outcome)
}
