mod ifconfig;

pub use ifconfig::IfconfigResolver;

use crate::errors::DynDnsError;
use std::net::Ipv4Addr;

/// Discovers the caller's current public IPv4 address.
pub trait IpResolver {
    async fn wan_ipv4(&self) -> Result<Ipv4Addr, DynDnsError>;
}
