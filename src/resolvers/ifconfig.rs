use crate::errors::DynDnsError;
use crate::resolvers::IpResolver;
use std::net::Ipv4Addr;
use std::time::Duration;

const DEFAULT_ECHO_URL: &str = "https://ifconfig.me/";

/// A hanging echo service would otherwise stall the whole run
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Queries an IP-echo service that returns the caller's address as the plain
/// response body. One attempt per run, no retry.
#[derive(Debug)]
pub struct IfconfigResolver<'a> {
    url: String,
    client: &'a reqwest::Client,
}

impl<'a> IfconfigResolver<'a> {
    pub fn new(client: &'a reqwest::Client) -> Self {
        Self::with_url(client, DEFAULT_ECHO_URL)
    }

    pub fn with_url(client: &'a reqwest::Client, url: impl Into<String>) -> Self {
        IfconfigResolver {
            url: url.into(),
            client,
        }
    }
}

impl IpResolver for IfconfigResolver<'_> {
    async fn wan_ipv4(&self) -> Result<Ipv4Addr, DynDnsError> {
        let body = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| DynDnsError::send_http(&self.url, "wan ip lookup", e))?
            .error_for_status()
            .map_err(|e| DynDnsError::bad_response(&self.url, "wan ip lookup", e))?
            .text()
            .await
            .map_err(|e| DynDnsError::deserialize(&self.url, "wan ip lookup", e))?;

        let trimmed = body.trim();
        trimmed
            .parse::<Ipv4Addr>()
            .map_err(|_| DynDnsError::invalid_address(trimmed))
    }
}
