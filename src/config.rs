use crate::errors::DynDnsError;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;

pub const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";

/// Azure caps A record TTLs at 2147483647, but anything outside a few minutes
/// defeats the purpose of a dynamic record.
pub const DEFAULT_TTL_SECONDS: i64 = 300;

/// Everything one run needs to know about the target record and the identity
/// used to update it. Built once by [`resolve_request`] and read-only from
/// then on.
#[derive(Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub subscription_id: String,
    pub resource_group: String,
    pub zone_name: String,
    pub record_name: String,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub ttl_seconds: i64,
}

// Manual impl so the client secret can't leak into logs or test output
impl fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("subscription_id", &self.subscription_id)
            .field("resource_group", &self.resource_group)
            .field("zone_name", &self.zone_name)
            .field("record_name", &self.record_name)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// Values taken from the command line, all optional at this point. Resolution
/// decides what is actually required once the file and environment layers have
/// had their say.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub subscription_id: Option<String>,
    pub resource_group: Option<String>,
    pub zone_name: Option<String>,
    pub record_name: Option<String>,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Snapshot of the AZURE_* service principal variables. Captured once at
/// startup so that configuration resolution and credential selection agree on
/// what the environment looked like.
#[derive(Debug, Default, Clone)]
pub struct AzureEnv {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl AzureEnv {
    pub fn from_process() -> AzureEnv {
        AzureEnv {
            tenant_id: var_non_empty(TENANT_ID_VAR),
            client_id: var_non_empty(CLIENT_ID_VAR),
            client_secret: var_non_empty(CLIENT_SECRET_VAR),
        }
    }

    /// True when all three variables are set, which is what flips credential
    /// selection over to the ambient environment chain.
    pub fn is_complete(&self) -> bool {
        self.tenant_id.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }
}

fn var_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileConfig {
    subscription_id: Option<String>,
    tenant_id: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    resource_group: Option<String>,
    zone_name: Option<String>,
    record_name: Option<String>,
}

fn parse_config(path: &Path) -> Result<FileConfig, DynDnsError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        DynDnsError::config_source(format!("could not read config file {}", path.display()), e)
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        DynDnsError::config_source(format!("could not parse config file {}", path.display()), e)
    })
}

// An empty value is as good as an absent one, whichever layer it came from
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Layers the three configuration sources into an [`UpdateRequest`]: flags
/// win, the config file fills what flags left open, and the environment
/// supplies the service principal identity only (never the target record
/// fields). Fails when any of the four target fields is still empty at the
/// end.
pub fn resolve_request(
    cli: CliOverrides,
    config_file: Option<&Path>,
    azure_env: &AzureEnv,
) -> Result<UpdateRequest, DynDnsError> {
    let file = match config_file {
        Some(path) => parse_config(path)?,
        None => FileConfig::default(),
    };

    let subscription_id = non_empty(cli.subscription_id).or(non_empty(file.subscription_id));
    let resource_group = non_empty(cli.resource_group).or(non_empty(file.resource_group));
    let zone_name = non_empty(cli.zone_name).or(non_empty(file.zone_name));
    let record_name = non_empty(cli.record_name).or(non_empty(file.record_name));

    let tenant_id = non_empty(cli.tenant_id)
        .or(non_empty(file.tenant_id))
        .or_else(|| azure_env.tenant_id.clone());
    let client_id = non_empty(cli.client_id)
        .or(non_empty(file.client_id))
        .or_else(|| azure_env.client_id.clone());
    let client_secret = non_empty(cli.client_secret)
        .or(non_empty(file.client_secret))
        .or_else(|| azure_env.client_secret.clone());

    let mut missing = Vec::new();
    if subscription_id.is_none() {
        missing.push("subscription-id");
    }
    if resource_group.is_none() {
        missing.push("resource-group");
    }
    if zone_name.is_none() {
        missing.push("zone");
    }
    if record_name.is_none() {
        missing.push("record");
    }

    let (Some(subscription_id), Some(resource_group), Some(zone_name), Some(record_name)) =
        (subscription_id, resource_group, zone_name, record_name)
    else {
        return Err(DynDnsError::config(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    };

    Ok(UpdateRequest {
        subscription_id,
        resource_group,
        zone_name,
        record_name,
        tenant_id,
        client_id,
        client_secret,
        ttl_seconds: DEFAULT_TTL_SECONDS,
    })
}
