use crate::config::{AzureEnv, CLIENT_ID_VAR, CLIENT_SECRET_VAR, TENANT_ID_VAR, UpdateRequest};
use crate::errors::DynDnsError;
use serde::Deserialize;
use std::fmt;

const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";
const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// How this run authenticates against the management API. Exactly one
/// strategy is selected per invocation.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialStrategy {
    /// Service principal credentials discovered from the AZURE_* environment
    /// variables at token time.
    Ambient,
    /// A service principal secret supplied explicitly via flags or the config
    /// file.
    ExplicitSecret {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
}

impl CredentialStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            CredentialStrategy::Ambient => "ambient environment",
            CredentialStrategy::ExplicitSecret { .. } => "explicit client secret",
        }
    }
}

// Manual impl so the client secret can't leak into logs or test output
impl fmt::Debug for CredentialStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialStrategy::Ambient => write!(f, "Ambient"),
            CredentialStrategy::ExplicitSecret {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ExplicitSecret")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("client_secret", &"***")
                .finish(),
        }
    }
}

/// Decides, once, how the run will authenticate. When all three AZURE_*
/// variables are present the ambient environment chain wins and any explicit
/// secret values are ignored. Otherwise the resolved request must carry a
/// complete tenant/client/secret triplet of its own.
pub fn select_credential_strategy(
    azure_env: &AzureEnv,
    request: &UpdateRequest,
) -> Result<CredentialStrategy, DynDnsError> {
    if azure_env.is_complete() {
        return Ok(CredentialStrategy::Ambient);
    }

    match (&request.tenant_id, &request.client_id, &request.client_secret) {
        (Some(tenant_id), Some(client_id), Some(client_secret)) => {
            Ok(CredentialStrategy::ExplicitSecret {
                tenant_id: tenant_id.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            })
        }
        _ => Err(DynDnsError::auth_config(format!(
            "set {TENANT_ID_VAR}, {CLIENT_ID_VAR} and {CLIENT_SECRET_VAR}, \
             or supply --tenant-id, --client-id and --client-secret",
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges service principal credentials for a management API bearer token
/// via the client credentials grant.
#[derive(Debug)]
pub struct TokenClient<'a> {
    authority_url: String,
    client: &'a reqwest::Client,
}

impl<'a> TokenClient<'a> {
    pub fn new(client: &'a reqwest::Client) -> Self {
        Self::with_authority_url(client, DEFAULT_AUTHORITY_URL)
    }

    pub fn with_authority_url(client: &'a reqwest::Client, url: impl Into<String>) -> Self {
        TokenClient {
            authority_url: url.into(),
            client,
        }
    }

    pub async fn acquire(
        &self,
        strategy: &CredentialStrategy,
        azure_env: &AzureEnv,
    ) -> Result<String, DynDnsError> {
        match strategy {
            CredentialStrategy::Ambient => {
                let (Some(tenant_id), Some(client_id), Some(client_secret)) = (
                    &azure_env.tenant_id,
                    &azure_env.client_id,
                    &azure_env.client_secret,
                ) else {
                    // Selection already validated these, so only an environment
                    // mutated mid-run can land here
                    return Err(DynDnsError::auth_config(
                        "ambient credentials selected but the AZURE_* variables are incomplete",
                    ));
                };
                self.client_credentials(tenant_id, client_id, client_secret)
                    .await
            }
            CredentialStrategy::ExplicitSecret {
                tenant_id,
                client_id,
                client_secret,
            } => {
                self.client_credentials(tenant_id, client_id, client_secret)
                    .await
            }
        }
    }

    /// <https://learn.microsoft.com/en-us/entra/identity-platform/v2-oauth2-client-creds-grant-flow>
    async fn client_credentials(
        &self,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, DynDnsError> {
        let base = self.authority_url.trim_end_matches('/');
        let url = format!("{base}/{tenant_id}/oauth2/v2.0/token");
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("scope", MANAGEMENT_SCOPE),
        ];

        let token: TokenResponse = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DynDnsError::send_http(&url, "token request", e))?
            .error_for_status()
            .map_err(|e| DynDnsError::bad_response(&url, "token request", e))?
            .json()
            .await
            .map_err(|e| DynDnsError::deserialize(&url, "token request", e))?;

        Ok(token.access_token)
    }
}
