//! Azure DevOps authentication

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use crate::platform::azure_devops::models::AuthenticatedUser;
use crate::platform::AzureDevOpsService;
use crate::types::ServiceConfig;
use std::env;

/// Environment variables checked for a personal access token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["AZURE_DEVOPS_TOKEN", "AZURE_DEVOPS_EXT_PAT"];

/// Azure DevOps authentication configuration
#[derive(Debug, Clone)]
pub struct AzureDevOpsAuthConfig {
    /// Personal access token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get Azure DevOps authentication
///
/// Priority:
/// 1. `explicit` (the `--token` flag)
/// 2. `AZURE_DEVOPS_TOKEN` environment variable
/// 3. `AZURE_DEVOPS_EXT_PAT` environment variable (shared with `az devops`)
pub fn get_azure_devops_auth(explicit: Option<&str>) -> Result<AzureDevOpsAuthConfig> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(AzureDevOpsAuthConfig {
            token: token.to_string(),
            source: AuthSource::Explicit,
        });
    }

    for var in TOKEN_ENV_VARS {
        if let Ok(token) = env::var(var) {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(AzureDevOpsAuthConfig {
                    token: token.to_string(),
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    Err(Error::Auth(
        "No Azure DevOps token found. Set AZURE_DEVOPS_TOKEN to a personal access token"
            .to_string(),
    ))
}

/// Test Azure DevOps authentication
///
/// Returns the account the token acts as. Its `id` is the GUID to configure
/// when merges should not wait for the identity to be learned.
pub async fn test_azure_devops_auth(
    auth: &AzureDevOpsAuthConfig,
    config: &ServiceConfig,
    organization: &str,
) -> Result<AuthenticatedUser> {
    let service = AzureDevOpsService::new(&auth.token, config)?;
    service
        .authenticated_user(organization)
        .await
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))
}
