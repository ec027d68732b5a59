//! VCS client factory
//!
//! Creates the client for the configured host.

use crate::auth::AzureDevOpsAuthConfig;
use crate::error::Result;
use crate::platform::{AzureDevOpsService, VcsClient};
use crate::types::ServiceConfig;

/// Create a VCS client from configuration and resolved credentials
pub fn create_vcs_client(
    config: &ServiceConfig,
    auth: &AzureDevOpsAuthConfig,
) -> Result<Box<dyn VcsClient>> {
    Ok(Box::new(AzureDevOpsService::new(&auth.token, config)?))
}
