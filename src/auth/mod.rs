//! Authentication for Azure DevOps
//!
//! Supports personal access tokens from flags and environment variables.

mod azure_devops;

pub use azure_devops::{get_azure_devops_auth, test_azure_devops_auth, AzureDevOpsAuthConfig};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed explicitly (e.g. `--token`)
    Explicit,
    /// Token from environment variable
    EnvVar,
}
