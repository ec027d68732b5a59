//! CLI commands
//!
//! Command implementations for the `azdo` binary.

mod auth;
mod merge;
mod pull;
mod style;

pub use auth::{run_auth_setup, run_auth_test};
pub use merge::run_merge;
pub use pull::{
    run_approved, run_comment, run_files, run_link, run_mergeable, run_status, StatusArgs,
};

use azdo_vcs::auth::get_azure_devops_auth;
use azdo_vcs::error::Result;
use azdo_vcs::platform::{create_vcs_client, AzureDevOpsService, VcsClient};
use azdo_vcs::types::{PullRequest, Repo, ServiceConfig};

/// Connection settings shared by every command
pub struct Connection {
    /// Host, identity and status naming
    pub config: ServiceConfig,
    /// Token passed with `--token`
    pub token: Option<String>,
}

impl Connection {
    /// Provider-neutral client
    pub fn client(&self) -> Result<Box<dyn VcsClient>> {
        let auth = get_azure_devops_auth(self.token.as_deref())?;
        create_vcs_client(&self.config, &auth)
    }

    /// Concrete Azure DevOps service, for commands that report identity
    pub fn service(&self) -> Result<AzureDevOpsService> {
        let auth = get_azure_devops_auth(self.token.as_deref())?;
        AzureDevOpsService::new(&auth.token, &self.config)
    }
}

/// Pull request reference built from command arguments
pub fn pull_request(repo: &str, number: u64, head: Option<&str>) -> PullRequest {
    PullRequest {
        number,
        head_commit: head.unwrap_or_default().to_string(),
        base_repo: Repo::new(repo),
    }
}
