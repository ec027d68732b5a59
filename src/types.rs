//! Core types for azdo-vcs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Azure DevOps host
pub const DEFAULT_HOST: &str = "dev.azure.com";

/// Genre prefix used for every status this adapter posts
pub const DEFAULT_BOT_NAME: &str = "Atlantis Bot";

/// Status source the orchestration engine uses for its apply status
pub const DEFAULT_APPLY_STATUS_SRC: &str = "atlantis/apply";

/// A repository as known to the orchestration engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repo {
    /// Full name, e.g. `org/project/repo`
    pub full_name: String,
}

impl Repo {
    /// Create a repository reference from its full name
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }
}

/// A pull request as known to the orchestration engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// Pull request ID
    pub number: u64,
    /// Commit SHA at the head of the source branch
    pub head_commit: String,
    /// Repository the pull request merges into
    pub base_repo: Repo,
}

/// Segments of an Azure DevOps repository full name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoName {
    /// Organization (or everything before the last slash)
    pub owner: String,
    /// Project, empty when the full name has no middle segment
    pub project: String,
    /// Repository name
    pub repo: String,
}

impl RepoName {
    /// True when parsing produced no usable segments
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty() && self.repo.is_empty()
    }
}

/// Provider-neutral commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStatus {
    /// Work is in progress
    Pending,
    /// Work finished successfully
    Success,
    /// Work finished with failures
    Failed,
    /// Work could not run
    Error,
}

impl fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// Adapter configuration supplied at construction time
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Azure DevOps host (`dev.azure.com` or an on-prem server)
    pub host: String,
    /// Configured identity: `None` or `"auto"` to learn it, `""` to disable merges
    pub user_guid: Option<String>,
    /// Genre prefix for posted statuses
    pub bot_name: String,
    /// Status source of the engine's own apply status
    pub apply_status_src: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            user_guid: None,
            bot_name: DEFAULT_BOT_NAME.to_string(),
            apply_status_src: DEFAULT_APPLY_STATUS_SRC.to_string(),
        }
    }
}
