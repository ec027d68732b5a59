//! Platform services for pull request automation
//!
//! Provides a provider-neutral interface for the operations an automation
//! engine performs on a pull request.

pub mod azure_devops;
mod factory;
mod names;

pub use azure_devops::AzureDevOpsService;
pub use factory::create_vcs_client;
pub use names::{clean_repo_path, split_repo_full_name, status_context_from_src};

use crate::error::Result;
use crate::types::{CommitStatus, PullRequest, Repo};
use async_trait::async_trait;

/// VCS client trait for pull request operations
///
/// The orchestration engine only talks to this trait, so it never needs to
/// know which hosting provider is behind it. Each call is reported once;
/// nothing is retried, since comments and merges are not idempotent.
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// Files modified by the pull request, relative to the repository root
    ///
    /// Renamed files are reported at both their old and new path.
    async fn get_modified_files(&self, repo: &Repo, pull: &PullRequest) -> Result<Vec<String>>;

    /// Post a comment, split across several comments when it is too long
    async fn create_comment(&self, repo: &Repo, pull_num: u64, comment: &str) -> Result<()>;

    /// Whether someone other than the author approved the pull request
    async fn pull_is_approved(&self, repo: &Repo, pull: &PullRequest) -> Result<bool>;

    /// Whether the pull request can be merged right now
    async fn pull_is_mergeable(&self, repo: &Repo, pull: &PullRequest) -> Result<bool>;

    /// Set a commit status on the pull request's head
    async fn update_status(
        &self,
        repo: &Repo,
        pull: &PullRequest,
        state: CommitStatus,
        src: &str,
        description: &str,
        url: &str,
    ) -> Result<()>;

    /// Merge the pull request with an explicit merge commit
    async fn merge_pull(&self, pull: &PullRequest) -> Result<()>;

    /// Reference to another pull request usable inside a comment
    fn markdown_pull_link(&self, pull: &PullRequest) -> String;
}
