//! Azure DevOps REST wire models
//!
//! Only the fields the adapter reads or writes are modelled. Fixed string
//! vocabularies are closed enums with an `Unknown` fallback so the rest of
//! the crate never compares raw strings.

use crate::types::CommitStatus;
use serde::{Deserialize, Serialize};

/// Envelope used by list endpoints
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    /// Page items
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Number of items in this page
    #[serde(default)]
    pub count: Option<usize>,
}

/// Identity reference
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    /// Identity GUID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Unique name, usually the UPN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
}

/// Reviewer entry on a pull request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRefWithVote {
    /// Reviewer identity GUID
    #[serde(default)]
    pub id: Option<String>,
    /// Reviewer unique name
    #[serde(default)]
    pub unique_name: Option<String>,
    /// Recorded vote
    #[serde(default)]
    pub vote: Vote,
}

/// Reviewer vote, sent by the API as an integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "i32")]
pub enum Vote {
    /// 10
    Approved,
    /// 5
    ApprovedWithSuggestions,
    /// 0
    #[default]
    NoVote,
    /// -5
    WaitingForAuthor,
    /// -10
    Rejected,
    /// Anything else
    Unknown,
}

impl From<i32> for Vote {
    fn from(value: i32) -> Self {
        match value {
            10 => Self::Approved,
            5 => Self::ApprovedWithSuggestions,
            0 => Self::NoVote,
            -5 => Self::WaitingForAuthor,
            -10 => Self::Rejected,
            _ => Self::Unknown,
        }
    }
}

impl Vote {
    /// Whether the vote counts as an approval
    pub const fn is_approval(self) -> bool {
        matches!(self, Self::Approved | Self::ApprovedWithSuggestions)
    }
}

/// Pull request lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PullRequestStatus {
    /// Status not set
    NotSet,
    /// Open
    Active,
    /// Closed without merging
    Abandoned,
    /// Merged
    Completed,
    /// Unrecognized value
    #[default]
    #[serde(other)]
    Unknown,
}

/// Result of the last merge attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStatus {
    /// No merge attempted yet
    NotSet,
    /// Merge queued
    Queued,
    /// Merge conflicts
    Conflicts,
    /// Merge succeeded
    Succeeded,
    /// Blocked by a policy
    RejectedByPolicy,
    /// Merge failed
    Failure,
    /// Unrecognized value
    #[default]
    #[serde(other)]
    Unknown,
}

/// Commit reference
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitCommitRef {
    /// Commit SHA
    pub commit_id: String,
}

/// Project reference
#[derive(Debug, Clone, Deserialize)]
pub struct TeamProjectReference {
    /// Project GUID
    pub id: String,
    /// Project name
    #[serde(default)]
    pub name: Option<String>,
}

/// Repository reference
#[derive(Debug, Clone, Deserialize)]
pub struct GitRepository {
    /// Repository GUID
    #[serde(default)]
    pub id: Option<String>,
    /// Repository name
    #[serde(default)]
    pub name: Option<String>,
    /// Owning project
    #[serde(default)]
    pub project: Option<TeamProjectReference>,
}

/// Pull request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPullRequest {
    /// Pull request ID
    pub pull_request_id: u64,
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// Lifecycle status
    #[serde(default)]
    pub status: PullRequestStatus,
    /// Merge status
    #[serde(default)]
    pub merge_status: MergeStatus,
    /// Merge failure detail, if any
    #[serde(default)]
    pub merge_failure_message: Option<String>,
    /// Draft flag
    #[serde(default)]
    pub is_draft: bool,
    /// Author
    #[serde(default)]
    pub created_by: Option<IdentityRef>,
    /// Reviewers and their votes
    #[serde(default)]
    pub reviewers: Vec<IdentityRefWithVote>,
    /// Source commit of the last merge
    #[serde(default)]
    pub last_merge_source_commit: Option<GitCommitRef>,
    /// Target repository
    #[serde(default)]
    pub repository: Option<GitRepository>,
    /// Whether statuses can target a specific iteration
    #[serde(default)]
    pub supports_iterations: bool,
}

impl GitPullRequest {
    /// Project GUID of the target repository
    pub fn project_id(&self) -> Option<&str> {
        self.repository
            .as_ref()
            .and_then(|r| r.project.as_ref())
            .map(|p| p.id.as_str())
    }
}

/// One flag of a change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// add
    Add,
    /// edit
    Edit,
    /// rename
    Rename,
    /// delete
    Delete,
    /// Any other flag (encoding, branch, merge, sourceRename, ...)
    Other,
}

/// Change type, sent as a comma separated flag list such as `"rename, edit"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct ChangeType(Vec<ChangeKind>);

impl From<String> for ChangeType {
    fn from(value: String) -> Self {
        Self(
            value
                .split(',')
                .map(str::trim)
                .filter(|flag| !flag.is_empty())
                .map(|flag| match flag {
                    "add" => ChangeKind::Add,
                    "edit" => ChangeKind::Edit,
                    "rename" => ChangeKind::Rename,
                    "delete" => ChangeKind::Delete,
                    _ => ChangeKind::Other,
                })
                .collect(),
        )
    }
}

impl ChangeType {
    /// Whether the change includes a rename
    pub fn is_rename(&self) -> bool {
        self.0.contains(&ChangeKind::Rename)
    }
}

/// Changed item
#[derive(Debug, Clone, Deserialize)]
pub struct GitItem {
    /// Server path, e.g. `/dir/file.tf`
    #[serde(default)]
    pub path: Option<String>,
}

/// Single change in a commit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitChange {
    /// Changed item
    #[serde(default)]
    pub item: Option<GitItem>,
    /// Change flags
    #[serde(default)]
    pub change_type: ChangeType,
    /// Original path for renames
    #[serde(default)]
    pub source_server_item: Option<String>,
}

/// Changes of a commit
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommitChanges {
    /// Changes in this page
    #[serde(default)]
    pub changes: Vec<GitChange>,
}

/// New comment posted in a thread
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment<'a> {
    /// Always 0, a thread's first comment
    pub parent_comment_id: u64,
    /// Markdown body
    pub content: &'a str,
    /// Always `text`
    pub comment_type: &'static str,
}

/// Thread creation request
#[derive(Debug, Clone, Serialize)]
pub struct NewCommentThread<'a> {
    /// Comments opening the thread
    pub comments: Vec<NewComment<'a>>,
}

/// Comment returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    /// Comment ID
    #[serde(default)]
    pub id: Option<u64>,
    /// Author
    #[serde(default)]
    pub author: Option<IdentityRef>,
}

/// Comment thread returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct GitPullRequestCommentThread {
    /// Thread ID
    #[serde(default)]
    pub id: Option<u64>,
    /// Comments in the thread
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl GitPullRequestCommentThread {
    /// Author GUID when the thread holds exactly one comment with an author
    pub fn single_author_id(&self) -> Option<&str> {
        match self.comments.as_slice() {
            [comment] => comment
                .author
                .as_ref()
                .and_then(|a| a.id.as_deref())
                .filter(|id| !id.is_empty()),
            _ => None,
        }
    }
}

/// Policy evaluation status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyEvaluationStatus {
    /// Waiting to run
    Queued,
    /// Running
    Running,
    /// Passed
    Approved,
    /// Failed
    Rejected,
    /// Does not apply
    NotApplicable,
    /// Policy is broken
    Broken,
    /// Unrecognized value
    #[default]
    #[serde(other)]
    Unknown,
}

/// Policy configuration attached to an evaluation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfiguration {
    /// Policy enabled
    #[serde(default)]
    pub is_enabled: bool,
    /// Policy deleted
    #[serde(default)]
    pub is_deleted: bool,
    /// Policy blocks completion
    #[serde(default)]
    pub is_blocking: bool,
    /// Type-specific settings
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl PolicyConfiguration {
    /// `statusGenre` setting of a status policy
    pub fn status_genre(&self) -> Option<&str> {
        self.settings.get("statusGenre").and_then(|v| v.as_str())
    }

    /// `statusName` setting of a status policy
    pub fn status_name(&self) -> Option<&str> {
        self.settings.get("statusName").and_then(|v| v.as_str())
    }
}

/// Policy evaluation record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyEvaluationRecord {
    /// Evaluation ID
    #[serde(default)]
    pub evaluation_id: Option<String>,
    /// Evaluation status
    #[serde(default)]
    pub status: PolicyEvaluationStatus,
    /// Policy configuration
    pub configuration: PolicyConfiguration,
}

/// Pull request iteration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPullRequestIteration {
    /// Iteration ID, starting at 1
    #[serde(default)]
    pub id: Option<i64>,
    /// Source commit of the iteration
    #[serde(default)]
    pub source_ref_commit: Option<GitCommitRef>,
}

/// Status state vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GitStatusState {
    /// pending
    Pending,
    /// succeeded
    Succeeded,
    /// failed
    Failed,
    /// error
    Error,
}

impl From<CommitStatus> for GitStatusState {
    fn from(status: CommitStatus) -> Self {
        match status {
            CommitStatus::Pending => Self::Pending,
            CommitStatus::Success => Self::Succeeded,
            CommitStatus::Failed => Self::Failed,
            CommitStatus::Error => Self::Error,
        }
    }
}

/// Status context, rendered as `genre/name` in the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitStatusContext {
    /// Name
    pub name: String,
    /// Genre
    pub genre: String,
}

/// Pull request status creation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitPullRequestStatus<'a> {
    /// State
    pub state: GitStatusState,
    /// Description
    pub description: &'a str,
    /// Context
    pub context: GitStatusContext,
    /// Link shown with the status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<&'a str>,
    /// Iteration the status applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_id: Option<i64>,
}

/// Merge strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStrategy {
    /// Explicit merge commit
    NoFastForward,
    /// Squash
    Squash,
    /// Rebase then fast-forward
    Rebase,
    /// Rebase then merge commit
    RebaseMerge,
}

/// Completion options for a pull request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions<'a> {
    /// Bypass policies
    pub bypass_policy: bool,
    /// Bypass reason
    pub bypass_reason: &'a str,
    /// Delete the source branch afterwards
    pub delete_source_branch: bool,
    /// Merge commit message
    pub merge_commit_message: &'a str,
    /// Merge strategy
    pub merge_strategy: MergeStrategy,
    /// Legacy squash flag
    pub squash_merge: bool,
    /// Transition linked work items
    pub transition_work_items: bool,
    /// Whether completion was triggered by auto-complete
    pub triggered_by_auto_complete: bool,
}

/// Pull request update that completes it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestCompletion<'a> {
    /// Always `completed`
    pub status: PullRequestStatus,
    /// Commit the caller expects to merge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_merge_source_commit: Option<GitCommitRef>,
    /// Completion options
    pub completion_options: CompletionOptions<'a>,
    /// Acting identity
    pub auto_complete_set_by: IdentityRef,
}

/// Account the token authenticates as
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Identity GUID, usable as the merge identity
    pub id: String,
    /// Display name
    #[serde(default)]
    pub provider_display_name: Option<String>,
}

/// Response of the connection data endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    /// Authenticated account
    pub authenticated_user: AuthenticatedUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vote_from_integer() {
        let reviewer: IdentityRefWithVote =
            serde_json::from_value(json!({"uniqueName": "a@b", "vote": 5})).unwrap();
        assert_eq!(reviewer.vote, Vote::ApprovedWithSuggestions);
        assert!(reviewer.vote.is_approval());
        assert_eq!(Vote::from(-10), Vote::Rejected);
        assert!(!Vote::from(7).is_approval());
    }

    #[test]
    fn test_unknown_vocabulary_falls_back() {
        let pr: GitPullRequest = serde_json::from_value(json!({
            "pullRequestId": 1,
            "status": "somethingNew",
            "mergeStatus": "succeeded"
        }))
        .unwrap();
        assert_eq!(pr.status, PullRequestStatus::Unknown);
        assert_eq!(pr.merge_status, MergeStatus::Succeeded);
        assert!(!pr.is_draft);
    }

    #[test]
    fn test_change_type_flags() {
        let change: GitChange = serde_json::from_value(json!({
            "item": {"path": "/new/main.tf"},
            "changeType": "rename, edit",
            "sourceServerItem": "/old/main.tf"
        }))
        .unwrap();
        assert!(change.change_type.is_rename());

        let source_rename = ChangeType::from("delete, sourceRename".to_string());
        assert!(!source_rename.is_rename());
    }

    #[test]
    fn test_single_author_id() {
        let thread: GitPullRequestCommentThread = serde_json::from_value(json!({
            "id": 3,
            "comments": [{"id": 1, "author": {"id": "guid-1"}}]
        }))
        .unwrap();
        assert_eq!(thread.single_author_id(), Some("guid-1"));

        let two: GitPullRequestCommentThread = serde_json::from_value(json!({
            "comments": [{"author": {"id": "a"}}, {"author": {"id": "b"}}]
        }))
        .unwrap();
        assert_eq!(two.single_author_id(), None);

        let blank: GitPullRequestCommentThread = serde_json::from_value(json!({
            "comments": [{"author": {"id": ""}}]
        }))
        .unwrap();
        assert_eq!(blank.single_author_id(), None);
    }

    #[test]
    fn test_completion_body_shape() {
        let body = PullRequestCompletion {
            status: PullRequestStatus::Completed,
            last_merge_source_commit: None,
            completion_options: CompletionOptions {
                bypass_policy: false,
                bypass_reason: "",
                delete_source_branch: false,
                merge_commit_message: "msg",
                merge_strategy: MergeStrategy::NoFastForward,
                squash_merge: false,
                transition_work_items: true,
                triggered_by_auto_complete: false,
            },
            auto_complete_set_by: IdentityRef {
                id: Some("guid".into()),
                ..IdentityRef::default()
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["completionOptions"]["mergeStrategy"], "noFastForward");
        assert_eq!(value["autoCompleteSetBy"], json!({"id": "guid"}));
        assert!(value.get("lastMergeSourceCommit").is_none());
    }
}
