//! Azure DevOps platform service implementation

pub mod models;

use crate::comment::{split_comment, MAX_COMMENT_LENGTH, SEP_END, SEP_START};
use crate::error::{Error, Result};
use crate::identity::{CachedIdentity, Identity, IdentityResolver};
use crate::platform::names::{clean_repo_path, split_repo_full_name, status_context_from_src};
use crate::platform::VcsClient;
use crate::types::{CommitStatus, PullRequest, Repo, RepoName, ServiceConfig, DEFAULT_HOST};
use async_trait::async_trait;
use models::{
    AuthenticatedUser, CompletionOptions, ConnectionData, GitCommitChanges, GitCommitRef,
    GitPullRequest, GitPullRequestCommentThread, GitPullRequestIteration, GitPullRequestStatus,
    GitStatusContext, IdentityRef, ListResponse, MergeStatus, MergeStrategy, NewComment,
    NewCommentThread, PolicyEvaluationRecord, PolicyEvaluationStatus, PullRequestCompletion,
    PullRequestStatus,
};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// API version for stable endpoints
const API_VERSION: &str = "7.1";

/// API version for endpoints still in preview (statuses, policy evaluations)
const API_VERSION_PREVIEW: &str = "7.1-preview.1";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Page size for commit changes
const CHANGES_PAGE_SIZE: usize = 1000;

/// Page size for policy evaluations
const EVALUATIONS_PAGE_SIZE: usize = 200;

/// Commit message used when completing a pull request
pub const MERGE_COMMIT_MESSAGE: &str = "[Atlantis] Automatically merging after successful apply";

/// Azure DevOps service using reqwest
pub struct AzureDevOpsService {
    client: Client,
    token: String,
    base_url: Url,
    identity: Arc<dyn IdentityResolver>,
    bot_name: String,
    apply_status: GitStatusContext,
}

impl AzureDevOpsService {
    /// Create a new Azure DevOps service for `config.host`
    pub fn new(token: &str, config: &ServiceConfig) -> Result<Self> {
        let host = config.host.trim();
        let host = if host.is_empty() { DEFAULT_HOST } else { host };
        Self::with_base_url(token, &format!("https://{host}/"), config)
    }

    /// Create a service talking to an explicit base URL
    pub fn with_base_url(token: &str, base_url: &str, config: &ServiceConfig) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|_| Error::InvalidHost(base_url.to_string()))?;
        if base_url.cannot_be_a_base() || base_url.host_str().is_none() {
            return Err(Error::InvalidHost(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        let identity = Identity::from_config(config.user_guid.as_deref());

        Ok(Self {
            client,
            token: token.trim().to_string(),
            base_url,
            identity: Arc::new(CachedIdentity::new(identity)),
            bot_name: config.bot_name.clone(),
            apply_status: status_context_from_src(&config.bot_name, &config.apply_status_src),
        })
    }

    /// Replace the identity strategy
    #[must_use]
    pub fn with_identity(mut self, identity: Arc<dyn IdentityResolver>) -> Self {
        self.identity = identity;
        self
    }

    /// Current acting identity
    pub fn identity(&self) -> Identity {
        self.identity.get()
    }

    /// Account the token authenticates as within `organization`
    pub async fn authenticated_user(&self, organization: &str) -> Result<AuthenticatedUser> {
        let name = RepoName {
            owner: organization.to_string(),
            ..RepoName::default()
        };
        let url = self.api_url(&name, "connectionData");
        let request = self
            .request(Method::GET, &url)
            .query(&[("api-version", API_VERSION_PREVIEW)]);
        let data: ConnectionData = self.send("getting connection data", request).await?;
        Ok(data.authenticated_user)
    }

    /// Fetch a pull request of `repo`
    pub async fn get_pull_request(&self, repo: &Repo, number: u64) -> Result<GitPullRequest> {
        let name = self.repo_name(repo);
        self.fetch_pull_request(&name, number).await
    }

    fn repo_name(&self, repo: &Repo) -> RepoName {
        let name = split_repo_full_name(&repo.full_name);
        if name.is_empty() {
            warn!(
                full_name = %repo.full_name,
                "malformed repository name, expected organization/project/repository"
            );
        }
        name
    }

    fn api_url(&self, name: &RepoName, path: &str) -> String {
        let mut url = self.base_url.to_string();
        for segment in [&name.owner, &name.project] {
            if !segment.is_empty() {
                url.push_str(&encode_path(segment));
                url.push('/');
            }
        }
        url.push_str("_apis/");
        url.push_str(path);
        url
    }

    fn repo_url(&self, name: &RepoName, path: &str) -> String {
        self.api_url(
            name,
            &format!("git/repositories/{}/{path}", urlencoding::encode(&name.repo)),
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth("", Some(&self.token))
            .header(ACCEPT, "application/json")
    }

    /// Send a request and return the body of a 2xx response
    async fn execute(&self, operation: &'static str, request: RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|source| Error::Request { operation, source })?;

        let status = response.status();
        debug!(operation, %status, "azure devops response");

        let body = response
            .text()
            .await
            .map_err(|source| Error::Request { operation, source })?;

        if !status.is_success() {
            return Err(Error::Api {
                operation,
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        Ok(body)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let body = self.execute(operation, request).await?;
        serde_json::from_str(&body).map_err(|source| Error::Decode { operation, source })
    }

    async fn fetch_pull_request(&self, name: &RepoName, number: u64) -> Result<GitPullRequest> {
        let url = self.repo_url(name, &format!("pullrequests/{number}"));
        let request = self.request(Method::GET, &url).query(&[
            ("includeWorkItemRefs", "true"),
            ("api-version", API_VERSION),
        ]);
        self.send("getting pull request", request).await
    }

    async fn list_commit_changes(&self, name: &RepoName, commit_id: &str) -> Result<Vec<String>> {
        let url = self.repo_url(name, &format!("commits/{}/changes", encode_path(commit_id)));
        let mut files = Vec::new();
        let mut skip = 0;

        loop {
            let request = self.request(Method::GET, &url).query(&[
                ("top", CHANGES_PAGE_SIZE.to_string()),
                ("skip", skip.to_string()),
                ("api-version", API_VERSION.to_string()),
            ]);
            let page: GitCommitChanges = self.send("getting commit changes", request).await?;
            let fetched = page.changes.len();

            for change in page.changes {
                if let Some(path) = change.item.and_then(|item| item.path) {
                    files.push(clean_repo_path(&path));
                }
                // A rename may move files between independently planned
                // directories, so the old location counts as modified too.
                if change.change_type.is_rename() {
                    if let Some(source) = change.source_server_item {
                        files.push(clean_repo_path(&source));
                    }
                }
            }

            if fetched != CHANGES_PAGE_SIZE {
                break;
            }
            skip += fetched;
        }

        Ok(files)
    }

    async fn list_policy_evaluations(
        &self,
        name: &RepoName,
        project_id: &str,
        number: u64,
    ) -> Result<Vec<PolicyEvaluationRecord>> {
        let url = self.api_url(name, "policy/evaluations");
        let artifact_id = format!("vstfs:///CodeReview/CodeReviewId/{project_id}/{number}");
        let mut evaluations = Vec::new();

        loop {
            let request = self.request(Method::GET, &url).query(&[
                ("artifactId", artifact_id.clone()),
                ("$top", EVALUATIONS_PAGE_SIZE.to_string()),
                ("$skip", evaluations.len().to_string()),
                ("api-version", API_VERSION_PREVIEW.to_string()),
            ]);
            let page: ListResponse<PolicyEvaluationRecord> =
                self.send("getting policy evaluations", request).await?;
            let fetched = page.value.len();
            evaluations.extend(page.value);

            if fetched != EVALUATIONS_PAGE_SIZE {
                break;
            }
        }

        Ok(evaluations)
    }

    fn learn_identity(&self, thread: &GitPullRequestCommentThread) {
        if self.identity.get() != Identity::Auto {
            return;
        }
        debug!("user GUID set to auto");

        // A freshly created single-comment thread has exactly one author: us.
        match thread.single_author_id() {
            Some(guid) => {
                if self.identity.try_set(guid) {
                    debug!(guid, "cached user GUID from comment author");
                }
            }
            None => debug!(
                ?thread,
                "user GUID set to auto but response identities != 1, not caching"
            ),
        }
    }
}

#[async_trait]
impl VcsClient for AzureDevOpsService {
    async fn get_modified_files(&self, repo: &Repo, pull: &PullRequest) -> Result<Vec<String>> {
        let name = self.repo_name(repo);
        let pr = self.fetch_pull_request(&name, pull.number).await?;

        let commit_id = pr
            .last_merge_source_commit
            .map(|commit| commit.commit_id)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| pull.head_commit.clone());
        if commit_id.is_empty() {
            return Err(Error::MissingField {
                operation: "getting pull request",
                field: "lastMergeSourceCommit.commitId",
            });
        }

        self.list_commit_changes(&name, &commit_id).await
    }

    async fn create_comment(&self, repo: &Repo, pull_num: u64, comment: &str) -> Result<()> {
        let name = self.repo_name(repo);
        let url = self.repo_url(&name, &format!("pullRequests/{pull_num}/threads"));
        let chunks = split_comment(comment, MAX_COMMENT_LENGTH, SEP_END, SEP_START);
        let single = chunks.len() == 1;

        for chunk in &chunks {
            let body = NewCommentThread {
                comments: vec![NewComment {
                    parent_comment_id: 0,
                    content: chunk,
                    comment_type: "text",
                }],
            };
            let request = self
                .request(Method::POST, &url)
                .query(&[("api-version", API_VERSION)])
                .json(&body);
            let thread: GitPullRequestCommentThread =
                self.send("creating pull request comment", request).await?;

            if single {
                self.learn_identity(&thread);
            }
        }

        Ok(())
    }

    async fn pull_is_approved(&self, repo: &Repo, pull: &PullRequest) -> Result<bool> {
        let name = self.repo_name(repo);
        let pr = self.fetch_pull_request(&name, pull.number).await?;
        Ok(is_approved(&pr))
    }

    async fn pull_is_mergeable(&self, repo: &Repo, pull: &PullRequest) -> Result<bool> {
        let name = self.repo_name(repo);
        let pr = self.fetch_pull_request(&name, pull.number).await?;

        if pr.merge_status != MergeStatus::Succeeded
            || pr.is_draft
            || pr.status != PullRequestStatus::Active
        {
            return Ok(false);
        }

        let project_id = pr.project_id().ok_or(Error::MissingField {
            operation: "getting pull request",
            field: "repository.project.id",
        })?;
        let evaluations = self
            .list_policy_evaluations(&name, project_id, pull.number)
            .await?;

        Ok(policies_allow_merge(&evaluations, &self.apply_status))
    }

    async fn update_status(
        &self,
        repo: &Repo,
        pull: &PullRequest,
        state: CommitStatus,
        src: &str,
        description: &str,
        url: &str,
    ) -> Result<()> {
        let name = self.repo_name(repo);
        let mut status = GitPullRequestStatus {
            state: state.into(),
            description,
            context: status_context_from_src(&self.bot_name, src),
            target_url: (!url.is_empty()).then_some(url),
            iteration_id: None,
        };

        let pr = self.fetch_pull_request(&name, pull.number).await?;
        if pr.supports_iterations {
            let iterations_url =
                self.repo_url(&name, &format!("pullRequests/{}/iterations", pull.number));
            let request = self
                .request(Method::GET, &iterations_url)
                .query(&[("api-version", API_VERSION)]);
            let iterations: ListResponse<GitPullRequestIteration> =
                self.send("listing pull request iterations", request).await?;

            let iteration_id = find_iteration(&iterations.value, &pull.head_commit).ok_or_else(
                || Error::NoMatchingIteration {
                    head_commit: pull.head_commit.clone(),
                },
            )?;
            status.iteration_id = Some(iteration_id);
        }

        let statuses_url = self.repo_url(&name, &format!("pullRequests/{}/statuses", pull.number));
        let request = self
            .request(Method::POST, &statuses_url)
            .query(&[("api-version", API_VERSION_PREVIEW)])
            .json(&status);
        self.execute("creating pull request status", request).await?;

        debug!(
            number = pull.number,
            genre = %status.context.genre,
            name = %status.context.name,
            "updated pull request status"
        );
        Ok(())
    }

    async fn merge_pull(&self, pull: &PullRequest) -> Result<()> {
        // Without the acting GUID Azure DevOps either rejects the completion
        // (wrong GUID) or accepts it without merging (empty GUID).
        let guid = match self.identity.get() {
            Identity::Auto => return Err(Error::IdentityNotCached),
            Identity::Unset => return Err(Error::IdentityNotConfigured),
            Identity::Known(guid) => guid,
        };

        let name = self.repo_name(&pull.base_repo);
        let body = PullRequestCompletion {
            status: PullRequestStatus::Completed,
            last_merge_source_commit: (!pull.head_commit.is_empty()).then(|| GitCommitRef {
                commit_id: pull.head_commit.clone(),
            }),
            completion_options: CompletionOptions {
                bypass_policy: false,
                bypass_reason: "",
                delete_source_branch: false,
                merge_commit_message: MERGE_COMMIT_MESSAGE,
                merge_strategy: MergeStrategy::NoFastForward,
                squash_merge: false,
                transition_work_items: true,
                triggered_by_auto_complete: false,
            },
            auto_complete_set_by: IdentityRef {
                id: Some(guid),
                ..IdentityRef::default()
            },
        };

        let url = self.repo_url(&name, &format!("pullrequests/{}", pull.number));
        let request = self
            .request(Method::PATCH, &url)
            .query(&[("api-version", API_VERSION)])
            .json(&body);
        let result: GitPullRequest = self.send("merging pull request", request).await?;

        if result.merge_status != MergeStatus::Succeeded {
            return Err(Error::MergeFailed(
                result.merge_failure_message.unwrap_or_default(),
            ));
        }

        info!(number = pull.number, "merged pull request");
        Ok(())
    }

    fn markdown_pull_link(&self, pull: &PullRequest) -> String {
        format!("!{}", pull.number)
    }
}

fn encode_path(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Whether any reviewer other than the author approved
fn is_approved(pr: &GitPullRequest) -> bool {
    let author = pr
        .created_by
        .as_ref()
        .and_then(|c| c.unique_name.as_deref())
        .unwrap_or_default();

    pr.reviewers
        .iter()
        .filter(|r| r.unique_name.as_deref().unwrap_or_default() != author)
        .any(|r| r.vote.is_approval())
}

/// Whether every enabled blocking policy is approved
///
/// The status posted for our own apply is skipped even when a branch policy
/// makes it blocking, otherwise apply would wait on itself.
fn policies_allow_merge(
    evaluations: &[PolicyEvaluationRecord],
    own_status: &GitStatusContext,
) -> bool {
    for evaluation in evaluations {
        let config = &evaluation.configuration;
        if !config.is_enabled || config.is_deleted {
            continue;
        }

        if config.status_genre() == Some(own_status.genre.as_str())
            && config.status_name() == Some(own_status.name.as_str())
        {
            continue;
        }

        if config.is_blocking && evaluation.status != PolicyEvaluationStatus::Approved {
            debug!(
                evaluation_id = ?evaluation.evaluation_id,
                status = ?evaluation.status,
                "blocking policy not approved"
            );
            return false;
        }
    }
    true
}

/// ID of the iteration whose source commit is `head_commit`
fn find_iteration(iterations: &[GitPullRequestIteration], head_commit: &str) -> Option<i64> {
    iterations
        .iter()
        .find(|it| {
            it.source_ref_commit
                .as_ref()
                .is_some_and(|c| c.commit_id == head_commit)
        })
        .and_then(|it| it.id)
        .filter(|id| *id >= 1)
}
