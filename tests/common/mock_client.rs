//! Mock VCS client for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use azdo_vcs::error::{Error, Result};
use azdo_vcs::platform::VcsClient;
use azdo_vcs::types::{CommitStatus, PullRequest, Repo};
use std::sync::Mutex;

/// Call record for `create_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pull_num: u64,
    pub body: String,
}

/// Call record for `update_status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatusCall {
    pub pull_num: u64,
    pub state: CommitStatus,
    pub src: String,
    pub description: String,
}

/// Hand-written `VcsClient` that records every call
///
/// Features:
/// - Configurable answers for files, approval and mergeability
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockVcsClient {
    modified_files: Mutex<Vec<String>>,
    approved: Mutex<bool>,
    mergeable: Mutex<bool>,
    // Call tracking
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    update_status_calls: Mutex<Vec<UpdateStatusCall>>,
    merge_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_comment: Mutex<Option<u16>>,
    error_on_merge: Mutex<Option<String>>,
}

impl MockVcsClient {
    pub fn new() -> Self {
        Self {
            modified_files: Mutex::new(Vec::new()),
            approved: Mutex::new(false),
            mergeable: Mutex::new(false),
            create_comment_calls: Mutex::new(Vec::new()),
            update_status_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_comment: Mutex::new(None),
            error_on_merge: Mutex::new(None),
        }
    }

    // === Response configuration ===

    pub fn set_modified_files(&self, files: &[&str]) {
        *self.modified_files.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    pub fn set_approved(&self, approved: bool) {
        *self.approved.lock().unwrap() = approved;
    }

    pub fn set_mergeable(&self, mergeable: bool) {
        *self.mergeable.lock().unwrap() = mergeable;
    }

    // === Error injection methods ===

    /// Make `create_comment` fail with an API error of `status`
    pub fn fail_comment(&self, status: u16) {
        *self.error_on_comment.lock().unwrap() = Some(status);
    }

    /// Make `merge_pull` report an incomplete merge
    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    pub fn get_update_status_calls(&self) -> Vec<UpdateStatusCall> {
        self.update_status_calls.lock().unwrap().clone()
    }

    pub fn get_merge_calls(&self) -> Vec<u64> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Assert `merge_pull` was never called
    pub fn assert_not_merged(&self) {
        let calls = self.get_merge_calls();
        assert!(calls.is_empty(), "expected no merges, got {calls:?}");
    }
}

impl Default for MockVcsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VcsClient for MockVcsClient {
    async fn get_modified_files(&self, _repo: &Repo, _pull: &PullRequest) -> Result<Vec<String>> {
        Ok(self.modified_files.lock().unwrap().clone())
    }

    async fn create_comment(&self, _repo: &Repo, pull_num: u64, comment: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pull_num,
                body: comment.to_string(),
            });

        if let Some(status) = *self.error_on_comment.lock().unwrap() {
            return Err(Error::Api {
                operation: "creating pull request comment",
                status,
                message: "mock failure".to_string(),
            });
        }
        Ok(())
    }

    async fn pull_is_approved(&self, _repo: &Repo, _pull: &PullRequest) -> Result<bool> {
        Ok(*self.approved.lock().unwrap())
    }

    async fn pull_is_mergeable(&self, _repo: &Repo, _pull: &PullRequest) -> Result<bool> {
        Ok(*self.mergeable.lock().unwrap())
    }

    async fn update_status(
        &self,
        _repo: &Repo,
        pull: &PullRequest,
        state: CommitStatus,
        src: &str,
        description: &str,
        _url: &str,
    ) -> Result<()> {
        self.update_status_calls
            .lock()
            .unwrap()
            .push(UpdateStatusCall {
                pull_num: pull.number,
                state,
                src: src.to_string(),
                description: description.to_string(),
            });
        Ok(())
    }

    async fn merge_pull(&self, pull: &PullRequest) -> Result<()> {
        self.merge_calls.lock().unwrap().push(pull.number);

        if let Some(msg) = self.error_on_merge.lock().unwrap().clone() {
            return Err(Error::MergeFailed(msg));
        }
        Ok(())
    }

    fn markdown_pull_link(&self, pull: &PullRequest) -> String {
        format!("!{}", pull.number)
    }
}
