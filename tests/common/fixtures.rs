//! Test data factories for Azure DevOps responses
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use azdo_vcs::platform::AzureDevOpsService;
use azdo_vcs::types::{PullRequest, Repo, ServiceConfig};
use serde_json::{Value, json};

pub const TOKEN: &str = "token";

/// `Authorization` header for [`TOKEN`] (basic auth, empty user)
pub const BASIC_AUTH: &str = "Basic OnRva2Vu";

pub const REPO: &str = "org/proj/repo";

pub const PROJECT_ID: &str = "6f0e8a4c-0000-4000-8000-000000000001";

/// URL path of a repository scoped endpoint
pub fn repo_path(path: &str) -> String {
    format!("/org/proj/_apis/git/repositories/repo/{path}")
}

/// Adapter config with the given identity setting
pub fn make_config(user_guid: Option<&str>) -> ServiceConfig {
    ServiceConfig {
        user_guid: user_guid.map(str::to_string),
        ..ServiceConfig::default()
    }
}

/// Service pointed at a mock server
pub fn make_service(server_url: &str, user_guid: Option<&str>) -> AzureDevOpsService {
    AzureDevOpsService::with_base_url(TOKEN, server_url, &make_config(user_guid)).unwrap()
}

pub fn make_repo() -> Repo {
    Repo::new(REPO)
}

pub fn make_pull(number: u64, head_commit: &str) -> PullRequest {
    PullRequest {
        number,
        head_commit: head_commit.to_string(),
        base_repo: make_repo(),
    }
}

/// Active, mergeable pull request
pub fn pr_json(number: u64) -> Value {
    json!({
        "pullRequestId": number,
        "title": "Add network module",
        "status": "active",
        "mergeStatus": "succeeded",
        "isDraft": false,
        "createdBy": {
            "id": "author-guid",
            "displayName": "Author",
            "uniqueName": "author@example.com"
        },
        "reviewers": [],
        "lastMergeSourceCommit": {"commitId": "abc123"},
        "repository": {
            "id": "repo-guid",
            "name": "repo",
            "project": {"id": PROJECT_ID, "name": "proj"}
        },
        "supportsIterations": false
    })
}

/// Pull request with some fields overridden
pub fn pr_json_with(number: u64, overrides: Value) -> Value {
    let mut pr = pr_json(number);
    if let (Some(target), Value::Object(fields)) = (pr.as_object_mut(), overrides) {
        target.extend(fields);
    }
    pr
}

pub fn reviewer(unique_name: &str, vote: i32) -> Value {
    json!({"id": format!("{unique_name}-guid"), "uniqueName": unique_name, "vote": vote})
}

pub fn change(path: &str, change_type: &str) -> Value {
    json!({"item": {"path": path}, "changeType": change_type})
}

pub fn rename(path: &str, source: &str) -> Value {
    json!({"item": {"path": path}, "changeType": "rename", "sourceServerItem": source})
}

pub fn changes_json(changes: Vec<Value>) -> Value {
    json!({"changes": changes, "changeCounts": {}})
}

/// Thread created by `author_guids`, one comment each
pub fn thread_json(author_guids: &[&str]) -> Value {
    let comments: Vec<Value> = author_guids
        .iter()
        .enumerate()
        .map(|(idx, guid)| json!({"id": idx + 1, "author": {"id": guid}, "content": "..."}))
        .collect();
    json!({"id": 11, "comments": comments})
}

pub fn evaluation(status: &str, blocking: bool, settings: Value) -> Value {
    json!({
        "evaluationId": format!("eval-{status}"),
        "status": status,
        "configuration": {
            "isEnabled": true,
            "isDeleted": false,
            "isBlocking": blocking,
            "settings": settings
        }
    })
}

pub fn list_json(values: Vec<Value>) -> Value {
    let count = values.len();
    json!({"value": values, "count": count})
}

pub fn iteration(id: i64, commit: &str) -> Value {
    json!({"id": id, "sourceRefCommit": {"commitId": commit}})
}
