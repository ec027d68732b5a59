//! Name and path normalization for Azure DevOps
//!
//! Azure DevOps repositories are addressed as `organization/project/repo`,
//! statuses as a `genre`/`name` pair, and changed items by absolute server
//! paths. These helpers map between those shapes and the plain strings the
//! orchestration engine works with.

use crate::platform::azure_devops::models::GitStatusContext;
use crate::types::RepoName;

/// Split a repository full name into owner, project and repository
///
/// ```text
/// org/repo              => (org, "", repo)
/// org/project/repo      => (org, project, repo)
/// group/sub/org/repo    => (group/sub/org, "", repo)
/// repo, org/            => ("", "", "")
/// ```
///
/// Malformed names produce empty segments instead of an error so a bad
/// configuration surfaces as a failed API call rather than a crash.
pub fn split_repo_full_name(full_name: &str) -> RepoName {
    let Some(last) = full_name.rfind('/') else {
        return RepoName::default();
    };
    if last == full_name.len() - 1 {
        return RepoName::default();
    }

    let owner_and_project = &full_name[..last];
    let repo = full_name[last + 1..].to_string();

    if full_name.matches('/').count() == 2 {
        if let Some((owner, project)) = owner_and_project.split_once('/') {
            return RepoName {
                owner: owner.to_string(),
                project: project.to_string(),
                repo,
            };
        }
    }

    RepoName {
        owner: owner_and_project.to_string(),
        project: String::new(),
        repo,
    }
}

/// Build the status context for a status source string
///
/// The branch policy UI shows a single `genre/name` string where everything
/// before the final `/` is the genre, so `plan/dir` posted by `bot` becomes
/// genre `bot/plan` and name `dir`.
pub fn status_context_from_src(bot_name: &str, src: &str) -> GitStatusContext {
    match src.rsplit_once('/') {
        Some((prefix, name)) => GitStatusContext {
            genre: format!("{bot_name}/{prefix}"),
            name: name.to_string(),
        },
        None => GitStatusContext {
            genre: bot_name.to_string(),
            name: src.to_string(),
        },
    }
}

/// Make a server item path relative to the repository root
///
/// Equivalent to lexically cleaning `./<path>`: duplicate and trailing
/// separators and `.` segments are dropped and `..` consumes its parent.
pub fn clean_repo_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
