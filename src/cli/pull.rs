//! Pull request commands - files, comments, approval, mergeability, statuses

use crate::cli::style::{bullet, check, cross, Stylize};
use crate::cli::{pull_request, Connection};
use anstream::println;
use azdo_vcs::error::{Error, Result};
use azdo_vcs::identity::Identity;
use azdo_vcs::platform::{AzureDevOpsService, VcsClient};
use azdo_vcs::types::{CommitStatus, Repo};
use std::io::Read;
use std::path::Path;

/// List files modified by a pull request
pub async fn run_files(conn: &Connection, repo: &str, number: u64) -> Result<()> {
    let client = conn.client()?;
    let pull = pull_request(repo, number, None);
    let files = client.get_modified_files(&pull.base_repo, &pull).await?;

    if files.is_empty() {
        println!("{}", "No modified files".muted());
        return Ok(());
    }
    for file in &files {
        println!("{} {}", bullet(), file.accent());
    }
    Ok(())
}

/// Post a comment, read from `body`, `body_file` or stdin
pub async fn run_comment(
    conn: &Connection,
    repo: &str,
    number: u64,
    body: Option<&str>,
    body_file: Option<&Path>,
) -> Result<()> {
    let text = match (body, body_file) {
        (Some(body), _) => body.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("reading {}: {e}", path.display())))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| Error::Config(format!("reading stdin: {e}")))?;
            buf
        }
    };

    let service = conn.service()?;
    service.create_comment(&Repo::new(repo), number, &text).await?;
    println!("{} Commented on !{}", check(), number.accent());

    if let Identity::Known(guid) = service.identity() {
        println!("{}", format!("Acting as user GUID {guid}").muted());
    }
    Ok(())
}

/// Report whether a pull request is approved
pub async fn run_approved(conn: &Connection, repo: &str, number: u64) -> Result<()> {
    let client = conn.client()?;
    let pull = pull_request(repo, number, None);
    if client.pull_is_approved(&pull.base_repo, &pull).await? {
        println!("{} !{} is {}", check(), number.accent(), "approved".success());
    } else {
        println!(
            "{} !{} is {}",
            cross().for_stdout(),
            number.accent(),
            "not approved".warn().for_stdout()
        );
    }
    Ok(())
}

/// Report whether a pull request is mergeable
pub async fn run_mergeable(conn: &Connection, repo: &str, number: u64) -> Result<()> {
    let client = conn.client()?;
    let pull = pull_request(repo, number, None);
    if client.pull_is_mergeable(&pull.base_repo, &pull).await? {
        println!("{} !{} is {}", check(), number.accent(), "mergeable".success());
    } else {
        println!(
            "{} !{} is {}",
            cross().for_stdout(),
            number.accent(),
            "not mergeable".warn().for_stdout()
        );
    }
    Ok(())
}

/// Arguments of the status command
pub struct StatusArgs<'a> {
    /// Head commit the status applies to
    pub head: &'a str,
    /// New state
    pub state: CommitStatus,
    /// Status source, e.g. `atlantis/plan`
    pub src: &'a str,
    /// Description
    pub description: &'a str,
    /// Link target
    pub url: &'a str,
}

/// Set a status on a pull request
pub async fn run_status(
    conn: &Connection,
    repo: &str,
    number: u64,
    args: &StatusArgs<'_>,
) -> Result<()> {
    let client = conn.client()?;
    let pull = pull_request(repo, number, Some(args.head));
    client
        .update_status(
            &pull.base_repo,
            &pull,
            args.state,
            args.src,
            args.description,
            args.url,
        )
        .await?;
    println!(
        "{} Set {} to {} on !{}",
        check(),
        args.src.accent(),
        args.state,
        number.accent()
    );
    Ok(())
}

/// Print the comment reference for a pull request
pub fn run_link(conn: &Connection, number: u64) -> Result<()> {
    // Formatting a link needs no credentials.
    let service = AzureDevOpsService::new("", &conn.config)?;
    println!("{}", service.markdown_pull_link(&pull_request("", number, None)));
    Ok(())
}
