//! Merge command - complete a pull request

use crate::cli::style::{check, Stylize};
use crate::cli::{pull_request, Connection};
use anstream::println;
use azdo_vcs::error::{Error, Result};
use dialoguer::Confirm;

/// Run the merge command
pub async fn run_merge(
    conn: &Connection,
    repo: &str,
    number: u64,
    head: Option<&str>,
    yes: bool,
) -> Result<()> {
    let client = conn.client()?;
    let pull = pull_request(repo, number, head);
    let link = client.markdown_pull_link(&pull);

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Merge {link} in {repo} with a merge commit?"))
            .default(false)
            .interact()
            .map_err(|e| Error::Config(format!("confirmation prompt failed: {e}")))?;

        if !confirmed {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
    }

    client.merge_pull(&pull).await?;
    println!("{} Merged {}", check(), link.accent());
    Ok(())
}
