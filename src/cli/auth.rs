//! Auth command - test and explain authentication

use crate::cli::Connection;
use crate::cli::style::{check, Stylize};
use anstream::println;
use azdo_vcs::auth::{get_azure_devops_auth, test_azure_devops_auth};
use azdo_vcs::error::Result;

/// Run the auth test command
pub async fn run_auth_test(conn: &Connection, organization: &str) -> Result<()> {
    println!("Testing Azure DevOps authentication...");
    let auth = get_azure_devops_auth(conn.token.as_deref())?;
    let user = test_azure_devops_auth(&auth, &conn.config, organization).await?;

    let name = user.provider_display_name.as_deref().unwrap_or("(unknown)");
    println!("{} Authenticated as: {}", check(), name.accent());
    println!("User GUID: {}", user.id.accent());
    println!("{}", format!("Token source: {:?}", auth.source).muted());
    println!("{}", format!("Host: {}", conn.config.host).muted());
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("{}", "Azure DevOps Authentication Setup".emphasis());
    println!("=================================");
    println!();
    println!("1. Create a personal access token with Code (Read & Write) and");
    println!("   Code (Status) scopes:");
    println!("   https://dev.azure.com/<organization>/_usersSettings/tokens");
    println!();
    println!("2. Export it:");
    println!("   {}", "export AZURE_DEVOPS_TOKEN=<token>".accent());
    println!("   (AZURE_DEVOPS_EXT_PAT is also read)");
    println!();
    println!("3. For merges, configure the GUID the token acts as:");
    println!("   {}", "azdo auth test <organization>".accent());
    println!("   {}", "export AZURE_DEVOPS_USER_GUID=<guid>".accent());
    println!("   Leave it unset (\"auto\") to learn it from the first comment posted.");
    println!();
    println!("For Azure DevOps Server:");
    println!("  Set AZURE_DEVOPS_HOST to your instance hostname");
}
