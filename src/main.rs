//! azdo - Azure DevOps pull request operations
//!
//! CLI binary exposing the adapter operations for manual use and scripting.

use anyhow::Result;
use azdo_vcs::types::{
    CommitStatus, ServiceConfig, DEFAULT_APPLY_STATUS_SRC, DEFAULT_BOT_NAME, DEFAULT_HOST,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "azdo")]
#[command(about = "Azure DevOps pull request operations for PR automation")]
#[command(version)]
struct Cli {
    /// Azure DevOps host
    #[arg(long, global = true, env = "AZURE_DEVOPS_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Personal access token (defaults to AZURE_DEVOPS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// User GUID to merge as; "auto" learns it from a comment, empty disables merging
    #[arg(long, global = true, env = "AZURE_DEVOPS_USER_GUID")]
    user_guid: Option<String>,

    /// Genre prefix of posted statuses
    #[arg(long, global = true, default_value = DEFAULT_BOT_NAME)]
    bot_name: String,

    /// Status source of the apply status, ignored when checking mergeability
    #[arg(long, global = true, default_value = DEFAULT_APPLY_STATUS_SRC)]
    apply_status: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files modified by a pull request
    Files {
        /// Repository full name (organization/project/repository)
        repo: String,
        /// Pull request ID
        pr: u64,
    },

    /// Post a comment (reads stdin when no body is given)
    Comment {
        /// Repository full name
        repo: String,
        /// Pull request ID
        pr: u64,
        /// Comment text
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,
        /// File containing the comment text
        #[arg(long)]
        body_file: Option<PathBuf>,
    },

    /// Check whether someone other than the author approved
    Approved {
        /// Repository full name
        repo: String,
        /// Pull request ID
        pr: u64,
    },

    /// Check whether the pull request can be merged
    Mergeable {
        /// Repository full name
        repo: String,
        /// Pull request ID
        pr: u64,
    },

    /// Set a status on the pull request
    Status {
        /// Repository full name
        repo: String,
        /// Pull request ID
        pr: u64,
        /// Head commit SHA the status applies to
        #[arg(long)]
        head: String,
        /// Status state
        #[arg(long, value_enum)]
        state: StateArg,
        /// Status source, e.g. atlantis/plan
        #[arg(long)]
        context: String,
        /// Status description
        #[arg(long, default_value = "")]
        description: String,
        /// Link shown with the status
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Merge the pull request with a merge commit
    Merge {
        /// Repository full name
        repo: String,
        /// Pull request ID
        pr: u64,
        /// Head commit SHA expected to be merged
        #[arg(long)]
        head: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the comment reference for a pull request
    Link {
        /// Pull request ID
        pr: u64,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication and show the user GUID
    Test {
        /// Organization (or collection) to authenticate against
        organization: String,
    },
    /// Show authentication setup instructions
    Setup,
}

#[derive(Clone, Copy, ValueEnum)]
enum StateArg {
    Pending,
    Success,
    Failed,
    Error,
}

impl From<StateArg> for CommitStatus {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Pending => Self::Pending,
            StateArg::Success => Self::Success,
            StateArg::Failed => Self::Failed,
            StateArg::Error => Self::Error,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let conn = cli::Connection {
        config: ServiceConfig {
            host: cli.host,
            user_guid: cli.user_guid,
            bot_name: cli.bot_name,
            apply_status_src: cli.apply_status,
        },
        token: cli.token,
    };

    match cli.command {
        Commands::Files { repo, pr } => cli::run_files(&conn, &repo, pr).await?,
        Commands::Comment {
            repo,
            pr,
            body,
            body_file,
        } => {
            cli::run_comment(&conn, &repo, pr, body.as_deref(), body_file.as_deref()).await?;
        }
        Commands::Approved { repo, pr } => cli::run_approved(&conn, &repo, pr).await?,
        Commands::Mergeable { repo, pr } => cli::run_mergeable(&conn, &repo, pr).await?,
        Commands::Status {
            repo,
            pr,
            head,
            state,
            context,
            description,
            url,
        } => {
            let args = cli::StatusArgs {
                head: &head,
                state: state.into(),
                src: &context,
                description: &description,
                url: &url,
            };
            cli::run_status(&conn, &repo, pr, &args).await?;
        }
        Commands::Merge {
            repo,
            pr,
            head,
            yes,
        } => cli::run_merge(&conn, &repo, pr, head.as_deref(), yes).await?,
        Commands::Link { pr } => cli::run_link(&conn, pr)?,
        Commands::Auth { action } => match action {
            AuthAction::Test { organization } => {
                cli::run_auth_test(&conn, &organization).await?;
            }
            AuthAction::Setup => cli::run_auth_setup(),
        },
    }

    Ok(())
}
