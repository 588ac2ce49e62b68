//! access-check - inspect the bizdesk page policy
//!
//! Prints the role × page matrix, or runs the full access gate for a raw
//! stored role string against one page.

use anyhow::Context;
use bizdesk_access::{
    AccessSystem, Config, InMemoryIdentityProvider, InMemoryRecordStore, PageId, PolicyTable,
    Role, TracingSink, init_tracing,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const CLI_IDENTITY: &str = "access-check";

#[derive(Debug, Parser)]
#[command(
    name = "access-check",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about = "Inspect the bizdesk page access policy"
)]
struct Cli {
    /// YAML configuration file; `BIZDESK_*` environment variables override it
    #[arg(long, short, env = "BIZDESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print which roles may open which pages
    Matrix,
    /// Run the access gate for one role string and page
    Check {
        /// Role string as it would be stored (unknown values become `user`)
        #[arg(long, default_value = "user")]
        role: String,
        /// Requested page, e.g. `finances` or `user-management`
        #[arg(long)]
        page: PageId,
        /// Evaluate without a signed-in session
        #[arg(long)]
        anonymous: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?
            .with_env_overrides()
            .context("applying environment overrides")?,
        None => Config::from_env().context("loading configuration from environment")?,
    };
    init_tracing(&config.logging)?;

    match cli.command {
        Command::Matrix => {
            print_matrix(PolicyTable::standard());
            Ok(())
        }
        Command::Check {
            role,
            page,
            anonymous,
        } => check(&config, &role, page, anonymous).await,
    }
}

fn print_matrix(policy: &PolicyTable) {
    let width = PageId::ALL
        .iter()
        .map(|page| page.as_str().len())
        .max()
        .unwrap_or(0);

    print!("{:width$}", "", width = width);
    for role in Role::ALL {
        print!("  {:>11}", role.as_str());
    }
    println!();

    for page in PageId::ALL {
        let allowed = policy.roles_with_access(page);
        print!("{:width$}", page.as_str(), width = width);
        for role in Role::ALL {
            let mark = if allowed.contains(&role) { "x" } else { "-" };
            print!("  {:>11}", mark);
        }
        println!();
    }
}

async fn check(
    config: &Config,
    raw_role: &str,
    page: PageId,
    anonymous: bool,
) -> anyhow::Result<()> {
    let identity = Arc::new(InMemoryIdentityProvider::new(
        config.access.identity_event_buffer,
    ));
    let store = Arc::new(InMemoryRecordStore::new());
    store.insert_role(CLI_IDENTITY, raw_role);

    let access = AccessSystem::new(
        &config.access,
        identity.clone(),
        store,
        Arc::new(TracingSink::new()),
    )?;

    if !anonymous {
        identity.sign_in(CLI_IDENTITY);
        println!("role:     {} (stored {:?})", access.current_role().await, raw_role);
    } else {
        println!("role:     - (no session)");
    }
    println!("page:     {}", page);
    println!("decision: {}", access.guard_current(page).await);
    Ok(())
}
