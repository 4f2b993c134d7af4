mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::logging::init_logging;

#[derive(clap::Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, default_value = "taskboard.yaml")]
    config: PathBuf,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the Taskboard server
    Run,
    /// Create a password hash for use in the config file
    Hash,
    /// Validate the config file
    Check,
    /// Create or update a user account
    CreateUser {
        email: String,
        full_name: String,
        #[clap(long)]
        role: Option<String>,
        #[clap(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run => crate::commands::run::command(&cli).await,
        Commands::Hash => crate::commands::hash::command().await,
        Commands::Check => crate::commands::check::command(&cli).await,
        Commands::CreateUser {
            email,
            full_name,
            role,
            password,
        } => crate::commands::create_user::command(&cli, email, full_name, role, password).await,
    }
}
