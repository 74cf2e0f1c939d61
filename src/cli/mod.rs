//! CLI module for Postflow
//!
//! Provides operator commands:
//! - `check`: Show resolved configuration and publish readiness
//! - `audit`: Browse the session audit log

use clap::{Parser, Subcommand};
use tracing::debug;

pub mod audit;
pub mod check;

/// Postflow CLI
#[derive(Parser, Debug)]
#[command(name = "postflow")]
#[command(about = "Turn a spoken or typed request into a social post")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show resolved configuration and whether publishing is available
    Check,
    /// Browse the audit log
    Audit {
        #[command(subcommand)]
        command: AuditCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuditCommands {
    /// List the most recently active sessions
    Sessions {
        /// Maximum number of sessions to show
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Show the timeline of one session
    Show {
        /// Session ID (UUID)
        session_id: String,
        /// Only show events of this type (user_action, system, error)
        #[arg(long = "type")]
        event_type: Option<String>,
        /// Print the full session detail as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    debug!(command = ?cli.command, "Dispatching command");
    match cli.command {
        Some(Commands::Check) => check::run(),
        Some(Commands::Audit { command }) => audit::run(command).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
