//! Command-line definitions for the `ifta` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Darul Ifta - fatwa request intake and review service.
#[derive(Debug, Parser)]
#[command(name = "ifta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ./ifta.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Answer or reject a pending request
    Review(ReviewArgs),

    /// Show recently answered questions
    Recent(RecentArgs),

    /// Search recently answered questions
    Search(SearchArgs),

    /// Show the status of a request by tracking id
    Status(StatusArgs),
}

/// Arguments for the review command.
#[derive(Debug, Parser)]
pub struct ReviewArgs {
    /// Tracking id of the request
    pub id: String,

    #[command(subcommand)]
    pub decision: DecisionCommand,
}

/// Reviewer decision.
#[derive(Debug, Subcommand)]
pub enum DecisionCommand {
    /// Publish an answer
    Answer {
        /// Name of the answering mufti
        #[arg(short, long)]
        mufti: String,

        /// Answer text
        #[arg(short, long)]
        answer: String,
    },

    /// Decline the request
    Reject,
}

/// Arguments for the recent command.
#[derive(Debug, Parser)]
pub struct RecentArgs {
    /// Number of entries (clamped to the configured maximum)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Search text
    pub query: String,

    /// Number of recent answers to search through
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the status command.
#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Tracking id of the request
    pub id: String,
}
