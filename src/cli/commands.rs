//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// listwalk CLI
#[derive(Parser, Debug)]
#[command(name = "listwalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Endpoint definition file (YAML)
    #[arg(short, long, global = true)]
    pub endpoint: Option<PathBuf>,

    /// State file for continuation tokens (JSON)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drain the endpoint, printing items as NDJSON on stdout
    Fetch {
        /// Maximum items to fetch across all pages
        #[arg(long)]
        max_items: Option<u64>,

        /// Requested page size (clamped to the endpoint's max)
        #[arg(long)]
        page_size: Option<u32>,

        /// Resume from the token saved in the state file
        #[arg(long)]
        resume: bool,

        /// Resume from an explicit token (overrides --resume)
        #[arg(long)]
        token: Option<String>,
    },

    /// Fetch exactly one page and print it with its continuation token
    Page {
        /// Token to resume from
        #[arg(long)]
        token: Option<String>,

        /// Requested page size (clamped to the endpoint's max)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Validate an endpoint definition
    Validate,

    /// Print the saved state for the endpoint
    State,
}
