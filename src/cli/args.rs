//! CLI argument definitions using clap
//!
//! Commands:
//! - resoval run --module <path> --data <path> [--previous-data <path>] [--config <path>]
//! - resoval check --data <path> [--previous-data <path>]
//! - resoval rules --rules <path> --data <path> [--previous-data <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// resoval - Sandboxed listing field validation
#[derive(Parser, Debug)]
#[command(name = "resoval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a validator module (.wasm or .wat) against a listing
    Run {
        /// Path to the validator module
        #[arg(long)]
        module: PathBuf,

        /// Path to the current listing (JSON)
        #[arg(long)]
        data: PathBuf,

        /// Path to the previous listing (JSON); `null` when omitted
        #[arg(long)]
        previous_data: Option<PathBuf>,

        /// Path to runtime configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Log more (-v for lifecycle events, -vv to trace host calls)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },

    /// Run the built-in listing rules natively
    Check {
        /// Path to the current listing (JSON)
        #[arg(long)]
        data: PathBuf,

        /// Path to the previous listing (JSON); `null` when omitted
        #[arg(long)]
        previous_data: Option<PathBuf>,

        /// Log more (-v for lifecycle events, -vv to trace host calls)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },

    /// Run a rule file (RETS expressions) natively
    Rules {
        /// Path to the rule file (JSON, `{"value": [...]}`)
        #[arg(long)]
        rules: PathBuf,

        /// Path to the current listing (JSON)
        #[arg(long)]
        data: PathBuf,

        /// Path to the previous listing (JSON); `null` when omitted
        #[arg(long)]
        previous_data: Option<PathBuf>,

        /// Log more (-v for lifecycle events, -vv to trace host calls)
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
