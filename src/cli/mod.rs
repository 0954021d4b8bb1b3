//! CLI module for resoval
//!
//! Provides command-line interface for:
//! - run: Execute a validator module against a listing
//! - check: Execute the built-in listing rules natively
//! - rules: Execute a rule file natively

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, check_rules, run, run_command, run_module};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
