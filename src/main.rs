//! resoval CLI entry point
//!
//! All logic is delegated to the CLI module. Errors go to stderr; the exit
//! status is 2 when the validator aborted and 1 for any other failure.

use resoval::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}
