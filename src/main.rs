//! person-api entry point
//!
//! All logic is delegated to the CLI module; errors go to stderr and the
//! process exits non-zero.

use person_api::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
