//! CLI module for person-api
//!
//! Provides command-line interface for:
//! - init: Write a default configuration file
//! - serve: Connect the database and run the HTTP server

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use errors::{CliError, CliResult};
