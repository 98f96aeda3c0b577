//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code. The
//! rendered message starts with a stable code so scripts can match on it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Failures of the `init` and `serve` commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("PERSON_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    #[error("PERSON_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("PERSON_CLI_ALREADY_INITIALIZED: config file already exists: {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// Database or server failed to come up
    #[error("PERSON_CLI_BOOT_FAILED: {0}")]
    BootFailed(String),
}

impl CliError {
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::BootFailed(msg.into())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
