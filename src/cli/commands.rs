//! CLI command implementations

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::http_server::HttpServer;
use crate::logging;
use crate::store::Database;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Write a default configuration file.
///
/// Refuses to overwrite an existing file.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::AlreadyInitialized(config_path.to_path_buf()));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = Config::default().to_json()?;
    fs::write(config_path, content)?;

    println!("Wrote default config to {}", config_path.display());
    Ok(())
}

/// Load config, connect the database, and serve HTTP until interrupted
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    logging::init(&config.log_level);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(serve_config(config))
}

/// Async half of `serve`
pub async fn serve_config(config: Config) -> CliResult<()> {
    let db = boot_database(&config).await?;

    let server = HttpServer::with_database(config.server, db.clone());
    let result = server
        .start()
        .await
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)));

    db.close().await;
    result
}

/// Connect and make sure the person table exists
async fn boot_database(config: &Config) -> CliResult<Database> {
    let db = Database::connect(&config.database)
        .await
        .map_err(|e| CliError::boot_failed(format!("Failed to connect database: {}", e)))?;

    db.ensure_schema()
        .await
        .map_err(|e| CliError::boot_failed(format!("Failed to create person table: {}", e)))?;

    tracing::info!(url = %config.database.url, "database ready");
    Ok(db)
}
