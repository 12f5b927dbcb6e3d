//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::infrastructure::AppContext;

pub use types::{Cli, Commands};

/// Load configuration from `path`, or from the project files when unset.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Install the global subscriber described by `config`.
///
/// The returned logger must be kept alive for file output to be flushed.
pub fn init_logging(config: &Config, verbose: bool) -> Result<LoggerImpl> {
    let mut log_config = LogConfig::from_settings(&config.logging, config.logs_dir())
        .map_err(|e| anyhow::anyhow!(e))
        .context("Invalid logging configuration")?;
    if verbose {
        log_config = log_config.verbose();
    }
    LoggerImpl::init(&log_config)
}

/// Build the services used by a command.
pub fn build_context(config: Config) -> Result<AppContext> {
    AppContext::from_config(config).context("Failed to initialize services")
}

/// Write a downloaded file to `target`, or to `default_name` in the current
/// directory. A directory target receives `default_name` inside it.
pub async fn save_download(target: Option<&Path>, default_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = match target {
        Some(target) if target.is_dir() => target.join(default_name),
        Some(target) => target.to_path_buf(),
        None => PathBuf::from(default_name),
    };
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Load configuration, set up logging and dispatch the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let _logger = init_logging(&config, cli.verbose)?;
    let json = cli.json;

    match cli.command {
        Commands::Init(args) => commands::init::execute(args, config, json).await,
        Commands::Course(args) => commands::course::execute(args, config, json).await,
        Commands::Ask(args) => commands::ask::execute(args, config, json).await,
        Commands::History(args) => commands::history::execute(args, config, json).await,
        Commands::Resources(args) => commands::resources::execute(args, config, json).await,
        Commands::Serve(args) => commands::serve::execute(args, config).await,
    }
}

/// Print `err` for the user and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": causes,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {}", style("Error:").red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("  {} {}", style("caused by:").dim(), cause);
        }
    }
    std::process::exit(1);
}
