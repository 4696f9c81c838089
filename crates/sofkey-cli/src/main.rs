#![deny(unsafe_code)]

//! sofkey CLI: resolve and query SOFiSTiK keyword tables from the shell.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sofkey_config::AppConfig;

/// sofkey: SOFiSTiK keyword resolution and lookup.
#[derive(Parser)]
#[command(name = "sofkey", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "sofkey.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the version and language that apply to a deck.
    Resolve {
        /// Deck to inspect.
        file: Option<PathBuf>,
    },

    /// List the versions a language's table covers.
    Versions {
        /// Language code or alias (defaults to the configured one).
        #[arg(short, long)]
        language: Option<String>,
    },

    /// List modules.
    Modules { file: Option<PathBuf> },

    /// List the commands of a module.
    Commands {
        module: String,
        file: Option<PathBuf>,
    },

    /// List the parameters of a command.
    Params {
        module: String,
        command: String,
        file: Option<PathBuf>,
    },

    /// Show the allowed values of a parameter.
    Enums {
        module: String,
        command: String,
        param: String,
        file: Option<PathBuf>,
    },

    /// Case-insensitive substring search over commands and parameters.
    Search {
        term: String,
        file: Option<PathBuf>,
    },

    /// Check whether a word is a known command or parameter.
    Validate {
        word: String,
        file: Option<PathBuf>,
    },

    /// Show module, command, and parameter counts.
    Stats { file: Option<PathBuf> },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_config(&cli.config)?;
    let from_file = loaded.is_some();
    let config = loaded.unwrap_or_default();

    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !from_file {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    let output = commands::Output { json: cli.json };
    let service = sofkey_core::KeywordService::new(&config);

    match cli.command {
        Commands::Resolve { file } => commands::resolve(&service, file.as_deref(), output)?,
        Commands::Versions { language } => {
            commands::versions(&service, language.as_deref(), output)?
        }
        Commands::Modules { file } => commands::modules(&service, file.as_deref(), output)?,
        Commands::Commands { module, file } => {
            commands::commands(&service, &module, file.as_deref(), output)?
        }
        Commands::Params {
            module,
            command,
            file,
        } => commands::params(&service, &module, &command, file.as_deref(), output)?,
        Commands::Enums {
            module,
            command,
            param,
            file,
        } => commands::enums(&service, &module, &command, &param, file.as_deref(), output)?,
        Commands::Search { term, file } => {
            commands::search(&service, &term, file.as_deref(), output)?
        }
        Commands::Validate { word, file } => {
            commands::validate(&service, &word, file.as_deref(), output)?
        }
        Commands::Stats { file } => commands::stats(&service, file.as_deref(), output)?,
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Load the config at `path`; `None` when there is no such file.
fn load_config(path: &Path) -> Result<Option<AppConfig>> {
    if path.exists() {
        AppConfig::load(path)
            .map(Some)
            .map_err(|e| anyhow::anyhow!(e))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_config(&tmp.path().join("sofkey.toml")).unwrap().is_none());
    }

    #[test]
    fn test_config_file_is_loaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sofkey.toml");
        std::fs::write(&path, "[keywords]\nlanguage = \"de\"\n").unwrap();
        let config = load_config(&path).unwrap().expect("config file exists");
        assert_eq!(config.keywords.language, "de");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sofkey.toml");
        std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
