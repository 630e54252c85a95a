use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use devolution_core::AppConfig;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "devolution")]
#[command(author, version, about = "The Dev-o-lution event landing page, in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Open the landing page (default)
    Run,
    /// Print the FAQ entries
    Faq {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Mount the page headless and replay a toggle sequence
    Simulate {
        /// Card indices to toggle, in order (e.g. 0,2,2)
        #[arg(short, long, value_delimiter = ',')]
        toggle: Vec<usize>,
        /// Milliseconds of frames played after each toggle
        #[arg(long, default_value_t = 1500)]
        settle_ms: u64,
        /// Use the lite motion profile
        #[arg(long)]
        lite: bool,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config {
        /// Print only the config file path
        #[arg(long)]
        path: bool,
        /// Write the defaults to the config file if it does not exist yet
        #[arg(long, conflicts_with = "path")]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load()?,
    };
    let config = Arc::new(config);

    let command = cli.command.unwrap_or(Commands::Run);
    init_logging(&config, command == Commands::Run)?;

    match command {
        Commands::Run => commands::run::run(config).await,
        Commands::Faq { json } => commands::faq::run(&config, json),
        Commands::Simulate {
            toggle,
            settle_ms,
            lite,
            json,
        } => commands::simulate::run(&config, &toggle, settle_ms, lite, json),
        Commands::Config { path, init } => {
            commands::config::run(&config, cli.config.as_deref(), path, init)
        }
    }
}

/// `RUST_LOG` wins over the configured level. The terminal UI owns the
/// screen, so `run` logs to a file in the data directory.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_run() {
        let cli = Cli::try_parse_from(["devolution"]).unwrap();
        assert_eq!(cli.command, None);
        let cli = Cli::try_parse_from(["devolution", "run"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Run));
    }

    #[test]
    fn test_simulate_toggle_list() {
        let cli =
            Cli::try_parse_from(["devolution", "simulate", "--toggle", "0,2,2", "--json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Simulate {
                toggle: vec![0, 2, 2],
                settle_ms: 1500,
                lite: false,
                json: true,
            })
        );
    }

    #[test]
    fn test_rejects_bad_toggle_index() {
        assert!(Cli::try_parse_from(["devolution", "simulate", "--toggle", "a"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["devolution", "config", "--path", "-c", "/tmp/d.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/d.toml")));
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                path: true,
                init: false
            })
        );
    }

    #[test]
    fn test_config_init_conflicts_with_path() {
        assert!(Cli::try_parse_from(["devolution", "config", "--path", "--init"]).is_err());
    }
}
