use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;

pub mod check;
pub mod config;
pub mod init_config;
pub mod logging;
pub mod shuffle;
pub mod version;

use config::SantaConfig;

#[derive(Parser)]
#[command(name = "santa")]
#[command(author = "santa-shuffle contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Secret Santa assignment engine", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.config/santa/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level or EnvFilter directive (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for shuffle results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines with participant names
    Text,
    /// Machine-readable JSON report
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw a giver → recipient assignment for a party roster
    Shuffle {
        /// Path to the party roster (TOML)
        #[arg(long)]
        party: String,

        /// Wall-clock budget for the search (e.g. "500ms", "10s")
        #[arg(long)]
        time_budget: Option<String>,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a roster and report its exclusion density
    Check {
        /// Path to the party roster (TOML)
        #[arg(long)]
        party: String,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write it (default: ~/.config/santa/config.toml)
        #[arg(long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = SantaConfig::load_or_default(cli.config.as_deref().map(Path::new))?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    logging::init_logging(&level)?;

    match cli.command {
        Commands::Shuffle {
            party,
            time_budget,
            seed,
            format,
        } => shuffle::execute(&config, party, time_budget, seed, format).await,
        Commands::Check { party } => check::execute(party).await,
        Commands::InitConfig { path, force } => init_config::execute(path, force).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
