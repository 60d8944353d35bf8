//! santa configuration file handling
//!
//! Provides default configuration generation and loading for the `santa` CLI.
//! Configuration files are TOML format and live under the user config
//! directory (`~/.config/santa/config.toml` on Linux) unless `--config` is given.
//!
//! Rosters (who is in the party, who excludes whom) are NOT configuration;
//! they are passed per command with `--party`.

use santa_shuffle::matchmaker::{ShuffleConfig, DEFAULT_TIME_BUDGET};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Longest accepted time budget (one day)
const MAX_TIME_BUDGET: Duration = Duration::from_secs(24 * 60 * 60);

/// santa CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SantaConfig {
    /// Assignment engine configuration
    #[serde(default)]
    pub shuffle: ShuffleSection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Assignment engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuffleSection {
    /// Wall-clock budget per shuffle, humantime format ("10s", "500ms", "1m")
    #[serde(default = "default_time_budget")]
    pub time_budget: String,

    /// Reuse the first assignment found for a party id within one run
    #[serde(default = "default_memoize")]
    pub memoize: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or an EnvFilter directive
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_time_budget() -> String {
    humantime::format_duration(DEFAULT_TIME_BUDGET).to_string()
}

fn default_memoize() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ShuffleSection {
    fn default() -> Self {
        Self {
            time_budget: default_time_budget(),
            memoize: default_memoize(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Parse a humantime duration, rejecting zero and anything over a day.
pub fn parse_time_budget(value: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let budget = humantime::parse_duration(value.trim())
        .map_err(|e| format!("Invalid time budget '{}': {}", value, e))?;

    if budget.is_zero() {
        return Err(format!("Invalid time budget '{}': must be greater than zero", value).into());
    }
    if budget > MAX_TIME_BUDGET {
        return Err(format!(
            "Invalid time budget '{}': must be at most {}",
            value,
            humantime::format_duration(MAX_TIME_BUDGET)
        )
        .into());
    }

    Ok(budget)
}

impl SantaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: SantaConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Load `path` if given, else the default location if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::load(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Engine settings from the `[shuffle]` section
    pub fn shuffle_config(&self) -> Result<ShuffleConfig, Box<dyn std::error::Error>> {
        Ok(ShuffleConfig {
            time_budget: parse_time_budget(&self.shuffle.time_budget)?,
            memoize: self.shuffle.memoize,
        })
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# santa configuration
#
# Party rosters are NOT stored here. Pass them per command:
#   santa shuffle --party office-2026.toml

[shuffle]
# Wall-clock budget for one shuffle ("500ms", "10s", "1m").
# When no valid draw is found within the budget the party is reported as
# unsatisfiable: its exclusions are too dense for its size.
time_budget = "{time_budget}"

# Reuse the first assignment found for a party id within one run
memoize = true

[logging]
# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this when set.
level = "{level}"
"#,
            time_budget = default_time_budget(),
            level = DEFAULT_LOG_LEVEL,
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml();

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path
///
/// - Linux: ~/.config/santa/config.toml
/// - macOS: ~/Library/Application Support/santa/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("santa")
        .join("config.toml")
}
