use crate::constants::{self, env_vars, federation};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// An extra country alias checked before the built-in alias table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CountryAlias {
    /// Lower-case substring to look for in the country text
    pub alias: String,
    /// Two-letter country code the alias resolves to
    pub code: String,
}

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// API domain for fetching live snapshots and reference data. Should include https:// prefix.
    pub api_domain: String,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Seconds between live snapshot polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Team country literal of the tracked federation.
    #[serde(default = "default_federation_country")]
    pub federation_country: String,
    /// Nationality substring of the tracked federation's players.
    #[serde(default = "default_federation_demonym")]
    pub federation_demonym: String,
    /// Aliases checked before the built-in country alias table, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_country_aliases: Vec<CountryAlias>,
}

fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_poll_interval() -> u64 {
    constants::DEFAULT_POLL_INTERVAL_SECONDS
}

fn default_federation_country() -> String {
    federation::DEFAULT_COUNTRY.to_string()
}

fn default_federation_demonym() -> String {
    federation::DEFAULT_DEMONYM.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_domain: String::new(),
            log_file_path: None,
            http_timeout_seconds: default_http_timeout(),
            poll_interval_seconds: default_poll_interval(),
            federation_country: default_federation_country(),
            federation_demonym: default_federation_demonym(),
            extra_country_aliases: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `VOLLEY_API_DOMAIN` - Override API domain
    /// - `VOLLEY_LOG_FILE` - Override log file path
    /// - `VOLLEY_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    /// - `VOLLEY_POLL_INTERVAL` - Override poll interval in seconds (default: 10)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - No config file and no `VOLLEY_API_DOMAIN`, unreadable file, or
    ///   validation failure
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else if std::env::var(env_vars::API_DOMAIN).is_ok() {
            Config::default()
        } else {
            return Err(AppError::config_error(format!(
                "No configuration found at {config_path}. Run with --config <API_DOMAIN> or set {}",
                env_vars::API_DOMAIN
            )));
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies `VOLLEY_*` environment overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_domain) = std::env::var(env_vars::API_DOMAIN) {
            self.api_domain = api_domain;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Some(interval) = std::env::var(env_vars::POLL_INTERVAL)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.poll_interval_seconds = interval;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Domain:");
            println!("{}", config.api_domain);
            println!("────────────────────────────────────");
            println!("HTTP Timeout / Poll Interval:");
            println!(
                "{}s / {}s",
                config.http_timeout_seconds, config.poll_interval_seconds
            );
            println!("────────────────────────────────────");
            println!("Tracked Federation:");
            println!(
                "{} (players: *{}*)",
                config.federation_country, config.federation_demonym
            );
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/volley_live.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist and ensures the API domain
    /// has the proper https:// prefix.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let api_domain = if !self.api_domain.starts_with("https://") {
            format!("https://{}", self.api_domain.trim_start_matches("http://"))
        } else {
            self.api_domain.clone()
        };
        let content = toml::to_string_pretty(&Config {
            api_domain,
            ..self.clone()
        })?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads the stored file for editing: no env overrides and no validation,
    /// so saving it back keeps every stored setting. Defaults when absent.
    pub async fn load_stored_or_default(path: &str) -> Result<Self, AppError> {
        if Path::new(path).exists() {
            Self::load_from_path(path).await
        } else {
            Ok(Config::default())
        }
    }
}
