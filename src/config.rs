//! Configuration file handling.
//!
//! This module provides loading and saving of wpscout configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/wpscout/config.toml`
//! - macOS: `~/Library/Application Support/wpscout/config.toml`
//! - Windows: `%APPDATA%\wpscout\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! timeout_secs = 10
//! user_agent = "Mozilla/5.0 (compatible; wpscout)"
//! concurrency = 4
//! default_format = "table"
//! color = true
//! wordlist_dir = "/usr/share/wpscout/wordlists"
//! cve_database = "/var/lib/wpscout/cves.json"
//! latest_version_url = "https://wordpress.org/download/"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::version::LATEST_VERSION_URL;

/// Application configuration.
///
/// This struct represents all configurable options for wpscout.
/// It can be loaded from a TOML file or created with default values.
///
/// # Example
///
/// ```no_run
/// use wpscout::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Timeout: {} seconds", config.timeout_secs);
/// println!("Probes in flight: {}", config.concurrency);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-request timeout, in seconds.
    ///
    /// Default: 10
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// How many detection probes may be in flight at once.
    ///
    /// Default: 1 (probes are fetched one after another)
    pub concurrency: usize,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// Whether advisory identifiers are colored in table output.
    ///
    /// Default: true
    pub color: bool,

    /// Directory searched for wordlists before the built-in ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordlist_dir: Option<PathBuf>,

    /// JSON advisory database. Without one, no advisories are reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve_database: Option<PathBuf>,

    /// Page advertising the latest WordPress release.
    pub latest_version_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!(
                "Mozilla/5.0 (compatible; wpscout/{})",
                env!("CARGO_PKG_VERSION")
            ),
            concurrency: 1,
            default_format: "table".to_string(),
            color: true,
            wordlist_dir: None,
            cve_database: None,
            latest_version_url: LATEST_VERSION_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::from_toml(&fs::read_to_string(&path)?)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use wpscout::Config;
    ///
    /// let path = Config::config_path();
    /// println!("Config file: {}", path.display());
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wpscout")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.default_format, "table");
        assert!(config.color);
        assert!(config.cve_database.is_none());
        assert_eq!(config.latest_version_url, "https://wordpress.org/download/");
        assert!(config.user_agent.contains("wpscout"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let content = "concurrency = 8\ncve_database = \"/tmp/cves.json\"\n";
        let config = Config::from_toml(content).unwrap();

        assert_eq!(config.concurrency, 8);
        assert_eq!(config.cve_database, Some(PathBuf::from("/tmp/cves.json")));
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("concurrency = \"many\"").is_err());
    }

    #[test]
    fn test_generate_default_config_round_trips() {
        let generated = Config::generate_default_config();
        assert!(generated.contains("timeout_secs = 10"));
        assert!(Config::from_toml(&generated).is_ok());
    }
}
