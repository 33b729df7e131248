//! Configuration structures and loading logic.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Profile targeting configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Profile URL or bare username. May instead come from the CLI or the
    /// interactive prompt.
    #[serde(default)]
    pub target: Option<String>,
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// How many posts may be fetching at once.
    #[serde(default = "default_concurrent_fetches")]
    pub concurrent_fetches: usize,

    /// Total fetch attempts per post (first try included).
    #[serde(default = "default_fetch_attempts")]
    pub fetch_attempts: u32,

    /// First retry delay in seconds; doubles per attempt.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_secs: u64,

    /// Ceiling on the retry delay in seconds.
    #[serde(default = "default_retry_max_delay")]
    pub retry_max_delay_secs: u64,

    /// Courtesy pause after each successful fetch, in milliseconds.
    #[serde(default = "default_post_delay")]
    pub post_delay_ms: u64,

    /// Whether to log each downloaded file.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            concurrent_fetches: default_concurrent_fetches(),
            fetch_attempts: default_fetch_attempts(),
            retry_base_delay_secs: default_retry_base_delay(),
            retry_max_delay_secs: default_retry_max_delay(),
            post_delay_ms: default_post_delay(),
            show_downloads: true,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36".to_string()
}

fn default_concurrent_fetches() -> usize {
    3
}

fn default_fetch_attempts() -> u32 {
    3
}

fn default_retry_base_delay() -> u64 {
    2
}

fn default_retry_max_delay() -> u64 {
    60
}

fn default_post_delay() -> u64 {
    1500
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// First retry delay.
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_secs(self.options.retry_base_delay_secs)
    }

    /// Retry delay ceiling.
    pub fn retry_max_delay(&self) -> Duration {
        Duration::from_secs(self.options.retry_max_delay_secs)
    }

    /// Courtesy pause after a successful fetch.
    pub fn post_delay(&self) -> Duration {
        Duration::from_millis(self.options.post_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.options.concurrent_fetches, 3);
        assert_eq!(config.options.fetch_attempts, 3);
        assert!(config.options.show_downloads);
        assert!(config.profile.target.is_none());
    }

    #[test]
    fn test_load_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[profile]
target = "someuser"

[options]
concurrent_fetches = 5
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.profile.target.as_deref(), Some("someuser"));
        assert_eq!(config.options.concurrent_fetches, 5);
        // Unspecified fields fall back to defaults
        assert_eq!(config.options.fetch_attempts, 3);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/config.toml")),
            Err(Error::Config(_))
        ));
    }
}
