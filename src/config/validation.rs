//! Configuration validation logic.

use regex::Regex;
use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Maximum username length the platform allows.
const MAX_USERNAME_LENGTH: usize = 30;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.options.concurrent_fetches == 0 {
        return Err(Error::ConfigValidation {
            field: "concurrent_fetches".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if config.options.fetch_attempts == 0 {
        return Err(Error::ConfigValidation {
            field: "fetch_attempts".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if config.options.retry_base_delay_secs > config.options.retry_max_delay_secs {
        return Err(Error::ConfigValidation {
            field: "retry_base_delay_secs".to_string(),
            message: format!(
                "Base delay {}s exceeds maximum delay {}s",
                config.options.retry_base_delay_secs, config.options.retry_max_delay_secs
            ),
        });
    }

    Ok(())
}

/// Validate a bare username.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(Error::MissingConfig("profile username".to_string()));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(Error::ConfigValidation {
            field: "profile".to_string(),
            message: format!(
                "Username '{}' is too long (maximum {} characters)",
                username, MAX_USERNAME_LENGTH
            ),
        });
    }

    // Username pattern: alphanumeric, dots, underscores
    let username_pattern = Regex::new(r"^[a-zA-Z0-9._]+$").unwrap();
    if !username_pattern.is_match(username) {
        return Err(Error::ConfigValidation {
            field: "profile".to_string(),
            message: format!(
                "Username '{}' contains invalid characters. Only alphanumeric, dots, and underscores allowed.",
                username
            ),
        });
    }

    Ok(())
}

/// Extract a username from a profile URL or bare username string.
///
/// For URLs, the username is the last non-empty path segment; bare input may
/// carry a leading `@`.
pub fn parse_profile_input(input: &str) -> Result<String> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") {
        let url = Url::parse(input)?;
        let username = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(|s| s.to_string())
            .ok_or_else(|| Error::ConfigValidation {
                field: "profile".to_string(),
                message: format!("Could not extract a username from URL: {}", input),
            })?;

        validate_username(&username)?;
        return Ok(username);
    }

    let username = input.trim_start_matches('@').trim_end_matches('/');
    validate_username(username)?;
    Ok(username.to_string())
}
