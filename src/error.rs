//! Error types for the instagram-downloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Profile-level errors (fatal for the run)
    #[error("Profile '{0}' does not exist or is not accessible")]
    ProfileNotFound(String),

    #[error("Login required: {0}")]
    LoginRequired(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    // Metadata transcoding errors
    #[error("Metadata transcode failed: {0}")]
    Transcode(String),

    // File system errors
    #[error("Invalid path component: {0}")]
    InvalidPath(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether a failed fetch may succeed on a later attempt.
    ///
    /// Profile-level and configuration errors are permanent; network,
    /// rate-limit, and filesystem failures are worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::ProfileNotFound(_) | Error::LoginRequired(_) => false,
            Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => false,
            Error::InvalidPath(_) => false,
            Error::RateLimited(_) | Error::Http(_) | Error::Io(_) => true,
            Error::Api(_) | Error::Download(_) => true,
            Error::Transcode(_) | Error::Json(_) | Error::TomlParse(_) | Error::UrlParse(_) => {
                false
            }
        }
    }
}

/// Process exit codes, one per error class.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const PROFILE_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
