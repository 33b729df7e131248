//! Instagram Downloader - forensic profile capture
//!
//! This library downloads every post of a public Instagram profile and
//! preserves a chain-of-custody record of what was captured.
//!
//! # Features
//!
//! - Bounded concurrent post fetching with retry and backoff
//! - Per-file MD5 manifest (`hash.txt`), preserved across runs
//! - JSON metadata sidecars transcoded to plain text
//! - Whole-post resume: re-runs skip posts already on disk
//! - Per-run log file alongside the downloaded profile
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use instagram_downloader::{run_profile, Config, InstaClient, ProfileLayout};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let layout = ProfileLayout::new(Path::new("."), "someuser")?;
//!     layout.ensure()?;
//!
//!     let source = Arc::new(InstaClient::new(&config.client.user_agent)?);
//!     let stats = run_profile(source, &config, &layout, "someuser").await?;
//!     println!("{} posts processed", stats.posts_processed);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fs;
pub mod manifest;
pub mod media;
pub mod output;
pub mod resume;
pub mod transcode;

// Re-exports for convenience
pub use api::InstaClient;
pub use config::{parse_profile_input, Config};
pub use error::{Error, Result};
pub use fetch::{run_profile, RetryPolicy, RunStats};
pub use fs::ProfileLayout;
pub use manifest::ManifestWriter;
pub use media::{MediaSource, PostHandle, ProfileInfo};
