//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Instagram profile downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "instagram-downloader",
    version,
    about = "Download public Instagram profiles with MD5 chain-of-custody manifests",
    long_about = "Downloads every post of a public Instagram profile, records an MD5 manifest \
                  of all downloaded files, and converts JSON metadata sidecars to plain text.\n\n\
                  Re-runs skip posts whose artifacts are already on disk."
)]
pub struct Args {
    /// Profile URL or bare username. Prompted for interactively if omitted.
    pub profile: Option<String>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", env = "IG_USER_AGENT")]
    pub user_agent: Option<String>,

    /// How many posts to fetch concurrently.
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Total fetch attempts per post before it is abandoned.
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide per-file download logging.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(profile) = self.profile {
            config.profile.target = Some(profile);
        }

        if let Some(dir) = self.download_directory {
            config.options.download_directory = Some(dir);
        }

        if let Some(user_agent) = self.user_agent {
            config.client.user_agent = user_agent;
        }

        if let Some(concurrency) = self.concurrency {
            config.options.concurrent_fetches = concurrency;
        }

        if let Some(attempts) = self.attempts {
            config.options.fetch_attempts = attempts;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_config() {
        let args = Args {
            profile: Some("someuser".to_string()),
            download_directory: Some(PathBuf::from("/downloads")),
            user_agent: None,
            concurrency: Some(5),
            attempts: None,
            config: PathBuf::from("config.toml"),
            quiet: true,
            debug: false,
        };

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.profile.target.as_deref(), Some("someuser"));
        assert_eq!(config.options.concurrent_fetches, 5);
        assert_eq!(config.options.fetch_attempts, 3);
        assert!(!config.options.show_downloads);
    }
}
