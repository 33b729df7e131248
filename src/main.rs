//! Instagram Downloader - CLI entry point.

use std::io::Write as _;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use instagram_downloader::{
    api::InstaClient,
    cli::Args,
    config::{parse_profile_input, validate_config, Config},
    error::{exit_codes, Error, Result},
    fetch::run_profile,
    fs::ProfileLayout,
    output::{print_banner, print_config_summary, print_error, print_run_stats},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::ProfileNotFound(_) | Error::LoginRequired(_) => {
                    ExitCode::from(exit_codes::PROFILE_ERROR as u8)
                }
                Error::Download(_) | Error::Http(_) | Error::Api(_) | Error::RateLimited(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();
    let debug = args.debug;

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    print_banner();

    // Resolve the target profile
    let target = match config.profile.target.clone() {
        Some(target) => target,
        None => prompt_for_profile()?,
    };
    let username = parse_profile_input(&target)?;

    let layout = ProfileLayout::new(&config.download_directory(), &username)?;
    layout.ensure()?;

    // The per-run log file lives inside the profile directory, so logging
    // starts once that directory exists. The guard flushes the file at exit.
    let log_path = layout.log_file(Local::now());
    let _guard = init_logging(&log_path, debug)?;

    print_config_summary(
        &username,
        &layout.root().display().to_string(),
        config.options.concurrent_fetches,
    );
    tracing::info!("Downloading profile {} into {}", username, layout.root().display());
    tracing::info!("Run log: {}", log_path.display());

    // Run the pipeline
    let source = Arc::new(InstaClient::new(&config.client.user_agent)?);
    let stats = run_profile(source, &config, &layout, &username).await?;

    print_run_stats(&username, &stats);
    tracing::info!("Manifest saved to {}", layout.manifest().display());

    Ok(())
}

/// Console layer at the requested level, plus a debug-level file layer for
/// the per-run log.
fn init_logging(log_path: &Path, debug: bool) -> Result<WorkerGuard> {
    let log_level = if debug { "debug" } else { "info" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let log_file = std::fs::File::create(log_path)?;
    let (file_writer, guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_filter(console_filter))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(EnvFilter::new("debug")),
        )
        .init();

    Ok(guard)
}

/// Ask for the profile URL interactively when none was supplied.
fn prompt_for_profile() -> Result<String> {
    print!("Enter the public Instagram profile URL: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let input = input.trim();
    if input.is_empty() {
        return Err(Error::MissingConfig("profile URL or username".to_string()));
    }
    Ok(input.to_string())
}
