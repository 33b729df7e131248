//! The download-move-hash-resume pipeline.
//!
//! Each post not already on disk is fetched into its own staging directory,
//! moved into the permanent posts directory, hashed into the manifest, and
//! its metadata sidecar transcoded. Fetches run concurrently up to a bound;
//! everything after the fetch runs in the same task, so within one post the
//! pipeline is strictly sequential.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tokio_retry2::{Retry, RetryError};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::retry::RetryPolicy;
use crate::fetch::state::{PostOutcome, RunStats};
use crate::fs::ProfileLayout;
use crate::manifest::ManifestWriter;
use crate::media::{classify_artifact, ArtifactKind, MediaSource, PostHandle};
use crate::output::progress::create_item_bar;
use crate::resume::scan_completed_posts;
use crate::transcode::{transcode_metadata, transcoded_path};

/// Shared state handed to every post task.
struct PipelineContext {
    source: Arc<dyn MediaSource>,
    layout: ProfileLayout,
    manifest: ManifestWriter,
    fetch_slots: Semaphore,
    policy: RetryPolicy,
    post_delay: Duration,
    show_downloads: bool,
}

/// Download a whole profile.
///
/// Profile-level failures (unknown profile, login wall) abort the run; every
/// post- and file-level failure is logged and the run continues.
pub async fn run_profile(
    source: Arc<dyn MediaSource>,
    config: &Config,
    layout: &ProfileLayout,
    username: &str,
) -> Result<RunStats> {
    let profile = source.resolve_profile(username).await?;
    tracing::info!(
        "Resolved profile {} ({} posts reported)",
        profile.username,
        profile.post_count
    );

    let posts = source.list_posts(&profile).await?;
    let resume_set = scan_completed_posts(layout.posts())?;
    if !resume_set.is_empty() {
        tracing::info!(
            "Resume: {} posts already captured in {}",
            resume_set.len(),
            layout.posts().display()
        );
    }

    let ctx = Arc::new(PipelineContext {
        source: Arc::clone(&source),
        layout: layout.clone(),
        manifest: ManifestWriter::open(layout.manifest())?,
        fetch_slots: Semaphore::new(config.options.concurrent_fetches),
        policy: RetryPolicy::from_config(config),
        post_delay: config.post_delay(),
        show_downloads: config.options.show_downloads,
    });

    let pb = create_item_bar(posts.len() as u64, "Posts");
    let mut stats = RunStats::default();
    let mut handles = Vec::new();

    for post in posts {
        if resume_set.contains(&post.shortcode) {
            tracing::debug!("Skipping already captured post {}", post.shortcode);
            stats.record_skipped();
            pb.inc(1);
            continue;
        }

        let ctx = Arc::clone(&ctx);
        let pb_task = pb.clone();
        handles.push(tokio::spawn(async move {
            let outcome = process_post(&ctx, post).await;
            pb_task.inc(1);
            outcome
        }));
    }

    for result in join_all(handles).await {
        match result {
            Ok(outcome) => stats.add_outcome(&outcome),
            Err(e) => {
                tracing::error!("Post task panicked: {}", e);
                stats.posts_failed += 1;
            }
        }
    }
    pb.finish_and_clear();

    if layout.staging_root().exists() {
        if let Err(e) = std::fs::remove_dir_all(layout.staging_root()) {
            tracing::warn!(
                "Could not remove staging directory {}: {}",
                layout.staging_root().display(),
                e
            );
        }
    }

    tracing::info!(
        "Run complete for {}: {} processed, {} skipped, {} failed, {} hashes written",
        profile.username,
        stats.posts_processed,
        stats.posts_skipped,
        stats.posts_failed,
        stats.hashes_written
    );

    Ok(stats)
}

/// One post's pipeline: fetch (bounded, retried) then move, hash, transcode.
async fn process_post(ctx: &PipelineContext, post: PostHandle) -> PostOutcome {
    let staging = ctx.layout.staging_for(&post.shortcode);

    // The permit bounds only the Fetching state; post-processing runs after
    // the slot is released.
    let fetch_result = match ctx.fetch_slots.acquire().await {
        Ok(_permit) => {
            let result = fetch_with_retry(ctx, &post, &staging).await;
            if result.is_ok() && !ctx.post_delay.is_zero() {
                // Courtesy pause holds the fetch slot so the source gets a
                // breather between fetches
                sleep(ctx.post_delay).await;
            }
            result
        }
        Err(_) => return PostOutcome::failed(post.shortcode),
    };

    if let Err(e) = fetch_result {
        tracing::error!(
            "Post {} abandoned after {} attempts: {}",
            post.shortcode,
            ctx.policy.max_attempts,
            e
        );
        cleanup_staging(&staging);
        return PostOutcome::failed(post.shortcode);
    }

    let mut outcome = PostOutcome {
        shortcode: post.shortcode.clone(),
        ..Default::default()
    };
    process_staged_files(ctx, &staging, &mut outcome);
    cleanup_staging(&staging);

    tracing::info!(
        "Post {} done: {} files moved, {} hashes, {} metadata transcoded",
        outcome.shortcode,
        outcome.files_moved,
        outcome.hashes_written,
        outcome.metadata_transcoded
    );
    outcome
}

/// Fetch a post's artifacts into staging, retrying transient failures per
/// the policy.
async fn fetch_with_retry(ctx: &PipelineContext, post: &PostHandle, staging: &Path) -> Result<()> {
    Retry::spawn(ctx.policy.delays(), || async {
        match ctx.source.fetch_post(post, staging).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_transient() => {
                tracing::warn!("Fetch of post {} failed, will retry: {}", post.shortcode, e);
                RetryError::to_transient(e)
            }
            Err(e) => {
                tracing::warn!("Fetch of post {} failed permanently: {}", post.shortcode, e);
                RetryError::to_permanent(e)
            }
        }
    })
    .await
}

/// Move every staged file into the posts directory, then hash and transcode
/// what moved. Per-file failures are logged and do not stop the remaining
/// files.
fn process_staged_files(ctx: &PipelineContext, staging: &Path, outcome: &mut PostOutcome) {
    let entries = match std::fs::read_dir(staging) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Cannot read staging directory {}: {}", staging.display(), e);
            return;
        }
    };

    for entry in entries {
        let src = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!("Unreadable staging entry in {}: {}", staging.display(), e);
                continue;
            }
        };
        if !src.is_file() {
            continue;
        }

        let filename = match src.file_name() {
            Some(name) => name.to_owned(),
            None => continue,
        };
        let dest = ctx.layout.posts().join(&filename);

        if let Err(e) = move_file(&src, &dest) {
            tracing::warn!("Could not move {} to {}: {}", src.display(), dest.display(), e);
            continue;
        }
        outcome.files_moved += 1;
        if ctx.show_downloads {
            tracing::info!("Moved {}", dest.display());
        }

        match classify_artifact(&dest) {
            ArtifactKind::PlainText => {}
            kind => {
                match ctx.manifest.record(&dest) {
                    Ok(true) => {
                        outcome.hashes_written += 1;
                        tracing::debug!("Hash recorded for {}", dest.display());
                    }
                    Ok(false) => {
                        tracing::debug!("Hash already recorded for {}", dest.display());
                    }
                    Err(e) => {
                        tracing::warn!("Could not hash {}: {}", dest.display(), e);
                    }
                }

                if kind == ArtifactKind::Metadata {
                    let txt = transcoded_path(&dest);
                    match transcode_metadata(&dest, &txt) {
                        Ok(()) => {
                            outcome.metadata_transcoded += 1;
                            tracing::debug!("Transcoded {} to {}", dest.display(), txt.display());
                        }
                        Err(e) => {
                            tracing::warn!("Could not transcode {}: {}", dest.display(), e);
                        }
                    }
                }
            }
        }
    }
}

/// Rename with a copy+remove fallback for cross-filesystem staging.
fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match std::fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            std::fs::copy(src, dest)?;
            std::fs::remove_file(src)?;
            Ok(())
        }
    }
}

/// Remove a post's staging directory so the next fetch starts clean.
fn cleanup_staging(staging: &Path) {
    if staging.exists() {
        if let Err(e) = std::fs::remove_dir_all(staging) {
            tracing::warn!("Could not clean staging {}: {}", staging.display(), e);
        }
    }
}
