//! Per-post outcomes and run-level statistics.

/// Result of pushing one post through the pipeline.
#[derive(Debug, Default)]
pub struct PostOutcome {
    pub shortcode: String,
    pub failed: bool,
    pub files_moved: u64,
    pub hashes_written: u64,
    pub metadata_transcoded: u64,
}

impl PostOutcome {
    /// Outcome for a post whose fetch was abandoned.
    pub fn failed(shortcode: String) -> Self {
        Self {
            shortcode,
            failed: true,
            ..Default::default()
        }
    }
}

/// Aggregated statistics for one run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub posts_processed: u64,
    pub posts_skipped: u64,
    pub posts_failed: u64,
    pub files_moved: u64,
    pub hashes_written: u64,
    pub metadata_transcoded: u64,
}

impl RunStats {
    /// Fold a post's outcome into the totals.
    pub fn add_outcome(&mut self, outcome: &PostOutcome) {
        if outcome.failed {
            self.posts_failed += 1;
        } else {
            self.posts_processed += 1;
        }
        self.files_moved += outcome.files_moved;
        self.hashes_written += outcome.hashes_written;
        self.metadata_transcoded += outcome.metadata_transcoded;
    }

    /// Record a post skipped via the resume set.
    pub fn record_skipped(&mut self) {
        self.posts_skipped += 1;
    }

    /// Total posts the run looked at.
    pub fn total_posts(&self) -> u64 {
        self.posts_processed + self.posts_skipped + self.posts_failed
    }
}
