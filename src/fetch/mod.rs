//! Fetch pipeline.
//!
//! This module provides:
//! - The profile orchestrator (bounded concurrent fetch, move, hash,
//!   transcode, resume)
//! - The retry policy for the fetch step
//! - Outcome and statistics tracking

pub mod orchestrator;
pub mod retry;
pub mod state;

pub use orchestrator::run_profile;
pub use retry::RetryPolicy;
pub use state::{PostOutcome, RunStats};
