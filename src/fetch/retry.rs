//! Retry policy for the fetch step.

use std::time::Duration;

use tokio_retry2::strategy::ExponentialBackoff;

use crate::config::Config;

/// Bounded exponential backoff applied uniformly to post fetches.
///
/// The first retry waits `base_delay`, each further retry doubles the wait,
/// and no wait exceeds `max_delay`. `max_attempts` counts the initial try.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Build the policy from the run configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.options.fetch_attempts,
            base_delay: config.retry_base_delay(),
            max_delay: config.retry_max_delay(),
        }
    }

    /// The delay sequence: one entry per retry, so `max_attempts - 1` total.
    ///
    /// The backoff strategy yields powers of two scaled so the first delay
    /// equals `base_delay`; the sequence is monotone non-decreasing and
    /// clamped to `max_delay`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let factor = (self.base_delay.as_millis() as u64 / 2).max(1);
        let cap = self.max_delay;

        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .map(move |delay| delay.min(cap))
            .take(self.max_attempts.saturating_sub(1) as usize)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_count_matches_attempt_ceiling() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        };
        assert_eq!(policy.delays().count(), 3);

        let single = RetryPolicy {
            max_attempts: 1,
            ..policy
        };
        assert_eq!(single.delays().count(), 0);
    }

    #[test]
    fn test_delays_double_from_base() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
        };
        let delays: Vec<Duration> = policy.delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
    }

    #[test]
    fn test_delays_are_monotone_and_capped() {
        let policy = RetryPolicy {
            max_attempts: 8,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        };
        let delays: Vec<Duration> = policy.delays().collect();

        for pair in delays.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        for delay in &delays {
            assert!(*delay <= Duration::from_secs(10));
        }
        assert_eq!(*delays.last().unwrap(), Duration::from_secs(10));
    }
}
