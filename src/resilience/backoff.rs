//! Exponential backoff.

use rand::Rng;
use std::time::Duration;

/// Delay before retrying after a rate-limited `attempt` (1-based):
/// `base_ms × 2^attempt`, so 10s, 20s, 40s for the default 5s base.
pub fn calculate_backoff(attempt: u32, base_ms: u64) -> Duration {
    let exponential = 2u64.saturating_pow(attempt);
    Duration::from_millis(base_ms.saturating_mul(exponential))
}

/// A fixed pause plus uniform jitter in `0..jitter_ms`, used to pace
/// sequential submissions.
pub fn jittered_pause(base_ms: u64, jitter_ms: u64) -> Duration {
    let jitter = if jitter_ms > 0 {
        rand::thread_rng().gen_range(0..jitter_ms)
    } else {
        0
    };
    Duration::from_millis(base_ms + jitter)
}
