//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Submission attempt fails:
//!     → retries.rs (rate limit? retry whole cycle : propagate)
//!     → backoff.rs (5s × 2^attempt)
//!     → Sleeper (tokio timer, or a recorder in tests)
//! ```

pub mod backoff;
pub mod retries;

pub use retries::{retry_on_rate_limit, RetryPolicy, Sleeper, TokioSleeper};
