//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Logs go to stderr; stdout carries the script's own narration
//! - `RUST_LOG` wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(log_level: &str) -> String {
    format!("ufc_nft_scripts={level},ufc_nft={level},warn", level = log_level)
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    let fmt_layer = tracing_subscriber::fmt::layer();
    #[cfg(not(test))]
    let fmt_layer = fmt_layer.with_writer(std::io::stderr);
    // Unit tests share one process; keep their output behind libtest capture.
    #[cfg(test)]
    let fmt_layer = fmt_layer.with_test_writer();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
