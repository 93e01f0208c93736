//! Observability subsystem.
//!
//! All subsystems emit `tracing` events with structured fields (addresses,
//! hashes, attempts); `logging.rs` installs the subscriber once per binary.

pub mod logging;
