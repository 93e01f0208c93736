//! Local hand-off and audit files.
//!
//! Plain overwrites: last write wins, no locking, no atomic rename. A crash
//! mid-write can truncate a file; scripts are re-run by hand on failure.

pub mod identifiers;
pub mod reports;

pub use identifiers::{read_identifier, write_identifier};
pub use reports::{write_report, RunClock};
