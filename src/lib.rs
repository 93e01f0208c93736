//! UFC NFT operator scripts library
//!
//! Shared plumbing for the command-line tools that deploy the UFC NFT Move
//! module and drive it on Aptos: key loading, faucet funding, transaction
//! submission with rate-limit retries, event parsing and result files.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod persistence;
pub mod resilience;
pub mod scripts;

pub use blockchain::{BlockchainError, BlockchainResult};
pub use config::ScriptConfig;
pub use scripts::ScriptContext;
