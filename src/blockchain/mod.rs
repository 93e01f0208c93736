//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! key file / --private-key
//!     → wallet.rs (key normalization, signing)
//!     → funding.rs (balance check, faucet top-up via faucet.rs)
//!     → payload.rs (typed entry function call)
//!     → transaction.rs (build, sign, submit, confirm, retry on 429)
//!     → events.rs (pull ids out of emitted events)
//! ```
//!
//! # Security Constraints
//! - Never log private keys
//! - All HTTP calls have configurable timeouts
//! - Confirmation waits are bounded

pub mod client;
pub mod events;
pub mod faucet;
pub mod funding;
pub mod payload;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{AptosRestClient, NodeApi};
pub use events::{find_event, EventKind, EventLookup, KnownEvent};
pub use faucet::{FaucetApi, HttpFaucetClient};
pub use funding::{ensure_funded, query_balance_status, BalanceStatus, FundingOutcome};
pub use payload::{EntryFunctionId, MoveArg, TransactionPayload};
pub use transaction::TransactionSubmitter;
pub use types::{AccountAddress, BlockchainError, BlockchainResult, Event, TransactionResult};
pub use wallet::{load_account, Account, KeySource, LoadedAccount};
