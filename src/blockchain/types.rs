//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Marker searched for in error messages that signal throttling.
pub const RATE_LIMIT_MARKER: &str = "rate limit";

/// A 32-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const LENGTH: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The framework address `0x1`.
    pub fn one() -> Self {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Long form hex literal, `0x` + 64 lowercase hex digits.
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_literal())
    }
}

impl FromStr for AccountAddress {
    type Err = BlockchainError;

    /// Accepts short (`0x1`) and long forms, with or without `0x`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > 64 {
            return Err(BlockchainError::Config(format!(
                "invalid account address '{}': expected 1 to 64 hex digits",
                s
            )));
        }

        let padded = format!("{:0>64}", digits);
        let bytes = hex::decode(&padded).map_err(|e| {
            BlockchainError::Config(format!("invalid account address '{}': {}", s, e))
        })?;

        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_literal())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur during script operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Missing or malformed local state: key file, id file, data file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A single throttled response (HTTP 429 or rate-limit message).
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Retries were exhausted while the node kept throttling.
    #[error("Rate limit exceeded after {attempts} attempts: {message}")]
    RateLimitExceeded { attempts: u32, message: String },

    /// Committed on-chain but the VM reported a failure.
    #[error("Transaction {hash} failed: {vm_status}")]
    TransactionFailed { hash: String, vm_status: String },

    /// The requested resource does not exist on the node (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other node or faucet failure.
    #[error("Network error: {0}")]
    Network(String),

    /// Transaction was not committed within the configured wait.
    #[error("Transaction {hash} not confirmed after {secs} seconds")]
    ConfirmationTimeout { hash: String, secs: u64 },

    /// Local file write failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlockchainError {
    /// Whether this error should trigger a backoff-and-retry cycle.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            BlockchainError::RateLimited(_) => true,
            BlockchainError::Network(message) => {
                message.to_lowercase().contains(RATE_LIMIT_MARKER)
            }
            _ => false,
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// An event emitted by a committed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Fully qualified Move type, e.g. `0xabc::ufc_nft::SeriesCreatedEvent`.
    #[serde(rename = "type")]
    pub type_tag: String,

    /// Event payload as returned by the node.
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Outcome of a committed transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionResult {
    pub hash: String,
    pub success: bool,
    pub vm_status: String,
    pub version: Option<u64>,
    pub gas_used: Option<u64>,
    pub events: Vec<Event>,
}

impl TransactionResult {
    /// Turn a committed-but-failed transaction into `TransactionFailed`.
    pub fn ensure_success(self) -> BlockchainResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(BlockchainError::TransactionFailed {
                hash: self.hash,
                vm_status: self.vm_status,
            })
        }
    }
}

/// Lifecycle of a single submission.
///
/// ```text
/// Built → Signed → Submitted → Confirmed-Success
///                            → Confirmed-Failed
///                            → RateLimited → (retry) Built
///                            → Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Built,
    Signed,
    Submitted,
    ConfirmedSuccess,
    ConfirmedFailed,
    RateLimited,
    Error,
}

impl fmt::Display for TxState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxState::Built => "built",
            TxState::Signed => "signed",
            TxState::Submitted => "submitted",
            TxState::ConfirmedSuccess => "confirmed-success",
            TxState::ConfirmedFailed => "confirmed-failed",
            TxState::RateLimited => "rate-limited",
            TxState::Error => "error",
        };
        f.write_str(name)
    }
}
