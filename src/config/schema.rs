//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure shared by every
//! script. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default public devnet fullnode.
pub const DEFAULT_NODE_URL: &str = "https://fullnode.devnet.aptoslabs.com";

/// Default public devnet faucet.
pub const DEFAULT_FAUCET_URL: &str = "https://faucet.devnet.aptoslabs.com";

/// Address the `ufc_nft` module is published under.
pub const DEFAULT_CONTRACT_ADDRESS: &str =
    "0x70c3a99237fe6e34da53a324b53685aeffb20c09b35681eb32c7718bd36179dc";

/// Root configuration for the scripts.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ScriptConfig {
    /// Node and faucet endpoints, timeouts.
    pub network: NetworkConfig,

    /// On-chain module location.
    pub contract: ContractConfig,

    /// Where the signing key comes from.
    pub account: AccountConfig,

    /// Faucet top-up settings.
    pub funding: FundingConfig,

    /// Rate-limit retry configuration.
    pub retries: RetryConfig,

    /// Gas and expiration settings for submitted transactions.
    pub gas: GasConfig,

    /// Hand-off files between scripts.
    pub files: FilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Node and faucet endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Fullnode REST endpoint (without the `/v1` suffix).
    pub node_url: String,

    /// Faucet endpoint.
    pub faucet_url: String,

    /// Per-request HTTP timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum time to wait for a submitted transaction to commit.
    pub confirmation_timeout_secs: u64,

    /// Interval between transaction status polls in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.to_string(),
            faucet_url: DEFAULT_FAUCET_URL.to_string(),
            request_timeout_secs: 10,
            confirmation_timeout_secs: 60,
            poll_interval_ms: 1000,
        }
    }
}

/// On-chain module location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Account address the module is published under.
    pub address: String,

    /// Module name.
    pub module: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            module: "ufc_nft".to_string(),
        }
    }
}

/// Signing key source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountConfig {
    /// YAML-like file holding a `private_key:` line.
    pub key_file: PathBuf,

    /// Generate a throwaway account when the key file cannot be read.
    pub allow_ephemeral: bool,

    /// Write a generated key here so later runs reuse the same address.
    pub persist_generated_key: Option<PathBuf>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            key_file: PathBuf::from(".aptos/config.yaml"),
            allow_ephemeral: true,
            persist_generated_key: None,
        }
    }
}

/// Faucet top-up settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FundingConfig {
    /// Override for the per-script top-up amount in octas.
    pub amount: Option<u64>,
}

/// Retry configuration for rate-limited submissions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 5000,
        }
    }
}

/// Gas settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GasConfig {
    /// Maximum gas units a transaction may consume.
    pub max_gas_amount: u64,

    /// Seconds from now until a submitted transaction expires.
    pub expiration_secs: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: 200_000,
            expiration_secs: 60,
        }
    }
}

/// Hand-off files between independently invoked scripts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    pub series_id: PathBuf,
    pub set_id: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            series_id: PathBuf::from("series_id.txt"),
            set_id: PathBuf::from("set_id.txt"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
