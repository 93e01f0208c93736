//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ufc-nft.toml (optional)
//!     → loader.rs (parse & deserialize, NODE_URL / FAUCET_URL overrides)
//!     → validation.rs (semantic checks)
//!     → ScriptConfig (validated, immutable)
//!     → ScriptContext builds clients from it
//! ```
//!
//! # Design Decisions
//! - Every section has defaults so the file itself is optional
//! - Environment wins over the file for endpoints
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AccountConfig, ContractConfig, FilesConfig, FundingConfig, GasConfig, NetworkConfig,
    RetryConfig, ScriptConfig,
};
