//! Script runners behind the binaries.
//!
//! Each runner takes a [`ScriptContext`] and a writer for console narration,
//! so the same code drives the binaries and the integration tests.

pub mod batch_mint;
pub mod collections;
pub mod context;
pub mod deploy;
pub mod mint;
pub mod series;
pub mod set;
pub mod token_uri;
pub mod ufc_nft;

pub use context::ScriptContext;

use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use crate::config::{load_or_default, ScriptConfig};
use crate::observability::logging;

/// Flags shared by every binary.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Path to the TOML configuration file (optional)
    #[arg(short, long, default_value = "ufc-nft.toml")]
    pub config: PathBuf,

    /// Private key (hex, `0x` hex or `ed25519-priv-0x` hex); overrides the key file
    #[arg(long)]
    pub private_key: Option<String>,
}

impl CommonArgs {
    pub fn explicit_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }
}

/// Load `.env`, the config file and the logger, then connect the clients.
pub fn bootstrap(args: &CommonArgs) -> Result<ScriptContext, Box<dyn Error>> {
    dotenv::dotenv().ok();

    let config: ScriptConfig = load_or_default(&args.config)?;
    logging::init(&config.observability.log_level);
    tracing::debug!(config = ?args.config, "Configuration loaded");

    Ok(ScriptContext::connect(config)?)
}
