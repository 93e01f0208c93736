//! Account loading and transaction signing.
//!
//! # Security
//! - Keys come from an explicit argument or a local key file
//! - Keys are never logged; `Debug` only shows the address
//! - A generated fallback key is only written to disk when configured

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use sha3::{Digest, Sha3_256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::blockchain::types::{AccountAddress, BlockchainError, BlockchainResult};
use crate::config::AccountConfig;

/// Marker for the key line in the CLI config file.
pub const PRIVATE_KEY_MARKER: &str = "private_key:";

/// Prefix the Aptos CLI writes in front of ed25519 keys.
pub const ED25519_PRIV_PREFIX: &str = "ed25519-priv-";

/// Canonical key length: `0x` + 64 hex digits.
pub const CANONICAL_KEY_LEN: usize = 66;

/// Authentication scheme byte for single ed25519 keys.
const ED25519_SCHEME: u8 = 0x00;

/// A signing account: an ed25519 keypair and its derived address.
#[derive(Clone)]
pub struct Account {
    signing_key: SigningKey,
    address: AccountAddress,
}

impl Account {
    /// Generate a fresh random account.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Create an account from a private key in any accepted form
    /// (raw hex, `0x` hex, `ed25519-priv-0x` hex).
    pub fn from_private_key(raw: &str) -> BlockchainResult<Self> {
        let canonical = normalize_private_key(raw)?;
        let bytes = hex::decode(&canonical[2..])
            .map_err(|e| BlockchainError::Config(format!("Invalid private key hex: {}", e)))?;
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes);
        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = derive_address(&signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Get the account's address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// Public key as `0x` hex.
    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Private key in canonical form. Only used to persist generated keys.
    fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.signing_key.to_bytes()))
    }

    /// Sign a message, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish()
    }
}

/// Derive the account address for a single ed25519 public key.
pub fn derive_address(public_key: &[u8; 32]) -> AccountAddress {
    let mut hasher = Sha3_256::new();
    hasher.update(public_key);
    hasher.update([ED25519_SCHEME]);
    let digest = hasher.finalize();

    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    AccountAddress::new(bytes)
}

/// Normalize a private key to `0x` + 64 lowercase hex digits.
pub fn normalize_private_key(raw: &str) -> BlockchainResult<String> {
    let unquoted: String = raw.chars().filter(|c| *c != '"' && *c != '\'').collect();
    let trimmed = unquoted.trim();
    let without_scheme = trimmed.strip_prefix(ED25519_PRIV_PREFIX).unwrap_or(trimmed);

    let key = if without_scheme.starts_with("0x") {
        without_scheme.to_string()
    } else {
        format!("0x{}", without_scheme)
    };

    if key.len() != CANONICAL_KEY_LEN {
        return Err(BlockchainError::Config(format!(
            "Invalid private key length: expected {} characters (0x + 64 hex digits), got {}",
            CANONICAL_KEY_LEN,
            key.len()
        )));
    }
    if !key[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BlockchainError::Config(
            "Invalid private key: non-hex characters".to_string(),
        ));
    }

    Ok(key.to_ascii_lowercase())
}

/// Pull the raw key text out of the first `private_key:` line.
pub fn extract_private_key(content: &str) -> BlockchainResult<String> {
    let line = content
        .lines()
        .find(|line| line.contains(PRIVATE_KEY_MARKER))
        .ok_or_else(|| BlockchainError::Config("Private key not found in config".to_string()))?;

    let value = line
        .split_once(PRIVATE_KEY_MARKER)
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    Ok(value.trim().to_string())
}

/// Where the loaded account came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Explicit,
    KeyFile(PathBuf),
    Generated { persisted_to: Option<PathBuf> },
}

/// An account plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedAccount {
    pub account: Account,
    pub source: KeySource,
}

/// Load the signing account.
///
/// An explicit key wins. Otherwise the key file is read; if it cannot be read
/// at all a new account is generated, unless `allow_ephemeral` is off.
pub fn load_account(
    explicit_key: Option<&str>,
    config: &AccountConfig,
) -> BlockchainResult<LoadedAccount> {
    if let Some(key) = explicit_key {
        return Ok(LoadedAccount {
            account: Account::from_private_key(key)?,
            source: KeySource::Explicit,
        });
    }

    match fs::read_to_string(&config.key_file) {
        Ok(content) => {
            let raw = extract_private_key(&content)?;
            let account = Account::from_private_key(&raw)?;
            tracing::info!(
                address = %account.address(),
                key_file = ?config.key_file,
                "Loaded account from key file"
            );
            Ok(LoadedAccount {
                account,
                source: KeySource::KeyFile(config.key_file.clone()),
            })
        }
        Err(e) => {
            if !config.allow_ephemeral {
                return Err(BlockchainError::Config(format!(
                    "Cannot read key file {}: {}",
                    config.key_file.display(),
                    e
                )));
            }

            let account = Account::generate();
            tracing::warn!(
                address = %account.address(),
                key_file = ?config.key_file,
                error = %e,
                "Key file unreadable, generated a new account; its address changes on every run unless persisted"
            );

            let persisted_to = match &config.persist_generated_key {
                Some(path) => {
                    persist_key(path, &account)?;
                    tracing::info!(path = ?path, "Generated key saved");
                    Some(path.clone())
                }
                None => None,
            };

            Ok(LoadedAccount {
                account,
                source: KeySource::Generated { persisted_to },
            })
        }
    }
}

/// Write a key in the same line format the loader reads.
fn persist_key(path: &Path, account: &Account) -> BlockchainResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(
        path,
        format!("{} \"{}\"\n", PRIVATE_KEY_MARKER, account.private_key_hex()),
    )?;
    Ok(())
}
