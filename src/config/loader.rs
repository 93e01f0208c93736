//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ScriptConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `network.node_url`.
pub const NODE_URL_ENV_VAR: &str = "NODE_URL";

/// Environment variable overriding `network.faucet_url`.
pub const FAUCET_URL_ENV_VAR: &str = "FAUCET_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ScriptConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: ScriptConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration if the file exists, otherwise start from defaults.
///
/// Environment overrides and validation apply either way.
pub fn load_or_default(path: &Path) -> Result<ScriptConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = ?path, "Config file not found, using defaults");
    let mut config = ScriptConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `NODE_URL` / `FAUCET_URL` overrides. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut ScriptConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(NODE_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
        config.network.node_url = url.trim().to_string();
    }
    if let Some(url) = lookup(FAUCET_URL_ENV_VAR).filter(|v| !v.trim().is_empty()) {
        config.network.faucet_url = url.trim().to_string();
    }
}
