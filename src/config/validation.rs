//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check endpoint URLs parse and use http(s)
//! - Validate value ranges (attempts > 0, timeouts > 0)
//! - Check the contract address is well-formed hex
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ScriptConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::blockchain::types::AccountAddress;
use crate::config::schema::ScriptConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("contract.address '{0}' is not a valid account address")]
    InvalidContractAddress(String),

    #[error("contract.module must not be empty")]
    EmptyModule,
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &ScriptConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url("network.node_url", &config.network.node_url, &mut errors);
    check_url("network.faucet_url", &config.network.faucet_url, &mut errors);

    let positive: [(&'static str, u64); 5] = [
        ("network.request_timeout_secs", config.network.request_timeout_secs),
        (
            "network.confirmation_timeout_secs",
            config.network.confirmation_timeout_secs,
        ),
        ("network.poll_interval_ms", config.network.poll_interval_ms),
        ("retries.max_attempts", u64::from(config.retries.max_attempts)),
        ("gas.max_gas_amount", config.gas.max_gas_amount),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.contract.address.parse::<AccountAddress>().is_err() {
        errors.push(ValidationError::InvalidContractAddress(
            config.contract.address.clone(),
        ));
    }
    if config.contract.module.trim().is_empty() {
        errors.push(ValidationError::EmptyModule);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
