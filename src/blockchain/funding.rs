//! Funding guard.
//!
//! Tops an account up from the faucet when it looks underfunded. The check
//! is a heuristic: anything at or above a tenth of the requested amount
//! counts as funded.

use crate::blockchain::client::NodeApi;
use crate::blockchain::faucet::FaucetApi;
use crate::blockchain::types::{AccountAddress, BlockchainError, BlockchainResult};

/// One APT in octas.
pub const OCTAS_PER_APT: u64 = 100_000_000;

/// Result of a balance check against a target amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    Sufficient(u64),
    InsufficientFunds(u64),
    AccountNotFound,
}

/// What [`ensure_funded`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingOutcome {
    AlreadyFunded { balance: u64 },
    Funded { amount: u64 },
}

/// Balance below which an account is topped up.
pub fn funding_threshold(amount: u64) -> u64 {
    amount / 10
}

/// Query the balance and classify it against `amount`.
pub async fn query_balance_status(
    node: &dyn NodeApi,
    address: AccountAddress,
    amount: u64,
) -> BlockchainResult<BalanceStatus> {
    match node.get_coin_balance(address).await {
        Ok(balance) if balance >= funding_threshold(amount) => Ok(BalanceStatus::Sufficient(balance)),
        Ok(balance) => Ok(BalanceStatus::InsufficientFunds(balance)),
        Err(BlockchainError::NotFound(_)) => Ok(BalanceStatus::AccountNotFound),
        Err(e) => Err(e),
    }
}

/// Request `amount` from the faucet unless the account already holds at
/// least a tenth of it.
pub async fn ensure_funded(
    node: &dyn NodeApi,
    faucet: &dyn FaucetApi,
    address: AccountAddress,
    amount: u64,
) -> BlockchainResult<FundingOutcome> {
    let status = query_balance_status(node, address, amount).await?;
    tracing::debug!(address = %address, ?status, amount, "Balance checked");

    match status {
        BalanceStatus::Sufficient(balance) => {
            tracing::info!(address = %address, balance, "Account already has sufficient funds");
            Ok(FundingOutcome::AlreadyFunded { balance })
        }
        BalanceStatus::InsufficientFunds(_) | BalanceStatus::AccountNotFound => {
            faucet.fund_account(address, amount).await?;
            tracing::info!(address = %address, amount, "Account funded from faucet");
            Ok(FundingOutcome::Funded { amount })
        }
    }
}
