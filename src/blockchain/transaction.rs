//! Transaction building, signing, and confirmation.
//!
//! # Responsibilities
//! - Build submission requests with sequence number and gas price from the node
//! - Sign the node-encoded signing message
//! - Submit and wait for the commit
//! - Retry the whole cycle when the node rate-limits us

use serde_json::{json, Value};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::blockchain::client::NodeApi;
use crate::blockchain::payload::TransactionPayload;
use crate::blockchain::types::{AccountAddress, BlockchainResult, TransactionResult, TxState};
use crate::blockchain::wallet::Account;
use crate::config::GasConfig;
use crate::resilience::{retry_on_rate_limit, RetryPolicy, Sleeper};

/// An unsigned transaction in the node's JSON submission format.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
    pub payload: TransactionPayload,
}

impl SubmissionRequest {
    pub fn to_json(&self) -> Value {
        json!({
            "sender": self.sender.to_hex_literal(),
            "sequence_number": self.sequence_number.to_string(),
            "max_gas_amount": self.max_gas_amount.to_string(),
            "gas_unit_price": self.gas_unit_price.to_string(),
            "expiration_timestamp_secs": self.expiration_timestamp_secs.to_string(),
            "payload": self.payload.to_json(),
        })
    }
}

/// A request plus its single-key ed25519 signature.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedSubmission {
    pub request: SubmissionRequest,
    pub public_key: String,
    pub signature: [u8; 64],
}

impl SignedSubmission {
    pub fn to_json(&self) -> Value {
        let mut body = self.request.to_json();
        body["signature"] = json!({
            "type": "ed25519_signature",
            "public_key": self.public_key,
            "signature": format!("0x{}", hex::encode(self.signature)),
        });
        body
    }
}

/// Submits payloads for one account and waits for them to commit.
pub struct TransactionSubmitter<'a> {
    node: &'a dyn NodeApi,
    sleeper: &'a dyn Sleeper,
    policy: RetryPolicy,
    gas: GasConfig,
}

impl<'a> TransactionSubmitter<'a> {
    pub fn new(
        node: &'a dyn NodeApi,
        sleeper: &'a dyn Sleeper,
        policy: RetryPolicy,
        gas: GasConfig,
    ) -> Self {
        Self {
            node,
            sleeper,
            policy,
            gas,
        }
    }

    /// Build, sign, submit and confirm, retrying on rate limits.
    ///
    /// The returned result may still carry `success == false`; callers check
    /// it with [`TransactionResult::ensure_success`].
    pub async fn submit(
        &self,
        account: &Account,
        payload: &TransactionPayload,
    ) -> BlockchainResult<TransactionResult> {
        let label = payload.function.to_string();
        retry_on_rate_limit(&self.policy, self.sleeper, &label, |attempt| {
            self.submit_once(account, payload, attempt)
        })
        .await
    }

    /// [`submit`](Self::submit) followed by the VM status check.
    pub async fn submit_and_confirm(
        &self,
        account: &Account,
        payload: &TransactionPayload,
    ) -> BlockchainResult<TransactionResult> {
        self.submit(account, payload).await?.ensure_success()
    }

    async fn submit_once(
        &self,
        account: &Account,
        payload: &TransactionPayload,
        attempt: u32,
    ) -> BlockchainResult<TransactionResult> {
        let outcome = self.run_cycle(account, payload, attempt).await;
        if let Err(e) = &outcome {
            let state = if e.is_rate_limit() {
                TxState::RateLimited
            } else {
                TxState::Error
            };
            tracing::debug!(function = %payload.function, attempt, state = %state, error = %e, "Submission failed");
        }
        outcome
    }

    async fn run_cycle(
        &self,
        account: &Account,
        payload: &TransactionPayload,
        attempt: u32,
    ) -> BlockchainResult<TransactionResult> {
        let request = self.build(account.address(), payload.clone()).await?;
        trace_state(payload, attempt, TxState::Built);

        let signing_message = self.node.encode_submission(&request).await?;
        let signed = SignedSubmission {
            signature: account.sign(&signing_message),
            public_key: account.public_key_hex(),
            request,
        };
        trace_state(payload, attempt, TxState::Signed);

        let hash = self.node.submit_transaction(&signed).await?;
        tracing::info!(function = %payload.function, tx_hash = %hash, "Transaction submitted");
        trace_state(payload, attempt, TxState::Submitted);

        let result = self.node.wait_for_transaction(&hash).await?;
        let state = if result.success {
            TxState::ConfirmedSuccess
        } else {
            TxState::ConfirmedFailed
        };
        trace_state(payload, attempt, state);
        tracing::info!(
            tx_hash = %result.hash,
            success = result.success,
            vm_status = %result.vm_status,
            "Transaction committed"
        );

        Ok(result)
    }

    async fn build(
        &self,
        sender: AccountAddress,
        payload: TransactionPayload,
    ) -> BlockchainResult<SubmissionRequest> {
        let sequence_number = self.node.get_sequence_number(sender).await?;
        let gas_unit_price = self.node.estimate_gas_price().await?;

        Ok(SubmissionRequest {
            sender,
            sequence_number,
            max_gas_amount: self.gas.max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs: expiration_from_now(self.gas.expiration_secs),
            payload,
        })
    }
}

fn trace_state(payload: &TransactionPayload, attempt: u32, state: TxState) {
    tracing::debug!(function = %payload.function, attempt, state = %state, "Transaction state");
}

fn expiration_from_now(ttl_secs: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    now.saturating_add(ttl_secs)
}
