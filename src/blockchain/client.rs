//! Node REST client with timeout and error handling.
//!
//! # Responsibilities
//! - Query account state (sequence number, coin balance)
//! - Encode, submit and confirm transactions
//! - Map HTTP failures onto `BlockchainError` (429 → `RateLimited`,
//!   404 → `NotFound`, everything else → `Network`)

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{interval, timeout};
use url::Url;

use crate::blockchain::transaction::{SignedSubmission, SubmissionRequest};
use crate::blockchain::types::{
    AccountAddress, BlockchainError, BlockchainResult, Event, TransactionResult,
};
use crate::config::NetworkConfig;

/// Resource holding an account's APT balance.
pub const APT_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

/// Operations the scripts need from a fullnode.
///
/// Implemented over HTTP by [`AptosRestClient`]; tests substitute in-memory
/// implementations.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Current sequence number; a missing account reports 0.
    async fn get_sequence_number(&self, address: AccountAddress) -> BlockchainResult<u64>;

    /// APT balance in octas. `NotFound` when the account or its coin store
    /// does not exist yet.
    async fn get_coin_balance(&self, address: AccountAddress) -> BlockchainResult<u64>;

    /// Suggested gas unit price.
    async fn estimate_gas_price(&self) -> BlockchainResult<u64>;

    /// Bytes the sender must sign for this request.
    async fn encode_submission(&self, request: &SubmissionRequest) -> BlockchainResult<Vec<u8>>;

    /// Submit a signed transaction, returning its hash.
    async fn submit_transaction(&self, signed: &SignedSubmission) -> BlockchainResult<String>;

    /// Block until the transaction is committed or the wait times out.
    async fn wait_for_transaction(&self, hash: &str) -> BlockchainResult<TransactionResult>;
}

/// Fullnode client speaking the `/v1` REST API.
#[derive(Clone)]
pub struct AptosRestClient {
    http: Client,
    base_url: Url,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl AptosRestClient {
    /// Create a new client.
    ///
    /// `network.node_url` may be given with or without the `/v1` suffix.
    pub fn new(config: &NetworkConfig) -> BlockchainResult<Self> {
        let base_url = api_base_url(&config.node_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BlockchainError::Network(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(base_url = %base_url, "Node client initialized");

        Ok(Self {
            http,
            base_url,
            confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    fn endpoint(&self, path: &str) -> BlockchainResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BlockchainError::Network(format!("Invalid endpoint '{}': {}", path, e)))
    }

    async fn get_json(&self, path: &str) -> BlockchainResult<Value> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| BlockchainError::Network(format!("GET {}: {}", path, e)))?;
        let response = check_status(response, path).await?;
        response
            .json()
            .await
            .map_err(|e| BlockchainError::Network(format!("GET {}: invalid JSON: {}", path, e)))
    }

    async fn post_json(&self, path: &str, body: &Value) -> BlockchainResult<Value> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| BlockchainError::Network(format!("POST {}: {}", path, e)))?;
        let response = check_status(response, path).await?;
        response
            .json()
            .await
            .map_err(|e| BlockchainError::Network(format!("POST {}: invalid JSON: {}", path, e)))
    }

    /// One status lookup; `None` while the transaction is unknown or pending.
    async fn poll_transaction(&self, hash: &str) -> BlockchainResult<Option<TransactionResult>> {
        let body = match self.get_json(&format!("transactions/by_hash/{}", hash)).await {
            Ok(body) => body,
            Err(BlockchainError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        if body.get("type").and_then(Value::as_str) == Some("pending_transaction") {
            return Ok(None);
        }
        parse_committed(body).map(Some)
    }
}

#[async_trait]
impl NodeApi for AptosRestClient {
    async fn get_sequence_number(&self, address: AccountAddress) -> BlockchainResult<u64> {
        match self.get_json(&format!("accounts/{}", address)).await {
            Ok(body) => parse_u64_field(&body, "sequence_number"),
            Err(BlockchainError::NotFound(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    async fn get_coin_balance(&self, address: AccountAddress) -> BlockchainResult<u64> {
        let body = self
            .get_json(&format!("accounts/{}/resource/{}", address, APT_COIN_STORE))
            .await?;
        let coin = body
            .get("data")
            .and_then(|d| d.get("coin"))
            .ok_or_else(|| BlockchainError::Network("Coin store without coin field".to_string()))?;
        parse_u64_field(coin, "value")
    }

    async fn estimate_gas_price(&self) -> BlockchainResult<u64> {
        let body = self.get_json("estimate_gas_price").await?;
        parse_u64_field(&body, "gas_estimate")
    }

    async fn encode_submission(&self, request: &SubmissionRequest) -> BlockchainResult<Vec<u8>> {
        let body = self
            .post_json("transactions/encode_submission", &request.to_json())
            .await?;
        let encoded = body.as_str().ok_or_else(|| {
            BlockchainError::Network("encode_submission did not return a hex string".to_string())
        })?;
        hex::decode(encoded.trim_start_matches("0x")).map_err(|e| {
            BlockchainError::Network(format!("encode_submission returned invalid hex: {}", e))
        })
    }

    async fn submit_transaction(&self, signed: &SignedSubmission) -> BlockchainResult<String> {
        let body = self.post_json("transactions", &signed.to_json()).await?;
        body.get("hash")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BlockchainError::Network("Submission response without hash".to_string()))
    }

    async fn wait_for_transaction(&self, hash: &str) -> BlockchainResult<TransactionResult> {
        let result = timeout(self.confirmation_timeout, async {
            let mut ticker = interval(self.poll_interval);

            loop {
                ticker.tick().await;

                // The node already holds the transaction, so a throttled
                // poll is retried here and never re-submits.
                match self.poll_transaction(hash).await {
                    Ok(Some(result)) => return Ok(result),
                    Ok(None) => tracing::debug!(tx_hash = %hash, "Transaction pending"),
                    Err(e) if e.is_rate_limit() => {
                        tracing::warn!(tx_hash = %hash, error = %e, "Status poll rate limited")
                    }
                    Err(e) => return Err(e),
                }
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                hash: hash.to_string(),
                secs: self.confirmation_timeout.as_secs(),
            }),
        }
    }
}

impl std::fmt::Debug for AptosRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AptosRestClient")
            .field("base_url", &self.base_url.as_str())
            .field("confirmation_timeout", &self.confirmation_timeout)
            .finish()
    }
}

/// Normalize a node URL to its `/v1/` API root.
pub fn api_base_url(node_url: &str) -> BlockchainResult<Url> {
    let trimmed = node_url.trim().trim_end_matches('/');
    let with_version = if trimmed.ends_with("/v1") {
        format!("{}/", trimmed)
    } else {
        format!("{}/v1/", trimmed)
    };
    Url::parse(&with_version)
        .map_err(|e| BlockchainError::Config(format!("Invalid node URL '{}': {}", node_url, e)))
}

/// Turn a non-success HTTP response into the matching error.
pub(crate) async fn check_status(response: Response, context: &str) -> BlockchainResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("{}: HTTP {}: {}", context, status.as_u16(), body.trim());
    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => BlockchainError::RateLimited(message),
        StatusCode::NOT_FOUND => BlockchainError::NotFound(message),
        _ => BlockchainError::Network(message),
    })
}

/// The node encodes u64 as decimal strings; accept plain numbers too.
fn parse_u64_field(body: &Value, field: &str) -> BlockchainResult<u64> {
    let value = body
        .get(field)
        .ok_or_else(|| BlockchainError::Network(format!("Response missing '{}'", field)))?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| BlockchainError::Network(format!("Field '{}' is not a u64: {}", field, value)))
}

#[derive(Deserialize)]
struct CommittedTransaction {
    hash: String,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    vm_status: String,
    version: Option<String>,
    gas_used: Option<String>,
    #[serde(default)]
    events: Vec<Event>,
}

fn parse_committed(body: Value) -> BlockchainResult<TransactionResult> {
    let txn: CommittedTransaction = serde_json::from_value(body)
        .map_err(|e| BlockchainError::Network(format!("Unexpected transaction shape: {}", e)))?;
    Ok(TransactionResult {
        hash: txn.hash,
        success: txn.success,
        vm_status: txn.vm_status,
        version: txn.version.and_then(|v| v.parse().ok()),
        gas_used: txn.gas_used.and_then(|v| v.parse().ok()),
        events: txn.events,
    })
}
