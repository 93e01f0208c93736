//! Faucet client.
//!
//! The faucet mints test coins and replies with the hashes of the funding
//! transactions, which are awaited on the node before returning.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::blockchain::client::{check_status, NodeApi};
use crate::blockchain::types::{AccountAddress, BlockchainError, BlockchainResult};
use crate::config::NetworkConfig;

/// Credits an address with test coins.
#[async_trait]
pub trait FaucetApi: Send + Sync {
    /// Fund `address` with `amount` octas; returns once funding committed.
    async fn fund_account(&self, address: AccountAddress, amount: u64) -> BlockchainResult<()>;
}

/// Faucet over HTTP (`POST /mint?address=…&amount=…`).
pub struct HttpFaucetClient {
    faucet_url: Url,
    http: Client,
    node: Arc<dyn NodeApi>,
}

impl HttpFaucetClient {
    pub fn new(config: &NetworkConfig, node: Arc<dyn NodeApi>) -> BlockchainResult<Self> {
        let faucet_url = Url::parse(&config.faucet_url).map_err(|e| {
            BlockchainError::Config(format!("Invalid faucet URL '{}': {}", config.faucet_url, e))
        })?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BlockchainError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            faucet_url,
            http,
            node,
        })
    }

    fn mint_url(&self, address: AccountAddress, amount: u64) -> Url {
        let mut url = self.faucet_url.clone();
        url.set_path("mint");
        url.set_query(Some(&format!("address={}&amount={}", address, amount)));
        url
    }
}

#[async_trait]
impl FaucetApi for HttpFaucetClient {
    async fn fund_account(&self, address: AccountAddress, amount: u64) -> BlockchainResult<()> {
        let url = self.mint_url(address, amount);
        let response = self
            .http
            .post(url)
            .header("content-type", "application/json; charset=utf-8")
            .send()
            .await
            .map_err(|e| BlockchainError::Network(format!("Faucet request failed: {}", e)))?;
        let response = check_status(response, "faucet mint").await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| BlockchainError::Network(format!("Faucet returned invalid JSON: {}", e)))?;

        let hashes = parse_hashes(&body)?;
        tracing::debug!(address = %address, amount, txns = hashes.len(), "Faucet accepted request");

        for hash in &hashes {
            self.node.wait_for_transaction(hash).await?.ensure_success()?;
        }
        Ok(())
    }
}

/// Faucets answer either `["0x…"]` or `{"txn_hashes": ["0x…"]}`.
fn parse_hashes(body: &Value) -> BlockchainResult<Vec<String>> {
    let list = body
        .as_array()
        .or_else(|| body.get("txn_hashes").and_then(Value::as_array))
        .ok_or_else(|| BlockchainError::Network(format!("Unexpected faucet response: {}", body)))?;

    list.iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| BlockchainError::Network(format!("Non-string faucet hash: {}", v)))
        })
        .collect()
}
