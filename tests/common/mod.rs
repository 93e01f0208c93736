//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use ufc_nft_scripts::blockchain::transaction::{SignedSubmission, SubmissionRequest};
use ufc_nft_scripts::blockchain::{
    AccountAddress, BlockchainError, BlockchainResult, Event, FaucetApi, NodeApi,
    TransactionResult,
};
use ufc_nft_scripts::config::ScriptConfig;
use ufc_nft_scripts::resilience::Sleeper;
use ufc_nft_scripts::scripts::ScriptContext;

/// RFC 8032 test vector 1 secret key.
pub const TEST_KEY: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

/// What the mock node does with the next submission.
#[derive(Debug, Clone)]
pub enum SubmitBehavior {
    Accept,
    RateLimit,
    Fail(String),
    /// Commits, but with `success == false`.
    Abort(String),
}

/// In-memory fullnode.
pub struct MockNode {
    /// `None` means the account does not exist yet.
    pub balance: Mutex<Option<u64>>,
    pub script: Mutex<VecDeque<SubmitBehavior>>,
    /// Events attached to committed transactions, keyed by function name.
    pub events: Mutex<HashMap<String, Vec<Event>>>,
    pub submitted: Mutex<Vec<Value>>,
    pub calls: AtomicUsize,
    pub submit_attempts: AtomicUsize,
    pending: Mutex<HashMap<String, (bool, String, Vec<Event>)>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            balance: Mutex::new(Some(10_000_000_000)),
            script: Mutex::new(VecDeque::new()),
            events: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            submit_attempts: AtomicUsize::new(0),
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_balance(self, balance: Option<u64>) -> Self {
        *self.balance.lock().unwrap() = balance;
        self
    }

    pub fn script(&self, behaviors: impl IntoIterator<Item = SubmitBehavior>) {
        self.script.lock().unwrap().extend(behaviors);
    }

    /// Emit `event_type` with `data` whenever `function` commits.
    pub fn emit(&self, function: &str, event_type: &str, data: Value) {
        let data = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.events
            .lock()
            .unwrap()
            .entry(function.to_string())
            .or_default()
            .push(Event {
                type_tag: event_type.to_string(),
                data,
            });
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Payload JSON of every accepted submission, in order.
    pub fn submitted_payloads(&self) -> Vec<Value> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submitted_functions(&self) -> Vec<String> {
        self.submitted_payloads()
            .iter()
            .map(|p| p["function"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn function_name(payload: &Value) -> String {
    payload["function"]
        .as_str()
        .and_then(|f| f.rsplit("::").next())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl NodeApi for MockNode {
    async fn get_sequence_number(&self, _address: AccountAddress) -> BlockchainResult<u64> {
        self.touch();
        Ok(self.submitted.lock().unwrap().len() as u64)
    }

    async fn get_coin_balance(&self, _address: AccountAddress) -> BlockchainResult<u64> {
        self.touch();
        self.balance
            .lock()
            .unwrap()
            .ok_or_else(|| BlockchainError::NotFound("account not found".to_string()))
    }

    async fn estimate_gas_price(&self) -> BlockchainResult<u64> {
        self.touch();
        Ok(100)
    }

    async fn encode_submission(&self, _request: &SubmissionRequest) -> BlockchainResult<Vec<u8>> {
        self.touch();
        Ok(vec![0xb5, 0xe9, 0x7d, 0xb0])
    }

    async fn submit_transaction(&self, signed: &SignedSubmission) -> BlockchainResult<String> {
        self.touch();
        let attempt = self.submit_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let behavior = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(SubmitBehavior::Accept);

        let payload = signed.request.payload.to_json();
        let (success, vm_status) = match behavior {
            SubmitBehavior::RateLimit => {
                return Err(BlockchainError::RateLimited(
                    "POST transactions: HTTP 429: Too Many Requests".to_string(),
                ))
            }
            SubmitBehavior::Fail(message) => return Err(BlockchainError::Network(message)),
            SubmitBehavior::Accept => (true, "Executed successfully".to_string()),
            SubmitBehavior::Abort(status) => (false, status),
        };

        let hash = format!("0x{:064x}", attempt);
        let events = self
            .events
            .lock()
            .unwrap()
            .get(&function_name(&payload))
            .cloned()
            .unwrap_or_default();
        self.submitted.lock().unwrap().push(payload);
        self.pending
            .lock()
            .unwrap()
            .insert(hash.clone(), (success, vm_status, events));
        Ok(hash)
    }

    async fn wait_for_transaction(&self, hash: &str) -> BlockchainResult<TransactionResult> {
        self.touch();
        let (success, vm_status, events) = self
            .pending
            .lock()
            .unwrap()
            .remove(hash)
            .unwrap_or((true, "Executed successfully".to_string(), Vec::new()));
        Ok(TransactionResult {
            hash: hash.to_string(),
            success,
            vm_status,
            version: Some(1),
            gas_used: Some(10),
            events,
        })
    }
}

/// Records faucet requests instead of minting.
#[derive(Default)]
pub struct MockFaucet {
    pub requests: Mutex<Vec<(AccountAddress, u64)>>,
}

impl MockFaucet {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl FaucetApi for MockFaucet {
    async fn fund_account(&self, address: AccountAddress, amount: u64) -> BlockchainResult<()> {
        self.requests.lock().unwrap().push((address, amount));
        Ok(())
    }
}

/// Records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    pub delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// A context over mocks, with hand-off files under `dir`.
pub struct Harness {
    pub ctx: ScriptContext,
    pub node: Arc<MockNode>,
    pub faucet: Arc<MockFaucet>,
    pub sleeper: Arc<RecordingSleeper>,
}

impl Harness {
    pub fn new(dir: &Path) -> Self {
        Self::with_node(dir, MockNode::new())
    }

    pub fn with_node(dir: &Path, node: MockNode) -> Self {
        let mut config = ScriptConfig::default();
        config.account.key_file = dir.join("missing-config.yaml");
        config.account.allow_ephemeral = false;
        config.files.series_id = dir.join("series_id.txt");
        config.files.set_id = dir.join("set_id.txt");

        let node = Arc::new(node);
        let faucet = Arc::new(MockFaucet::default());
        let sleeper = Arc::new(RecordingSleeper::default());
        let ctx = ScriptContext::new(config, node.clone(), faucet.clone(), sleeper.clone());

        Self {
            ctx,
            node,
            faucet,
            sleeper,
        }
    }
}

/// A parsed HTTP/1.1 request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Start a routing mock HTTP server on an ephemeral port.
///
/// Every connection carries exactly one request; the handler maps it to a
/// status code and a JSON body.
pub async fn start_mock_http<F, Fut>(handler: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body) = handler(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            202 => "202 Accepted",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(head_end + content_length);
    let body = String::from_utf8_lossy(&buf[head_end..body_end]).to_string();
    Some(MockRequest { method, path, body })
}
