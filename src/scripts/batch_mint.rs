//! Batch mint of a prepared list in a single `batch_mint_simple_for` call.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::blockchain::{
    AccountAddress, BlockchainError, BlockchainResult, MoveArg, TransactionPayload,
};
use crate::persistence::reports::{BatchMintReport, FailureReport};
use crate::persistence::{write_report, RunClock};
use crate::scripts::ScriptContext;

pub const DEFAULT_FUNDING_OCTAS: u64 = 2_000_000_000;
const SAMPLE_SIZE: usize = 5;

/// One token to mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMintItem {
    pub collection: String,
    pub recipient: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMintData {
    pub batch_mint_data: Vec<BatchMintItem>,
}

#[derive(Debug, Clone)]
pub struct BatchMintOptions {
    pub data_path: PathBuf,
    /// Exact number of items the data file must contain.
    pub expected: usize,
    pub results_path: PathBuf,
    pub error_path: PathBuf,
}

impl Default for BatchMintOptions {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/batch-mint-data-50.json"),
            expected: 50,
            results_path: PathBuf::from("batch-mint-results.json"),
            error_path: PathBuf::from("batch-mint-error.json"),
        }
    }
}

pub fn load_batch_data(path: &Path) -> BlockchainResult<Vec<BatchMintItem>> {
    let content = fs::read_to_string(path).map_err(|e| {
        BlockchainError::Config(format!("cannot read batch data {}: {}", path.display(), e))
    })?;
    let data: BatchMintData = serde_json::from_str(&content).map_err(|e| {
        BlockchainError::Config(format!("malformed batch data {}: {}", path.display(), e))
    })?;
    Ok(data.batch_mint_data)
}

/// Column-wise view of the items, with recipients parsed.
struct Columns {
    collections: Vec<String>,
    recipients: Vec<AccountAddress>,
    uris: Vec<String>,
}

impl Columns {
    fn from_items(items: &[BatchMintItem]) -> BlockchainResult<Self> {
        let recipients = items
            .iter()
            .map(|item| item.recipient.parse())
            .collect::<BlockchainResult<Vec<AccountAddress>>>()?;
        Ok(Self {
            collections: items.iter().map(|i| i.collection.clone()).collect(),
            recipients,
            uris: items.iter().map(|i| i.uri.clone()).collect(),
        })
    }
}

/// Mint everything in `options.data_path`, writing the success report or,
/// on any fatal error, the failure report before returning the error.
pub async fn run(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    options: &BatchMintOptions,
    out: &mut dyn Write,
) -> BlockchainResult<BatchMintReport> {
    let clock = RunClock::start();
    writeln!(out, "Batch Minting UFC NFTs...")?;
    writeln!(out, "Script started at: {}", clock.started_at().to_rfc3339())?;

    match mint_all(ctx, explicit_key, options, &clock, out).await {
        Ok(report) => {
            write_report(&options.results_path, &report)?;
            writeln!(out, "Results saved to: {}", options.results_path.display())?;
            Ok(report)
        }
        Err(e) => {
            tracing::error!(error = %e, "Batch mint failed");
            writeln!(out, "Batch mint failed: {}", e)?;
            let report = FailureReport::new(e.to_string(), &clock);
            writeln!(out, "Total script duration: {:.2} seconds", report.timing.total_script_duration)?;
            write_report(&options.error_path, &report)?;
            writeln!(out, "Error details saved to: {}", options.error_path.display())?;
            Err(e)
        }
    }
}

async fn mint_all(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    options: &BatchMintOptions,
    clock: &RunClock,
    out: &mut dyn Write,
) -> BlockchainResult<BatchMintReport> {
    let function = ctx.contract_function("batch_mint_simple_for")?;
    let items = load_batch_data(&options.data_path)?;
    if items.len() != options.expected {
        return Err(BlockchainError::Config(format!(
            "Expected {} items, got {}",
            options.expected,
            items.len()
        )));
    }
    let columns = Columns::from_items(&items)?;

    let account = ctx.prepare_account(explicit_key, DEFAULT_FUNDING_OCTAS).await?;
    writeln!(out, "Using account: {}", account.address())?;

    let unique_collections: HashSet<&String> = columns.collections.iter().collect();
    let unique_recipients: HashSet<&AccountAddress> = columns.recipients.iter().collect();
    writeln!(out, "Batch mint summary:")?;
    writeln!(out, "   Collections: {} items", columns.collections.len())?;
    writeln!(out, "   Recipients: {} items", columns.recipients.len())?;
    writeln!(out, "   URIs: {} items", columns.uris.len())?;
    writeln!(out, "   Unique collections: {}", unique_collections.len())?;
    writeln!(out, "   Unique recipients: {}", unique_recipients.len())?;

    let payload = TransactionPayload::entry_function(
        function,
        vec![
            MoveArg::strings(&columns.collections),
            MoveArg::addresses(&columns.recipients),
            MoveArg::strings(&columns.uris),
        ],
    );

    writeln!(out, "Batch minting {} tokens...", items.len())?;
    let started = Instant::now();
    let result = ctx.submitter().submit_and_confirm(&account, &payload).await?;
    let duration = started.elapsed().as_secs_f64();

    let timing = clock.timing();
    writeln!(out, "Successfully minted: {} NFTs", items.len())?;
    writeln!(out, "Transaction hash: {}", result.hash)?;
    writeln!(out, "Batch mint transaction time: {:.2} seconds", duration)?;
    writeln!(
        out,
        "Average: {:.3} seconds per NFT",
        duration / items.len().max(1) as f64
    )?;
    writeln!(out, "Total script duration: {:.2} seconds", timing.total_script_duration)?;

    writeln!(out, "Sample minted tokens:")?;
    for (i, item) in items.iter().take(SAMPLE_SIZE).enumerate() {
        let short: String = item.recipient.chars().take(10).collect();
        writeln!(out, "   Token {}: {} -> {}...", i + 1, item.collection, short)?;
    }
    if items.len() > SAMPLE_SIZE {
        writeln!(out, "   ... and {} more tokens", items.len() - SAMPLE_SIZE)?;
    }

    Ok(BatchMintReport {
        success: true,
        transaction_hash: result.hash,
        minted_tokens: items.len(),
        duration,
        timing,
        collections: columns.collections,
        recipients: columns.recipients.iter().map(|r| r.to_hex_literal()).collect(),
        uris: columns.uris,
    })
}
