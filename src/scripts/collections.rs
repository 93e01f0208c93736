//! Sequential bulk collection creation with pacing.
//!
//! Collections are created one after another. Each submission already
//! retries on rate limits; on top of that the run pauses between items so
//! a public node does not throttle the whole batch. A failed item is
//! recorded and the run moves on.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::blockchain::{Account, BlockchainResult, MoveArg, TransactionPayload};
use crate::persistence::reports::{CollectionCreationReport, CollectionEntry};
use crate::persistence::{write_report, RunClock};
use crate::resilience::backoff::jittered_pause;
use crate::scripts::ScriptContext;

pub const DEFAULT_FUNDING_OCTAS: u64 = 500_000_000;
const PROGRESS_EVERY: usize = 5;

#[derive(Debug, Clone)]
pub struct CollectionBatchOptions {
    pub count: usize,
    pub maximum: u64,
    pub mutable_uri: bool,
    pub pause_ms: u64,
    pub jitter_ms: u64,
    pub error_pause_ms: u64,
    pub results_path: PathBuf,
}

impl Default for CollectionBatchOptions {
    fn default() -> Self {
        Self {
            count: 50,
            maximum: 1000,
            mutable_uri: true,
            pause_ms: 8000,
            jitter_ms: 2000,
            error_pause_ms: 5000,
            results_path: PathBuf::from("collection-creation-results.json"),
        }
    }
}

/// Name, URI and description of collection `index` (1-based).
pub fn collection_fields(index: usize) -> (String, String, String) {
    (
        format!("UFC Fighters #{}", index),
        format!("https://ipfs.io/ipfs/collection-metadata-{}", index),
        format!(
            "Official UFC Fighters Collection #{} - Featuring legendary fighters and champions",
            index
        ),
    )
}

/// Create `options.count` collections and write the summary report.
pub async fn run(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    options: &CollectionBatchOptions,
    out: &mut dyn Write,
) -> BlockchainResult<CollectionCreationReport> {
    let clock = RunClock::start();
    writeln!(out, "Creating {} UFC Collections...", options.count)?;
    writeln!(out, "Script started at: {}", clock.started_at().to_rfc3339())?;

    let account = ctx.prepare_account(explicit_key, DEFAULT_FUNDING_OCTAS).await?;
    writeln!(out, "Using account: {}", account.address())?;

    let started = Instant::now();
    let mut entries = Vec::with_capacity(options.count);

    for index in 1..=options.count {
        let is_last = index == options.count;
        let (name, uri, description) = collection_fields(index);

        match create_one(ctx, &account, options, &name, &uri, &description).await {
            Ok(hash) => {
                writeln!(out, "Collection \"{}\" created! Hash: {}", name, hash)?;
                entries.push(CollectionEntry {
                    name,
                    hash,
                    error: None,
                });

                if index % PROGRESS_EVERY == 0 {
                    writeln!(out, "Progress: {}/{} collections created", index, options.count)?;
                }
                if !is_last {
                    let pause = jittered_pause(options.pause_ms, options.jitter_ms);
                    writeln!(
                        out,
                        "Waiting {:.1}s before next collection...",
                        pause.as_secs_f64()
                    )?;
                    ctx.sleeper.sleep(pause).await;
                }
            }
            Err(e) => {
                tracing::warn!(collection = %name, error = %e, "Collection creation failed");
                writeln!(out, "Failed to create collection #{}: {}", index, e)?;
                entries.push(CollectionEntry {
                    name,
                    hash: String::new(),
                    error: Some(e.to_string()),
                });

                if !is_last {
                    writeln!(out, "Waiting before continuing after error...")?;
                    ctx.sleeper
                        .sleep(Duration::from_millis(options.error_pause_ms))
                        .await;
                }
            }
        }
    }

    let duration = started.elapsed().as_secs_f64();
    let report = CollectionCreationReport::new(entries, duration, &clock);
    let summary = &report.summary;

    writeln!(out, "Collection Creation Complete!")?;
    writeln!(out, "Successful: {}/{}", summary.successful, summary.total)?;
    writeln!(out, "Failed: {}/{}", summary.failed, summary.total)?;
    writeln!(out, "Collections creation time: {:.2} seconds", duration)?;
    if summary.successful > 0 {
        writeln!(
            out,
            "Average: {:.2} seconds per successful collection",
            duration / summary.successful as f64
        )?;
    }
    writeln!(out, "Total script duration: {:.2} seconds", summary.total_script_duration)?;

    write_report(&options.results_path, &report)?;
    writeln!(out, "Results saved to: {}", options.results_path.display())?;

    if summary.failed > 0 {
        writeln!(out, "Failed collections:")?;
        for entry in report.failures() {
            writeln!(out, "   {}: {}", entry.name, entry.error.as_deref().unwrap_or_default())?;
        }
    }

    Ok(report)
}

async fn create_one(
    ctx: &ScriptContext,
    account: &Account,
    options: &CollectionBatchOptions,
    name: &str,
    uri: &str,
    description: &str,
) -> BlockchainResult<String> {
    let payload = TransactionPayload::entry_function(
        ctx.contract_function("create_collection")?,
        vec![
            MoveArg::string(name),
            MoveArg::string(uri),
            MoveArg::string(description),
            MoveArg::U64(options.maximum),
            MoveArg::Bool(options.mutable_uri),
        ],
    );
    let result = ctx.submitter().submit_and_confirm(account, &payload).await?;
    Ok(result.hash)
}
