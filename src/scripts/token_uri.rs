//! Token URI update on an existing digital asset.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::blockchain::{
    AccountAddress, BlockchainResult, EntryFunctionId, MoveArg, TransactionPayload,
};
use crate::persistence::reports::{FailureReport, UriUpdateReport};
use crate::persistence::{write_report, RunClock};
use crate::scripts::ScriptContext;

pub const DEFAULT_FUNDING_OCTAS: u64 = 1_000_000_000;
pub const DEFAULT_SET_URI_FUNCTION: &str = "0x4::token::set_uri";

#[derive(Debug, Clone)]
pub struct UriUpdateOptions {
    pub token_address: String,
    pub new_uri: String,
    pub function: EntryFunctionId,
    pub results_path: PathBuf,
    pub error_path: PathBuf,
}

impl UriUpdateOptions {
    pub fn new(
        token_address: impl Into<String>,
        new_uri: impl Into<String>,
    ) -> BlockchainResult<Self> {
        Ok(Self {
            token_address: token_address.into(),
            new_uri: new_uri.into(),
            function: DEFAULT_SET_URI_FUNCTION.parse()?,
            results_path: PathBuf::from("update-uri-result.json"),
            error_path: PathBuf::from("update-uri-error.json"),
        })
    }
}

/// Point the token at `new_uri`, writing the result or error report.
pub async fn run(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    options: &UriUpdateOptions,
    out: &mut dyn Write,
) -> BlockchainResult<UriUpdateReport> {
    let clock = RunClock::start();
    writeln!(out, "Update Token URI")?;
    writeln!(out, "Started at: {}", clock.started_at().to_rfc3339())?;

    match update(ctx, explicit_key, options, &clock, out).await {
        Ok(report) => {
            write_report(&options.results_path, &report)?;
            writeln!(out, "Results saved to: {}", options.results_path.display())?;
            Ok(report)
        }
        Err(e) => {
            tracing::error!(error = %e, token = %options.token_address, "Token URI update failed");
            writeln!(out, "Update failed: {}", e)?;
            let mut report = FailureReport::new(e.to_string(), &clock);
            report.digital_asset_address = Some(options.token_address.clone());
            write_report(&options.error_path, &report)?;
            writeln!(out, "Error details saved to: {}", options.error_path.display())?;
            Err(e)
        }
    }
}

async fn update(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    options: &UriUpdateOptions,
    clock: &RunClock,
    out: &mut dyn Write,
) -> BlockchainResult<UriUpdateReport> {
    let token: AccountAddress = options.token_address.parse()?;

    let account = ctx.prepare_account(explicit_key, DEFAULT_FUNDING_OCTAS).await?;
    writeln!(out, "Using account: {}", account.address())?;
    writeln!(out, "Token Address: {}", token)?;
    writeln!(out, "New URI: {}", options.new_uri)?;

    let payload = TransactionPayload::entry_function(
        options.function.clone(),
        vec![MoveArg::Address(token), MoveArg::string(&options.new_uri)],
    );

    let started = Instant::now();
    let result = ctx.submitter().submit_and_confirm(&account, &payload).await?;
    let duration = started.elapsed().as_secs_f64();
    let timing = clock.timing();

    writeln!(out, "Token URI updated successfully")?;
    writeln!(out, "Transaction hash: {}", result.hash)?;
    writeln!(out, "Update transaction time: {:.2} seconds", duration)?;
    writeln!(out, "Total script duration: {:.2} seconds", timing.total_script_duration)?;

    Ok(UriUpdateReport {
        success: true,
        transaction_hash: result.hash,
        digital_asset_address: token.to_hex_literal(),
        new_uri: options.new_uri.clone(),
        duration,
        timing,
    })
}
