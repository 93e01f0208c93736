//! Set creation within the persisted series.

use std::io::Write;

use crate::blockchain::{BlockchainResult, EventKind, EventLookup, MoveArg, TransactionPayload};
use crate::persistence::{read_identifier, write_identifier};
use crate::scripts::ScriptContext;

pub const DEFAULT_FUNDING_OCTAS: u64 = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSpec {
    pub name: String,
    pub description: String,
    pub maximum_editions: u64,
    pub metadata_hash: String,
}

impl Default for SetSpec {
    fn default() -> Self {
        Self {
            name: "Main Event".to_string(),
            description: "UFC 291 Main Event NFT Collection".to_string(),
            maximum_editions: 100,
            metadata_hash: "QmHash...".to_string(),
        }
    }
}

impl SetSpec {
    pub fn payload(&self, ctx: &ScriptContext, series_id: &str) -> BlockchainResult<TransactionPayload> {
        Ok(TransactionPayload::entry_function(
            ctx.contract_function("create_set")?,
            vec![
                MoveArg::string(series_id),
                MoveArg::string(&self.name),
                MoveArg::string(&self.description),
                MoveArg::U64(self.maximum_editions),
                MoveArg::string(&self.metadata_hash),
            ],
        ))
    }
}

/// Create a set in the series named by `files.series_id` and persist the
/// new set id. The series file is read before anything touches the network.
pub async fn create_set(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    spec: &SetSpec,
    out: &mut dyn Write,
) -> BlockchainResult<Option<String>> {
    let series_id = read_identifier(&ctx.config.files.series_id)?;
    writeln!(out, "Using series ID: {}", series_id)?;
    let payload = spec.payload(ctx, &series_id)?;

    let account = ctx.prepare_account(explicit_key, DEFAULT_FUNDING_OCTAS).await?;
    writeln!(out, "Creating set...")?;
    let result = ctx.submitter().submit_and_confirm(&account, &payload).await?;
    writeln!(out, "Transaction submitted: {}", result.hash)?;

    match EventKind::SetCreated.extract(&result) {
        EventLookup::Found(event) => {
            writeln!(out, "Set created with ID: {}", event.id())?;
            write_identifier(&ctx.config.files.set_id, event.id())?;
            writeln!(out, "Set ID saved to {}", ctx.config.files.set_id.display())?;
            Ok(Some(event.id().to_string()))
        }
        lookup => {
            tracing::warn!(tx_hash = %result.hash, lookup = ?lookup, "Set id not found in events");
            writeln!(out, "Set created but couldn't find the set ID in events")?;
            Ok(None)
        }
    }
}
