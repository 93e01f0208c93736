//! Series creation; persists the new series id for `create-set`.

use std::io::Write;

use crate::blockchain::{BlockchainResult, EventKind, EventLookup, MoveArg, TransactionPayload};
use crate::persistence::write_identifier;
use crate::scripts::ScriptContext;

pub const DEFAULT_FUNDING_OCTAS: u64 = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    pub name: String,
    pub description: String,
    pub uri: String,
    pub max_supply: u64,
    pub royalty_bps: u64,
    pub metadata_uri: String,
}

impl Default for SeriesSpec {
    fn default() -> Self {
        Self {
            name: "UFC Series 1".to_string(),
            description: "First series of UFC NFTs".to_string(),
            uri: "https://ufc.com/series1".to_string(),
            max_supply: 10_000,
            royalty_bps: 100,
            metadata_uri: "https://ufc.com/series1/metadata".to_string(),
        }
    }
}

impl SeriesSpec {
    pub fn payload(&self, ctx: &ScriptContext) -> BlockchainResult<TransactionPayload> {
        Ok(TransactionPayload::entry_function(
            ctx.contract_function("create_series")?,
            vec![
                MoveArg::string(&self.name),
                MoveArg::string(&self.description),
                MoveArg::string(&self.uri),
                MoveArg::U64(self.max_supply),
                MoveArg::U64(self.royalty_bps),
                MoveArg::string(&self.metadata_uri),
            ],
        ))
    }
}

/// Create the series and write its id to `files.series_id`.
///
/// Returns the id, or `None` when the transaction committed without a
/// readable `SeriesCreatedEvent` (nothing is written then).
pub async fn create_series(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    spec: &SeriesSpec,
    out: &mut dyn Write,
) -> BlockchainResult<Option<String>> {
    let payload = spec.payload(ctx)?;
    let account = ctx.prepare_account(explicit_key, DEFAULT_FUNDING_OCTAS).await?;
    writeln!(out, "Account address: {}", account.address())?;
    writeln!(out, "Creating series...")?;

    let result = ctx.submitter().submit(&account, &payload).await?;
    writeln!(out, "Transaction submitted: {}", result.hash)?;

    if !result.events.is_empty() {
        let types: Vec<&str> = result.events.iter().map(|e| e.type_tag.as_str()).collect();
        tracing::debug!(count = types.len(), types = ?types, "Events in transaction");
    }

    let lookup = EventKind::SeriesCreated.extract(&result);
    // A failed VM status is fatal even if an event was emitted.
    let result = result.ensure_success()?;

    let series_id = match lookup {
        EventLookup::Found(event) => {
            let id = event.id().to_string();
            writeln!(out, "Series ID: {}", id)?;
            write_identifier(&ctx.config.files.series_id, &id)?;
            writeln!(out, "Series ID saved to {}", ctx.config.files.series_id.display())?;
            Some(id)
        }
        EventLookup::EventNotFound => {
            tracing::warn!(tx_hash = %result.hash, "No SeriesCreatedEvent in transaction");
            writeln!(out, "No SeriesCreatedEvent found in transaction events")?;
            None
        }
        EventLookup::FieldAbsent(field) => {
            tracing::warn!(tx_hash = %result.hash, field, "SeriesCreatedEvent without id");
            writeln!(out, "SeriesCreatedEvent has no {} field", field)?;
            None
        }
    };

    writeln!(out, "Series created successfully!")?;
    Ok(series_id)
}
