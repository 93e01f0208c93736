//! Edition minting within the persisted series/set, followed by metadata.

use std::io::Write;

use crate::blockchain::{
    AccountAddress, BlockchainResult, EventKind, EventLookup, MoveArg, TransactionPayload,
};
use crate::persistence::read_identifier;
use crate::scripts::ScriptContext;

pub const DEFAULT_FUNDING_OCTAS: u64 = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintSpec {
    /// Defaults to the signing account.
    pub recipient: Option<AccountAddress>,
    pub edition_number: u64,
    pub attributes: Vec<String>,
    pub media_type: String,
    pub media_url: String,
}

impl Default for MintSpec {
    fn default() -> Self {
        Self {
            recipient: None,
            edition_number: 1,
            attributes: vec![
                "Fighter: Dustin Poirier".to_string(),
                "Event: UFC 291".to_string(),
            ],
            media_type: "image/jpeg".to_string(),
            media_url: "https://ipfs.io/ipfs/QmHash...".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub mint_hash: String,
    pub nft_id: Option<String>,
    pub metadata_hash: Option<String>,
}

/// Mint one edition and, if the mint event carries an id, attach metadata.
pub async fn mint_nft(
    ctx: &ScriptContext,
    explicit_key: Option<&str>,
    spec: &MintSpec,
    out: &mut dyn Write,
) -> BlockchainResult<MintOutcome> {
    let series_id = read_identifier(&ctx.config.files.series_id)?;
    let set_id = read_identifier(&ctx.config.files.set_id)?;
    writeln!(out, "Using series ID: {}", series_id)?;
    writeln!(out, "Using set ID: {}", set_id)?;

    let mint_function = ctx.contract_function("mint_nft")?;
    let metadata_function = ctx.contract_function("add_metadata")?;

    let account = ctx.prepare_account(explicit_key, DEFAULT_FUNDING_OCTAS).await?;
    let recipient = spec.recipient.unwrap_or_else(|| account.address());
    let submitter = ctx.submitter();

    writeln!(out, "Minting NFT...")?;
    let mint = TransactionPayload::entry_function(
        mint_function,
        vec![
            MoveArg::Address(recipient),
            MoveArg::string(&series_id),
            MoveArg::string(&set_id),
            MoveArg::U64(spec.edition_number),
        ],
    );
    let result = submitter.submit_and_confirm(&account, &mint).await?;
    writeln!(out, "Transaction submitted: {}", result.hash)?;

    let nft_id = match EventKind::NftMinted.extract(&result) {
        EventLookup::Found(event) => event.id().to_string(),
        lookup => {
            tracing::warn!(tx_hash = %result.hash, lookup = ?lookup, "NFT id not found in events");
            writeln!(out, "NFT minted but couldn't find the NFT ID in events")?;
            return Ok(MintOutcome {
                mint_hash: result.hash,
                nft_id: None,
                metadata_hash: None,
            });
        }
    };
    writeln!(out, "NFT minted with ID: {}", nft_id)?;

    writeln!(out, "Adding metadata to NFT...")?;
    let metadata = TransactionPayload::entry_function(
        metadata_function,
        vec![
            MoveArg::string(&nft_id),
            MoveArg::strings(&spec.attributes),
            MoveArg::string(&spec.media_type),
            MoveArg::string(&spec.media_url),
        ],
    );
    let metadata_result = submitter.submit_and_confirm(&account, &metadata).await?;
    writeln!(out, "Metadata transaction submitted: {}", metadata_result.hash)?;
    writeln!(out, "NFT minted and metadata added successfully!")?;

    Ok(MintOutcome {
        mint_hash: result.hash,
        nft_id: Some(nft_id),
        metadata_hash: Some(metadata_result.hash),
    })
}
