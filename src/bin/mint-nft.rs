//! Mint an edition in the saved series/set and attach its metadata.

use std::error::Error;

use clap::Parser;

use ufc_nft_scripts::blockchain::AccountAddress;
use ufc_nft_scripts::scripts::mint::{mint_nft, MintSpec};
use ufc_nft_scripts::scripts::{bootstrap, CommonArgs};

#[derive(Parser)]
#[command(name = "mint-nft")]
#[command(about = "Mint an NFT edition and add metadata", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Recipient address (defaults to the signing account)
    #[arg(long)]
    recipient: Option<AccountAddress>,

    #[arg(long, default_value_t = 1)]
    edition: u64,

    /// Metadata attribute; repeat for several
    #[arg(long = "attribute")]
    attributes: Vec<String>,

    #[arg(long)]
    media_type: Option<String>,

    #[arg(long)]
    media_url: Option<String>,
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let defaults = MintSpec::default();
    let spec = MintSpec {
        recipient: cli.recipient,
        edition_number: cli.edition,
        attributes: if cli.attributes.is_empty() {
            defaults.attributes
        } else {
            cli.attributes
        },
        media_type: cli.media_type.unwrap_or(defaults.media_type),
        media_url: cli.media_url.unwrap_or(defaults.media_url),
    };

    let ctx = bootstrap(&cli.common)?;
    let mut stdout = std::io::stdout();
    mint_nft(&ctx, cli.common.explicit_key(), &spec, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
