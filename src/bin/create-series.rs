//! Create a series and save its id to the series id file.

use std::error::Error;

use clap::Parser;

use ufc_nft_scripts::scripts::series::{create_series, SeriesSpec};
use ufc_nft_scripts::scripts::{bootstrap, CommonArgs};

#[derive(Parser)]
#[command(name = "create-series")]
#[command(about = "Create a UFC NFT series", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    uri: Option<String>,

    #[arg(long)]
    max_supply: Option<u64>,

    /// Royalty in basis points
    #[arg(long)]
    royalty_bps: Option<u64>,

    #[arg(long)]
    metadata_uri: Option<String>,
}

impl Cli {
    fn spec(&self) -> SeriesSpec {
        let defaults = SeriesSpec::default();
        SeriesSpec {
            name: self.name.clone().unwrap_or(defaults.name),
            description: self.description.clone().unwrap_or(defaults.description),
            uri: self.uri.clone().unwrap_or(defaults.uri),
            max_supply: self.max_supply.unwrap_or(defaults.max_supply),
            royalty_bps: self.royalty_bps.unwrap_or(defaults.royalty_bps),
            metadata_uri: self.metadata_uri.clone().unwrap_or(defaults.metadata_uri),
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let ctx = bootstrap(&cli.common)?;
    let mut stdout = std::io::stdout();
    create_series(&ctx, cli.common.explicit_key(), &cli.spec(), &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
