//! Create a set in the saved series and save its id to the set id file.

use std::error::Error;

use clap::Parser;

use ufc_nft_scripts::scripts::set::{create_set, SetSpec};
use ufc_nft_scripts::scripts::{bootstrap, CommonArgs};

#[derive(Parser)]
#[command(name = "create-set")]
#[command(about = "Create a set within the saved series", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    maximum_editions: Option<u64>,

    /// IPFS hash of the set metadata
    #[arg(long)]
    metadata_hash: Option<String>,
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let defaults = SetSpec::default();
    let spec = SetSpec {
        name: cli.name.unwrap_or(defaults.name),
        description: cli.description.unwrap_or(defaults.description),
        maximum_editions: cli.maximum_editions.unwrap_or(defaults.maximum_editions),
        metadata_hash: cli.metadata_hash.unwrap_or(defaults.metadata_hash),
    };

    let ctx = bootstrap(&cli.common)?;
    let mut stdout = std::io::stdout();
    create_set(&ctx, cli.common.explicit_key(), &spec, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
