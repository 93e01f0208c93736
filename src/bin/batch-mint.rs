//! Mint a prepared batch of tokens in one transaction.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use ufc_nft_scripts::scripts::batch_mint::{self, BatchMintOptions};
use ufc_nft_scripts::scripts::{bootstrap, CommonArgs};

#[derive(Parser)]
#[command(name = "batch-mint")]
#[command(about = "Batch mint tokens from a JSON data file", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// JSON file with a `batchMintData` array
    #[arg(long, default_value = "data/batch-mint-data-50.json")]
    data: PathBuf,

    /// Exact number of items the data file must contain
    #[arg(long, default_value_t = 50)]
    expected: usize,

    #[arg(long, default_value = "batch-mint-results.json")]
    results: PathBuf,

    #[arg(long, default_value = "batch-mint-error.json")]
    error_report: PathBuf,
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let ctx = bootstrap(&cli.common)?;
    let options = BatchMintOptions {
        data_path: cli.data,
        expected: cli.expected,
        results_path: cli.results,
        error_path: cli.error_report,
    };

    let mut stdout = std::io::stdout();
    batch_mint::run(&ctx, cli.common.explicit_key(), &options, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
