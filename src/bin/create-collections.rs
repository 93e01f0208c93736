//! Create a numbered run of UFC Fighters collections, paced to avoid rate
//! limits.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use ufc_nft_scripts::scripts::collections::{self, CollectionBatchOptions};
use ufc_nft_scripts::scripts::{bootstrap, CommonArgs};

#[derive(Parser)]
#[command(name = "create-collections")]
#[command(about = "Create UFC Fighters collections in sequence", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long, default_value_t = 50)]
    count: usize,

    /// Maximum supply of each collection
    #[arg(long, default_value_t = 1000)]
    maximum: u64,

    /// Pause after each success, before jitter
    #[arg(long, default_value_t = 8000)]
    pause_ms: u64,

    #[arg(long, default_value_t = 2000)]
    jitter_ms: u64,

    /// Pause after a failed item
    #[arg(long, default_value_t = 5000)]
    error_pause_ms: u64,

    #[arg(long, default_value = "collection-creation-results.json")]
    results: PathBuf,
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let ctx = bootstrap(&cli.common)?;
    let options = CollectionBatchOptions {
        count: cli.count,
        maximum: cli.maximum,
        pause_ms: cli.pause_ms,
        jitter_ms: cli.jitter_ms,
        error_pause_ms: cli.error_pause_ms,
        results_path: cli.results,
        ..CollectionBatchOptions::default()
    };

    let mut stdout = std::io::stdout();
    collections::run(&ctx, cli.common.explicit_key(), &options, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
