//! Point an existing digital asset at a new metadata URI.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use ufc_nft_scripts::blockchain::EntryFunctionId;
use ufc_nft_scripts::scripts::token_uri::{self, UriUpdateOptions, DEFAULT_SET_URI_FUNCTION};
use ufc_nft_scripts::scripts::{bootstrap, CommonArgs};

#[derive(Parser)]
#[command(name = "update-token-uri")]
#[command(about = "Update the URI of a digital asset", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Address of the token object
    token_address: String,

    new_uri: String,

    /// Entry function taking (token address, uri)
    #[arg(long, default_value = DEFAULT_SET_URI_FUNCTION)]
    function: EntryFunctionId,

    #[arg(long, default_value = "update-uri-result.json")]
    results: PathBuf,

    #[arg(long, default_value = "update-uri-error.json")]
    error_report: PathBuf,
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let ctx = bootstrap(&cli.common)?;
    let mut options = UriUpdateOptions::new(cli.token_address, cli.new_uri)?;
    options.function = cli.function;
    options.results_path = cli.results;
    options.error_path = cli.error_report;

    let mut stdout = std::io::stdout();
    token_uri::run(&ctx, cli.common.explicit_key(), &options, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
