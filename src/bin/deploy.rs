//! Publish the compiled UFC NFT Move package.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use ufc_nft_scripts::scripts::deploy::{deploy, DEFAULT_PACKAGE_DIR};
use ufc_nft_scripts::scripts::{bootstrap, CommonArgs};

#[derive(Parser)]
#[command(name = "deploy")]
#[command(about = "Publish the compiled Move package", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Package build directory (contains package-metadata.bcs)
    #[arg(long, default_value = DEFAULT_PACKAGE_DIR)]
    package_dir: PathBuf,

    /// Module to publish, repeated in dependency order (defaults to the
    /// configured contract module)
    #[arg(long = "module")]
    modules: Vec<String>,
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let ctx = bootstrap(&cli.common)?;
    let mut stdout = std::io::stdout();
    deploy(&ctx, cli.common.explicit_key(), &cli.package_dir, &cli.modules, &mut stdout).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
