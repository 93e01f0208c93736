//! `ufc-nft`: create collections and mint UFC fighter tokens.
//!
//! ```text
//!   args ──▶ parse ──▶ load key ──▶ funding guard ──▶ submit (retry on 429) ──▶ hash
//!                                       │                     │
//!                                    faucet              node REST API
//! ```
//!
//! Usage problems print the usage text and exit 0; bad values and failed
//! transactions exit 1.

use clap::Parser;

use ufc_nft_scripts::scripts::{bootstrap, ufc_nft, CommonArgs};

#[derive(Parser)]
#[command(name = "ufc-nft")]
#[command(about = "Create UFC NFT collections and mint tokens", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Subcommand and its positional arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let ctx = match bootstrap(&cli.common) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("ufc-nft v{} starting", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let code = ufc_nft::run(
        &ctx,
        cli.common.explicit_key(),
        &cli.args,
        &mut stdout,
        &mut stderr,
    )
    .await;
    std::process::exit(code);
}
