use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use mailproof_core::encode_calldata;
use tracing::{debug, info};
use url::Url;

mod client;
mod utils;

use client::{BlueprintSlug, ProverClient, ProverConfig};

/// Generate a ZK proof for an email and encode it for a Solidity
/// verifier contract.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the raw email file (.eml) to prove.
    email_path: PathBuf,

    /// Blueprint slug on the proving service, e.g. "acme/PaymentReceived@v1".
    #[clap(short, long, env = "BLUEPRINT_SLUG")]
    blueprint: BlueprintSlug,

    /// Base URL of the proving service API.
    #[clap(short, long, env = "PROVER_URL")]
    prover_url: Url,

    /// Where to write the encoded calldata JSON.
    #[clap(short, long, default_value = "contract-proof-data.json")]
    out: PathBuf,

    /// Seconds to wait between proof status checks.
    #[clap(long, default_value_t = 5)]
    poll_interval: u64,

    /// Give up after this many status checks.
    #[clap(long, default_value_t = 120)]
    poll_limit: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment variables from {:?}", path),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => bail!("failed to load .env file: {}", e),
    }
    let args = Args::parse();

    let raw_email = utils::read_email_file(&args.email_path)
        .with_context(|| format!("Failed to read email from {}", args.email_path.display()))?;

    let client = ProverClient::new(ProverConfig {
        base_url: args.prover_url,
        blueprint: args.blueprint,
        poll_interval: Duration::from_secs(args.poll_interval),
        poll_limit: args.poll_limit,
    });

    info!("Requesting proof for blueprint {}", client.blueprint());
    let request_id = client.submit(&raw_email).await?;
    let start_time = Instant::now();

    let status = client.status(&request_id).await?;
    info!("Initial status of {request_id}: {status:?}");

    info!("Waiting for proof request {request_id} to complete");
    let result = client.wait_for_completion(&request_id).await?;
    info!(
        "Proof request {request_id} completed in {:.2?}",
        start_time.elapsed()
    );

    let calldata = encode_calldata(&result.proof, &result.public_outputs)?;

    utils::save_calldata(&calldata, &args.out)?;
    info!("Contract calldata saved to {}", args.out.display());

    utils::display_calldata(&calldata)?;

    Ok(())
}
