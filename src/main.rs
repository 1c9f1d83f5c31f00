use anyhow::{Context, Result};
use clap::Parser;
use ethers::providers::{Http, Provider};
use log::debug;
use std::{io, sync::Arc};

use rewards_cli::{
    cli::Cli,
    config::ShowConfig,
    coordinator::RewardsCoordinatorReader,
    proofs::HttpProofDataFetcher,
    show::{show_rewards, ShowContext},
    tokens::Erc20NameResolver,
    utils::setup_logger,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Cli::parse().show_args();
    setup_logger(args.verbose)?;

    run(args).await
}

async fn run(args: rewards_cli::cli::ShowArgs) -> Result<()> {
    let config = ShowConfig::resolve(&args).context("error reading and validating config")?;
    debug!("Resolved config: {:?}", config);

    let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
        .context("failed to create new eth client")?;
    let provider = Arc::new(provider);

    let coordinator =
        RewardsCoordinatorReader::new(config.rewards_coordinator_address, provider.clone());
    let fetcher = HttpProofDataFetcher::new(
        config.proof_store_base_url.clone(),
        &config.environment,
        config.network.proof_store_segment(),
        reqwest::Client::new(),
    );
    let names = Erc20NameResolver::new(provider);

    let ctx = ShowContext {
        roots: &coordinator,
        claims: &coordinator,
        fetcher: &fetcher,
        names: &names,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    show_rewards(&config, &ctx, &mut out)
        .await
        .context("failed to show rewards")?;

    Ok(())
}
