use clap::{Args, Parser, Subcommand};
use ethers::types::Address;
use indoc::indoc;
use std::{path::PathBuf, str::FromStr};

use crate::config::{ClaimTimestamp, ClaimType, OutputType};
use crate::constants::Network;

#[derive(Debug, Parser)]
#[command(name = "rewards", version, about = "Inspect EigenLayer rewards for an earner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn show_args(self) -> ShowArgs {
        match self.command {
            Command::Show(args) => args,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show rewards for an address against the `DistributionRoot` posted on-chain by the rewards updater
    #[command(long_about = SHOW_DESCRIPTION)]
    Show(ShowArgs),
}

const SHOW_DESCRIPTION: &str = indoc! {"
    Command to show rewards for earners

    Helpful flags
    - claim-type: Type of rewards to show. Can be 'all', 'claimed' or 'unclaimed'
    - claim-timestamp: Timestamp of the claim distribution root to use. Can be 'latest' or 'latest_active'.
        - 'latest' will show rewards for the latest root (can contain non-claimable rewards)
        - 'latest_active' will show rewards for the latest active root (only claimable rewards)
"};

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Address of the earner
    #[arg(long, visible_alias = "ea", env = "REWARDS_EARNER_ADDRESS", value_parser = parse_address)]
    pub earner_address: Address,

    /// Network to use
    #[arg(long, short = 'n', env = "NETWORK", value_enum, default_value_t = Network::Holesky)]
    pub network: Network,

    /// Environment to use. Inferred from the network when empty
    #[arg(long, visible_alias = "env", env = "REWARDS_ENVIRONMENT")]
    pub environment: Option<String>,

    /// URL of the Ethereum RPC
    #[arg(long, env = "ETH_RPC_URL")]
    pub eth_rpc_url: Option<String>,

    /// Type of rewards to show
    #[arg(long, env = "REWARDS_CLAIM_TYPE", value_enum, default_value_t = ClaimType::All)]
    pub claim_type: ClaimType,

    /// Distribution root whose end date is used to look up rewards
    #[arg(long, env = "REWARDS_CLAIM_TIMESTAMP", value_enum, default_value_t = ClaimTimestamp::Latest)]
    pub claim_timestamp: ClaimTimestamp,

    /// Base URL of the proof store. Defaulted per network
    #[arg(long, env = "REWARDS_PROOF_STORE_BASE_URL")]
    pub proof_store_base_url: Option<String>,

    /// Address of the rewards coordinator contract. Defaulted per network
    #[arg(long, env = "REWARDS_COORDINATOR_ADDRESS")]
    pub rewards_coordinator_address: Option<String>,

    /// Write json output to this file instead of stdout
    #[arg(long, short = 'o', env = "REWARDS_OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Output format
    #[arg(long, visible_alias = "ot", env = "REWARDS_OUTPUT_TYPE", value_enum, default_value_t = OutputType::Table)]
    pub output_type: OutputType,

    /// Enable debug logging
    #[arg(long, short = 'v', env = "VERBOSE")]
    pub verbose: bool,
}

fn parse_address(value: &str) -> Result<Address, String> {
    let hex = value.trim();
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.len() != 40 {
        return Err(format!("expected 20 bytes of hex, got `{}`", value));
    }
    Address::from_str(digits).map_err(|e| format!("invalid address `{}`: {}", value, e))
}
