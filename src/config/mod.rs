use clap::ValueEnum;
use ethers::types::Address;
use log::debug;
use std::{fmt, path::PathBuf, str::FromStr};
use thiserror::Error;
use url::Url;

use crate::cli::ShowArgs;
use crate::constants::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClaimType {
    All,
    Unclaimed,
    Claimed,
}

impl ClaimType {
    /// Section title printed above the rewards table.
    pub fn title(&self) -> &'static str {
        match self {
            ClaimType::All => "Lifetime Rewards",
            ClaimType::Claimed => "Claimed Rewards",
            ClaimType::Unclaimed => "Unclaimed Rewards",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimType::All => "all",
            ClaimType::Unclaimed => "unclaimed",
            ClaimType::Claimed => "claimed",
        };
        f.write_str(name)
    }
}

/// Which distribution root's end date is used to look up claim amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClaimTimestamp {
    /// Most recently submitted root, which may not be claimable yet.
    Latest,
    /// Most recent root whose activation delay has passed.
    #[value(name = "latest_active")]
    LatestActive,
}

impl fmt::Display for ClaimTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimTimestamp::Latest => "latest",
            ClaimTimestamp::LatestActive => "latest_active",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
    Table,
    Json,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("eth rpc url not provided")]
    MissingRpcUrl,

    #[error("invalid {field} `{value}`: {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("rewards coordinator address not found for chain id {0}")]
    UnknownRewardsCoordinator(u64),

    #[error("invalid rewards coordinator address `{0}`")]
    InvalidRewardsCoordinator(String),

    #[error("proof store base URL not provided")]
    MissingProofStoreBaseUrl,

    #[error("environment must not be empty")]
    EmptyEnvironment,
}

/// Settings for one `show` run, resolved once before any network access.
#[derive(Debug, Clone)]
pub struct ShowConfig {
    pub earner_address: Address,
    pub network: Network,
    pub environment: String,
    pub claim_type: ClaimType,
    pub chain_id: u64,
    pub output: Option<PathBuf>,
    pub output_type: OutputType,
    pub rpc_url: Url,
    pub proof_store_base_url: Url,
    pub claim_timestamp: ClaimTimestamp,
    pub rewards_coordinator_address: Address,
}

impl ShowConfig {
    pub fn resolve(args: &ShowArgs) -> Result<Self, ConfigError> {
        let network = args.network;
        let environment = match non_empty(args.environment.as_deref()) {
            Some(env) => env.to_string(),
            None => network.default_environment().to_string(),
        };
        debug!("Network: {}, Env: {}", network, environment);

        let rewards_coordinator_address = resolve_rewards_coordinator(
            network,
            non_empty(args.rewards_coordinator_address.as_deref()),
        )?;
        debug!(
            "Using Rewards Coordinator address: {:?}",
            rewards_coordinator_address
        );

        let proof_store_base_url = match non_empty(args.proof_store_base_url.as_deref()) {
            Some(url) => url,
            None => network
                .proof_store_base_url()
                .ok_or(ConfigError::MissingProofStoreBaseUrl)?,
        };
        let proof_store_base_url = parse_url("proof store base url", proof_store_base_url)?;
        debug!("Using Proof store base URL: {}", proof_store_base_url);

        let rpc_url = non_empty(args.eth_rpc_url.as_deref()).ok_or(ConfigError::MissingRpcUrl)?;
        let rpc_url = parse_url("eth rpc url", rpc_url)?;

        debug!("Claim Type: {}", args.claim_type);
        let chain_id = network.chain_id();
        debug!("Using chain ID: {}", chain_id);

        let config = Self {
            earner_address: args.earner_address,
            network,
            environment,
            claim_type: args.claim_type,
            chain_id,
            output: args.output_file.clone(),
            output_type: args.output_type,
            rpc_url,
            proof_store_base_url,
            claim_timestamp: args.claim_timestamp,
            rewards_coordinator_address,
        };
        config.validate_all()?;

        Ok(config)
    }

    pub fn validate_all(&self) -> Result<(), ConfigError> {
        if self.environment.trim().is_empty() {
            return Err(ConfigError::EmptyEnvironment);
        }
        validate_rpc_url(&self.rpc_url)?;
        validate_proof_store_url(&self.proof_store_base_url)?;
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_rewards_coordinator(
    network: Network,
    flag: Option<&str>,
) -> Result<Address, ConfigError> {
    let raw = match flag {
        Some(address) => address,
        None => network
            .rewards_coordinator()
            .ok_or(ConfigError::UnknownRewardsCoordinator(network.chain_id()))?,
    };
    let address = Address::from_str(raw)
        .map_err(|_| ConfigError::InvalidRewardsCoordinator(raw.to_string()))?;
    if address == Address::zero() {
        return Err(ConfigError::InvalidRewardsCoordinator(raw.to_string()));
    }
    Ok(address)
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn validate_rpc_url(url: &Url) -> Result<(), ConfigError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidUrl {
            field: "eth rpc url",
            value: url.to_string(),
            reason: format!("unsupported scheme `{}`", scheme),
        }),
    }
}

fn validate_proof_store_url(url: &Url) -> Result<(), ConfigError> {
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            field: "proof store base url",
            value: url.to_string(),
            reason: "expected an http(s) base url".to_string(),
        });
    }
    Ok(())
}
