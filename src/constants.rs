use clap::ValueEnum;
use std::fmt;

pub const MAINNET_CHAIN_ID: u64 = 1;
pub const HOLESKY_CHAIN_ID: u64 = 17000;
pub const ANVIL_CHAIN_ID: u64 = 31337;
pub const BUILDER_PLAYGROUND_CHAIN_ID: u64 = 1337;

/// Placeholder shown when a token's `name()` cannot be read.
pub const UNKNOWN_TOKEN_NAME: &str = "N/A";

/// Claim amounts are published per day under this file name.
pub const CLAIM_AMOUNTS_FILE: &str = "claim-amounts.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Network {
    Mainnet,
    Holesky,
    Anvil,
    BuilderPlayground,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Holesky => "holesky",
            Network::Anvil => "anvil",
            Network::BuilderPlayground => "builder-playground",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Mainnet => MAINNET_CHAIN_ID,
            Network::Holesky => HOLESKY_CHAIN_ID,
            Network::Anvil => ANVIL_CHAIN_ID,
            Network::BuilderPlayground => BUILDER_PLAYGROUND_CHAIN_ID,
        }
    }

    /// Environment used in proof store paths when none is given.
    pub fn default_environment(&self) -> &'static str {
        match self {
            Network::Holesky => "testnet",
            Network::Mainnet => "prod",
            _ => "local",
        }
    }

    pub fn rewards_coordinator(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some("0x7750d328b314EfFa365A0402CcfD489B80B0adda"),
            Network::Holesky => Some("0xAcc1fb458a1317E886dB376Fc8141540537E68fE"),
            _ => None,
        }
    }

    pub fn proof_store_base_url(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some("https://eigenlabs-rewards-mainnet-ethereum.s3.amazonaws.com"),
            Network::Holesky => Some("https://eigenlabs-rewards-testnet-holesky.s3.amazonaws.com"),
            _ => None,
        }
    }

    /// Mainnet claim amounts live under `ethereum` in the proof store.
    pub fn proof_store_segment(&self) -> &'static str {
        match self {
            Network::Mainnet => "ethereum",
            other => other.name(),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
