use ethers::types::Address;
use num_bigint::BigUint;
use thiserror::Error;

use crate::config::ClaimTimestamp;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of a `show` run once its configuration has been resolved.
/// Configuration problems are reported separately as [`ConfigError`].
///
/// [`ConfigError`]: crate::config::ConfigError
#[derive(Debug, Error)]
pub enum RewardsError {
    #[error("rewards coordinator call `{call}` failed: {source}")]
    Rpc {
        call: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("failed to fetch claim amounts from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("proof store returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed claim amounts on line {line}: {reason}")]
    MalformedClaimAmounts { line: usize, reason: String },

    #[error("duplicate allocation for earner {earner:?} and token {token:?}")]
    DuplicateAllocation { earner: Address, token: Address },

    #[error("no {0} distribution root found")]
    NoDistributionRoot(ClaimTimestamp),

    #[error("earner address {0:?} not found in distribution")]
    EarnerNotFound(Address),

    #[error("claimed amount {claimed} exceeds lifetime amount {lifetime} for token {token:?}")]
    ClaimedExceedsLifetime {
        token: Address,
        lifetime: BigUint,
        claimed: BigUint,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to encode rewards as json: {0}")]
    Json(#[from] serde_json::Error),
}

impl RewardsError {
    pub fn rpc<E>(call: &'static str, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Rpc {
            call,
            source: source.into(),
        }
    }

    /// True when the failure is a business outcome rather than a fault of the
    /// chain, the proof store or the local machine.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EarnerNotFound(_))
    }
}

pub type Result<T, E = RewardsError> = std::result::Result<T, E>;
