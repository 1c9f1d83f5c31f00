use async_trait::async_trait;
use ethers::types::Address;
use log::{debug, info};
#[cfg(test)]
use mockall::automock;
use num_bigint::BigUint;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::{btree_map::Entry, BTreeMap, HashMap};
use url::Url;

use crate::constants::CLAIM_AMOUNTS_FILE;
use crate::error::{Result, RewardsError};

/// Lifetime allocations of one earner, keyed by token.
pub type TokenAllocations = BTreeMap<Address, BigUint>;

/// Cumulative allocations of every earner for one distribution date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    earners: HashMap<Address, TokenAllocations>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, earner: Address, token: Address, amount: BigUint) -> Result<()> {
        match self.earners.entry(earner).or_default().entry(token) {
            Entry::Occupied(_) => Err(RewardsError::DuplicateAllocation { earner, token }),
            Entry::Vacant(slot) => {
                slot.insert(amount);
                Ok(())
            }
        }
    }

    pub fn get_token_allocations_for_earner(&self, earner: Address) -> Option<&TokenAllocations> {
        self.earners.get(&earner)
    }

    pub fn earner_count(&self) -> usize {
        self.earners.len()
    }

    /// Parses a newline-delimited `claim-amounts.json` body.
    pub fn from_claim_amounts(body: &str) -> Result<Self> {
        let mut distribution = Self::new();
        for (idx, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let malformed = |reason: String| RewardsError::MalformedClaimAmounts {
                line: idx + 1,
                reason,
            };
            let row: ClaimAmountsRow =
                serde_json::from_str(line).map_err(|e| malformed(e.to_string()))?;
            let amount = parse_amount(&row.cumulative_amount).map_err(malformed)?;
            distribution.insert(row.earner, row.token, amount)?;
        }
        Ok(distribution)
    }
}

#[derive(Debug, Deserialize)]
struct ClaimAmountsRow {
    earner: Address,
    token: Address,
    cumulative_amount: Box<RawValue>,
}

/// Accepts a decimal string or a JSON integer of any size. The literal text is
/// parsed directly so wei amounts never pass through an `f64`.
fn parse_amount(raw: &RawValue) -> std::result::Result<BigUint, String> {
    let text = raw.get();
    let digits = if text.starts_with('"') {
        serde_json::from_str::<String>(text).map_err(|e| e.to_string())?
    } else {
        text.to_string()
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!(
            "invalid amount `{}`, expected a non-negative integer or decimal string",
            text
        ));
    }
    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| format!("invalid amount `{}`", text))
}

/// Source of per-date reward distributions.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProofDataFetcher {
    /// `date` is a UTC calendar date formatted `YYYY-MM-DD`.
    async fn fetch_claim_amounts_for_date(&self, date: &str) -> Result<Distribution>;
}

/// Fetches claim amounts from `<base>/<environment>/<network>/<date>/claim-amounts.json`.
pub struct HttpProofDataFetcher {
    base_url: Url,
    environment: String,
    network: String,
    client: reqwest::Client,
}

impl HttpProofDataFetcher {
    pub fn new(base_url: Url, environment: &str, network: &str, client: reqwest::Client) -> Self {
        Self {
            base_url,
            environment: environment.to_string(),
            network: network.to_string(),
            client,
        }
    }

    pub fn claim_amounts_url(&self, date: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.environment,
            self.network,
            date,
            CLAIM_AMOUNTS_FILE
        )
    }
}

#[async_trait]
impl ProofDataFetcher for HttpProofDataFetcher {
    async fn fetch_claim_amounts_for_date(&self, date: &str) -> Result<Distribution> {
        let url = self.claim_amounts_url(date);
        debug!("Fetching claim amounts from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| RewardsError::Fetch {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RewardsError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| RewardsError::Fetch {
            url: url.clone(),
            source,
        })?;

        let distribution = Distribution::from_claim_amounts(&body)?;
        info!(
            "Loaded claim amounts for {} earners on {}",
            distribution.earner_count(),
            date
        );
        Ok(distribution)
    }
}
