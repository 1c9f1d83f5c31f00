use async_trait::async_trait;
use ethers::{
    providers::Middleware,
    types::{Address, U256},
};
#[cfg(test)]
use mockall::automock;
use num_bigint::BigUint;
use std::sync::Arc;

use crate::abi::RewardsCoordinator;
use crate::error::{Result, RewardsError};

/// A distribution root as committed on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionRoot {
    pub root: [u8; 32],
    pub rewards_calculation_end_timestamp: u32,
    pub activated_at: u32,
    pub disabled: bool,
}

/// Reads cumulative claims recorded by the rewards coordinator.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClaimsReader {
    /// `None` means the coordinator has no record, which callers treat as zero.
    async fn get_cumulative_claimed(
        &self,
        earner: Address,
        token: Address,
    ) -> Result<Option<BigUint>>;
}

/// Reads the distribution roots posted to the rewards coordinator.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DistributionRootReader {
    async fn curr_rewards_calculation_end_timestamp(&self) -> Result<u32>;

    async fn get_distribution_roots_length(&self) -> Result<u64>;

    async fn get_current_claimable_distribution_root(&self) -> Result<DistributionRoot>;

    async fn get_root_index_from_hash(&self, root: [u8; 32]) -> Result<u32>;
}

pub struct RewardsCoordinatorReader<M> {
    contract: RewardsCoordinator<M>,
}

impl<M: Middleware + 'static> RewardsCoordinatorReader<M> {
    pub fn new(address: Address, client: Arc<M>) -> Self {
        Self {
            contract: RewardsCoordinator::new(address, client),
        }
    }
}

#[async_trait]
impl<M: Middleware + 'static> ClaimsReader for RewardsCoordinatorReader<M> {
    async fn get_cumulative_claimed(
        &self,
        earner: Address,
        token: Address,
    ) -> Result<Option<BigUint>> {
        let claimed = self
            .contract
            .cumulative_claimed(earner, token)
            .call()
            .await
            .map_err(|e| RewardsError::rpc("cumulativeClaimed", e))?;
        Ok(Some(u256_to_biguint(claimed)))
    }
}

#[async_trait]
impl<M: Middleware + 'static> DistributionRootReader for RewardsCoordinatorReader<M> {
    async fn curr_rewards_calculation_end_timestamp(&self) -> Result<u32> {
        self.contract
            .curr_rewards_calculation_end_timestamp()
            .call()
            .await
            .map_err(|e| RewardsError::rpc("currRewardsCalculationEndTimestamp", e))
    }

    async fn get_distribution_roots_length(&self) -> Result<u64> {
        let length = self
            .contract
            .get_distribution_roots_length()
            .call()
            .await
            .map_err(|e| RewardsError::rpc("getDistributionRootsLength", e))?;
        if length > U256::from(u64::MAX) {
            return Err(RewardsError::rpc(
                "getDistributionRootsLength",
                format!("root count {} does not fit in u64", length),
            ));
        }
        Ok(length.as_u64())
    }

    async fn get_current_claimable_distribution_root(&self) -> Result<DistributionRoot> {
        // Human-readable struct outputs decode as a plain tuple.
        let (root, rewards_calculation_end_timestamp, activated_at, disabled) = self
            .contract
            .get_current_claimable_distribution_root()
            .call()
            .await
            .map_err(|e| RewardsError::rpc("getCurrentClaimableDistributionRoot", e))?;
        Ok(DistributionRoot {
            root,
            rewards_calculation_end_timestamp,
            activated_at,
            disabled,
        })
    }

    async fn get_root_index_from_hash(&self, root: [u8; 32]) -> Result<u32> {
        self.contract
            .get_root_index_from_hash(root)
            .call()
            .await
            .map_err(|e| RewardsError::rpc("getRootIndexFromHash", e))
    }
}

pub fn u256_to_biguint(value: U256) -> BigUint {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    BigUint::from_bytes_be(&bytes)
}
