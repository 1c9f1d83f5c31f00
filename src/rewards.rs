use chrono::DateTime;
use ethers::types::Address;
use log::{debug, info};
use num_bigint::BigUint;
use num_traits::{CheckedSub, Zero};

use crate::config::{ClaimTimestamp, ClaimType};
use crate::coordinator::{ClaimsReader, DistributionRootReader};
use crate::error::{Result, RewardsError};
use crate::proofs::{Distribution, TokenAllocations};

/// Token → wei amount for one earner. Lifetime, claimed or unclaimed
/// depending on the selected [`ClaimType`].
pub type RewardsView = TokenAllocations;

/// The distribution root a run reads claim amounts for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRoot {
    /// UTC end date of the rewards calculation, `YYYY-MM-DD`.
    pub date: String,
    pub index: u32,
}

pub async fn resolve_claim_date<R>(selector: ClaimTimestamp, reader: &R) -> Result<ClaimRoot>
where
    R: DistributionRootReader + Sync + ?Sized,
{
    let (end_timestamp, index) = match selector {
        ClaimTimestamp::Latest => {
            let end_timestamp = reader.curr_rewards_calculation_end_timestamp().await?;
            if end_timestamp == 0 {
                return Err(RewardsError::NoDistributionRoot(selector));
            }
            let root_count = reader.get_distribution_roots_length().await?;
            let index = root_count
                .checked_sub(1)
                .and_then(|i| u32::try_from(i).ok())
                .ok_or(RewardsError::NoDistributionRoot(selector))?;
            (end_timestamp, index)
        }
        ClaimTimestamp::LatestActive => {
            let root = reader.get_current_claimable_distribution_root().await?;
            if root.rewards_calculation_end_timestamp == 0 {
                return Err(RewardsError::NoDistributionRoot(selector));
            }
            let index = reader.get_root_index_from_hash(root.root).await?;
            (root.rewards_calculation_end_timestamp, index)
        }
    };

    let date = DateTime::from_timestamp(i64::from(end_timestamp), 0)
        .ok_or(RewardsError::NoDistributionRoot(selector))?
        .format("%Y-%m-%d")
        .to_string();
    info!("Using {} distribution root #{} ({})", selector, index, date);

    Ok(ClaimRoot { date, index })
}

pub fn lookup_earner_allocations(
    distribution: &Distribution,
    earner: Address,
) -> Result<RewardsView> {
    distribution
        .get_token_allocations_for_earner(earner)
        .cloned()
        .ok_or(RewardsError::EarnerNotFound(earner))
}

/// Reads the cumulative claimed amount of every token in `lifetime`.
/// The first failing read aborts the whole lookup.
pub async fn fetch_claimed_for_all<C>(
    lifetime: &RewardsView,
    earner: Address,
    reader: &C,
) -> Result<RewardsView>
where
    C: ClaimsReader + Sync + ?Sized,
{
    let mut claimed = RewardsView::new();
    for token in lifetime.keys() {
        let amount = reader
            .get_cumulative_claimed(earner, *token)
            .await?
            .unwrap_or_else(BigUint::zero);
        debug!("Claimed {} of token {:?}", amount, token);
        claimed.insert(*token, amount);
    }
    Ok(claimed)
}

/// `lifetime - claimed` per token of `lifetime`; tokens missing from
/// `claimed` count as nothing claimed.
pub fn compute_unclaimed(lifetime: &RewardsView, claimed: &RewardsView) -> Result<RewardsView> {
    let zero = BigUint::zero();
    lifetime
        .iter()
        .map(|(token, total)| {
            let already = claimed.get(token).unwrap_or(&zero);
            let unclaimed = total.checked_sub(already).ok_or_else(|| {
                RewardsError::ClaimedExceedsLifetime {
                    token: *token,
                    lifetime: total.clone(),
                    claimed: already.clone(),
                }
            })?;
            Ok((*token, unclaimed))
        })
        .collect()
}

pub async fn select_rewards<C>(
    claim_type: ClaimType,
    lifetime: RewardsView,
    earner: Address,
    reader: &C,
) -> Result<RewardsView>
where
    C: ClaimsReader + Sync + ?Sized,
{
    match claim_type {
        ClaimType::All => Ok(lifetime),
        ClaimType::Claimed => fetch_claimed_for_all(&lifetime, earner, reader).await,
        ClaimType::Unclaimed => {
            let claimed = fetch_claimed_for_all(&lifetime, earner, reader).await?;
            compute_unclaimed(&lifetime, &claimed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::{DistributionRoot, MockClaimsReader, MockDistributionRootReader};
    use mockall::predicate::eq;

    fn token(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn view(entries: &[(u8, u64)]) -> RewardsView {
        entries
            .iter()
            .map(|(t, amount)| (token(*t), BigUint::from(*amount)))
            .collect()
    }

    #[test]
    fn test_unclaimed_subtracts_per_token() {
        let lifetime = view(&[(0xa, 1000), (0xb, 500)]);
        let claimed = view(&[(0xa, 300), (0xb, 500)]);
        let unclaimed = compute_unclaimed(&lifetime, &claimed).unwrap();
        assert_eq!(unclaimed, view(&[(0xa, 700), (0xb, 0)]));
    }

    #[test]
    fn test_unclaimed_missing_claim_counts_as_zero() {
        let lifetime = view(&[(0xa, 1000), (0xb, 500)]);
        let claimed = view(&[(0xa, 300)]);
        let unclaimed = compute_unclaimed(&lifetime, &claimed).unwrap();
        assert_eq!(unclaimed, view(&[(0xa, 700), (0xb, 500)]));
    }

    #[test]
    fn test_unclaimed_ignores_tokens_only_claimed() {
        let lifetime = view(&[(0xa, 10)]);
        let claimed = view(&[(0xa, 4), (0xc, 99)]);
        let unclaimed = compute_unclaimed(&lifetime, &claimed).unwrap();
        assert_eq!(unclaimed, view(&[(0xa, 6)]));
    }

    #[test]
    fn test_unclaimed_rejects_overclaim() {
        let lifetime = view(&[(0xa, 10)]);
        let claimed = view(&[(0xa, 11)]);
        match compute_unclaimed(&lifetime, &claimed) {
            Err(RewardsError::ClaimedExceedsLifetime { token: t, lifetime, claimed }) => {
                assert_eq!(t, token(0xa));
                assert_eq!(lifetime, BigUint::from(10u32));
                assert_eq!(claimed, BigUint::from(11u32));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unclaimed_beyond_256_bits() {
        let big = (BigUint::from(1u8) << 300u32) + 7u32;
        let lifetime: RewardsView = [(token(0xa), big.clone())].into_iter().collect();
        let claimed = view(&[(0xa, 7)]);
        let unclaimed = compute_unclaimed(&lifetime, &claimed).unwrap();
        assert_eq!(unclaimed[&token(0xa)], BigUint::from(1u8) << 300u32);
    }

    #[tokio::test]
    async fn test_all_skips_claims_lookup() {
        let mut reader = MockClaimsReader::new();
        reader.expect_get_cumulative_claimed().times(0);

        let lifetime = view(&[(0xa, 1000)]);
        let result = select_rewards(ClaimType::All, lifetime.clone(), token(0xe), &reader)
            .await
            .unwrap();
        assert_eq!(result, lifetime);
    }

    #[tokio::test]
    async fn test_claimed_null_is_zero() {
        let mut reader = MockClaimsReader::new();
        reader
            .expect_get_cumulative_claimed()
            .with(eq(token(0xe)), eq(token(0xa)))
            .times(1)
            .returning(|_, _| Ok(Some(BigUint::from(300u32))));
        reader
            .expect_get_cumulative_claimed()
            .with(eq(token(0xe)), eq(token(0xb)))
            .times(1)
            .returning(|_, _| Ok(None));

        let lifetime = view(&[(0xa, 1000), (0xb, 500)]);
        let claimed = select_rewards(ClaimType::Claimed, lifetime, token(0xe), &reader)
            .await
            .unwrap();
        assert_eq!(claimed, view(&[(0xa, 300), (0xb, 0)]));
    }

    #[tokio::test]
    async fn test_claims_lookup_fails_fast() {
        let mut reader = MockClaimsReader::new();
        reader
            .expect_get_cumulative_claimed()
            .times(1)
            .returning(|_, _| Err(RewardsError::rpc("cumulativeClaimed", "connection refused")));

        let lifetime = view(&[(0xa, 1000), (0xb, 500)]);
        let err = select_rewards(ClaimType::Unclaimed, lifetime, token(0xe), &reader)
            .await
            .unwrap_err();
        assert!(matches!(err, RewardsError::Rpc { call: "cumulativeClaimed", .. }));
    }

    #[test]
    fn test_lookup_missing_earner() {
        let mut distribution = Distribution::new();
        distribution
            .insert(token(0xe), token(0xa), BigUint::from(1u32))
            .unwrap();

        let found = lookup_earner_allocations(&distribution, token(0xe)).unwrap();
        assert_eq!(found, view(&[(0xa, 1)]));

        let err = lookup_earner_allocations(&distribution, token(0xf)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_latest_root() {
        let mut reader = MockDistributionRootReader::new();
        reader
            .expect_curr_rewards_calculation_end_timestamp()
            .returning(|| Ok(1_718_668_800));
        reader
            .expect_get_distribution_roots_length()
            .returning(|| Ok(42));
        reader.expect_get_current_claimable_distribution_root().times(0);

        let root = resolve_claim_date(ClaimTimestamp::Latest, &reader)
            .await
            .unwrap();
        assert_eq!(
            root,
            ClaimRoot {
                date: "2024-06-18".to_string(),
                index: 41
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_latest_without_roots() {
        let mut reader = MockDistributionRootReader::new();
        reader
            .expect_curr_rewards_calculation_end_timestamp()
            .returning(|| Ok(0));

        let err = resolve_claim_date(ClaimTimestamp::Latest, &reader)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RewardsError::NoDistributionRoot(ClaimTimestamp::Latest)
        ));
    }

    #[tokio::test]
    async fn test_resolve_latest_active_root() {
        let root_hash = [7u8; 32];
        let mut reader = MockDistributionRootReader::new();
        reader
            .expect_get_current_claimable_distribution_root()
            .returning(move || {
                Ok(DistributionRoot {
                    root: root_hash,
                    rewards_calculation_end_timestamp: 1_718_582_400,
                    activated_at: 1_718_700_000,
                    disabled: false,
                })
            });
        reader
            .expect_get_root_index_from_hash()
            .with(eq(root_hash))
            .returning(|_| Ok(40));
        reader.expect_curr_rewards_calculation_end_timestamp().times(0);

        let root = resolve_claim_date(ClaimTimestamp::LatestActive, &reader)
            .await
            .unwrap();
        assert_eq!(root.date, "2024-06-17");
        assert_eq!(root.index, 40);
    }

    #[tokio::test]
    async fn test_resolve_latest_active_without_roots() {
        let mut reader = MockDistributionRootReader::new();
        reader
            .expect_get_current_claimable_distribution_root()
            .returning(|| {
                Ok(DistributionRoot {
                    root: [0u8; 32],
                    rewards_calculation_end_timestamp: 0,
                    activated_at: 0,
                    disabled: false,
                })
            });

        let err = resolve_claim_date(ClaimTimestamp::LatestActive, &reader)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RewardsError::NoDistributionRoot(ClaimTimestamp::LatestActive)
        ));
    }
}
