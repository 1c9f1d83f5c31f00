use log::{debug, info};
use std::io::Write;

use crate::config::ShowConfig;
use crate::coordinator::{ClaimsReader, DistributionRootReader};
use crate::error::Result;
use crate::output::{build_rows, emit};
use crate::proofs::ProofDataFetcher;
use crate::rewards::{lookup_earner_allocations, resolve_claim_date, select_rewards, RewardsView};
use crate::tokens::TokenNameResolver;

/// Collaborators a `show` run talks to.
pub struct ShowContext<'a, R: ?Sized, C: ?Sized, F: ?Sized, T: ?Sized> {
    pub roots: &'a R,
    pub claims: &'a C,
    pub fetcher: &'a F,
    pub names: &'a T,
}

/// Resolves the rewards view the config asks for without printing anything.
pub async fn compute_rewards<R, C, F, T>(
    config: &ShowConfig,
    ctx: &ShowContext<'_, R, C, F, T>,
) -> Result<RewardsView>
where
    R: DistributionRootReader + Sync + ?Sized,
    C: ClaimsReader + Sync + ?Sized,
    F: ProofDataFetcher + Sync + ?Sized,
    T: ?Sized,
{
    let root = resolve_claim_date(config.claim_timestamp, ctx.roots).await?;

    let distribution = ctx.fetcher.fetch_claim_amounts_for_date(&root.date).await?;
    let lifetime = lookup_earner_allocations(&distribution, config.earner_address)?;
    debug!(
        "Earner {:?} has lifetime rewards in {} tokens",
        config.earner_address,
        lifetime.len()
    );

    select_rewards(config.claim_type, lifetime, config.earner_address, ctx.claims).await
}

/// Runs the `show` command end to end. Nothing is written to `out` unless
/// every step succeeds.
pub async fn show_rewards<R, C, F, T, W>(
    config: &ShowConfig,
    ctx: &ShowContext<'_, R, C, F, T>,
    out: &mut W,
) -> Result<()>
where
    R: DistributionRootReader + Sync + ?Sized,
    C: ClaimsReader + Sync + ?Sized,
    F: ProofDataFetcher + Sync + ?Sized,
    T: TokenNameResolver + Sync + ?Sized,
    W: Write,
{
    let rewards = compute_rewards(config, ctx).await?;
    info!(
        "Showing {} rewards for {} tokens",
        config.claim_type,
        rewards.len()
    );

    let rows = build_rows(&rewards, ctx.names).await;
    emit(config, &rows, out)
}
