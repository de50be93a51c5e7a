//! mStable meta vaults. Deposits take a minimum share output, derived from the vault's
//! current share price fetched off-ledger.

use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    error::RateSourceError,
    ptb::{Argument, CallSequence},
};
use tracing::debug;

use super::{coin_types, lookup, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::{
    builder::{CallSequenceExt, MoveTarget},
    errors::PtbError,
    framework::CLOCK,
};

const BPS_DENOMINATOR: u128 = 10_000;

pub(super) struct Mstable;

/// `shares` reduced by `slippage_bps`, rounded down.
pub(crate) fn min_amount_out(shares: u64, slippage_bps: u16) -> u64 {
    let kept = BPS_DENOMINATOR.saturating_sub(slippage_bps as u128);
    // kept <= 10_000, so the product fits and the quotient is at most `shares`.
    ((shares as u128 * kept) / BPS_DENOMINATOR) as u64
}

#[async_trait]
impl ProviderStrategy for Mstable {
    fn provider(&self) -> Provider {
        Provider::Mstable
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        amount: u64,
    ) -> Result<Argument, PtbError> {
        let mstable = &ctx.deployment.mstable;
        let types = coin_types(MINT, config)?;
        let vault = *lookup(MINT, Provider::Mstable, &mstable.vaults, types.wrapped)?;
        let rates = ctx.rates.ok_or_else(|| {
            PtbError::validation(MINT, "an exchange rate source is required to mint Mstable shares")
        })?;

        let ratio = rates
            .deposit_ratio(&vault, types.wrapped)
            .await
            .map_err(|source| PtbError::RateSource { operation: MINT, provider: Provider::Mstable, source })?;
        let shares = ratio.shares_for(amount).ok_or_else(|| PtbError::RateSource {
            operation: MINT,
            provider: Provider::Mstable,
            source: RateSourceError::InvalidRatio(format!(
                "{} assets / {} supply cannot price {amount}",
                ratio.total_assets, ratio.total_supply
            )),
        })?;
        let min_out = min_amount_out(shares, mstable.slippage_bps);
        debug!(shares, min_out, slippage_bps = mstable.slippage_bps, "Priced Mstable deposit");

        let call = seq
            .move_call(
                MoveTarget::new(mstable.package, "exchange", "deposit"),
                vec![types.underlying.to_string(), types.wrapped.to_string()],
            )
            .shared("vault", vault)
            .arg("coin", coin)
            .pure(MINT, "min_amount_out", &min_out)?
            .shared_ref("clock", CLOCK)
            .finish();
        Ok(call.result())
    }

    async fn burn(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        wrapped: Argument,
    ) -> Result<Argument, PtbError> {
        let mstable = &ctx.deployment.mstable;
        let types = coin_types(BURN, config)?;
        let vault = *lookup(BURN, Provider::Mstable, &mstable.vaults, types.wrapped)?;
        let call = seq
            .move_call(
                MoveTarget::new(mstable.package, "exchange", "withdraw"),
                vec![types.underlying.to_string(), types.wrapped.to_string()],
            )
            .shared("vault", vault)
            .arg("shares", wrapped)
            .shared_ref("clock", CLOCK)
            .finish();
        Ok(call.result())
    }
}

#[cfg(test)]
mod tests {
    use nemo_common::traits::{DepositRatio, MockExchangeRateSource};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::testing::{coin_config, test_deployment};

    #[rstest]
    #[case(1_000, 50, 995)]
    #[case(1_000, 0, 1_000)]
    #[case(999, 1, 998)]
    #[case(1_000, 10_000, 0)]
    #[case(1_000, u16::MAX, 0)]
    #[case(u64::MAX, 0, u64::MAX)]
    fn test_min_amount_out(#[case] shares: u64, #[case] bps: u16, #[case] expected: u64) {
        assert_eq!(min_amount_out(shares, bps), expected);
    }

    #[tokio::test]
    async fn test_mint_prices_deposit_with_rate_source() {
        let deployment = test_deployment();
        let config = coin_config(Provider::Mstable);
        let vault = *deployment
            .mstable
            .vaults
            .get(&config.coin_type)
            .unwrap();
        let mut rates = MockExchangeRateSource::new();
        rates
            .expect_deposit_ratio()
            .withf(move |v, _| *v == vault)
            .times(1)
            .returning(|_, _| Ok(DepositRatio::new(2_000, 1_000)));
        let ctx = StrategyContext::new(&deployment).with_rates(&rates);
        let mut seq = CallSequence::new();

        Mstable
            .mint(&ctx, &mut seq, &config, Argument::GasCoin, 10_000)
            .await
            .unwrap();

        // 10_000 assets at 2:1 is 5_000 shares, minus the configured slippage.
        let expected = min_amount_out(5_000, deployment.mstable.slippage_bps).to_string();
        assert_eq!(seq.descriptors()[0].argument("min_amount_out"), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_mint_without_rate_source_fails_before_append() {
        let deployment = test_deployment();
        let ctx = StrategyContext::new(&deployment);
        let config = coin_config(Provider::Mstable);
        let mut seq = CallSequence::new();

        let err = Mstable
            .mint(&ctx, &mut seq, &config, Argument::GasCoin, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, PtbError::Validation { .. }));
        assert!(seq.is_empty());
    }

    #[tokio::test]
    async fn test_rate_failure_is_reported_with_provider() {
        let deployment = test_deployment();
        let mut rates = MockExchangeRateSource::new();
        rates
            .expect_deposit_ratio()
            .returning(|_, _| Err(RateSourceError::Request("503".into())));
        let ctx = StrategyContext::new(&deployment).with_rates(&rates);
        let mut seq = CallSequence::new();

        let err = Mstable
            .mint(&ctx, &mut seq, &coin_config(Provider::Mstable), Argument::GasCoin, 10)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "mint: Mstable exchange rate unavailable: Rate request failed: 503");
        assert!(seq.is_empty());
    }
}
