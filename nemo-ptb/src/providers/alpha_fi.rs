use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    ptb::{Argument, CallSequence},
};

use super::{lst, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::errors::PtbError;

/// AlphaFi's stSUI pools run the same liquid staking contracts as SpringSui, deployed
/// under their own package.
pub(super) struct AlphaFi;

#[async_trait]
impl ProviderStrategy for AlphaFi {
    fn provider(&self) -> Provider {
        Provider::AlphaFi
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        lst::mint(MINT, Provider::AlphaFi, &ctx.deployment.alpha_fi, seq, config, coin)
    }

    async fn burn(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        wrapped: Argument,
    ) -> Result<Argument, PtbError> {
        lst::redeem(BURN, Provider::AlphaFi, &ctx.deployment.alpha_fi, seq, config, wrapped)
    }
}
