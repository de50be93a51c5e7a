use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    ptb::{Argument, CallSequence},
};

use super::{lst, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::errors::PtbError;

pub(super) struct SpringSui;

#[async_trait]
impl ProviderStrategy for SpringSui {
    fn provider(&self) -> Provider {
        Provider::SpringSui
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        lst::mint(MINT, Provider::SpringSui, &ctx.deployment.spring_sui, seq, config, coin)
    }

    async fn burn(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        wrapped: Argument,
    ) -> Result<Argument, PtbError> {
        lst::redeem(BURN, Provider::SpringSui, &ctx.deployment.spring_sui, seq, config, wrapped)
    }
}
