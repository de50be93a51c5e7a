//! Scallop lending: deposits mint a market coin, which is converted into the sCoin the
//! market wraps.

use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    ptb::{Argument, CallSequence},
};

use super::{coin_types, lookup, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::{
    builder::{CallSequenceExt, MoveTarget},
    errors::PtbError,
    framework::CLOCK,
};

pub(super) struct Scallop;

#[async_trait]
impl ProviderStrategy for Scallop {
    fn provider(&self) -> Provider {
        Provider::Scallop
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        let scallop = &ctx.deployment.scallop;
        let types = coin_types(MINT, config)?;
        let treasury = *lookup(MINT, Provider::Scallop, &scallop.treasuries, types.underlying)?;

        let market_coin = seq
            .move_call(
                MoveTarget::new(scallop.protocol_package, "mint", "mint"),
                vec![types.underlying.to_string()],
            )
            .shared_ref("version", scallop.version)
            .shared("market", scallop.market)
            .arg("coin", coin)
            .shared_ref("clock", CLOCK)
            .finish();
        let s_coin = seq
            .move_call(
                MoveTarget::new(scallop.converter_package, "s_coin_converter", "mint_s_coin"),
                vec![types.wrapped.to_string(), types.underlying.to_string()],
            )
            .shared("treasury", treasury)
            .arg("market_coin", market_coin.result())
            .finish();
        Ok(s_coin.result())
    }

    async fn burn(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        wrapped: Argument,
    ) -> Result<Argument, PtbError> {
        let scallop = &ctx.deployment.scallop;
        let types = coin_types(BURN, config)?;
        let treasury = *lookup(BURN, Provider::Scallop, &scallop.treasuries, types.underlying)?;

        let market_coin = seq
            .move_call(
                MoveTarget::new(scallop.converter_package, "s_coin_converter", "burn_s_coin"),
                vec![types.wrapped.to_string(), types.underlying.to_string()],
            )
            .shared("treasury", treasury)
            .arg("s_coin", wrapped)
            .finish();
        let coin = seq
            .move_call(
                MoveTarget::new(scallop.protocol_package, "redeem", "redeem"),
                vec![types.underlying.to_string()],
            )
            .shared_ref("version", scallop.version)
            .shared("market", scallop.market)
            .arg("market_coin", market_coin.result())
            .shared_ref("clock", CLOCK)
            .finish();
        Ok(coin.result())
    }
}
