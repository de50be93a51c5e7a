//! Strater's sBUCK savings vault. The vault works on balances, so coins are unwrapped
//! before and rewrapped after each vault call.

use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    ptb::{Argument, CallSequence},
};

use super::{coin_types, issued_type, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::{
    builder::{CallSequenceExt, MoveTarget},
    errors::PtbError,
    framework::{coin_value, from_balance, into_balance, CLOCK},
};

pub(super) struct Strater;

#[async_trait]
impl ProviderStrategy for Strater {
    fn provider(&self) -> Provider {
        Provider::Strater
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        let strater = &ctx.deployment.strater;
        let types = coin_types(MINT, config)?;
        issued_type(MINT, Provider::Strater, config, &strater.coin_type)?;

        let balance = into_balance(seq, types.underlying, coin);
        let shares = seq
            .move_call(MoveTarget::new(strater.package, "sbuck", "deposit"), vec![])
            .shared("vault", strater.vault)
            .arg("balance", balance)
            .shared_ref("clock", CLOCK)
            .finish();
        Ok(from_balance(seq, types.wrapped, shares.result()))
    }

    async fn burn(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        wrapped: Argument,
    ) -> Result<Argument, PtbError> {
        let strater = &ctx.deployment.strater;
        let types = coin_types(BURN, config)?;
        issued_type(BURN, Provider::Strater, config, &strater.coin_type)?;

        // Must be read before the coin is consumed into a balance.
        let share_amount = coin_value(seq, types.wrapped, wrapped);
        let shares = into_balance(seq, types.wrapped, wrapped);
        let balance = seq
            .move_call(MoveTarget::new(strater.package, "sbuck", "withdraw"), vec![])
            .shared("vault", strater.vault)
            .arg("shares", shares)
            .arg("amount", share_amount)
            .shared_ref("clock", CLOCK)
            .finish();
        Ok(from_balance(seq, types.underlying, balance.result()))
    }
}
