//! Kai single-asset vaults. Withdrawals go through a ticket that is redeemed in the
//! same transaction.

use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    ptb::{Argument, CallSequence},
};

use super::{coin_types, lookup, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::{
    builder::{CallSequenceExt, MoveTarget},
    errors::PtbError,
    framework::{from_balance, into_balance, CLOCK},
};

pub(super) struct Kai;

#[async_trait]
impl ProviderStrategy for Kai {
    fn provider(&self) -> Provider {
        Provider::Kai
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        let kai = &ctx.deployment.kai;
        let types = coin_types(MINT, config)?;
        let vault = *lookup(MINT, Provider::Kai, &kai.vaults, types.wrapped)?;
        let type_arguments = vec![types.underlying.to_string(), types.wrapped.to_string()];

        let balance = into_balance(seq, types.underlying, coin);
        let shares = seq
            .move_call(MoveTarget::new(kai.package, "vault", "deposit"), type_arguments)
            .shared("vault", vault)
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
        let kai = &ctx.deployment.kai;
        let types = coin_types(BURN, config)?;
        let vault = *lookup(BURN, Provider::Kai, &kai.vaults, types.wrapped)?;
        let type_arguments = vec![types.underlying.to_string(), types.wrapped.to_string()];

        let shares = into_balance(seq, types.wrapped, wrapped);
        let ticket = seq
            .move_call(MoveTarget::new(kai.package, "vault", "withdraw"), type_arguments.clone())
            .shared("vault", vault)
            .arg("shares", shares)
            .shared_ref("clock", CLOCK)
            .finish();
        let balance = seq
            .move_call(MoveTarget::new(kai.package, "vault", "redeem_withdraw_ticket"), type_arguments)
            .shared("vault", vault)
            .arg("ticket", ticket.result())
            .finish();
        Ok(from_balance(seq, types.underlying, balance.result()))
    }
}
