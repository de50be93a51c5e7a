//! Winter's Blizzard protocol issues several WAL liquid staking tokens. Each token is
//! registered with its own staking object, and only some allow instant burns.

use async_trait::async_trait;
use nemo_common::models::{
    coin::{CoinConfig, Provider},
    ptb::{Argument, CallSequence},
};

use super::{lookup, wrapped_type, ProviderStrategy, StrategyContext, BURN, MINT};
use crate::{
    builder::{CallSequenceExt, MoveTarget},
    errors::PtbError,
};

pub(super) struct Winter;

#[async_trait]
impl ProviderStrategy for Winter {
    fn provider(&self) -> Provider {
        Provider::Winter
    }

    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        _amount: u64,
    ) -> Result<Argument, PtbError> {
        let winter = &ctx.deployment.winter;
        let coin_type = wrapped_type(MINT, config)?;
        let lst = lookup(MINT, Provider::Winter, &winter.lsts, coin_type)?;
        let call = seq
            .move_call(
                MoveTarget::new(winter.package, "blizzard_protocol", "mint"),
                vec![coin_type.to_string()],
            )
            .shared("staking", lst.staking)
            .shared("walrus_staking", winter.walrus_staking)
            .arg("wal", coin)
            .pure(MINT, "validator", &lst.validator)?
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
        let winter = &ctx.deployment.winter;
        let coin_type = wrapped_type(BURN, config)?;
        let lst = lookup(BURN, Provider::Winter, &winter.lsts, coin_type)?;
        if !lst.instant_redeem {
            return Err(PtbError::unsupported(
                BURN,
                Provider::Winter,
                coin_type,
                "token has no instant redemption path",
            ));
        }
        let call = seq
            .move_call(
                MoveTarget::new(winter.package, "blizzard_protocol", "burn_lst_instant"),
                vec![coin_type.to_string()],
            )
            .shared("staking", lst.staking)
            .shared("walrus_staking", winter.walrus_staking)
            .arg("lst", wrapped)
            .finish();
        Ok(call.result())
    }
}
