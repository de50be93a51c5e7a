//! Liquid staking pools that keep one `LiquidStakingInfo` object per issued token.

use nemo_common::models::{
    coin::{CoinConfig, Provider},
    ptb::{Argument, CallSequence},
};

use super::{lookup, wrapped_type};
use crate::{
    builder::{CallSequenceExt, MoveTarget},
    deployment::LiquidStakingDeployment,
    errors::PtbError,
    framework::SUI_SYSTEM_STATE,
};

pub(super) fn mint(
    operation: &'static str,
    provider: Provider,
    deployment: &LiquidStakingDeployment,
    seq: &mut CallSequence,
    config: &CoinConfig,
    sui: Argument,
) -> Result<Argument, PtbError> {
    let coin_type = wrapped_type(operation, config)?;
    let lst_info = *lookup(operation, provider, &deployment.lst_infos, coin_type)?;
    let call = seq
        .move_call(
            MoveTarget::new(deployment.package, "liquid_staking", "mint"),
            vec![coin_type.to_string()],
        )
        .shared("lst_info", lst_info)
        .shared("system_state", SUI_SYSTEM_STATE)
        .arg("sui", sui)
        .finish();
    Ok(call.result())
}

pub(super) fn redeem(
    operation: &'static str,
    provider: Provider,
    deployment: &LiquidStakingDeployment,
    seq: &mut CallSequence,
    config: &CoinConfig,
    lst: Argument,
) -> Result<Argument, PtbError> {
    let coin_type = wrapped_type(operation, config)?;
    let lst_info = *lookup(operation, provider, &deployment.lst_infos, coin_type)?;
    let call = seq
        .move_call(
            MoveTarget::new(deployment.package, "liquid_staking", "redeem"),
            vec![coin_type.to_string()],
        )
        .shared("lst_info", lst_info)
        .arg("lst", lst)
        .shared("system_state", SUI_SYSTEM_STATE)
        .finish();
    Ok(call.result())
}
