//! Calls into the Nemo protocol package of a market. Package and object ids come from
//! the market's [`CoinConfig`].

use nemo_common::models::{
    coin::{CoinConfig, ConfigField},
    ptb::{Argument, CallSequence},
};

use crate::{
    builder::{CallHandle, CallSequenceExt, MoveTarget},
    errors::PtbError,
    framework::CLOCK,
    validate::{require, require_id},
};

fn target(
    operation: &'static str,
    config: &CoinConfig,
    module: &'static str,
    function: &'static str,
) -> Result<MoveTarget, PtbError> {
    Ok(MoveTarget::new(require_id(operation, config, ConfigField::ContractId)?, module, function))
}

fn sy_type(operation: &'static str, config: &CoinConfig) -> Result<String, PtbError> {
    require(operation, config, ConfigField::SyCoinType).map(str::to_string)
}

fn sy_pair(operation: &'static str, config: &CoinConfig) -> Result<Vec<String>, PtbError> {
    Ok(vec![
        require(operation, config, ConfigField::CoinType)?.to_string(),
        sy_type(operation, config)?,
    ])
}

/// Wraps a provider coin into the market's SY coin.
pub fn sy_deposit(
    operation: &'static str,
    seq: &mut CallSequence,
    config: &CoinConfig,
    coin: Argument,
) -> Result<Argument, PtbError> {
    let target = target(operation, config, "sy", "deposit")?;
    let type_arguments = sy_pair(operation, config)?;
    let version = require_id(operation, config, ConfigField::Version)?;
    let sy_state = require_id(operation, config, ConfigField::SyStateId)?;
    let call = seq
        .move_call(target, type_arguments)
        .shared("version", version)
        .arg("coin", coin)
        .shared("sy_state", sy_state)
        .finish();
    Ok(call.result())
}

/// Unwraps an SY coin back into the provider coin.
pub fn sy_redeem(
    operation: &'static str,
    seq: &mut CallSequence,
    config: &CoinConfig,
    sy_coin: Argument,
) -> Result<Argument, PtbError> {
    let target = target(operation, config, "sy", "redeem")?;
    let type_arguments = sy_pair(operation, config)?;
    let version = require_id(operation, config, ConfigField::Version)?;
    let sy_state = require_id(operation, config, ConfigField::SyStateId)?;
    let call = seq
        .move_call(target, type_arguments)
        .shared("version", version)
        .arg("sy_coin", sy_coin)
        .shared("sy_state", sy_state)
        .finish();
    Ok(call.result())
}

pub fn init_py_position(
    operation: &'static str,
    seq: &mut CallSequence,
    config: &CoinConfig,
) -> Result<Argument, PtbError> {
    let target = target(operation, config, "py", "init_py_position")?;
    let sy_type = sy_type(operation, config)?;
    let version = require_id(operation, config, ConfigField::Version)?;
    let py_state = require_id(operation, config, ConfigField::PyStateId)?;
    let call = seq
        .move_call(target, vec![sy_type])
        .shared("version", version)
        .shared("py_state", py_state)
        .shared_ref("clock", CLOCK)
        .finish();
    Ok(call.result())
}

/// Claims the interest accrued by a position's YT, paid out in SY.
pub fn redeem_due_interest(
    operation: &'static str,
    seq: &mut CallSequence,
    config: &CoinConfig,
    position: Argument,
    price_voucher: Argument,
) -> Result<Argument, PtbError> {
    let target = target(operation, config, "yield_factory", "redeem_due_interest")?;
    let sy_type = sy_type(operation, config)?;
    let version = require_id(operation, config, ConfigField::Version)?;
    let py_state = require_id(operation, config, ConfigField::PyStateId)?;
    let factory_config = require_id(operation, config, ConfigField::YieldFactoryConfigId)?;
    let call = seq
        .move_call(target, vec![sy_type])
        .shared("version", version)
        .arg("py_position", position)
        .shared("py_state", py_state)
        .arg("price_voucher", price_voucher)
        .shared_ref("yield_factory_config", factory_config)
        .shared_ref("clock", CLOCK)
        .finish();
    Ok(call.result())
}

/// Read-only router quotes. Each appends one call whose first return value is a `u64`.
pub mod router {
    use super::*;

    /// SY received for swapping an exact PT amount.
    pub fn get_sy_amount_out_for_exact_pt_in_with_price_voucher(
        operation: &'static str,
        seq: &mut CallSequence,
        config: &CoinConfig,
        pt_amount: u64,
        price_voucher: Argument,
    ) -> Result<CallHandle, PtbError> {
        market_quote(
            operation,
            seq,
            config,
            "get_sy_amount_out_for_exact_pt_in_with_price_voucher",
            ("exact_pt_in", pt_amount),
            price_voucher,
        )
    }

    /// LP minted for adding liquidity with a single PT amount.
    pub fn get_lp_out_for_single_pt_in(
        operation: &'static str,
        seq: &mut CallSequence,
        config: &CoinConfig,
        pt_amount: u64,
        price_voucher: Argument,
    ) -> Result<CallHandle, PtbError> {
        market_quote(
            operation,
            seq,
            config,
            "get_lp_out_for_single_pt_in",
            ("net_pt_in", pt_amount),
            price_voucher,
        )
    }

    /// SY received for burning LP.
    pub fn get_sy_amount_out_for_burn_lp(
        operation: &'static str,
        seq: &mut CallSequence,
        config: &CoinConfig,
        lp_amount: u64,
        price_voucher: Argument,
    ) -> Result<CallHandle, PtbError> {
        market_quote(
            operation,
            seq,
            config,
            "get_sy_amount_out_for_burn_lp",
            ("lp_amount", lp_amount),
            price_voucher,
        )
    }

    /// LP minted for depositing PT and SY at the given values. Needs no voucher.
    pub fn get_lp_out_from_mint_lp(
        operation: &'static str,
        seq: &mut CallSequence,
        config: &CoinConfig,
        pt_value: u64,
        sy_value: u64,
    ) -> Result<CallHandle, PtbError> {
        let target = target(operation, config, "router", "get_lp_out_from_mint_lp")?;
        let sy_type = sy_type(operation, config)?;
        let market_state = require_id(operation, config, ConfigField::MarketStateId)?;
        Ok(seq
            .move_call(target, vec![sy_type])
            .pure(operation, "pt_value", &pt_value)?
            .pure(operation, "sy_value", &sy_value)?
            .shared_ref("market_state", market_state)
            .finish())
    }

    fn market_quote(
        operation: &'static str,
        seq: &mut CallSequence,
        config: &CoinConfig,
        function: &'static str,
        (amount_name, amount): (&str, u64),
        price_voucher: Argument,
    ) -> Result<CallHandle, PtbError> {
        let target = target(operation, config, "router", function)?;
        let sy_type = sy_type(operation, config)?;
        let py_state = require_id(operation, config, ConfigField::PyStateId)?;
        let factory_config = require_id(operation, config, ConfigField::MarketFactoryConfigId)?;
        let market_state = require_id(operation, config, ConfigField::MarketStateId)?;
        Ok(seq
            .move_call(target, vec![sy_type])
            .pure(operation, amount_name, &amount)?
            .arg("price_voucher", price_voucher)
            .shared_ref("py_state", py_state)
            .shared_ref("market_factory_config", factory_config)
            .shared_ref("market_state", market_state)
            .shared_ref("clock", CLOCK)
            .finish())
    }
}
