//! Dry-run quotes and executable plans built on top of the providers, the oracle and
//! the position lifecycle.
//!
//! Quotes build a sequence, simulate it through the [`LedgerClient`] and decode one
//! `u64` return value. Amounts are returned as base-unit strings; `value` fields are the
//! same amount scaled by the market's decimals for display.

use nemo_common::{
    models::{
        coin::{CoinConfig, ConfigField},
        normalize_type_tag,
        position::PyPosition,
        ptb::{Argument, CallSequence},
    },
    traits::{ExchangeRateSource, LedgerClient},
    Address, ObjectId,
};
use serde::Serialize;
use strum_macros::{Display, EnumString};
use tracing::{info, instrument};

use crate::{
    builder::{probe_u64, CallHandle, CallResult, TraceOptions},
    decode,
    deployment::Deployment,
    errors::PtbError,
    framework::{self, CoinSource},
    oracle,
    position,
    protocol::{self, router},
    providers::{self, StrategyContext},
    simulation::DryRunSimulator,
    validate::{parse_address, parse_amount, parse_positive_amount, require},
};

/// Collaborators shared by all queries.
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    pub deployment: &'a Deployment,
    pub client: &'a dyn LedgerClient,
    pub rates: Option<&'a dyn ExchangeRateSource>,
    /// Account the dry runs execute as.
    pub sender: Address,
    pub trace: TraceOptions,
}

impl<'a> QueryContext<'a> {
    pub fn new(deployment: &'a Deployment, client: &'a dyn LedgerClient, sender: Address) -> Self {
        Self { deployment, client, rates: None, sender, trace: TraceOptions::default() }
    }

    pub fn with_rates(mut self, rates: &'a dyn ExchangeRateSource) -> Self {
        self.rates = Some(rates);
        self
    }

    pub fn with_trace(mut self, trace: TraceOptions) -> Self {
        self.trace = trace;
        self
    }

    fn simulator(&self) -> DryRunSimulator<'a> {
        DryRunSimulator::new(self.client, self.sender)
    }

    fn strategies(&self) -> StrategyContext<'a> {
        StrategyContext { deployment: self.deployment, rates: self.rates }
    }
}

/// A decoded amount, raw and scaled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryQuote {
    /// Base units.
    pub amount: String,
    /// `amount / 10^decimal`.
    pub value: String,
}

impl QueryQuote {
    fn from_raw(operation: &'static str, raw: u64, decimals: u8) -> Result<Self, PtbError> {
        Ok(Self { amount: raw.to_string(), value: decode::scale_amount(operation, raw, decimals)? })
    }
}

/// Which coin a redemption pays out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, Serialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Receiving {
    /// The provider's underlying coin; the wrapped coin is burned in the same sequence.
    #[default]
    Underlying,
    /// The provider's wrapped coin, as held by the SY.
    Wrapped,
}

#[derive(Debug, Clone)]
pub struct YieldQuery<'q> {
    pub address: &'q str,
    pub yt_balance: &'q str,
    pub py_positions: &'q [PyPosition],
    pub receiving: Receiving,
    pub config: &'q CoinConfig,
}

const QUERY_YIELD: &str = "query_yield";
const QUERY_PT_VALUE: &str = "query_pt_value";
const QUERY_LP_OUT: &str = "query_lp_out";
const QUERY_ADD_LIQUIDITY_SINGLE_PT: &str = "query_add_liquidity_single_pt";
const QUERY_SY_OUT_FROM_BURN_LP: &str = "query_sy_out_from_burn_lp";
const QUERY_PRICE_VOUCHER: &str = "query_price_voucher";
const BUILD_MINT_SY: &str = "build_mint_sy";
const BUILD_REDEEM_SY: &str = "build_redeem_sy";

/// Claimable interest of a position, as the coin `receiving` selects.
#[instrument(skip_all, fields(provider = %query.config.provider, receiving = %query.receiving))]
pub async fn query_yield(
    ctx: &QueryContext<'_>,
    query: YieldQuery<'_>,
) -> Result<CallResult<QueryQuote>, PtbError> {
    let config = query.config;
    if parse_amount(QUERY_YIELD, "ytBalance", query.yt_balance)? == 0 {
        return Err(PtbError::validation(QUERY_YIELD, "no YT balance to claim"));
    }
    let owner = parse_address(QUERY_YIELD, "address", query.address)?;
    let payout_type = match query.receiving {
        Receiving::Underlying => require(QUERY_YIELD, config, ConfigField::UnderlyingCoinType)?,
        Receiving::Wrapped => require(QUERY_YIELD, config, ConfigField::CoinType)?,
    }
    .to_string();

    let mut seq = CallSequence::new();
    let position = position::init_or_reuse(QUERY_YIELD, &mut seq, config, query.py_positions)?;
    let voucher = oracle::resolve_price_voucher(ctx.deployment, &mut seq, config)?;
    let sy = protocol::redeem_due_interest(QUERY_YIELD, &mut seq, config, position.argument, voucher.argument)?;
    let mut coin = protocol::sy_redeem(QUERY_YIELD, &mut seq, config, sy)?;
    if query.receiving == Receiving::Underlying {
        coin = providers::burn(&ctx.strategies(), &mut seq, config, coin, TraceOptions::default())
            .await?
            .value;
    }
    let value_index = seq.len();
    framework::coin_value(&mut seq, &payout_type, coin);
    framework::transfer_objects(QUERY_YIELD, &mut seq, vec![coin], &owner)?;
    position::finalize(QUERY_YIELD, &mut seq, &position, &owner)?;

    let (raw, outcome) = ctx
        .simulator()
        .run_u64(QUERY_YIELD, &seq, value_index)
        .await?;
    info!(raw, created_position = position.created, "Quoted claimable yield");
    let quote = QueryQuote::from_raw(QUERY_YIELD, raw, config.decimal)?;
    Ok(CallResult::traced(quote, ctx.trace, seq.descriptors(), Some(&outcome)))
}

/// SY received for selling `pt_amount` PT.
#[instrument(skip_all, fields(provider = %config.provider, pt_amount = %pt_amount))]
pub async fn query_pt_value(
    ctx: &QueryContext<'_>,
    config: &CoinConfig,
    pt_amount: &str,
) -> Result<CallResult<QueryQuote>, PtbError> {
    let amount = parse_positive_amount(QUERY_PT_VALUE, "ptAmount", pt_amount)?;
    voucher_quote(ctx, config, QUERY_PT_VALUE, |seq, voucher| {
        router::get_sy_amount_out_for_exact_pt_in_with_price_voucher(
            QUERY_PT_VALUE,
            seq,
            config,
            amount,
            voucher,
        )
    })
    .await
}

/// LP minted for adding `pt_value` PT and `sy_value` SY.
#[instrument(skip_all, fields(provider = %config.provider, pt_value = %pt_value, sy_value = %sy_value))]
pub async fn query_lp_out(
    ctx: &QueryContext<'_>,
    config: &CoinConfig,
    pt_value: &str,
    sy_value: &str,
) -> Result<CallResult<String>, PtbError> {
    let pt_value = parse_amount(QUERY_LP_OUT, "ptValue", pt_value)?;
    let sy_value = parse_amount(QUERY_LP_OUT, "syValue", sy_value)?;
    let result = probe_u64(&ctx.simulator(), QUERY_LP_OUT, ctx.trace, |seq| {
        router::get_lp_out_from_mint_lp(QUERY_LP_OUT, seq, config, pt_value, sy_value)
    })
    .await?;
    Ok(result.map(|lp| lp.to_string()))
}

/// LP minted for adding liquidity with `pt_amount` PT alone.
#[instrument(skip_all, fields(provider = %config.provider, pt_amount = %pt_amount))]
pub async fn query_add_liquidity_single_pt(
    ctx: &QueryContext<'_>,
    config: &CoinConfig,
    pt_amount: &str,
) -> Result<CallResult<QueryQuote>, PtbError> {
    let amount = parse_positive_amount(QUERY_ADD_LIQUIDITY_SINGLE_PT, "ptAmount", pt_amount)?;
    voucher_quote(ctx, config, QUERY_ADD_LIQUIDITY_SINGLE_PT, |seq, voucher| {
        router::get_lp_out_for_single_pt_in(QUERY_ADD_LIQUIDITY_SINGLE_PT, seq, config, amount, voucher)
    })
    .await
}

/// SY received for burning `lp_amount` LP.
#[instrument(skip_all, fields(provider = %config.provider, lp_amount = %lp_amount))]
pub async fn query_sy_out_from_burn_lp(
    ctx: &QueryContext<'_>,
    config: &CoinConfig,
    lp_amount: &str,
) -> Result<CallResult<QueryQuote>, PtbError> {
    let amount = parse_positive_amount(QUERY_SY_OUT_FROM_BURN_LP, "lpAmount", lp_amount)?;
    voucher_quote(ctx, config, QUERY_SY_OUT_FROM_BURN_LP, |seq, voucher| {
        router::get_sy_amount_out_for_burn_lp(QUERY_SY_OUT_FROM_BURN_LP, seq, config, amount, voucher)
    })
    .await
}

/// Current oracle rate of the market coin, as the raw 128 bit voucher value.
#[instrument(skip_all, fields(provider = %config.provider))]
pub async fn query_price_voucher(
    ctx: &QueryContext<'_>,
    config: &CoinConfig,
) -> Result<CallResult<String>, PtbError> {
    let mut seq = CallSequence::new();
    oracle::resolve_price_voucher(ctx.deployment, &mut seq, config)?;
    let simulator = ctx.simulator();
    let outcome = simulator
        .run(QUERY_PRICE_VOUCHER, &seq)
        .await?;
    // The voucher is a struct wrapping the rate, so its type tag is not `u128`.
    let (bytes, _) = simulator.return_value(QUERY_PRICE_VOUCHER, &seq, &outcome, 0, 0)?;
    let rate = decode::decode_u128(QUERY_PRICE_VOUCHER, bytes, None)?;
    Ok(CallResult::traced(rate.to_string(), ctx.trace, seq.descriptors(), Some(&outcome)))
}

async fn voucher_quote<F>(
    ctx: &QueryContext<'_>,
    config: &CoinConfig,
    operation: &'static str,
    quote: F,
) -> Result<CallResult<QueryQuote>, PtbError>
where
    F: FnOnce(&mut CallSequence, Argument) -> Result<CallHandle, PtbError>,
{
    let mut seq = CallSequence::new();
    let voucher = oracle::resolve_price_voucher(ctx.deployment, &mut seq, config)?;
    let handle = quote(&mut seq, voucher.argument)?;
    let (raw, outcome) = ctx
        .simulator()
        .run_u64(operation, &seq, handle.index())
        .await?;
    let quote = QueryQuote::from_raw(operation, raw, config.decimal)?;
    Ok(CallResult::traced(quote, ctx.trace, seq.descriptors(), Some(&outcome)))
}

/// Plan that mints SY from `amount` of the underlying coin and sends it to `owner`.
#[instrument(skip_all, fields(provider = %config.provider, amount = %amount))]
pub async fn build_mint_sy(
    ctx: &StrategyContext<'_>,
    config: &CoinConfig,
    source: &CoinSource,
    amount: &str,
    owner: &str,
) -> Result<CallSequence, PtbError> {
    let amount = parse_positive_amount(BUILD_MINT_SY, "amount", amount)?;
    let owner = parse_address(BUILD_MINT_SY, "address", owner)?;
    if *source == CoinSource::Gas &&
        normalize_type_tag(&config.underlying_coin_type) != normalize_type_tag(framework::SUI_COIN_TYPE)
    {
        return Err(PtbError::validation(
            BUILD_MINT_SY,
            format!("gas coin cannot fund {}", config.underlying_coin_type),
        ));
    }

    let mut seq = CallSequence::new();
    let coin = framework::split_coin(BUILD_MINT_SY, &mut seq, source, amount)?;
    let wrapped = providers::mint(ctx, &mut seq, config, coin, amount, TraceOptions::default())
        .await?
        .value;
    let sy = protocol::sy_deposit(BUILD_MINT_SY, &mut seq, config, wrapped)?;
    framework::transfer_objects(BUILD_MINT_SY, &mut seq, vec![sy], &owner)?;
    Ok(seq)
}

/// Plan that redeems `amount` SY from `sy_coins` and sends the payout to `owner`.
#[instrument(skip_all, fields(provider = %config.provider, amount = %amount, receiving = %receiving))]
pub async fn build_redeem_sy(
    ctx: &StrategyContext<'_>,
    config: &CoinConfig,
    sy_coins: &[ObjectId],
    amount: &str,
    receiving: Receiving,
    owner: &str,
) -> Result<CallSequence, PtbError> {
    let amount = parse_positive_amount(BUILD_REDEEM_SY, "amount", amount)?;
    let owner = parse_address(BUILD_REDEEM_SY, "address", owner)?;

    let mut seq = CallSequence::new();
    let sy = framework::split_coin(BUILD_REDEEM_SY, &mut seq, &CoinSource::Owned(sy_coins.to_vec()), amount)?;
    let mut coin = protocol::sy_redeem(BUILD_REDEEM_SY, &mut seq, config, sy)?;
    if receiving == Receiving::Underlying {
        coin = providers::burn(ctx, &mut seq, config, coin, TraceOptions::default())
            .await?
            .value;
    }
    framework::transfer_objects(BUILD_REDEEM_SY, &mut seq, vec![coin], &owner)?;
    Ok(seq)
}
