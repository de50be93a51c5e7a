//! Per-provider mint and burn of a market's wrapped coin.
//!
//! Every [`Provider`] maps to exactly one [`ProviderStrategy`]. Strategies resolve all
//! provider tables and required config fields before appending anything, so a rejected
//! operation leaves the sequence untouched.

use async_trait::async_trait;
use nemo_common::{
    models::{
        coin::{CoinConfig, ConfigField, Provider},
        normalize_type_tag,
        ptb::{Argument, CallSequence},
    },
    traits::ExchangeRateSource,
};
use tracing::{debug, instrument};

use crate::{
    builder::{CallResult, TraceOptions},
    deployment::{CoinTable, Deployment},
    errors::PtbError,
    validate::require,
};

mod aftermath;
mod alpha_fi;
mod haedal;
mod kai;
mod lst;
mod mstable;
mod scallop;
mod spring_sui;
mod strater;
mod volo;
mod winter;

pub(crate) const MINT: &str = "mint";
pub(crate) const BURN: &str = "burn";

/// Everything a strategy may consult besides the market config.
#[derive(Clone, Copy)]
pub struct StrategyContext<'a> {
    pub deployment: &'a Deployment,
    /// Needed only by providers whose deposit takes a caller-computed minimum output.
    pub rates: Option<&'a dyn ExchangeRateSource>,
}

impl<'a> StrategyContext<'a> {
    pub fn new(deployment: &'a Deployment) -> Self {
        Self { deployment, rates: None }
    }

    pub fn with_rates(mut self, rates: &'a dyn ExchangeRateSource) -> Self {
        self.rates = Some(rates);
        self
    }
}

#[async_trait]
pub trait ProviderStrategy: Send + Sync {
    fn provider(&self) -> Provider;

    /// Turns `coin` (of the underlying type, worth `amount`) into the wrapped coin.
    async fn mint(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        coin: Argument,
        amount: u64,
    ) -> Result<Argument, PtbError>;

    /// Turns a wrapped coin back into the underlying coin.
    async fn burn(
        &self,
        ctx: &StrategyContext<'_>,
        seq: &mut CallSequence,
        config: &CoinConfig,
        wrapped: Argument,
    ) -> Result<Argument, PtbError>;
}

pub fn strategy_for(provider: Provider) -> &'static dyn ProviderStrategy {
    match provider {
        Provider::Scallop => &scallop::Scallop,
        Provider::Strater => &strater::Strater,
        Provider::Aftermath => &aftermath::Aftermath,
        Provider::SpringSui => &spring_sui::SpringSui,
        Provider::Volo => &volo::Volo,
        Provider::Haedal => &haedal::Haedal,
        Provider::AlphaFi => &alpha_fi::AlphaFi,
        Provider::Mstable => &mstable::Mstable,
        Provider::Winter => &winter::Winter,
        Provider::Kai => &kai::Kai,
    }
}

/// Appends the calls minting `config.coin_type` from `coin`.
#[instrument(skip_all, fields(provider = %config.provider, coin_type = %config.coin_type, amount = amount))]
pub async fn mint(
    ctx: &StrategyContext<'_>,
    seq: &mut CallSequence,
    config: &CoinConfig,
    coin: Argument,
    amount: u64,
    trace: TraceOptions,
) -> Result<CallResult<Argument>, PtbError> {
    let start = seq.descriptors().len();
    let wrapped = strategy_for(config.provider)
        .mint(ctx, seq, config, coin, amount)
        .await?;
    debug!(calls = seq.descriptors().len() - start, "Built provider mint");
    Ok(CallResult::traced(wrapped, trace, &seq.descriptors()[start..], None))
}

/// Appends the calls burning a wrapped `config.coin_type` coin.
#[instrument(skip_all, fields(provider = %config.provider, coin_type = %config.coin_type))]
pub async fn burn(
    ctx: &StrategyContext<'_>,
    seq: &mut CallSequence,
    config: &CoinConfig,
    wrapped: Argument,
    trace: TraceOptions,
) -> Result<CallResult<Argument>, PtbError> {
    let start = seq.descriptors().len();
    let coin = strategy_for(config.provider)
        .burn(ctx, seq, config, wrapped)
        .await?;
    debug!(calls = seq.descriptors().len() - start, "Built provider burn");
    Ok(CallResult::traced(coin, trace, &seq.descriptors()[start..], None))
}

/// Resolves `coin_type` in a provider table.
pub(crate) fn lookup<'t, V>(
    operation: &'static str,
    provider: Provider,
    table: &'t CoinTable<V>,
    coin_type: &str,
) -> Result<&'t V, PtbError> {
    table.get(coin_type).ok_or_else(|| {
        PtbError::unsupported(operation, provider, coin_type, "coin type is not registered")
    })
}

/// The wrapped and underlying coin types of a market.
pub(crate) struct CoinTypes<'c> {
    pub wrapped: &'c str,
    pub underlying: &'c str,
}

pub(crate) fn coin_types<'c>(
    operation: &'static str,
    config: &'c CoinConfig,
) -> Result<CoinTypes<'c>, PtbError> {
    Ok(CoinTypes {
        wrapped: require(operation, config, ConfigField::CoinType)?,
        underlying: require(operation, config, ConfigField::UnderlyingCoinType)?,
    })
}

pub(crate) fn wrapped_type<'c>(operation: &'static str, config: &'c CoinConfig) -> Result<&'c str, PtbError> {
    require(operation, config, ConfigField::CoinType)
}

/// The market's wrapped coin, provided it is `issued`, the single coin `provider` mints.
pub(crate) fn issued_type<'c>(
    operation: &'static str,
    provider: Provider,
    config: &'c CoinConfig,
    issued: &str,
) -> Result<&'c str, PtbError> {
    let wrapped = wrapped_type(operation, config)?;
    if normalize_type_tag(wrapped) != normalize_type_tag(issued) {
        return Err(PtbError::unsupported(
            operation,
            provider,
            wrapped,
            format!("coin type is not issued by {provider}"),
        ));
    }
    Ok(wrapped)
}
