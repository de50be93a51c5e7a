use std::fs;

use anyhow::{anyhow, Context};
use clap::Parser;
use nemo_common::{
    models::{coin::CoinConfig, descriptor::CallDescriptor, ptb::CallSequence},
    traits::ExchangeRateSource,
};
use nemo_ptb::{
    deployment::Deployment,
    framework::CoinSource,
    oracle::resolve_price_voucher,
    providers::StrategyContext,
    queries::{build_mint_sy, build_redeem_sy},
    rates::HttpRateSource,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, GlobalArgs};

mod cli;

/// What gets printed for a built sequence.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanSummary<'a> {
    inputs: usize,
    commands: usize,
    calls: &'a [CallDescriptor],
}

impl<'a> From<&'a CallSequence> for PlanSummary<'a> {
    fn from(seq: &'a CallSequence) -> Self {
        Self { inputs: seq.inputs().len(), commands: seq.len(), calls: seq.descriptors() }
    }
}

fn create_tracing_subscriber(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_target(false)
        .compact();
    tracing_subscriber::fmt()
        .event_format(format)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_deployment(args: &GlobalArgs) -> anyhow::Result<Deployment> {
    Deployment::from_yaml_file(&args.deployment)
        .with_context(|| format!("loading deployment {}", args.deployment.display()))
}

fn load_coin_config(args: &GlobalArgs) -> anyhow::Result<CoinConfig> {
    let raw = fs::read_to_string(&args.coin_config)
        .with_context(|| format!("reading coin config {}", args.coin_config.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing coin config {}", args.coin_config.display()))
}

async fn run(global_args: GlobalArgs, command: Command) -> anyhow::Result<()> {
    let deployment = load_deployment(&global_args)?;
    let config = load_coin_config(&global_args)?;
    let rates = global_args
        .rates_url
        .as_deref()
        .map(HttpRateSource::new)
        .transpose()
        .map_err(|e| anyhow!(e))?;
    let mut ctx = StrategyContext::new(&deployment);
    if let Some(rates) = rates.as_ref() {
        ctx = ctx.with_rates(rates as &dyn ExchangeRateSource);
    }
    info!(provider = %config.provider, coin_type = %config.coin_type, "Planning");

    let seq = match command {
        Command::MintSy(args) => {
            let source = if args.coins.is_empty() {
                CoinSource::Gas
            } else {
                CoinSource::Owned(args.coins)
            };
            build_mint_sy(&ctx, &config, &source, &args.amount, &args.recipient).await?
        }
        Command::RedeemSy(args) => {
            build_redeem_sy(&ctx, &config, &args.coins, &args.amount, args.receiving, &args.recipient)
                .await?
        }
        Command::Voucher => {
            let mut seq = CallSequence::new();
            resolve_price_voucher(&deployment, &mut seq, &config)?;
            seq
        }
    };
    seq.validate_references()
        .map_err(|e| anyhow!(e))?;

    println!("{}", serde_json::to_string_pretty(&PlanSummary::from(&seq))?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli: Cli = Cli::parse();
    let global_args = cli.args();
    create_tracing_subscriber(global_args.verbose);
    run(global_args, cli.command()).await
}
