use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nemo_common::ObjectId;

use nemo_ptb::queries::Receiving;

/// Nemo PTB planner
///
/// Builds Nemo call sequences for a market and prints the resulting call trail as JSON.
/// Nothing is signed or submitted.
#[derive(Parser, PartialEq, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    global_args: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn args(&self) -> GlobalArgs {
        self.global_args.clone()
    }

    pub fn command(&self) -> Command {
        self.command.clone()
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Deployment YAML with provider package and object ids.
    #[clap(long, env = "NEMO_DEPLOYMENT")]
    pub deployment: PathBuf,

    /// JSON file holding the market's coin config.
    #[clap(long, env = "NEMO_COIN_CONFIG")]
    pub coin_config: PathBuf,

    /// Base url of the vault rate API. Only needed by providers whose deposit takes a
    /// minimum output.
    #[clap(long, env = "NEMO_RATES_URL")]
    pub rates_url: Option<String>,

    /// Enable debug logging. Ignored when RUST_LOG is set.
    #[clap(long)]
    pub verbose: bool,
}

#[derive(Subcommand, Clone, PartialEq, Debug)]
pub enum Command {
    /// Plans minting SY from the underlying coin.
    MintSy(MintSyArgs),
    /// Plans redeeming SY into the wrapped or underlying coin.
    RedeemSy(RedeemSyArgs),
    /// Prints the price voucher call for the market.
    Voucher,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MintSyArgs {
    /// Amount of the underlying coin, in base units.
    #[clap(long)]
    pub amount: String,

    /// Owned coin objects to pay with. Pays from the gas coin when omitted.
    #[clap(long = "coin", number_of_values = 1)]
    pub coins: Vec<ObjectId>,

    /// Receiver of the minted SY.
    #[clap(long)]
    pub recipient: String,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RedeemSyArgs {
    /// Amount of SY, in base units.
    #[clap(long)]
    pub amount: String,

    /// Owned SY coin objects.
    #[clap(long = "coin", number_of_values = 1, required = true)]
    pub coins: Vec<ObjectId>,

    /// Coin to receive: `underlying` or `wrapped`.
    #[clap(long, default_value = "underlying")]
    pub receiving: Receiving,

    /// Receiver of the redeemed coin.
    #[clap(long)]
    pub recipient: String,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_mint_sy() {
        let cli = Cli::try_parse_from([
            "nemo-ptb",
            "--deployment",
            "mainnet.yaml",
            "--coin-config",
            "market.json",
            "mint-sy",
            "--amount",
            "1000",
            "--coin",
            "0x51",
            "--coin",
            "0x52",
            "--recipient",
            "0xa11ce",
        ])
        .expect("parse");

        assert_eq!(cli.args().coin_config, PathBuf::from("market.json"));
        assert_eq!(cli.args().deployment, PathBuf::from("mainnet.yaml"));
        assert!(!cli.args().verbose);
        assert_eq!(
            cli.command(),
            Command::MintSy(MintSyArgs {
                amount: "1000".to_string(),
                coins: vec![ObjectId::from_low_u64(0x51), ObjectId::from_low_u64(0x52)],
                recipient: "0xa11ce".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_redeem_sy_defaults_to_underlying() {
        let cli = Cli::try_parse_from([
            "nemo-ptb",
            "--deployment",
            "mainnet.yaml",
            "--coin-config",
            "market.json",
            "--verbose",
            "redeem-sy",
            "--amount",
            "5",
            "--coin",
            "0x51",
            "--recipient",
            "0xa11ce",
        ])
        .expect("parse");

        assert!(cli.args().verbose);
        match cli.command() {
            Command::RedeemSy(args) => assert_eq!(args.receiving, Receiving::Underlying),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_deployment_is_required() {
        let result = Cli::try_parse_from([
            "nemo-ptb",
            "--coin-config",
            "market.json",
            "voucher",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_redeem_sy_requires_coins() {
        let result = Cli::try_parse_from([
            "nemo-ptb",
            "--deployment",
            "mainnet.yaml",
            "--coin-config",
            "market.json",
            "redeem-sy",
            "--amount",
            "5",
            "--recipient",
            "0xa11ce",
        ]);

        assert!(result.is_err());
    }
}
