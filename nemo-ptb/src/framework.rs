//! Calls into the ledger's framework package and native coin commands.

use nemo_common::{
    models::ptb::{Argument, CallSequence, Command},
    Address, ObjectId,
};

use crate::{
    builder::{CallSequenceExt, MoveTarget},
    errors::PtbError,
};

pub const SUI_FRAMEWORK: Address = Address::from_low_u64(2);
pub const SUI_SYSTEM_STATE: ObjectId = Address::from_low_u64(5);
pub const CLOCK: ObjectId = Address::from_low_u64(6);
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

pub fn coin_value(seq: &mut CallSequence, coin_type: &str, coin: Argument) -> Argument {
    seq.move_call(MoveTarget::new(SUI_FRAMEWORK, "coin", "value"), vec![coin_type.to_string()])
        .arg("coin", coin)
        .finish()
        .result()
}

pub fn into_balance(seq: &mut CallSequence, coin_type: &str, coin: Argument) -> Argument {
    seq.move_call(MoveTarget::new(SUI_FRAMEWORK, "coin", "into_balance"), vec![coin_type.to_string()])
        .arg("coin", coin)
        .finish()
        .result()
}

pub fn from_balance(seq: &mut CallSequence, coin_type: &str, balance: Argument) -> Argument {
    seq.move_call(MoveTarget::new(SUI_FRAMEWORK, "coin", "from_balance"), vec![coin_type.to_string()])
        .arg("balance", balance)
        .finish()
        .result()
}

/// Moves `objects` to `recipient`.
pub fn transfer_objects(
    operation: &'static str,
    seq: &mut CallSequence,
    objects: Vec<Argument>,
    recipient: &Address,
) -> Result<(), PtbError> {
    if objects.is_empty() {
        return Ok(());
    }
    let recipient = seq
        .pure(recipient)
        .map_err(|source| PtbError::Encoding {
            operation,
            target: "TransferObjects".to_string(),
            argument: "recipient".to_string(),
            source,
        })?;
    seq.command(Command::TransferObjects(objects, recipient));
    Ok(())
}

/// Where the coin funding an operation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoinSource {
    /// Split from the gas coin. Only valid for the native coin.
    Gas,
    /// Owned coin objects of the required type; all are merged into the first.
    Owned(Vec<ObjectId>),
}

/// Produces a coin of exactly `amount` from `source`.
pub fn split_coin(
    operation: &'static str,
    seq: &mut CallSequence,
    source: &CoinSource,
    amount: u64,
) -> Result<Argument, PtbError> {
    let base = match source {
        CoinSource::Gas => Argument::GasCoin,
        CoinSource::Owned(ids) => {
            let (first, rest) = ids
                .split_first()
                .ok_or_else(|| PtbError::validation(operation, "no coin data provided"))?;
            let primary = seq.object(*first);
            let sources = rest
                .iter()
                .map(|id| seq.object(*id))
                .collect();
            merge_coins(seq, primary, sources)
        }
    };
    let amount = seq
        .pure(&amount)
        .map_err(|source| PtbError::Encoding {
            operation,
            target: "SplitCoins".to_string(),
            argument: "amount".to_string(),
            source,
        })?;
    Ok(match seq.command(Command::SplitCoins(base, vec![amount])) {
        Argument::Result(idx) => Argument::NestedResult(idx, 0),
        other => other,
    })
}

/// Merges `sources` into `primary` and returns `primary`.
pub fn merge_coins(seq: &mut CallSequence, primary: Argument, sources: Vec<Argument>) -> Argument {
    if !sources.is_empty() {
        seq.command(Command::MergeCoins(primary, sources));
    }
    primary
}
