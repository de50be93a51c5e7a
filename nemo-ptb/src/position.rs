use nemo_common::{
    models::{
        coin::{CoinConfig, ConfigField},
        normalize_type_tag,
        position::PyPosition,
        ptb::{Argument, CallSequence},
    },
    Address, ObjectId,
};
use tracing::debug;

use crate::{errors::PtbError, framework, protocol, validate::require_id};

/// The position a sequence operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionHandle {
    pub argument: Argument,
    /// Whether the position is created by this sequence. A created position must be handed
    /// to its owner with [`finalize`] before the sequence ends.
    pub created: bool,
    /// Id of the reused position. `None` for a created one, whose id is only known after
    /// execution.
    pub position_id: Option<ObjectId>,
}

/// Reuses the first of `existing` or appends the call creating a new position.
///
/// Only the first position is used; callers holding several must merge them beforehand.
pub fn init_or_reuse(
    operation: &'static str,
    seq: &mut CallSequence,
    config: &CoinConfig,
    existing: &[PyPosition],
) -> Result<PositionHandle, PtbError> {
    match existing.first() {
        Some(position) => {
            debug!(position = %position.id, "Reusing py position");
            Ok(PositionHandle {
                argument: seq.object(position.id),
                created: false,
                position_id: Some(position.id),
            })
        }
        None => {
            let argument = protocol::init_py_position(operation, seq, config)?;
            debug!("Creating py position");
            Ok(PositionHandle { argument, created: true, position_id: None })
        }
    }
}

/// Hands a position created by this sequence to `owner`. No-op for reused positions.
pub fn finalize(
    operation: &'static str,
    seq: &mut CallSequence,
    handle: &PositionHandle,
    owner: &Address,
) -> Result<(), PtbError> {
    if handle.created {
        framework::transfer_objects(operation, seq, vec![handle.argument], owner)?;
    }
    Ok(())
}

/// Owned positions belonging to the market described by `config`.
///
/// `position_types` are the move types of position objects to consider; at least one is
/// required.
pub fn select_positions(
    operation: &'static str,
    owned: &[(String, PyPosition)],
    config: &CoinConfig,
    position_types: &[String],
) -> Result<Vec<PyPosition>, PtbError> {
    if position_types.is_empty() {
        return Err(PtbError::validation(operation, "`positionTypes` must not be empty"));
    }
    let py_state = require_id(operation, config, ConfigField::PyStateId)?;
    let position_types: Vec<String> = position_types
        .iter()
        .map(|t| normalize_type_tag(t))
        .collect();
    Ok(owned
        .iter()
        .filter(|(object_type, _)| {
            position_types.contains(&normalize_type_tag(object_type))
        })
        .map(|(_, position)| position)
        .filter(|position| position.py_state_id == py_state && position.maturity == config.maturity)
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use nemo_common::models::{coin::Provider, ptb::Command};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{coin_config, CONTRACT};

    fn position(id: u64, config: &CoinConfig) -> PyPosition {
        PyPosition {
            id: ObjectId::from_low_u64(id),
            maturity: config.maturity,
            pt_balance: "100".to_string(),
            yt_balance: "100".to_string(),
            py_state_id: config.py_state_id.parse().unwrap(),
        }
    }

    #[test]
    fn test_empty_creates_position() {
        let config = coin_config(Provider::Volo);
        let mut seq = CallSequence::new();

        let handle = init_or_reuse("test", &mut seq, &config, &[]).unwrap();

        assert!(handle.created);
        assert_eq!(handle.position_id, None);
        assert_eq!(seq.len(), 1);
        assert!(seq.descriptors()[0]
            .target
            .ends_with("::py::init_py_position"));
    }

    #[test]
    fn test_existing_position_is_reused_without_calls() {
        let config = coin_config(Provider::Volo);
        let first = position(0xa1, &config);
        let second = position(0xa2, &config);
        let mut seq = CallSequence::new();

        let handle = init_or_reuse("test", &mut seq, &config, &[first.clone(), second]).unwrap();

        assert!(!handle.created);
        assert_eq!(handle.position_id, Some(first.id));
        assert!(seq.is_empty());
    }

    #[test]
    fn test_finalize_transfers_only_created_positions() {
        let config = coin_config(Provider::Volo);
        let owner = Address::from_low_u64(0xbb);

        let mut created_seq = CallSequence::new();
        let created = init_or_reuse("test", &mut created_seq, &config, &[]).unwrap();
        finalize("test", &mut created_seq, &created, &owner).unwrap();
        assert!(matches!(
            created_seq.commands().last(),
            Some(Command::TransferObjects(objects, _)) if objects == &vec![created.argument]
        ));

        let mut reused_seq = CallSequence::new();
        let reused = init_or_reuse("test", &mut reused_seq, &config, &[position(1, &config)]).unwrap();
        finalize("test", &mut reused_seq, &reused, &owner).unwrap();
        assert!(reused_seq.is_empty());
    }

    #[test]
    fn test_select_positions_filters_by_market() {
        let config = coin_config(Provider::Volo);
        let position_type = format!("{CONTRACT}::py_position::PyPosition");
        let mut other_maturity = position(2, &config);
        other_maturity.maturity += 1;
        let mut other_state = position(3, &config);
        other_state.py_state_id = ObjectId::from_low_u64(0xfff);
        let owned = vec![
            (position_type.clone(), position(1, &config)),
            (position_type.clone(), other_maturity),
            (position_type.clone(), other_state),
            ("0x2::coin::Coin<0x2::sui::SUI>".to_string(), position(4, &config)),
        ];

        let selected = select_positions("test", &owned, &config, &[position_type]).unwrap();

        assert_eq!(selected, vec![position(1, &config)]);
    }

    #[test]
    fn test_select_positions_requires_types() {
        let config = coin_config(Provider::Volo);

        let err = select_positions("redeem", &[], &config, &[]).unwrap_err();

        assert_eq!(err.to_string(), "redeem: `positionTypes` must not be empty");
    }
}
