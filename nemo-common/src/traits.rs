use async_trait::async_trait;

use crate::models::{
    error::{LedgerError, RateSourceError},
    ptb::CallSequence,
    simulation::SimulationOutcome,
    Address, ObjectId,
};

/// Narrow view of the ledger node: enough to dry-run a call sequence.
///
/// Implementations resolve object versions, serialize the sequence and call the node's
/// non-committing inspection endpoint. Timeouts are the implementation's concern; callers
/// simply await the outcome.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Executes `sequence` as `sender` without committing it.
    ///
    /// An aborted execution is reported through `SimulationOutcome::error`, not as `Err`.
    /// `Err` is reserved for failures to reach or talk to the node.
    async fn simulate(
        &self,
        sequence: &CallSequence,
        sender: &Address,
    ) -> Result<SimulationOutcome, LedgerError>;
}

/// Share price of a vault: how many shares a deposit of assets is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRatio {
    pub total_assets: u128,
    pub total_supply: u128,
}

impl DepositRatio {
    pub fn new(total_assets: u128, total_supply: u128) -> Self {
        Self { total_assets, total_supply }
    }

    /// Shares minted for `amount` assets, rounded down. `None` for an empty vault or on
    /// overflow.
    pub fn shares_for(&self, amount: u64) -> Option<u64> {
        if self.total_assets == 0 {
            return None;
        }
        let shares = (amount as u128)
            .checked_mul(self.total_supply)?
            / self.total_assets;
        u64::try_from(shares).ok()
    }
}

/// Off-ledger source of vault exchange rates, needed by providers whose deposit call
/// takes a caller-computed minimum output.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait ExchangeRateSource: Send + Sync {
    async fn deposit_ratio(
        &self,
        vault: &ObjectId,
        coin_type: &str,
    ) -> Result<DepositRatio, RateSourceError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::one_to_one(DepositRatio::new(100, 100), 1_000, Some(1_000))]
    #[case::appreciated_vault(DepositRatio::new(110, 100), 1_100, Some(1_000))]
    #[case::rounds_down(DepositRatio::new(3, 2), 10, Some(6))]
    #[case::empty_vault(DepositRatio::new(0, 0), 10, None)]
    fn test_shares_for(#[case] ratio: DepositRatio, #[case] amount: u64, #[case] expected: Option<u64>) {
        assert_eq!(ratio.shares_for(amount), expected);
    }
}
