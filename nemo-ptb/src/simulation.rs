use nemo_common::{
    models::{ptb::CallSequence, simulation::SimulationOutcome},
    traits::LedgerClient,
    Address,
};
use tracing::{debug, instrument, warn};

use crate::{decode, errors::PtbError};

/// Dry-runs call sequences through a [`LedgerClient`] and turns the outcome into either
/// decodable return values or a [`PtbError::Simulation`].
#[derive(Clone, Copy)]
pub struct DryRunSimulator<'a> {
    client: &'a dyn LedgerClient,
    sender: Address,
}

impl<'a> DryRunSimulator<'a> {
    pub fn new(client: &'a dyn LedgerClient, sender: Address) -> Self {
        Self { client, sender }
    }

    /// Simulates `seq` and fails if the ledger reported an execution error. Sequences that
    /// could never form a transaction block are rejected without calling the ledger.
    #[instrument(skip(self, seq), fields(sender = %self.sender, calls = seq.len()))]
    pub async fn run(
        &self,
        operation: &'static str,
        seq: &CallSequence,
    ) -> Result<SimulationOutcome, PtbError> {
        seq.validate_references()
            .map_err(|e| PtbError::validation(operation, e.to_string()))?;
        let outcome = self
            .client
            .simulate(seq, &self.sender)
            .await
            .map_err(|source| PtbError::Ledger { operation, source })?;

        if let Some(error) = outcome.error.clone() {
            warn!(operation, %error, "Simulation reported an error");
            return Err(PtbError::simulation(
                operation,
                error,
                outcome,
                seq.descriptors().to_vec(),
            ));
        }
        debug!(operation, results = outcome.results.len(), "Simulation succeeded");
        Ok(outcome)
    }

    /// Looks up return value `slot` of call `call_index`. A missing or empty buffer is a
    /// simulation failure, not a decode failure.
    pub fn return_value<'o>(
        &self,
        operation: &'static str,
        seq: &CallSequence,
        outcome: &'o SimulationOutcome,
        call_index: usize,
        slot: usize,
    ) -> Result<(&'o [u8], &'o str), PtbError> {
        match outcome.return_value(call_index, slot) {
            Some((bytes, type_tag)) if !bytes.is_empty() => Ok((bytes, type_tag)),
            _ => Err(PtbError::simulation(
                operation,
                format!("missing return value at call {call_index}, slot {slot}"),
                outcome.clone(),
                seq.descriptors().to_vec(),
            )),
        }
    }

    /// Simulates and decodes the `u64` at `call_index`, slot 0.
    pub async fn run_u64(
        &self,
        operation: &'static str,
        seq: &CallSequence,
        call_index: usize,
    ) -> Result<(u64, SimulationOutcome), PtbError> {
        let outcome = self.run(operation, seq).await?;
        let (bytes, type_tag) = self.return_value(operation, seq, &outcome, call_index, 0)?;
        let value = decode::decode_u64(operation, bytes, Some(type_tag))?;
        Ok((value, outcome))
    }
}
