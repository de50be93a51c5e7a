use nemo_common::models::{
    coin::Provider,
    descriptor::CallDescriptor,
    error::{LedgerError, RateSourceError},
    simulation::SimulationOutcome,
};
use thiserror::Error;

/// Everything needed to understand a failed dry run after the fact.
#[derive(Error, Debug)]
#[error(
    "{operation}: simulation failed: {message} (raw outcome: {outcome:?}, {} calls attempted)",
    .descriptors.len()
)]
pub struct SimulationFailure {
    pub operation: &'static str,
    pub message: String,
    pub outcome: SimulationOutcome,
    /// Descriptor trail of the simulated sequence, in append order.
    pub descriptors: Vec<CallDescriptor>,
}

/// Errors raised while building, simulating or decoding a call sequence.
///
/// None of these are retried internally: they either describe a caller mistake, a
/// protocol we cannot express, or a sequence the ledger refused to run.
#[derive(Error, Debug)]
pub enum PtbError {
    /// A required parameter is missing, empty or out of range. Raised before any call
    /// is built.
    #[error("{operation}: {message}")]
    Validation { operation: &'static str, message: String },

    /// No strategy or oracle branch exists for this provider / coin type combination.
    /// Raised during dispatch, before any call is appended.
    #[error("{operation}: {provider} does not support coin type {coin_type}: {reason}")]
    ProtocolUnsupported {
        operation: &'static str,
        provider: Provider,
        coin_type: String,
        reason: String,
    },

    #[error(transparent)]
    Simulation(Box<SimulationFailure>),

    /// A return buffer was present but not of the expected width or type.
    #[error("{operation}: failed to decode return value: {message}")]
    Decode { operation: &'static str, message: String },

    #[error("{operation}: ledger client failed: {source}")]
    Ledger {
        operation: &'static str,
        #[source]
        source: LedgerError,
    },

    #[error("{operation}: {provider} exchange rate unavailable: {source}")]
    RateSource {
        operation: &'static str,
        provider: Provider,
        #[source]
        source: RateSourceError,
    },

    #[error("{operation}: failed to encode argument `{argument}` of {target}: {source}")]
    Encoding {
        operation: &'static str,
        target: String,
        argument: String,
        #[source]
        source: bcs::Error,
    },
}

impl PtbError {
    pub fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        PtbError::Validation { operation, message: message.into() }
    }

    pub fn unsupported(
        operation: &'static str,
        provider: Provider,
        coin_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PtbError::ProtocolUnsupported {
            operation,
            provider,
            coin_type: coin_type.into(),
            reason: reason.into(),
        }
    }

    pub fn decode(operation: &'static str, message: impl Into<String>) -> Self {
        PtbError::Decode { operation, message: message.into() }
    }

    pub fn simulation(
        operation: &'static str,
        message: impl Into<String>,
        outcome: SimulationOutcome,
        descriptors: Vec<CallDescriptor>,
    ) -> Self {
        PtbError::Simulation(Box::new(SimulationFailure {
            operation,
            message: message.into(),
            outcome,
            descriptors,
        }))
    }

    /// The raw outcome of a failed simulation, if this error carries one.
    pub fn outcome(&self) -> Option<&SimulationOutcome> {
        match self {
            PtbError::Simulation(failure) => Some(&failure.outcome),
            _ => None,
        }
    }
}
