use thiserror::Error;

#[derive(Error, Debug)]
pub enum AddressParseError {
    #[error("Address literal is empty")]
    Empty,

    #[error("Address literal {0} is longer than 32 bytes")]
    TooLong(String),

    #[error("Invalid hex in address literal {0}: {1}")]
    InvalidHex(String, #[source] hex::FromHexError),
}

/// Errors reported by the ledger node while serving a simulation request.
///
/// A simulation that ran but aborted is not a `LedgerError`; it comes back as a
/// `SimulationOutcome` carrying an `error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger transport error: {0}")]
    Transport(String),

    #[error("Ledger rejected the request: {0}")]
    Rejected(String),

    #[error("Failed to serialize call sequence: {0}")]
    Serialization(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateSourceError {
    #[error("Rate request failed: {0}")]
    Request(String),

    #[error("Failed to parse rate response: {0}")]
    Parse(String),

    #[error("Unusable deposit ratio: {0}")]
    InvalidRatio(String),
}

/// A handle inside a call sequence that does not point at anything resolvable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Command {command} references input {input} but only {available} inputs exist")]
    UnknownInput { command: usize, input: u16, available: usize },

    #[error("Command {command} references the result of command {result} which is not earlier in the sequence")]
    ForwardResult { command: usize, result: u16 },

    #[error("Sequence has {count} inputs, a transaction block allows at most {limit}")]
    InputLimit { count: usize, limit: usize },

    #[error("Sequence has {count} commands, a transaction block allows at most {limit}")]
    CommandLimit { count: usize, limit: usize },
}
