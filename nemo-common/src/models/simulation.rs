use serde::{Deserialize, Serialize};

use crate::models::TypeTag;

/// Values returned by one executed command: `(bcs bytes, move type)` per return slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallReturn {
    pub return_values: Vec<(Vec<u8>, TypeTag)>,
}

impl CallReturn {
    pub fn new(return_values: Vec<(Vec<u8>, TypeTag)>) -> Self {
        Self { return_values }
    }
}

/// Result of a non-committing execution of a call sequence, as reported by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOutcome {
    /// Abort or execution error reported by the ledger, if any.
    pub error: Option<String>,
    /// One entry per executed command, in sequence order.
    pub results: Vec<CallReturn>,
}

impl SimulationOutcome {
    pub fn success(results: Vec<CallReturn>) -> Self {
        Self { error: None, results }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self { error: Some(error.into()), results: Vec::new() }
    }

    /// Returns the buffer and type tag at `slot` of the command at `call_index`.
    pub fn return_value(&self, call_index: usize, slot: usize) -> Option<(&[u8], &str)> {
        self.results
            .get(call_index)?
            .return_values
            .get(slot)
            .map(|(bytes, tag)| (bytes.as_slice(), tag.as_str()))
    }
}
