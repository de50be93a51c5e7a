use serde::{Deserialize, Serialize};

use crate::models::ObjectId;

/// A user's principal/yield position in one market.
///
/// Balances are base-unit integers carried as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyPosition {
    pub id: ObjectId,
    /// Unix milliseconds.
    pub maturity: u64,
    pub pt_balance: String,
    pub yt_balance: String,
    pub py_state_id: ObjectId,
}
