//! Shared models and collaborator traits for building Nemo call sequences.
//!
//! Everything in here is plain data or a narrow interface to something outside the
//! process (the ledger node, off-ledger rate feeds). The logic that turns a financial
//! operation into calls lives in `nemo-ptb`.

pub mod models;
pub mod traits;

pub use models::{Address, ObjectId, TypeTag};
