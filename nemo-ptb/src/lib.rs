//! # Nemo PTB
//!
//! Builds Nemo programmable transaction blocks for yield tokenization markets on Sui.
//!
//! A market is described by a [`CoinConfig`](nemo_common::models::coin::CoinConfig);
//! provider and oracle objects come from a [`Deployment`](deployment::Deployment).
//! From those the crate assembles call sequences that mint or burn a provider's wrapped
//! coin, wrap it into SY, price it through the oracle and manage yield positions. Quotes
//! are obtained by dry-running a sequence through a
//! [`LedgerClient`](nemo_common::traits::LedgerClient) and decoding its return values.
pub mod builder;
pub mod decode;
pub mod deployment;
pub mod errors;
pub mod framework;
pub mod oracle;
pub mod position;
pub mod protocol;
pub mod providers;
pub mod queries;
pub mod rates;
pub mod simulation;
pub mod validate;

#[cfg(test)]
mod testing;

pub use builder::{CallResult, TraceOptions};
pub use errors::PtbError;
pub use simulation::DryRunSimulator;
