//! Capabilities consumed by the transaction assembler.
//!
//! The assembler never talks to a node directly. Everything it needs from the
//! outside world goes through the traits defined here, so callers can back
//! them with a JSON-RPC client, an embedded indexer or an in-memory fixture.
mod fee_estimator;
mod ledger_provider;
mod search;

pub use crate::fee_estimator::FeeEstimator;
pub use crate::ledger_provider::{LedgerProvider, TransactionWithStatus};
pub use crate::search::{
    LiveCell, Order, Pagination, ScriptSearchMode, ScriptType, SearchKey, SearchKeyFilter,
    script_starts_with,
};

/// Opaque failure reported by a capability.
pub type QueryError = anyhow::Error;
