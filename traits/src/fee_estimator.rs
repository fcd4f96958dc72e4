use crate::QueryError;
use ckb_types::core::TransactionView;

/// Prices a candidate transaction.
pub trait FeeEstimator {
    /// Returns the minimal fee, in shannons, `tx` must pay at `fee_rate`
    /// shannons per 1000 bytes.
    ///
    /// Called again every time the candidate grows, so it should be cheap.
    fn estimate_fee(&self, tx: &TransactionView, fee_rate: u64) -> Result<u64, QueryError>;
}
