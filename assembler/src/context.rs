use crate::error::Error;
use crate::iterator::LiveCellIterator;
use crate::scripts::SystemScripts;
use crate::skeleton::TxSkeleton;
use ckb_assembler_config::ChequeConfig;
use ckb_assembler_traits::{FeeEstimator, LedgerProvider, Order, SearchKey};
use ckb_types::core::Capacity;

/// What every flow of one construction call reads: the capabilities and the
/// resolved configuration.
pub struct AssemblyContext<'a, L, F> {
    pub ledger: &'a L,
    pub fee_estimator: &'a F,
    /// Shannons per 1000 bytes.
    pub fee_rate: u64,
    pub page_size: u32,
    pub scripts: &'a SystemScripts,
    pub cheque: &'a ChequeConfig,
}

// Manual impls, derive would require `L: Copy` and `F: Copy`.
impl<L, F> Clone for AssemblyContext<'_, L, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L, F> Copy for AssemblyContext<'_, L, F> {}

impl<'a, L: LedgerProvider, F: FeeEstimator> AssemblyContext<'a, L, F> {
    /// Minimal fee of the skeleton in its current shape.
    pub fn estimate_fee(&self, skeleton: &TxSkeleton) -> Result<Capacity, Error> {
        let fee = self
            .fee_estimator
            .estimate_fee(&skeleton.build(), self.fee_rate)?;
        Ok(Capacity::shannons(fee))
    }

    /// Walks the live cells matching `search_key`, oldest first.
    pub fn live_cells(&self, search_key: SearchKey) -> LiveCellIterator<'a, L> {
        LiveCellIterator::new(self.ledger, search_key, Order::Asc, self.page_size)
    }
}
