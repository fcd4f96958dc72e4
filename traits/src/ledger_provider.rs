use crate::QueryError;
use crate::search::{LiveCell, Order, Pagination, SearchKey};
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, HeaderView, TransactionView},
    packed::{Byte32, OutPoint},
};

/// A committed (or pending) transaction together with the block it landed in.
#[derive(Clone, Debug)]
pub struct TransactionWithStatus {
    /// The transaction itself.
    pub transaction: TransactionView,
    /// Hash of the block containing the transaction, `None` while it is still pending.
    pub block_hash: Option<Byte32>,
}

/// Read access to the ledger.
///
/// Every call is a blocking round trip. Answers are trusted as-is: the
/// assembler does no verification of its own.
pub trait LedgerProvider {
    /// Returns the header of the current tip block.
    fn get_tip_header(&self) -> Result<HeaderView, QueryError>;

    /// Looks up a header by block hash.
    fn get_header(&self, hash: &Byte32) -> Result<Option<HeaderView>, QueryError>;

    /// Looks up a transaction by hash.
    fn get_transaction(&self, hash: &Byte32) -> Result<Option<TransactionWithStatus>, QueryError>;

    /// Returns one page of live cells matching `search_key`.
    ///
    /// `after_cursor` is the `last_cursor` of the previous page, `None` for the
    /// first one. An empty page marks the end of the result set.
    fn get_cells(
        &self,
        search_key: &SearchKey,
        order: Order,
        limit: u32,
        after_cursor: Option<Bytes>,
    ) -> Result<Pagination<LiveCell>, QueryError>;

    /// Calculates the maximum capacity a deposited DAO cell yields when it is
    /// withdrawn in the block `withdrawing_block_hash`.
    fn calculate_dao_maximum_withdraw(
        &self,
        out_point: &OutPoint,
        withdrawing_block_hash: &Byte32,
    ) -> Result<Capacity, QueryError>;
}
