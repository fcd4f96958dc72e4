//! Serialized size based fee estimation.

use ckb_assembler_traits::{FeeEstimator, QueryError};
use ckb_types::{core::TransactionView, prelude::*};

/// Bytes a transaction takes in a block besides its own serialization: the
/// offset entry in the block's transaction vector.
pub const TX_OFFSET_SIZE: usize = 4;

const KB: u64 = 1000;

/// Serialized size of `tx` as it is counted for fees.
pub fn serialized_size(tx: &TransactionView) -> usize {
    tx.data().as_slice().len() + TX_OFFSET_SIZE
}

/// Charges `fee_rate` shannons per 1000 bytes, rounded up.
#[derive(Clone, Copy, Debug, Default)]
pub struct SizeFeeEstimator;

impl FeeEstimator for SizeFeeEstimator {
    fn estimate_fee(&self, tx: &TransactionView, fee_rate: u64) -> Result<u64, QueryError> {
        let size = serialized_size(tx) as u64;
        Ok(size.saturating_mul(fee_rate).div_ceil(KB))
    }
}
