//! The error type of the assembler.

use ckb_assembler_traits::QueryError;
use ckb_types::core::CapacityResult;
use thiserror::Error;

/// Everything that can abort a construction call.
///
/// Whatever the variant, the transaction under construction is dropped: the
/// caller never sees a partially built transaction.
#[derive(Error, Debug)]
pub enum Error {
    /// A script or address the caller supplied is unusable for the flow.
    #[error("invalid address or script: {0}")]
    InvalidAddressOrScript(String),
    /// An amount is malformed or can't be used as requested.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The capacity cells ran out before inputs covered outputs and fee.
    #[error("insufficient capacity: {required} shannons required, {collected} collected")]
    InsufficientCapacity {
        /// Outputs plus fee at the moment the cells ran out.
        required: u128,
        /// Capacity of every input consumed so far.
        collected: u128,
    },
    /// The token cells ran out before the requested amount was collected.
    #[error("insufficient token: {required} required, {collected} collected")]
    InsufficientToken {
        /// The requested token amount.
        required: u128,
        /// Token amount of every token input consumed so far.
        collected: u128,
    },
    /// The fee is larger than an authoritative amount it has to be paid from.
    #[error("fee {fee} exceeds withdrawable amount {available}")]
    InsufficientForFee {
        /// The required fee.
        fee: u64,
        /// The amount the fee has to come from.
        available: u64,
    },
    /// No cell satisfies the request.
    #[error("no matching cell: {0}")]
    NoMatchingCell(String),
    /// The sender of a cheque cell can't be recovered from its creating transaction.
    #[error("sender lock of cheque cell {0} not found")]
    SenderLockNotFound(String),
    /// A point query answered "not found".
    #[error("{0} not found")]
    NotFound(String),
    /// The query capability failed.
    #[error("remote query failure: {0:#}")]
    RemoteQueryFailure(QueryError),
    /// Bytes can't be decoded into, or a value can't be encoded as, its binary form.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),
    /// Capacity arithmetic overflowed.
    #[error("capacity overflow")]
    CapacityOverflow,
}

impl From<QueryError> for Error {
    fn from(error: QueryError) -> Self {
        Error::RemoteQueryFailure(error)
    }
}

/// Maps a capacity arithmetic failure onto [`Error::CapacityOverflow`].
pub(crate) trait CapacityResultExt<T> {
    fn or_overflow(self) -> Result<T, Error>;
}

impl<T> CapacityResultExt<T> for CapacityResult<T> {
    fn or_overflow(self) -> Result<T, Error> {
        self.map_err(|_| Error::CapacityOverflow)
    }
}
