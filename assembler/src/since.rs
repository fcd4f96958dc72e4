//! The `since` field of a cell input.
//!
//! ```text
//! bit 63      relative flag
//! bit 62..61  metric: 00 block number, 01 epoch, 10 timestamp
//! bit 60..56  reserved
//! bit 55..0   value
//! ```

use ckb_types::core::{BlockNumber, EpochNumberWithFraction};

const FLAG_SINCE_RELATIVE: u64 =
    0b1000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000;
const FLAG_SINCE_BLOCK_NUMBER: u64 =
    0b000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000;
const FLAG_SINCE_EPOCH_NUMBER: u64 =
    0b010_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000;
const FLAG_SINCE_TIMESTAMP: u64 =
    0b100_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000_0000;
const VALUE_MASK: u64 = 0x00ff_ffff_ffff_ffff;

/// What a since value counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinceMetric {
    /// Block number.
    BlockNumber,
    /// Epoch number with fraction.
    Epoch,
    /// Median timestamp, in seconds.
    Timestamp,
}

/// A decoded since value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Since(u64);

impl Since {
    /// No time lock.
    pub const fn zero() -> Self {
        Since(0)
    }

    /// Wraps a raw since value.
    pub const fn from_raw(raw: u64) -> Self {
        Since(raw)
    }

    /// The raw value stored in `CellInput::since`.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Unlocks once the chain reaches `epoch`.
    pub fn absolute_epoch(epoch: EpochNumberWithFraction) -> Self {
        Since(FLAG_SINCE_EPOCH_NUMBER | (epoch.full_value() & VALUE_MASK))
    }

    /// Unlocks `epoch` after the input cell was committed.
    pub fn relative_epoch(epoch: EpochNumberWithFraction) -> Self {
        Since(FLAG_SINCE_RELATIVE | FLAG_SINCE_EPOCH_NUMBER | (epoch.full_value() & VALUE_MASK))
    }

    /// Unlocks once the chain reaches block `number`.
    pub fn absolute_block_number(number: BlockNumber) -> Self {
        Since(FLAG_SINCE_BLOCK_NUMBER | (number & VALUE_MASK))
    }

    /// Unlocks `blocks` blocks after the input cell was committed.
    pub fn relative_block_number(blocks: BlockNumber) -> Self {
        Since(FLAG_SINCE_RELATIVE | FLAG_SINCE_BLOCK_NUMBER | (blocks & VALUE_MASK))
    }

    /// Unlocks once the median time passes `timestamp` seconds.
    pub fn absolute_timestamp(timestamp: u64) -> Self {
        Since(FLAG_SINCE_TIMESTAMP | (timestamp & VALUE_MASK))
    }

    /// Unlocks `seconds` after the input cell was committed.
    pub fn relative_timestamp(seconds: u64) -> Self {
        Since(FLAG_SINCE_RELATIVE | FLAG_SINCE_TIMESTAMP | (seconds & VALUE_MASK))
    }

    /// Whether the value is measured from the input's commit point.
    pub fn is_relative(self) -> bool {
        self.0 & FLAG_SINCE_RELATIVE != 0
    }

    /// The metric, `None` for the reserved `11` encoding.
    pub fn metric(self) -> Option<SinceMetric> {
        match (self.0 >> 61) & 0b11 {
            0b00 => Some(SinceMetric::BlockNumber),
            0b01 => Some(SinceMetric::Epoch),
            0b10 => Some(SinceMetric::Timestamp),
            _ => None,
        }
    }

    /// The 56-bit value part.
    pub fn value(self) -> u64 {
        self.0 & VALUE_MASK
    }

    /// The value as an epoch, if the metric is epoch.
    pub fn epoch(self) -> Option<EpochNumberWithFraction> {
        match self.metric() {
            Some(SinceMetric::Epoch) => {
                Some(EpochNumberWithFraction::from_full_value(self.value()))
            }
            _ => None,
        }
    }
}

impl From<Since> for u64 {
    fn from(since: Since) -> u64 {
        since.as_u64()
    }
}
