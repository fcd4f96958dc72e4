//! Packed epoch points.
//!
//! An epoch point is stored in 8 big-endian bytes:
//!
//! ```text
//! byte 0      reserved, zero
//! byte 1..3   epoch length
//! byte 3..5   index within the epoch
//! byte 5..8   epoch number
//! ```
//!
//! Read as a `u64` this is exactly `EpochNumberWithFraction::full_value`.

use crate::error::Error;
use byteorder::{BigEndian, ByteOrder};
use ckb_types::core::{EpochNumber, EpochNumberWithFraction};

/// Largest epoch number the packed form holds.
pub const MAX_EPOCH_NUMBER: u64 = (1 << 24) - 1;

/// A point in chain time: `index / length` of the way through epoch `number`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Epoch {
    /// Blocks in the epoch.
    pub length: u16,
    /// Position within the epoch.
    pub index: u16,
    /// Epoch number, 24 bits.
    pub number: u32,
}

impl Epoch {
    /// Creates an epoch point, failing when `number` needs more than 24 bits.
    pub fn new(number: EpochNumber, index: u64, length: u64) -> Result<Self, Error> {
        if number > MAX_EPOCH_NUMBER {
            return Err(Error::EncodingFailure(format!(
                "epoch number {number} exceeds {MAX_EPOCH_NUMBER}"
            )));
        }
        let index = u16::try_from(index)
            .map_err(|_| Error::EncodingFailure(format!("epoch index {index} exceeds u16")))?;
        let length = u16::try_from(length)
            .map_err(|_| Error::EncodingFailure(format!("epoch length {length} exceeds u16")))?;
        Ok(Epoch {
            length,
            index,
            number: number as u32,
        })
    }

    /// Packs into the 8-byte big-endian form.
    pub fn compose(&self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        BigEndian::write_u16(&mut buf[1..3], self.length);
        BigEndian::write_u16(&mut buf[3..5], self.index);
        BigEndian::write_u24(&mut buf[5..8], self.number);
        buf
    }

    /// Unpacks the 8-byte big-endian form.
    pub fn resolve(data: &[u8]) -> Result<Self, Error> {
        if data.len() != 8 {
            return Err(Error::EncodingFailure(format!(
                "packed epoch must be 8 bytes, got {}",
                data.len()
            )));
        }
        Ok(Epoch {
            length: BigEndian::read_u16(&data[1..3]),
            index: BigEndian::read_u16(&data[3..5]),
            number: BigEndian::read_u24(&data[5..8]),
        })
    }

    /// The packed form as a number.
    pub fn full_value(&self) -> u64 {
        BigEndian::read_u64(&self.compose())
    }

    /// Epoch number.
    pub fn number(&self) -> EpochNumber {
        u64::from(self.number)
    }
}

impl From<EpochNumberWithFraction> for Epoch {
    fn from(epoch: EpochNumberWithFraction) -> Self {
        Epoch {
            length: epoch.length() as u16,
            index: epoch.index() as u16,
            number: epoch.number() as u32,
        }
    }
}

impl From<Epoch> for EpochNumberWithFraction {
    fn from(epoch: Epoch) -> Self {
        EpochNumberWithFraction::from_full_value(epoch.full_value())
    }
}
