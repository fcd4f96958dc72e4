//! Simple UDT amounts.
//!
//! An sUDT cell stores its token amount as a 128-bit little-endian integer in
//! the first 16 bytes of its data. Anything after those bytes is ignored.

use crate::error::Error;
use ckb_types::bytes::Bytes;

/// Byte length of an encoded token amount.
pub const UDT_AMOUNT_LEN: usize = 16;

/// Encodes `amount` as sUDT cell data.
pub fn encode_amount(amount: u128) -> Bytes {
    Bytes::from(amount.to_le_bytes().to_vec())
}

/// Reads the token amount from sUDT cell data.
pub fn decode_amount(data: &[u8]) -> Result<u128, Error> {
    let bytes: [u8; UDT_AMOUNT_LEN] = data
        .get(..UDT_AMOUNT_LEN)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| {
            Error::EncodingFailure(format!(
                "sUDT data should hold at least {UDT_AMOUNT_LEN} bytes, got {}",
                data.len()
            ))
        })?;
    Ok(u128::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn amount_round_trip(amount in any::<u128>()) {
            prop_assert_eq!(decode_amount(&encode_amount(amount)).unwrap(), amount);
        }
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let mut data = encode_amount(1_000).to_vec();
        data.extend_from_slice(&[0xff; 4]);
        assert_eq!(decode_amount(&data).unwrap(), 1_000);
    }

    #[test]
    fn decode_short_data() {
        assert!(matches!(
            decode_amount(&[1u8; 15]),
            Err(Error::EncodingFailure(_))
        ));
        assert!(decode_amount(&[]).is_err());
    }

    #[test]
    fn encode_is_little_endian() {
        let data = encode_amount(0x0102);
        assert_eq!(&data[..2], &[0x02, 0x01]);
        assert!(data[2..].iter().all(|b| *b == 0));
    }
}
