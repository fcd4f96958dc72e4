//! DAO interest and lock period arithmetic.

use super::epoch::Epoch;
use crate::error::{CapacityResultExt, Error};
use byteorder::{ByteOrder, LittleEndian};
use ckb_types::core::{Capacity, EpochNumberWithFraction};

// https://github.com/nervosnetwork/ckb-system-scripts/blob/1fd4cd3e2ab7e5ffbafce1f60119b95937b3c6eb/c/dao.c#L81
/// Deposits unlock in cycles of this many epochs.
pub const LOCK_PERIOD_EPOCHS: u64 = 180;

const DAO_FIELD_LEN: usize = 32;

/// Reads the accumulate rate out of a header's 32-byte dao field.
pub fn extract_ar(dao: &[u8]) -> Result<u64, Error> {
    if dao.len() != DAO_FIELD_LEN {
        return Err(Error::EncodingFailure(format!(
            "dao field must be {DAO_FIELD_LEN} bytes, got {}",
            dao.len()
        )));
    }
    Ok(LittleEndian::read_u64(&dao[8..16]))
}

/// Estimates the interest a deposit of `total` earns between two blocks.
///
/// Only the part above `occupied` accrues interest. The result is floored and
/// never negative.
pub fn compensation(
    total: Capacity,
    occupied: Capacity,
    deposit_ar: u64,
    withdraw_ar: u64,
) -> Result<Capacity, Error> {
    if deposit_ar == 0 {
        return Err(Error::EncodingFailure(
            "deposit accumulate rate is zero".to_owned(),
        ));
    }
    let free = u128::from(total.safe_sub(occupied).or_overflow()?.as_u64());
    let grown = free * u128::from(withdraw_ar) / u128::from(deposit_ar);
    let interest =
        u64::try_from(grown.saturating_sub(free)).map_err(|_| Error::CapacityOverflow)?;
    Ok(Capacity::shannons(interest))
}

/// Full epochs a deposit has been locked when it is withdrawn at `withdraw`,
/// counting a started epoch as a whole one.
pub fn deposited_epochs(
    deposit: EpochNumberWithFraction,
    withdraw: EpochNumberWithFraction,
) -> u64 {
    let mut epochs = withdraw.number().saturating_sub(deposit.number());
    if withdraw.index() * deposit.length() > deposit.index() * withdraw.length() {
        epochs += 1;
    }
    epochs
}

/// The earliest epoch at which a deposit made at `deposit` and withdrawn at
/// `withdraw` can be claimed.
///
/// Fails when the unlock epoch number no longer fits the packed epoch form.
pub fn minimal_unlock_epoch(
    deposit: EpochNumberWithFraction,
    withdraw: EpochNumberWithFraction,
) -> Result<EpochNumberWithFraction, Error> {
    let deposited = deposited_epochs(deposit, withdraw);
    let lock_epochs = deposited.div_ceil(LOCK_PERIOD_EPOCHS) * LOCK_PERIOD_EPOCHS;
    let unlock = Epoch::new(
        deposit.number() + lock_epochs,
        deposit.index(),
        deposit.length(),
    )?;
    Ok(unlock.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::epoch::MAX_EPOCH_NUMBER;
    use ckb_types::{core::capacity_bytes, h256};
    use proptest::prelude::*;

    #[test]
    fn extract_ar_from_header_dao() {
        let dao = h256!("0x8268d571c743a32ee1e547ea57872300989ceafa3e710000005d6a650b53ff06");
        assert_eq!(extract_ar(dao.as_bytes()).unwrap(), 10000435847357921);
    }

    #[test]
    fn extract_ar_rejects_short_field() {
        assert!(matches!(
            extract_ar(&[0u8; 16]),
            Err(Error::EncodingFailure(_))
        ));
    }

    #[test]
    fn no_interest_without_rate_growth() {
        let ar = 10_000_000_000_000_000;
        let comp = compensation(capacity_bytes!(1000), capacity_bytes!(102), ar, ar).unwrap();
        assert_eq!(comp, Capacity::zero());
    }

    #[test]
    fn interest_on_free_capacity_only() {
        // 898 free CKB at a 1% rate growth
        let comp = compensation(
            capacity_bytes!(1000),
            capacity_bytes!(102),
            10_000_000_000_000_000,
            10_100_000_000_000_000,
        )
        .unwrap();
        assert_eq!(comp, Capacity::shannons(898_000_000));
    }

    #[test]
    fn compensation_rejects_occupied_above_total() {
        assert!(matches!(
            compensation(capacity_bytes!(100), capacity_bytes!(102), 1, 1),
            Err(Error::CapacityOverflow)
        ));
    }

    #[test]
    fn unlock_rounds_up_to_lock_period() {
        let deposit = EpochNumberWithFraction::new(5, 100, 1000);
        let withdraw = EpochNumberWithFraction::new(100, 50, 1000);
        assert_eq!(deposited_epochs(deposit, withdraw), 95);
        assert_eq!(
            minimal_unlock_epoch(deposit, withdraw).unwrap(),
            EpochNumberWithFraction::new(185, 100, 1000)
        );

        // a started epoch counts in full
        let withdraw = EpochNumberWithFraction::new(185, 101, 1000);
        assert_eq!(deposited_epochs(deposit, withdraw), 181);
        assert_eq!(
            minimal_unlock_epoch(deposit, withdraw).unwrap(),
            EpochNumberWithFraction::new(365, 100, 1000)
        );
    }

    #[test]
    fn fraction_compared_across_lengths() {
        // 1/4 of the way vs 300/1000 of the way
        let deposit = EpochNumberWithFraction::new(10, 1, 4);
        let withdraw = EpochNumberWithFraction::new(20, 300, 1000);
        assert_eq!(deposited_epochs(deposit, withdraw), 11);
        let withdraw = EpochNumberWithFraction::new(20, 250, 1000);
        assert_eq!(deposited_epochs(deposit, withdraw), 10);
    }

    #[test]
    fn unlock_beyond_packed_epoch_range() {
        let deposit = EpochNumberWithFraction::new(MAX_EPOCH_NUMBER - 10, 0, 1800);
        let withdraw = EpochNumberWithFraction::new(MAX_EPOCH_NUMBER - 5, 0, 1800);
        assert!(matches!(
            minimal_unlock_epoch(deposit, withdraw),
            Err(Error::EncodingFailure(_))
        ));
    }

    proptest! {
        #[test]
        fn compensation_grows_with_rate(
            free in 1u64..1_000_000_000_000_000,
            deposit_ar in 10_000_000_000_000_000u64..20_000_000_000_000_000,
            extra in 0u64..1_000_000_000,
        ) {
            let occupied = capacity_bytes!(61);
            let total = occupied.safe_add(Capacity::shannons(free)).unwrap();
            let same = compensation(total, occupied, deposit_ar, deposit_ar).unwrap();
            prop_assert_eq!(same, Capacity::zero());

            // free * growth >= deposit_ar, so at least one shannon accrues
            let growth = deposit_ar.div_ceil(free) + extra;
            let grown = compensation(total, occupied, deposit_ar, deposit_ar + growth).unwrap();
            prop_assert!(grown > Capacity::zero());
            let faster = deposit_ar + growth + 1;
            let more = compensation(total, occupied, deposit_ar, faster).unwrap();
            prop_assert!(more >= grown);
        }

        #[test]
        fn unlock_is_a_whole_cycle_after_deposit(
            d_number in 0u64..10_000,
            d_index in 0u64..1800,
            w_gap in 0u64..2000,
            w_index in 0u64..1800,
        ) {
            let deposit = EpochNumberWithFraction::new(d_number, d_index, 1800);
            let withdraw = EpochNumberWithFraction::new(d_number + w_gap, w_index, 1800);
            let unlock = minimal_unlock_epoch(deposit, withdraw).unwrap();
            let lock = unlock.number() - deposit.number();
            prop_assert_eq!(lock % LOCK_PERIOD_EPOCHS, 0);
            prop_assert!(lock >= deposited_epochs(deposit, withdraw));
            prop_assert_eq!(unlock.index(), deposit.index());
        }
    }
}
