use super::CommittedCell;
use super::economics::{compensation, extract_ar, minimal_unlock_epoch};
use crate::error::{CapacityResultExt, Error};
use crate::scripts::SystemScripts;
use ckb_assembler_traits::LedgerProvider;
use ckb_types::{
    core::{BlockNumber, Capacity, EpochNumberWithFraction, HeaderView},
    packed::{Byte32, OutPoint},
    prelude::*,
};

/// What a deposit is worth when withdrawn at a given block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaoDepositInfo {
    /// The deposit cell.
    pub out_point: OutPoint,
    pub withdraw_block_hash: Byte32,
    pub withdraw_block_number: BlockNumber,
    /// Capacity of the deposit cell.
    pub deposit_capacity: Capacity,
    /// Estimated interest, floored.
    pub compensation: Capacity,
    /// First epoch at which phase 2 can be committed.
    pub unlockable_epoch: EpochNumberWithFraction,
}

pub(crate) fn deposit_info<L: LedgerProvider>(
    ledger: &L,
    scripts: &SystemScripts,
    deposit: &OutPoint,
    withdraw_header: &HeaderView,
) -> Result<DaoDepositInfo, Error> {
    let deposit = CommittedCell::load(ledger, deposit)?;
    deposit.ensure_deposit(scripts)?;

    let deposit_capacity: Capacity = deposit.output.capacity().unpack();
    let occupied = deposit
        .output
        .occupied_capacity(Capacity::bytes(deposit.data.len()).or_overflow()?)
        .or_overflow()?;
    let deposit_ar = extract_ar(deposit.header.dao().as_slice())?;
    let withdraw_ar = extract_ar(withdraw_header.dao().as_slice())?;

    Ok(DaoDepositInfo {
        out_point: deposit.out_point,
        withdraw_block_hash: withdraw_header.hash(),
        withdraw_block_number: withdraw_header.number(),
        deposit_capacity,
        compensation: compensation(deposit_capacity, occupied, deposit_ar, withdraw_ar)?,
        unlockable_epoch: minimal_unlock_epoch(deposit.header.epoch(), withdraw_header.epoch())?,
    })
}
