//! Nervos DAO: deposit, the two withdraw phases and deposit information.
//!
//! A deposit is a cell typed by the DAO script holding 8 zero bytes. Phase 1
//! turns it into a withdrawing cell with the same capacity whose data is the
//! deposit block number. Phase 2 spends the withdrawing cell, once the lock
//! period is over, for the deposit plus its compensation.

mod deposit;
pub mod economics;
pub mod epoch;
mod info;
mod withdraw;

pub(crate) use self::deposit::DaoDeposit;
pub use self::info::DaoDepositInfo;
pub(crate) use self::info::deposit_info;
pub(crate) use self::withdraw::{DaoWithdrawPhase1, DaoWithdrawPhase2};

use crate::error::Error;
use crate::scripts::SystemScripts;
use ckb_assembler_traits::LedgerProvider;
use ckb_types::{
    bytes::Bytes,
    core::{HeaderView, TransactionView},
    packed::{CellOutput, OutPoint},
    prelude::*,
};

/// Length of the data of a DAO cell.
pub const DAO_DATA_LEN: usize = 8;

/// A cell looked up through the transaction that created it.
#[derive(Clone, Debug)]
pub(crate) struct CommittedCell {
    pub out_point: OutPoint,
    pub output: CellOutput,
    pub data: Bytes,
    pub transaction: TransactionView,
    /// Header of the block that committed `transaction`.
    pub header: HeaderView,
}

impl CommittedCell {
    pub fn load<L: LedgerProvider>(ledger: &L, out_point: &OutPoint) -> Result<Self, Error> {
        let tx_hash = out_point.tx_hash();
        let tx = ledger
            .get_transaction(&tx_hash)?
            .ok_or_else(|| Error::NotFound(format!("transaction {tx_hash}")))?;
        let block_hash = tx
            .block_hash
            .ok_or_else(|| Error::NotFound(format!("block committing {tx_hash}")))?;
        let header = ledger
            .get_header(&block_hash)?
            .ok_or_else(|| Error::NotFound(format!("header {block_hash}")))?;
        let index: u32 = out_point.index().unpack();
        let (output, data) = tx
            .transaction
            .output_with_data(index as usize)
            .ok_or_else(|| Error::NotFound(format!("cell {out_point}")))?;
        Ok(CommittedCell {
            out_point: out_point.clone(),
            output,
            data,
            transaction: tx.transaction,
            header,
        })
    }

    fn is_dao_cell(&self, scripts: &SystemScripts) -> bool {
        self.data.len() == DAO_DATA_LEN
            && self
                .output
                .type_()
                .to_opt()
                .is_some_and(|type_| scripts.is_dao_type(&type_))
    }

    /// Fails unless this is a deposited DAO cell.
    pub fn ensure_deposit(&self, scripts: &SystemScripts) -> Result<(), Error> {
        if self.is_dao_cell(scripts) && self.data.iter().all(|byte| *byte == 0) {
            Ok(())
        } else {
            Err(Error::NoMatchingCell(format!(
                "{} is not a DAO deposit",
                self.out_point
            )))
        }
    }

    /// Fails unless this is a DAO cell in withdrawing state.
    pub fn ensure_withdrawing(&self, scripts: &SystemScripts) -> Result<(), Error> {
        if self.is_dao_cell(scripts) && self.data.iter().any(|byte| *byte != 0) {
            Ok(())
        } else {
            Err(Error::NoMatchingCell(format!(
                "{} is not a withdrawing DAO cell",
                self.out_point
            )))
        }
    }

    /// The deposit a withdrawing cell was created from: the input at the
    /// same index as the withdrawing output.
    pub fn deposit_out_point(&self) -> Result<OutPoint, Error> {
        let index: u32 = self.out_point.index().unpack();
        self.transaction
            .inputs()
            .get(index as usize)
            .map(|input| input.previous_output())
            .ok_or_else(|| Error::NotFound(format!("deposit of {}", self.out_point)))
    }
}
