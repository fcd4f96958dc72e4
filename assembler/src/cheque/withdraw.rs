use super::{CHEQUE_WITHDRAW_EPOCHS, ChequeArgs, cheque_search_key};
use crate::balance;
use crate::context::AssemblyContext;
use crate::director::Assemble;
use crate::error::Error;
use crate::since::Since;
use crate::skeleton::TxSkeleton;
use crate::udt;
use ckb_assembler_traits::{FeeEstimator, LedgerProvider, LiveCell, SearchKey};
use ckb_logger::{debug, trace};
use ckb_types::{
    bytes::Bytes,
    core::EpochNumberWithFraction,
    packed::{Byte32, CellOutput, Script},
    prelude::*,
};

/// The since of a cheque input spent by its sender.
pub fn cheque_withdraw_since() -> Since {
    Since::relative_epoch(EpochNumberWithFraction::new_unchecked(
        CHEQUE_WITHDRAW_EPOCHS,
        0,
        0,
    ))
}

/// Takes an unclaimed cheque holding exactly `amount` back to its sender.
///
/// Capacity and tokens return in one sUDT cell, the fee comes from the
/// sender's plain cells.
pub(crate) struct ChequeWithdraw<'a, L, F> {
    ctx: AssemblyContext<'a, L, F>,
    sender: Script,
    receiver: Script,
    udt_owner: Byte32,
    amount: u128,
    cheque: Option<LiveCell>,
}

impl<'a, L, F> ChequeWithdraw<'a, L, F> {
    pub(crate) fn new(
        ctx: AssemblyContext<'a, L, F>,
        sender: Script,
        receiver: Script,
        udt_owner: Byte32,
        amount: u128,
    ) -> Self {
        ChequeWithdraw {
            ctx,
            sender,
            receiver,
            udt_owner,
            amount,
            cheque: None,
        }
    }

    fn cheque(&self) -> Result<&LiveCell, Error> {
        self.cheque
            .as_ref()
            .ok_or_else(|| Error::NoMatchingCell(format!("cheque holding {}", self.amount)))
    }
}

impl<L: LedgerProvider, F: FeeEstimator> Assemble for ChequeWithdraw<'_, L, F> {
    fn init(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let args = ChequeArgs::new(&self.receiver, &self.sender);
        let sudt = self.ctx.scripts.sudt_type(&self.udt_owner);
        let search_key = cheque_search_key(self.ctx.scripts, args.to_bytes(), &self.udt_owner);
        for cheque in self.ctx.live_cells(search_key) {
            let cheque = cheque?;
            let same_udt = cheque.output.type_().to_opt().as_ref() == Some(&sudt);
            let same_args = cheque.output.lock().args().raw_data() == args.to_bytes();
            match udt::decode_amount(&cheque.output_data) {
                Ok(amount) if same_udt && same_args && amount == self.amount => {
                    debug!("withdraw cheque {}", cheque.out_point);
                    self.cheque = Some(cheque);
                    return Ok(());
                }
                _ => trace!("skip cheque {}", cheque.out_point),
            }
        }
        Err(Error::NoMatchingCell(format!(
            "no cheque from {} to {} holding {}",
            self.sender.calc_script_hash(),
            self.receiver.calc_script_hash(),
            self.amount
        )))
    }

    fn set_cell_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        skeleton.push_cell_dep(self.ctx.scripts.secp256k1_blake160_dep());
        skeleton.push_cell_dep(self.ctx.scripts.sudt_dep());
        skeleton.push_cell_dep(self.ctx.scripts.cheque_dep());
        Ok(())
    }

    fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let cheque = self.cheque()?;
        let returned = CellOutput::new_builder()
            .capacity(cheque.output.capacity())
            .lock(self.sender.clone())
            .type_(cheque.output.type_())
            .build();
        let index = skeleton.push_output(returned, udt::encode_amount(self.amount));
        skeleton.raise_to_occupied(index)?;
        let change = CellOutput::new_builder().lock(self.sender.clone()).build();
        skeleton.set_change_output(change, Bytes::new());
        Ok(())
    }

    fn build_inputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let cheque = self.cheque()?;
        skeleton.push_input(
            cheque.out_point.clone(),
            cheque.output.clone(),
            cheque_withdraw_since(),
            None,
        );
        let plain_cells = self
            .ctx
            .live_cells(SearchKey::plain_by_lock(self.sender.clone()));
        balance::collect_capacity(&self.ctx, skeleton, vec![plain_cells])?;
        Ok(())
    }

    fn finalize_change(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        balance::finalize_change(&self.ctx, skeleton)
    }

    fn signing_locks(&self) -> Vec<Script> {
        vec![self.sender.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_epochs_relative() {
        assert_eq!(cheque_withdraw_since().as_u64(), 0xa000_0000_0000_0006);
    }
}
