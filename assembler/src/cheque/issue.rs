use super::ChequeArgs;
use crate::balance::{self, CollectionResult};
use crate::context::AssemblyContext;
use crate::director::Assemble;
use crate::error::Error;
use crate::skeleton::TxSkeleton;
use crate::udt;
use ckb_assembler_traits::{FeeEstimator, LedgerProvider, SearchKey};
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{Byte32, CellOutput, Script},
    prelude::*,
};

/// Puts `amount` tokens into a cheque cell for the receiver.
///
/// Tokens come from the sender's sUDT cells, capacity and fee from the
/// sender's plain cells. Both changes go back to the sender.
pub(crate) struct ChequeIssue<'a, L, F> {
    ctx: AssemblyContext<'a, L, F>,
    sender: Script,
    receiver: Script,
    udt_owner: Byte32,
    amount: u128,
    token_change: usize,
    tokens: CollectionResult<u128>,
}

impl<'a, L, F> ChequeIssue<'a, L, F> {
    pub(crate) fn new(
        ctx: AssemblyContext<'a, L, F>,
        sender: Script,
        receiver: Script,
        udt_owner: Byte32,
        amount: u128,
    ) -> Self {
        ChequeIssue {
            ctx,
            sender,
            receiver,
            udt_owner,
            amount,
            token_change: 0,
            tokens: CollectionResult::default(),
        }
    }
}

impl<L: LedgerProvider, F: FeeEstimator> Assemble for ChequeIssue<'_, L, F> {
    fn init(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
        if self.amount == 0 {
            return Err(Error::InvalidAmount("cheque amount is zero".to_owned()));
        }
        if self.sender.calc_script_hash() == self.receiver.calc_script_hash() {
            return Err(Error::InvalidAddressOrScript(
                "cheque sender and receiver are the same lock".to_owned(),
            ));
        }
        Ok(())
    }

    fn set_cell_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        skeleton.push_cell_dep(self.ctx.scripts.secp256k1_blake160_dep());
        skeleton.push_cell_dep(self.ctx.scripts.sudt_dep());
        Ok(())
    }

    fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let sudt = self.ctx.scripts.sudt_type(&self.udt_owner);
        let args = ChequeArgs::new(&self.receiver, &self.sender);
        let cheque = CellOutput::new_builder()
            .capacity(Capacity::shannons(self.ctx.cheque.cell_capacity).pack())
            .lock(self.ctx.scripts.cheque_lock(args.to_bytes()))
            .type_(Some(sudt.clone()).pack())
            .build();
        let index = skeleton.push_output(cheque, udt::encode_amount(self.amount));
        skeleton.raise_to_occupied(index)?;

        let token_change = CellOutput::new_builder()
            .capacity(Capacity::shannons(self.ctx.cheque.udt_cell_capacity).pack())
            .lock(self.sender.clone())
            .type_(Some(sudt).pack())
            .build();
        self.token_change = skeleton.push_output(token_change, udt::encode_amount(0));
        skeleton.raise_to_occupied(self.token_change)?;

        let change = CellOutput::new_builder().lock(self.sender.clone()).build();
        skeleton.set_change_output(change, Bytes::new());
        Ok(())
    }

    fn build_inputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let sudt = self.ctx.scripts.sudt_type(&self.udt_owner);
        let token_cells = self.ctx.live_cells(SearchKey::by_lock_and_type(
            self.sender.clone(),
            sudt.clone(),
        ));
        self.tokens = balance::collect_token(skeleton, &sudt, self.amount, vec![token_cells])?;
        balance::settle_token_change(skeleton, self.token_change, self.tokens.extra, self.amount)?;

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
