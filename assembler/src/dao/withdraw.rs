use super::CommittedCell;
use super::economics::minimal_unlock_epoch;
use crate::balance;
use crate::context::AssemblyContext;
use crate::director::Assemble;
use crate::error::Error;
use crate::since::Since;
use crate::skeleton::TxSkeleton;
use ckb_assembler_traits::{FeeEstimator, LedgerProvider, SearchKey};
use ckb_logger::debug;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, EpochNumberWithFraction},
    packed::{CellOutput, OutPoint, Script},
    prelude::*,
};

/// Turns a deposit into a withdrawing cell. The fee comes from the owner's
/// plain cells.
pub(crate) struct DaoWithdrawPhase1<'a, L, F> {
    ctx: AssemblyContext<'a, L, F>,
    out_point: OutPoint,
    deposit: Option<CommittedCell>,
}

impl<'a, L, F> DaoWithdrawPhase1<'a, L, F> {
    pub(crate) fn new(ctx: AssemblyContext<'a, L, F>, out_point: OutPoint) -> Self {
        DaoWithdrawPhase1 {
            ctx,
            out_point,
            deposit: None,
        }
    }

    fn deposit(&self) -> Result<&CommittedCell, Error> {
        self.deposit
            .as_ref()
            .ok_or_else(|| Error::NotFound(format!("deposit {}", self.out_point)))
    }
}

impl<L: LedgerProvider, F: FeeEstimator> Assemble for DaoWithdrawPhase1<'_, L, F> {
    fn init(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let deposit = CommittedCell::load(self.ctx.ledger, &self.out_point)?;
        deposit.ensure_deposit(self.ctx.scripts)?;
        self.deposit = Some(deposit);
        Ok(())
    }

    fn set_header_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let hash = self.deposit()?.header.hash();
        skeleton.push_header_dep(hash);
        Ok(())
    }

    fn set_cell_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        skeleton.push_cell_dep(self.ctx.scripts.secp256k1_blake160_dep());
        skeleton.push_cell_dep(self.ctx.scripts.dao_dep());
        Ok(())
    }

    fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let deposit = self.deposit()?;
        // the DAO script reads the deposit block number from here
        let data = Bytes::from(deposit.header.number().to_le_bytes().to_vec());
        skeleton.push_output(deposit.output.clone(), data);
        let change = CellOutput::new_builder()
            .lock(deposit.output.lock())
            .build();
        skeleton.set_change_output(change, Bytes::new());
        Ok(())
    }

    fn build_inputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let deposit = self.deposit()?;
        skeleton.push_input(
            deposit.out_point.clone(),
            deposit.output.clone(),
            Since::zero(),
            None,
        );
        let cells = self
            .ctx
            .live_cells(SearchKey::plain_by_lock(deposit.output.lock()));
        balance::collect_capacity(&self.ctx, skeleton, vec![cells])?;
        Ok(())
    }

    fn finalize_change(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        balance::finalize_change(&self.ctx, skeleton)
    }

    fn signing_locks(&self) -> Vec<Script> {
        self.deposit
            .iter()
            .map(|deposit| deposit.output.lock())
            .collect()
    }
}

struct Phase2State {
    withdrawing: CommittedCell,
    deposit: CommittedCell,
    unlock_epoch: EpochNumberWithFraction,
    maximum_withdraw: Capacity,
}

/// Claims a withdrawing cell with its compensation once the lock period is
/// over. The fee is taken out of the claimed capacity.
pub(crate) struct DaoWithdrawPhase2<'a, L, F> {
    ctx: AssemblyContext<'a, L, F>,
    out_point: OutPoint,
    state: Option<Phase2State>,
    output_index: usize,
}

impl<'a, L, F> DaoWithdrawPhase2<'a, L, F> {
    pub(crate) fn new(ctx: AssemblyContext<'a, L, F>, out_point: OutPoint) -> Self {
        DaoWithdrawPhase2 {
            ctx,
            out_point,
            state: None,
            output_index: 0,
        }
    }

    fn state(&self) -> Result<&Phase2State, Error> {
        self.state
            .as_ref()
            .ok_or_else(|| Error::NotFound(format!("withdrawing cell {}", self.out_point)))
    }
}

impl<L: LedgerProvider, F: FeeEstimator> Assemble for DaoWithdrawPhase2<'_, L, F> {
    fn init(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let withdrawing = CommittedCell::load(self.ctx.ledger, &self.out_point)?;
        withdrawing.ensure_withdrawing(self.ctx.scripts)?;
        let deposit = CommittedCell::load(self.ctx.ledger, &withdrawing.deposit_out_point()?)?;
        deposit.ensure_deposit(self.ctx.scripts)?;

        let unlock_epoch =
            minimal_unlock_epoch(deposit.header.epoch(), withdrawing.header.epoch())?;
        let maximum_withdraw = self
            .ctx
            .ledger
            .calculate_dao_maximum_withdraw(&deposit.out_point, &withdrawing.header.hash())?;
        debug!(
            "withdrawing {} unlocks in epoch {}, worth {} shannons",
            self.out_point,
            unlock_epoch.number(),
            maximum_withdraw.as_u64()
        );
        self.state = Some(Phase2State {
            withdrawing,
            deposit,
            unlock_epoch,
            maximum_withdraw,
        });
        Ok(())
    }

    fn set_header_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let state = self.state()?;
        skeleton.push_header_dep(state.deposit.header.hash());
        skeleton.push_header_dep(state.withdrawing.header.hash());
        Ok(())
    }

    fn set_cell_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        skeleton.push_cell_dep(self.ctx.scripts.secp256k1_blake160_dep());
        skeleton.push_cell_dep(self.ctx.scripts.dao_dep());
        Ok(())
    }

    fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let lock = self.state()?.withdrawing.output.lock();
        let output = CellOutput::new_builder().lock(lock).build();
        self.output_index = skeleton.push_output(output, Bytes::new());
        Ok(())
    }

    fn build_inputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let state = self.state()?;
        let deposit_header_index = skeleton.push_header_dep(state.deposit.header.hash()) as u64;
        skeleton.push_input_with_capacity(
            state.withdrawing.out_point.clone(),
            state.withdrawing.output.clone(),
            Since::absolute_epoch(state.unlock_epoch),
            Some(Bytes::from(deposit_header_index.to_le_bytes().to_vec())),
            state.maximum_withdraw,
        );
        Ok(())
    }

    fn finalize_change(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let available = self.state()?.maximum_withdraw;
        let fee = self.ctx.estimate_fee(skeleton)?;
        let occupied = skeleton.occupied_capacity(self.output_index)?;
        let capacity = available
            .safe_sub(fee)
            .ok()
            .filter(|capacity| *capacity >= occupied)
            .ok_or(Error::InsufficientForFee {
                fee: fee.as_u64(),
                available: available.as_u64(),
            })?;
        skeleton.set_output_capacity(self.output_index, capacity);
        Ok(())
    }

    fn signing_locks(&self) -> Vec<Script> {
        self.state
            .iter()
            .map(|state| state.withdrawing.output.lock())
            .collect()
    }
}
