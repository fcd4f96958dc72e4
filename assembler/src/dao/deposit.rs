use super::DAO_DATA_LEN;
use crate::balance;
use crate::context::AssemblyContext;
use crate::director::Assemble;
use crate::error::Error;
use crate::skeleton::TxSkeleton;
use ckb_assembler_traits::{FeeEstimator, LedgerProvider, SearchKey};
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{CellOutput, Script},
    prelude::*,
};

/// Locks `capacity` of the owner's plain cells into a new DAO cell.
pub(crate) struct DaoDeposit<'a, L, F> {
    ctx: AssemblyContext<'a, L, F>,
    owner: Script,
    capacity: Capacity,
}

impl<'a, L, F> DaoDeposit<'a, L, F> {
    pub(crate) fn new(ctx: AssemblyContext<'a, L, F>, owner: Script, capacity: Capacity) -> Self {
        DaoDeposit {
            ctx,
            owner,
            capacity,
        }
    }
}

impl<L: LedgerProvider, F: FeeEstimator> Assemble for DaoDeposit<'_, L, F> {
    fn set_cell_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        skeleton.push_cell_dep(self.ctx.scripts.secp256k1_blake160_dep());
        skeleton.push_cell_dep(self.ctx.scripts.dao_dep());
        Ok(())
    }

    fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let deposit = CellOutput::new_builder()
            .capacity(self.capacity.pack())
            .lock(self.owner.clone())
            .type_(Some(self.ctx.scripts.dao_type()).pack())
            .build();
        let index = skeleton.push_output(deposit, Bytes::from(vec![0u8; DAO_DATA_LEN]));
        let occupied = skeleton.occupied_capacity(index)?;
        if self.capacity < occupied {
            return Err(Error::InvalidAmount(format!(
                "deposit of {} shannons is below the {} a DAO cell occupies",
                self.capacity.as_u64(),
                occupied.as_u64()
            )));
        }
        let change = CellOutput::new_builder().lock(self.owner.clone()).build();
        skeleton.set_change_output(change, Bytes::new());
        Ok(())
    }

    fn build_inputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let cells = self
            .ctx
            .live_cells(SearchKey::plain_by_lock(self.owner.clone()));
        balance::collect_capacity(&self.ctx, skeleton, vec![cells])?;
        Ok(())
    }

    fn finalize_change(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        balance::finalize_change(&self.ctx, skeleton)
    }

    fn signing_locks(&self) -> Vec<Script> {
        vec![self.owner.clone()]
    }
}
