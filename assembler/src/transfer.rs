//! Plain capacity transfer.

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

/// Moves capacity from some locks to others.
#[derive(Clone, Debug)]
pub struct TransferRequest {
    /// Locks whose plain cells pay, in the order they are drained.
    pub from: Vec<Script>,
    /// Receivers and the capacity each gets.
    pub to: Vec<(Script, Capacity)>,
    /// Where the change goes. `None` sends everything left over to the miner.
    pub change: Option<Script>,
}

pub(crate) struct Transfer<'a, L, F> {
    ctx: AssemblyContext<'a, L, F>,
    request: TransferRequest,
}

impl<'a, L, F> Transfer<'a, L, F> {
    pub(crate) fn new(ctx: AssemblyContext<'a, L, F>, request: TransferRequest) -> Self {
        Transfer { ctx, request }
    }
}

impl<L: LedgerProvider, F: FeeEstimator> Assemble for Transfer<'_, L, F> {
    fn init(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
        if self.request.from.is_empty() {
            return Err(Error::InvalidAddressOrScript(
                "no sender lock given".to_owned(),
            ));
        }
        if self.request.to.is_empty() {
            return Err(Error::InvalidAddressOrScript(
                "no receiver lock given".to_owned(),
            ));
        }
        Ok(())
    }

    fn set_cell_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        skeleton.push_cell_dep(self.ctx.scripts.secp256k1_blake160_dep());
        Ok(())
    }

    fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        for (lock, capacity) in &self.request.to {
            let output = CellOutput::new_builder()
                .capacity(capacity.pack())
                .lock(lock.clone())
                .build();
            let index = skeleton.push_output(output, Bytes::new());
            let occupied = skeleton.occupied_capacity(index)?;
            if *capacity < occupied {
                return Err(Error::InvalidAmount(format!(
                    "output {index} holds {} shannons, below its occupied {}",
                    capacity.as_u64(),
                    occupied.as_u64()
                )));
            }
        }
        if let Some(lock) = &self.request.change {
            let change = CellOutput::new_builder().lock(lock.clone()).build();
            skeleton.set_change_output(change, Bytes::new());
        }
        Ok(())
    }

    fn build_inputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let sources = self
            .request
            .from
            .iter()
            .map(|lock| self.ctx.live_cells(SearchKey::plain_by_lock(lock.clone())))
            .collect();
        balance::collect_capacity(&self.ctx, skeleton, sources)?;
        Ok(())
    }

    fn finalize_change(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        balance::finalize_change(&self.ctx, skeleton)
    }

    fn signing_locks(&self) -> Vec<Script> {
        self.request.from.clone()
    }
}
