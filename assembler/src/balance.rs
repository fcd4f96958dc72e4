//! Greedy cell collection and change settlement.
//!
//! Outputs are fixed before collection starts. Cells are then pulled one by
//! one from the given iterators and pushed as inputs until the inputs cover
//! the outputs plus the fee of the transaction as it looks at that moment.
//! The fee is estimated again after every pulled cell since every input and
//! witness makes the transaction bigger.

use crate::context::AssemblyContext;
use crate::error::{CapacityResultExt, Error};
use crate::iterator::LiveCellIterator;
use crate::since::Since;
use crate::skeleton::TxSkeleton;
use crate::udt;
use ckb_assembler_traits::{FeeEstimator, LedgerProvider, LiveCell};
use ckb_logger::{debug, trace};
use ckb_types::{core::Capacity, packed::Script, prelude::*};

/// What one collection pass consumed.
#[derive(Clone, Debug, Default)]
pub struct CollectionResult<T> {
    /// Capacity of the cells this pass consumed.
    pub capacity: Capacity,
    /// The consumed cells, in input order.
    pub cells: Vec<LiveCell>,
    /// Flow specific accumulator.
    pub extra: T,
}

impl<T> CollectionResult<T> {
    fn consume(&mut self, skeleton: &mut TxSkeleton, cell: LiveCell) -> Result<(), Error> {
        self.capacity = self
            .capacity
            .safe_add(Capacity::shannons(cell.capacity()))
            .or_overflow()?;
        skeleton.push_input(
            cell.out_point.clone(),
            cell.output.clone(),
            Since::zero(),
            None,
        );
        self.cells.push(cell);
        Ok(())
    }
}

/// Where the capacity side stands for the transaction in its current shape.
#[derive(Clone, Copy, Debug)]
struct CapacityBalance {
    collected: u128,
    required: u128,
    change_occupied: Option<u128>,
}

impl CapacityBalance {
    fn measure<L: LedgerProvider, F: FeeEstimator>(
        ctx: &AssemblyContext<'_, L, F>,
        skeleton: &TxSkeleton,
    ) -> Result<Self, Error> {
        let fee = ctx.estimate_fee(skeleton)?;
        let committed = skeleton.committed_outputs_capacity()?;
        let change_occupied = skeleton
            .change()
            .map(|slot| skeleton.occupied_capacity(slot.index()))
            .transpose()?;
        Ok(CapacityBalance {
            collected: u128::from(skeleton.inputs_capacity()?.as_u64()),
            required: u128::from(committed.as_u64()) + u128::from(fee.as_u64()),
            change_occupied: change_occupied.map(|capacity| u128::from(capacity.as_u64())),
        })
    }

    fn leftover(&self) -> Option<u128> {
        self.collected.checked_sub(self.required)
    }

    /// With a change output the leftover must be zero or fund the change
    /// output. Without one any positive leftover is burnt as fee.
    fn is_sufficient(&self) -> bool {
        match (self.leftover(), self.change_occupied) {
            (None, _) => false,
            (Some(leftover), Some(occupied)) => leftover == 0 || leftover >= occupied,
            (Some(leftover), None) => leftover > 0,
        }
    }

    fn insufficient(&self) -> Error {
        Error::InsufficientCapacity {
            required: self.required,
            collected: self.collected,
        }
    }
}

/// Pulls plain capacity cells until the inputs cover every output and the fee.
///
/// Inputs already in the skeleton count towards the goal, so nothing is
/// pulled when they suffice.
pub fn collect_capacity<L: LedgerProvider, F: FeeEstimator>(
    ctx: &AssemblyContext<'_, L, F>,
    skeleton: &mut TxSkeleton,
    sources: Vec<LiveCellIterator<'_, L>>,
) -> Result<CollectionResult<()>, Error> {
    let mut result = CollectionResult::default();
    let mut cells = sources.into_iter().flatten();
    loop {
        let balance = CapacityBalance::measure(ctx, skeleton)?;
        if balance.is_sufficient() {
            debug!(
                "capacity collected: {} cells, {} shannons, {} required",
                result.cells.len(),
                balance.collected,
                balance.required
            );
            return Ok(result);
        }
        match next_cell(&mut cells, skeleton, is_plain)? {
            Some(cell) => {
                trace!("collect capacity cell {}", cell.out_point);
                result.consume(skeleton, cell)?;
            }
            // nothing left to burn and nothing owed
            None if balance.change_occupied.is_none() && balance.leftover() == Some(0) => {
                return Ok(result);
            }
            None => return Err(balance.insufficient()),
        }
    }
}

/// Pulls cells of `udt_type` until they hold at least `required` tokens.
///
/// The accumulator is the token amount collected.
pub fn collect_token<L: LedgerProvider>(
    skeleton: &mut TxSkeleton,
    udt_type: &Script,
    required: u128,
    sources: Vec<LiveCellIterator<'_, L>>,
) -> Result<CollectionResult<u128>, Error> {
    let mut result = CollectionResult::<u128>::default();
    let mut cells = sources.into_iter().flatten();
    while result.extra < required {
        let is_token = |cell: &LiveCell| is_of_type(cell, udt_type);
        let Some(cell) = next_cell(&mut cells, skeleton, is_token)? else {
            return Err(Error::InsufficientToken {
                required,
                collected: result.extra,
            });
        };
        let amount = udt::decode_amount(&cell.output_data)?;
        trace!("collect token cell {} holding {}", cell.out_point, amount);
        result.extra = result
            .extra
            .checked_add(amount)
            .ok_or_else(|| Error::InvalidAmount("token amount overflows u128".to_owned()))?;
        result.consume(skeleton, cell)?;
    }
    debug!(
        "token collected: {} cells, {} of {} required",
        result.cells.len(),
        result.extra,
        required
    );
    Ok(result)
}

/// Writes `collected - required` into the token change output at `index`,
/// removing the output when nothing is left over.
pub fn settle_token_change(
    skeleton: &mut TxSkeleton,
    index: usize,
    collected: u128,
    required: u128,
) -> Result<(), Error> {
    let change = collected
        .checked_sub(required)
        .ok_or(Error::InsufficientToken {
            required,
            collected,
        })?;
    if change == 0 {
        debug!("no token change, output {} removed", index);
        skeleton.remove_output(index);
    } else {
        skeleton.set_output_data(index, udt::encode_amount(change));
    }
    Ok(())
}

/// Sets the change output to whatever inputs leave after outputs and fee.
///
/// The fee is estimated once more against the final shape. A change below its
/// own occupied capacity is dropped and the remainder goes to the miner.
pub fn finalize_change<L: LedgerProvider, F: FeeEstimator>(
    ctx: &AssemblyContext<'_, L, F>,
    skeleton: &mut TxSkeleton,
) -> Result<(), Error> {
    let Some(slot) = skeleton.change() else {
        return Ok(());
    };
    let balance = CapacityBalance::measure(ctx, skeleton)?;
    let change = balance.leftover().ok_or_else(|| balance.insufficient())?;
    let change = u64::try_from(change).map_err(|_| Error::CapacityOverflow)?;
    let occupied = skeleton.occupied_capacity(slot.index())?;
    if change >= occupied.as_u64() {
        skeleton.set_output_capacity(slot.index(), Capacity::shannons(change));
        debug!("change output {} set to {} shannons", slot.index(), change);
    } else {
        skeleton.remove_output(slot.index());
        debug!(
            "change {} below occupied {}, output {} removed",
            change,
            occupied.as_u64(),
            slot.index()
        );
    }
    Ok(())
}

/// Cells holding nothing but capacity.
pub fn is_plain(cell: &LiveCell) -> bool {
    cell.output.type_().is_none() && cell.output_data.is_empty()
}

fn is_of_type(cell: &LiveCell, script: &Script) -> bool {
    cell.output
        .type_()
        .to_opt()
        .is_some_and(|type_| type_.as_slice() == script.as_slice())
}

fn next_cell<I, P>(
    cells: &mut I,
    skeleton: &TxSkeleton,
    accept: P,
) -> Result<Option<LiveCell>, Error>
where
    I: Iterator<Item = Result<LiveCell, Error>>,
    P: Fn(&LiveCell) -> bool,
{
    for cell in cells {
        let cell = cell?;
        if skeleton.contains_input(&cell.out_point) || !accept(&cell) {
            trace!("skip cell {}", cell.out_point);
            continue;
        }
        return Ok(Some(cell));
    }
    Ok(None)
}
