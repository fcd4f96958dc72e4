//! The transaction under construction.

use crate::error::{CapacityResultExt, Error};
use crate::since::Since;
use ckb_types::{
    bytes::Bytes,
    constants::TX_VERSION,
    core::{Capacity, TransactionBuilder, TransactionView, Version},
    packed::{Byte32, CellDep, CellInput, CellOutput, OutPoint, WitnessArgs},
    prelude::*,
};
use std::collections::HashSet;

/// Byte length of a recoverable secp256k1 signature.
pub const SIGNATURE_PLACEHOLDER_LEN: usize = 65;

/// Index of the output that receives the capacity change.
///
/// Owned by the skeleton, which shifts it when an earlier output is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeSlot(usize);

impl ChangeSlot {
    /// Output index of the change output.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Mutable build context shared by every phase of one construction call.
///
/// Inputs and witnesses, as well as outputs and outputs data, only ever
/// change in pairs.
#[derive(Clone, Debug)]
pub struct TxSkeleton {
    version: Version,
    header_deps: Vec<Byte32>,
    cell_deps: Vec<CellDep>,
    inputs: Vec<CellInput>,
    input_cells: Vec<CellOutput>,
    input_capacities: Vec<Capacity>,
    witnesses: Vec<Bytes>,
    outputs: Vec<CellOutput>,
    outputs_data: Vec<Bytes>,
    change: Option<ChangeSlot>,
    placeholder_locks: HashSet<Byte32>,
}

impl Default for TxSkeleton {
    fn default() -> Self {
        TxSkeleton {
            version: TX_VERSION,
            header_deps: Vec::new(),
            cell_deps: Vec::new(),
            inputs: Vec::new(),
            input_cells: Vec::new(),
            input_capacities: Vec::new(),
            witnesses: Vec::new(),
            outputs: Vec::new(),
            outputs_data: Vec::new(),
            change: None,
            placeholder_locks: HashSet::new(),
        }
    }
}

impl TxSkeleton {
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Appends a header dep unless it is already there, returns its index.
    pub fn push_header_dep(&mut self, hash: Byte32) -> usize {
        if let Some(index) = self.header_deps.iter().position(|dep| dep == &hash) {
            return index;
        }
        self.header_deps.push(hash);
        self.header_deps.len() - 1
    }

    /// Appends a cell dep unless it is already there.
    pub fn push_cell_dep(&mut self, cell_dep: CellDep) {
        if !self
            .cell_deps
            .iter()
            .any(|dep| dep.as_slice() == cell_dep.as_slice())
        {
            self.cell_deps.push(cell_dep);
        }
    }

    /// Consumes `cell` and adds its witness.
    ///
    /// The first input of every lock gets a `WitnessArgs` whose lock is a
    /// zeroed signature, so the size of the candidate already accounts for
    /// the real one. Later inputs of the same lock get an empty witness
    /// unless `input_type` is set.
    pub fn push_input(
        &mut self,
        out_point: OutPoint,
        cell: CellOutput,
        since: Since,
        input_type: Option<Bytes>,
    ) {
        let capacity = cell.capacity().unpack();
        self.push_input_with_capacity(out_point, cell, since, input_type, capacity);
    }

    /// Like [`push_input`](Self::push_input), but the input is worth
    /// `capacity` instead of the capacity written in the cell, as a DAO
    /// withdrawal is.
    pub fn push_input_with_capacity(
        &mut self,
        out_point: OutPoint,
        cell: CellOutput,
        since: Since,
        input_type: Option<Bytes>,
        capacity: Capacity,
    ) {
        let lock_hash = cell.lock().calc_script_hash();
        let needs_placeholder = self.placeholder_locks.insert(lock_hash);
        let witness = if needs_placeholder || input_type.is_some() {
            let lock =
                needs_placeholder.then(|| Bytes::from(vec![0u8; SIGNATURE_PLACEHOLDER_LEN]));
            WitnessArgs::new_builder()
                .lock(lock.pack())
                .input_type(input_type.pack())
                .build()
                .as_bytes()
        } else {
            Bytes::new()
        };
        self.inputs.push(CellInput::new(out_point, since.as_u64()));
        self.input_cells.push(cell);
        self.input_capacities.push(capacity);
        self.witnesses.push(witness);
    }

    /// Whether `out_point` is already consumed.
    pub fn contains_input(&self, out_point: &OutPoint) -> bool {
        self.inputs
            .iter()
            .any(|input| input.previous_output().as_slice() == out_point.as_slice())
    }

    /// Appends an output with its data, returns its index.
    pub fn push_output(&mut self, output: CellOutput, data: Bytes) -> usize {
        self.outputs.push(output);
        self.outputs_data.push(data);
        self.outputs.len() - 1
    }

    /// Appends the capacity change output. Its capacity is settled last.
    pub fn set_change_output(&mut self, output: CellOutput, data: Bytes) -> ChangeSlot {
        let slot = ChangeSlot(self.push_output(output, data));
        self.change = Some(slot);
        slot
    }

    /// Removes an output with its data.
    pub fn remove_output(&mut self, index: usize) {
        self.outputs.remove(index);
        self.outputs_data.remove(index);
        self.change = match self.change {
            Some(ChangeSlot(slot)) if slot == index => None,
            Some(ChangeSlot(slot)) if slot > index => Some(ChangeSlot(slot - 1)),
            change => change,
        };
    }

    pub fn set_output_capacity(&mut self, index: usize, capacity: Capacity) {
        let output = self.outputs[index]
            .clone()
            .as_builder()
            .capacity(capacity.pack())
            .build();
        self.outputs[index] = output;
    }

    /// Lifts output `index` to its occupied capacity if it holds less.
    /// Returns the capacity it ends up with.
    pub fn raise_to_occupied(&mut self, index: usize) -> Result<Capacity, Error> {
        let occupied = self.occupied_capacity(index)?;
        let capacity: Capacity = self.outputs[index].capacity().unpack();
        if capacity >= occupied {
            return Ok(capacity);
        }
        self.set_output_capacity(index, occupied);
        Ok(occupied)
    }

    pub fn set_output_data(&mut self, index: usize, data: Bytes) {
        self.outputs_data[index] = data;
    }

    pub fn change(&self) -> Option<ChangeSlot> {
        self.change
    }

    pub fn header_deps(&self) -> &[Byte32] {
        &self.header_deps
    }

    pub fn inputs(&self) -> &[CellInput] {
        &self.inputs
    }

    /// The cells consumed by [`inputs`](Self::inputs), in the same order.
    pub fn input_cells(&self) -> &[CellOutput] {
        &self.input_cells
    }

    pub fn outputs(&self) -> &[CellOutput] {
        &self.outputs
    }

    pub fn outputs_data(&self) -> &[Bytes] {
        &self.outputs_data
    }

    pub fn witnesses(&self) -> &[Bytes] {
        &self.witnesses
    }

    /// What the inputs are worth.
    pub fn inputs_capacity(&self) -> Result<Capacity, Error> {
        self.input_capacities
            .iter()
            .try_fold(Capacity::zero(), |sum, capacity| sum.safe_add(*capacity))
            .or_overflow()
    }

    /// Sum of all output capacities.
    pub fn outputs_capacity(&self) -> Result<Capacity, Error> {
        self.outputs
            .iter()
            .try_fold(Capacity::zero(), |sum, output| {
                sum.safe_add(Unpack::<Capacity>::unpack(&output.capacity()))
            })
            .or_overflow()
    }

    /// Sum of the output capacities the flow committed to, the change
    /// output excluded.
    pub fn committed_outputs_capacity(&self) -> Result<Capacity, Error> {
        let change: Capacity = self
            .change
            .map(|ChangeSlot(index)| self.outputs[index].capacity().unpack())
            .unwrap_or_else(Capacity::zero);
        self.outputs_capacity()?.safe_sub(change).or_overflow()
    }

    /// The minimal capacity output `index` must hold.
    pub fn occupied_capacity(&self, index: usize) -> Result<Capacity, Error> {
        let data_capacity = Capacity::bytes(self.outputs_data[index].len()).or_overflow()?;
        self.outputs[index]
            .occupied_capacity(data_capacity)
            .or_overflow()
    }

    /// Inputs capacity minus outputs capacity.
    pub fn fee(&self) -> Result<Capacity, Error> {
        self.inputs_capacity()?
            .safe_sub(self.outputs_capacity()?)
            .or_overflow()
    }

    /// Builds the candidate transaction in its current shape.
    pub fn build(&self) -> TransactionView {
        TransactionBuilder::default()
            .version(self.version.pack())
            .cell_deps(self.cell_deps.clone())
            .header_deps(self.header_deps.clone())
            .inputs(self.inputs.clone())
            .outputs(self.outputs.clone())
            .outputs_data(self.outputs_data.iter().map(|data| data.pack()))
            .witnesses(self.witnesses.iter().map(|witness| witness.pack()))
            .build()
    }
}
