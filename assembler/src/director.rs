//! The construction pipeline.
//!
//! Every flow implements [`Assemble`]. [`assemble`] drives it through the
//! seven phases in a fixed order over one [`TxSkeleton`], stops at the first
//! failing phase and groups the inputs of the finished transaction.

use crate::error::Error;
use crate::group::{ScriptGroup, group_inputs};
use crate::skeleton::TxSkeleton;
use ckb_logger::debug;
use ckb_types::{
    constants::TX_VERSION,
    core::{Capacity, TransactionView},
    packed::Script,
};

/// An unsigned transaction ready to be signed.
#[derive(Clone, Debug)]
pub struct AssembledTransaction {
    pub transaction: TransactionView,
    /// One group per lock to sign with, see [`group_inputs`].
    pub groups: Vec<ScriptGroup>,
    /// Inputs capacity minus outputs capacity.
    pub fee: Capacity,
}

/// The phases of one construction flow, called by [`assemble`] in
/// declaration order.
///
/// A flow is consumed by one run.
pub trait Assemble {
    fn init(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
        Ok(())
    }

    fn set_version(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        skeleton.set_version(TX_VERSION);
        Ok(())
    }

    fn set_header_deps(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
        Ok(())
    }

    fn set_cell_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error>;

    /// Adds the outputs the flow commits to, and the change outputs.
    fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error>;

    /// Adds inputs until the outputs are covered.
    fn build_inputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error>;

    /// Settles the change outputs.
    fn finalize_change(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error>;

    /// Locks the caller will sign with, known before any input is chosen.
    fn signing_locks(&self) -> Vec<Script>;
}

/// Runs `flow` and returns the unsigned transaction.
///
/// On error the skeleton is dropped with the flow.
pub fn assemble<A: Assemble>(mut flow: A) -> Result<AssembledTransaction, Error> {
    let mut skeleton = TxSkeleton::default();
    flow.init(&mut skeleton)?;
    flow.set_version(&mut skeleton)?;
    flow.set_header_deps(&mut skeleton)?;
    flow.set_cell_deps(&mut skeleton)?;
    flow.build_outputs(&mut skeleton)?;
    flow.build_inputs(&mut skeleton)?;
    flow.finalize_change(&mut skeleton)?;

    let groups = group_inputs(&flow.signing_locks(), skeleton.input_cells());
    let fee = skeleton.fee()?;
    let transaction = skeleton.build();
    debug!(
        "assembled transaction {}: {} inputs, {} outputs, {} groups, fee {}",
        transaction.hash(),
        transaction.inputs().len(),
        transaction.outputs().len(),
        groups.len(),
        fee.as_u64()
    );
    Ok(AssembledTransaction {
        transaction,
        groups,
        fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckb_types::{bytes::Bytes, packed::CellOutput, prelude::*};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        phases: Rc<RefCell<Vec<&'static str>>>,
        fail_at: Option<&'static str>,
    }

    impl Recorder {
        fn record(&self, phase: &'static str) -> Result<(), Error> {
            self.phases.borrow_mut().push(phase);
            if self.fail_at == Some(phase) {
                return Err(Error::NoMatchingCell(phase.to_owned()));
            }
            Ok(())
        }
    }

    impl Assemble for Recorder {
        fn init(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
            self.record("init")
        }

        fn set_version(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
            skeleton.set_version(TX_VERSION);
            self.record("version")
        }

        fn set_header_deps(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
            self.record("header_deps")
        }

        fn set_cell_deps(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
            self.record("cell_deps")
        }

        fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
            skeleton.push_output(CellOutput::default(), Bytes::new());
            self.record("outputs")
        }

        fn build_inputs(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
            self.record("inputs")
        }

        fn finalize_change(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
            self.record("change")
        }

        fn signing_locks(&self) -> Vec<Script> {
            vec![Script::default()]
        }
    }

    #[test]
    fn runs_phases_in_order() {
        let phases = Rc::new(RefCell::new(Vec::new()));
        let assembled = assemble(Recorder {
            phases: Rc::clone(&phases),
            fail_at: None,
        })
        .unwrap();
        assert_eq!(
            *phases.borrow(),
            vec![
                "init",
                "version",
                "header_deps",
                "cell_deps",
                "outputs",
                "inputs",
                "change"
            ]
        );
        assert_eq!(assembled.transaction.outputs().len(), 1);
        assert_eq!(assembled.groups.len(), 1);
        assert_eq!(assembled.fee, Capacity::zero());
    }

    #[test]
    fn stops_at_first_failure() {
        let phases = Rc::new(RefCell::new(Vec::new()));
        let result = assemble(Recorder {
            phases: Rc::clone(&phases),
            fail_at: Some("outputs"),
        });
        assert!(matches!(result, Err(Error::NoMatchingCell(phase)) if phase == "outputs"));
        assert_eq!(phases.borrow().last(), Some(&"outputs"));
        assert_eq!(phases.borrow().len(), 5);
    }
}
