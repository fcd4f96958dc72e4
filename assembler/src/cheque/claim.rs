use super::{ChequeArgs, cheque_search_key, lock_hash_prefix};
use crate::balance::{self, CollectionResult};
use crate::context::AssemblyContext;
use crate::director::Assemble;
use crate::error::{CapacityResultExt, Error};
use crate::since::Since;
use crate::skeleton::TxSkeleton;
use crate::udt;
use ckb_assembler_traits::{FeeEstimator, LedgerProvider, LiveCell, SearchKey};
use ckb_logger::{debug, trace};
use ckb_types::{
    bytes::Bytes,
    core::Capacity,
    packed::{Byte32, CellOutput, Script},
    prelude::*,
};
use std::collections::HashMap;

/// Capacity owed back to every sender of the claimed cheques, in order of
/// first appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefundLedger {
    refunds: Vec<(Script, Capacity)>,
}

impl RefundLedger {
    /// Adds `capacity` to what `sender` gets back.
    pub fn credit(&mut self, sender: &Script, capacity: Capacity) -> Result<(), Error> {
        match self.refunds.iter_mut().find(|(lock, _)| lock == sender) {
            Some((_, total)) => *total = total.safe_add(capacity).or_overflow()?,
            None => self.refunds.push((sender.clone(), capacity)),
        }
        Ok(())
    }

    pub fn refunds(&self) -> &[(Script, Capacity)] {
        &self.refunds
    }
}

/// Running totals of a claim.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClaimLedger {
    amount: u128,
    refunds: RefundLedger,
}

/// Claims every cheque of one sUDT sent to the receiver.
///
/// The tokens end up in one sUDT cell of the receiver, paid for with the
/// receiver's plain cells. The capacity of every cheque cell goes back to
/// its sender.
pub(crate) struct ChequeClaim<'a, L, F> {
    ctx: AssemblyContext<'a, L, F>,
    receiver: Script,
    udt_owner: Byte32,
    cheques: CollectionResult<ClaimLedger>,
    senders: HashMap<ChequeArgs, Script>,
}

impl<'a, L, F> ChequeClaim<'a, L, F> {
    pub(crate) fn new(
        ctx: AssemblyContext<'a, L, F>,
        receiver: Script,
        udt_owner: Byte32,
    ) -> Self {
        ChequeClaim {
            ctx,
            receiver,
            udt_owner,
            cheques: CollectionResult::default(),
            senders: HashMap::new(),
        }
    }
}

impl<L: LedgerProvider, F> ChequeClaim<'_, L, F> {
    /// The lock the cheque's sender spent to create it, memoized per args.
    fn sender_lock(&mut self, cheque: &LiveCell, args: ChequeArgs) -> Result<Script, Error> {
        if let Some(lock) = self.senders.get(&args) {
            return Ok(lock.clone());
        }
        let lock = recover_sender_lock(self.ctx.ledger, cheque, &args)?;
        self.senders.insert(args, lock.clone());
        Ok(lock)
    }
}

/// Finds the sender of `cheque` among the cells its creating transaction
/// consumed: the first whose lock hash starts with the sender prefix.
pub(crate) fn recover_sender_lock<L: LedgerProvider>(
    ledger: &L,
    cheque: &LiveCell,
    args: &ChequeArgs,
) -> Result<Script, Error> {
    let not_found = || Error::SenderLockNotFound(cheque.out_point.to_string());
    let tx_hash = cheque.out_point.tx_hash();
    let Some(tx) = ledger.get_transaction(&tx_hash)? else {
        return Err(not_found());
    };
    for input in tx.transaction.inputs().into_iter() {
        let previous = input.previous_output();
        let Some(previous_tx) = ledger.get_transaction(&previous.tx_hash())? else {
            trace!("previous transaction of {} not found", previous);
            continue;
        };
        let index: u32 = previous.index().unpack();
        if let Some(output) = previous_tx.transaction.output(index as usize) {
            let lock = output.lock();
            if args.is_sender(&lock) {
                return Ok(lock);
            }
        }
    }
    Err(not_found())
}

impl<L: LedgerProvider, F: FeeEstimator> Assemble for ChequeClaim<'_, L, F> {
    fn init(&mut self, _skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let sudt = self.ctx.scripts.sudt_type(&self.udt_owner);
        let receiver_prefix = lock_hash_prefix(&self.receiver);
        let search_key = cheque_search_key(
            self.ctx.scripts,
            Bytes::from(receiver_prefix.to_vec()),
            &self.udt_owner,
        );
        let candidates = self
            .ctx
            .live_cells(search_key)
            .collect::<Result<Vec<_>, _>>()?;

        for cheque in candidates {
            let is_sudt = cheque
                .output
                .type_()
                .to_opt()
                .is_some_and(|type_| type_ == sudt);
            let Ok(args) = ChequeArgs::from_slice(&cheque.output.lock().args().raw_data()) else {
                trace!("skip cheque {} with malformed args", cheque.out_point);
                continue;
            };
            if !is_sudt || args.receiver_prefix() != &receiver_prefix[..] {
                continue;
            }
            let amount = udt::decode_amount(&cheque.output_data)?;
            let sender = self.sender_lock(&cheque, args)?;
            let capacity = Capacity::shannons(cheque.capacity());

            let ledger = &mut self.cheques.extra;
            ledger.amount = ledger
                .amount
                .checked_add(amount)
                .ok_or_else(|| Error::InvalidAmount("claimed amount overflows u128".to_owned()))?;
            ledger.refunds.credit(&sender, capacity)?;
            self.cheques.capacity = self.cheques.capacity.safe_add(capacity).or_overflow()?;
            self.cheques.cells.push(cheque);
        }

        if self.cheques.cells.is_empty() {
            return Err(Error::NoMatchingCell(format!(
                "no cheque for receiver {}",
                self.receiver.calc_script_hash()
            )));
        }
        debug!(
            "claiming {} cheques from {} senders, {} tokens",
            self.cheques.cells.len(),
            self.cheques.extra.refunds.refunds().len(),
            self.cheques.extra.amount
        );
        Ok(())
    }

    fn set_cell_deps(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        skeleton.push_cell_dep(self.ctx.scripts.secp256k1_blake160_dep());
        skeleton.push_cell_dep(self.ctx.scripts.sudt_dep());
        skeleton.push_cell_dep(self.ctx.scripts.cheque_dep());
        Ok(())
    }

    fn build_outputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        let claimed = CellOutput::new_builder()
            .capacity(Capacity::shannons(self.ctx.cheque.udt_cell_capacity).pack())
            .lock(self.receiver.clone())
            .type_(Some(self.ctx.scripts.sudt_type(&self.udt_owner)).pack())
            .build();
        let index = skeleton.push_output(claimed, udt::encode_amount(self.cheques.extra.amount));
        skeleton.raise_to_occupied(index)?;

        for (sender, capacity) in self.cheques.extra.refunds.refunds() {
            let refund = CellOutput::new_builder()
                .capacity(capacity.pack())
                .lock(sender.clone())
                .build();
            skeleton.push_output(refund, Bytes::new());
        }

        let change = CellOutput::new_builder().lock(self.receiver.clone()).build();
        skeleton.set_change_output(change, Bytes::new());
        Ok(())
    }

    fn build_inputs(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        for cheque in &self.cheques.cells {
            skeleton.push_input(
                cheque.out_point.clone(),
                cheque.output.clone(),
                Since::zero(),
                None,
            );
        }
        let plain_cells = self
            .ctx
            .live_cells(SearchKey::plain_by_lock(self.receiver.clone()));
        balance::collect_capacity(&self.ctx, skeleton, vec![plain_cells])?;
        Ok(())
    }

    fn finalize_change(&mut self, skeleton: &mut TxSkeleton) -> Result<(), Error> {
        balance::finalize_change(&self.ctx, skeleton)
    }

    fn signing_locks(&self) -> Vec<Script> {
        vec![self.receiver.clone()]
    }
}
