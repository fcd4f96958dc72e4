use crate::cheque::{ChequeClaim, ChequeIssue, ChequeWithdraw};
use crate::context::AssemblyContext;
use crate::dao::{
    self, CommittedCell, DaoDeposit, DaoDepositInfo, DaoWithdrawPhase1, DaoWithdrawPhase2,
};
use crate::director::{AssembledTransaction, assemble};
use crate::error::Error;
use crate::fee::SizeFeeEstimator;
use crate::scripts::SystemScripts;
use crate::transfer::{Transfer, TransferRequest};
use ckb_assembler_config::{AssemblerConfig, ChequeConfig, ConfigError};
use ckb_assembler_traits::{FeeEstimator, LedgerProvider};
use ckb_types::{
    core::Capacity,
    packed::{Byte32, OutPoint, Script},
};

/// Entry point: one method per construction flow and per query.
///
/// Holds no state between calls. Two calls spending from the same lock may
/// pick the same live cells, so callers building several transactions for
/// one lock before committing any must serialize them.
pub struct Assembler<'a, L, F = SizeFeeEstimator> {
    ledger: &'a L,
    fee_estimator: F,
    fee_rate: u64,
    page_size: u32,
    scripts: SystemScripts,
    cheque: ChequeConfig,
}

impl<'a, L: LedgerProvider> Assembler<'a, L> {
    /// Creates an assembler pricing transactions by their serialized size.
    pub fn new(config: &AssemblerConfig, ledger: &'a L) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Assembler {
            ledger,
            fee_estimator: SizeFeeEstimator,
            fee_rate: config.fee_rate,
            page_size: config.search_page_size,
            scripts: SystemScripts::new(config.scripts()?),
            cheque: config.cheque.clone(),
        })
    }
}

impl<'a, L: LedgerProvider, F: FeeEstimator> Assembler<'a, L, F> {
    /// Replaces the fee estimator.
    pub fn with_fee_estimator<G: FeeEstimator>(self, fee_estimator: G) -> Assembler<'a, L, G> {
        Assembler {
            ledger: self.ledger,
            fee_estimator,
            fee_rate: self.fee_rate,
            page_size: self.page_size,
            scripts: self.scripts,
            cheque: self.cheque,
        }
    }

    /// Overrides the configured fee rate, in shannons per 1000 bytes.
    pub fn with_fee_rate(mut self, fee_rate: u64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    fn context(&self) -> AssemblyContext<'_, L, F> {
        AssemblyContext {
            ledger: self.ledger,
            fee_estimator: &self.fee_estimator,
            fee_rate: self.fee_rate,
            page_size: self.page_size,
            scripts: &self.scripts,
            cheque: &self.cheque,
        }
    }

    pub fn transfer(&self, request: TransferRequest) -> Result<AssembledTransaction, Error> {
        assemble(Transfer::new(self.context(), request))
    }

    /// Deposits `capacity` of the owner's plain cells into the DAO.
    pub fn dao_deposit(
        &self,
        owner: Script,
        capacity: Capacity,
    ) -> Result<AssembledTransaction, Error> {
        assemble(DaoDeposit::new(self.context(), owner, capacity))
    }

    /// Starts withdrawing the deposit at `deposit`.
    pub fn dao_withdraw_phase1(&self, deposit: OutPoint) -> Result<AssembledTransaction, Error> {
        assemble(DaoWithdrawPhase1::new(self.context(), deposit))
    }

    /// Claims the withdrawing cell at `withdrawing` with its compensation.
    pub fn dao_withdraw_phase2(
        &self,
        withdrawing: OutPoint,
    ) -> Result<AssembledTransaction, Error> {
        assemble(DaoWithdrawPhase2::new(self.context(), withdrawing))
    }

    /// Sends `amount` of the sUDT issued by `udt_owner` in a cheque.
    pub fn cheque_issue(
        &self,
        sender: Script,
        receiver: Script,
        udt_owner: Byte32,
        amount: u128,
    ) -> Result<AssembledTransaction, Error> {
        assemble(ChequeIssue::new(
            self.context(),
            sender,
            receiver,
            udt_owner,
            amount,
        ))
    }

    /// Claims every cheque of the sUDT issued by `udt_owner` sent to `receiver`.
    pub fn cheque_claim(
        &self,
        receiver: Script,
        udt_owner: Byte32,
    ) -> Result<AssembledTransaction, Error> {
        assemble(ChequeClaim::new(self.context(), receiver, udt_owner))
    }

    /// Takes back an unclaimed cheque holding exactly `amount`.
    pub fn cheque_withdraw(
        &self,
        sender: Script,
        receiver: Script,
        udt_owner: Byte32,
        amount: u128,
    ) -> Result<AssembledTransaction, Error> {
        assemble(ChequeWithdraw::new(
            self.context(),
            sender,
            receiver,
            udt_owner,
            amount,
        ))
    }

    /// What the deposit at `deposit` is worth if withdrawn in block
    /// `withdraw_block_hash`.
    pub fn dao_deposit_info(
        &self,
        deposit: &OutPoint,
        withdraw_block_hash: &Byte32,
    ) -> Result<DaoDepositInfo, Error> {
        let header = self
            .ledger
            .get_header(withdraw_block_hash)?
            .ok_or_else(|| Error::NotFound(format!("header {withdraw_block_hash}")))?;
        dao::deposit_info(self.ledger, &self.scripts, deposit, &header)
    }

    /// Deposit information of the withdrawing cell at `withdrawing`.
    pub fn dao_deposit_info_by_withdraw(
        &self,
        withdrawing: &OutPoint,
    ) -> Result<DaoDepositInfo, Error> {
        let withdrawing = CommittedCell::load(self.ledger, withdrawing)?;
        withdrawing.ensure_withdrawing(&self.scripts)?;
        dao::deposit_info(
            self.ledger,
            &self.scripts,
            &withdrawing.deposit_out_point()?,
            &withdrawing.header,
        )
    }

    /// What the deposit at `deposit` would be worth if withdrawn now.
    pub fn dao_deposit_info_at_tip(&self, deposit: &OutPoint) -> Result<DaoDepositInfo, Error> {
        let tip = self.ledger.get_tip_header()?;
        dao::deposit_info(self.ledger, &self.scripts, deposit, &tip)
    }
}
