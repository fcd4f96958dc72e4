//! Client side assembly of unsigned CKB transactions.
//!
//! The assembler reads the chain through [`LedgerProvider`], chooses live
//! cells to cover the outputs of a flow and its fee, settles the change and
//! groups the inputs by the lock that has to sign them. Signing and sending
//! the transaction are left to the caller.
//!
//! Flows:
//!
//! - plain capacity transfer
//! - Nervos DAO deposit, withdraw phase 1 and phase 2
//! - cheque issue, claim and withdraw
//!
//! Every flow runs through the same seven phases, see [`director`].
//!
//! [`LedgerProvider`]: ckb_assembler_traits::LedgerProvider

mod amount;
mod assembler;
pub mod balance;
pub mod cheque;
mod context;
pub mod dao;
pub mod director;
mod error;
pub mod fee;
pub mod group;
pub mod iterator;
pub mod scripts;
pub mod since;
pub mod skeleton;
mod transfer;
pub mod udt;

#[cfg(test)]
mod tests;

pub use crate::amount::{ONE_CKB, parse_capacity, parse_udt_amount};
pub use crate::assembler::Assembler;
pub use crate::context::AssemblyContext;
pub use crate::dao::DaoDepositInfo;
pub use crate::director::{Assemble, AssembledTransaction, assemble};
pub use crate::error::Error;
pub use crate::group::ScriptGroup;
pub use crate::transfer::TransferRequest;
