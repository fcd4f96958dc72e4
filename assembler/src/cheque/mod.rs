//! Cheque cells: conditional sUDT payments.
//!
//! A cheque cell is locked by the cheque lock with [`ChequeArgs`] and holds
//! the token amount in its data. The receiver claims it at any time, the
//! sender takes it back once it has been live for
//! [`CHEQUE_WITHDRAW_EPOCHS`] epochs.

mod args;
mod claim;
mod issue;
mod withdraw;

pub use self::args::{CHEQUE_ARGS_LEN, ChequeArgs, LOCK_HASH_PREFIX_LEN, lock_hash_prefix};
pub(crate) use self::claim::ChequeClaim;
pub use self::claim::RefundLedger;
pub(crate) use self::issue::ChequeIssue;
pub(crate) use self::withdraw::ChequeWithdraw;
pub use self::withdraw::cheque_withdraw_since;

use crate::scripts::SystemScripts;
use ckb_assembler_traits::{ScriptSearchMode, ScriptType, SearchKey, SearchKeyFilter};
use ckb_types::{bytes::Bytes, packed::Byte32};

/// Epochs a cheque stays claimable before the sender may withdraw it.
pub const CHEQUE_WITHDRAW_EPOCHS: u64 = 6;

/// Cheque cells of the sUDT issued by `udt_owner` whose args start with
/// `args_prefix`.
fn cheque_search_key(
    scripts: &SystemScripts,
    args_prefix: Bytes,
    udt_owner: &Byte32,
) -> SearchKey {
    SearchKey {
        script: scripts.cheque_lock(args_prefix),
        script_type: ScriptType::Lock,
        script_search_mode: ScriptSearchMode::Prefix,
        filter: Some(SearchKeyFilter {
            script: Some(scripts.sudt_type(udt_owner)),
            ..Default::default()
        }),
        with_data: true,
    }
}
