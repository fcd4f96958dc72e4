use crate::error::Error;
use ckb_types::{bytes::Bytes, packed::Script, prelude::*};

/// Bytes of a lock hash kept in cheque args.
pub const LOCK_HASH_PREFIX_LEN: usize = 20;
/// Length of the cheque lock args.
pub const CHEQUE_ARGS_LEN: usize = LOCK_HASH_PREFIX_LEN * 2;

/// First 20 bytes of the script hash of `lock`.
pub fn lock_hash_prefix(lock: &Script) -> [u8; LOCK_HASH_PREFIX_LEN] {
    let mut prefix = [0u8; LOCK_HASH_PREFIX_LEN];
    prefix.copy_from_slice(&lock.calc_script_hash().as_slice()[..LOCK_HASH_PREFIX_LEN]);
    prefix
}

/// Args of a cheque lock: receiver lock hash prefix, then sender lock hash
/// prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChequeArgs {
    receiver: [u8; LOCK_HASH_PREFIX_LEN],
    sender: [u8; LOCK_HASH_PREFIX_LEN],
}

impl ChequeArgs {
    pub fn new(receiver_lock: &Script, sender_lock: &Script) -> Self {
        ChequeArgs {
            receiver: lock_hash_prefix(receiver_lock),
            sender: lock_hash_prefix(sender_lock),
        }
    }

    pub fn from_slice(args: &[u8]) -> Result<Self, Error> {
        if args.len() != CHEQUE_ARGS_LEN {
            return Err(Error::EncodingFailure(format!(
                "cheque args must be {CHEQUE_ARGS_LEN} bytes, got {}",
                args.len()
            )));
        }
        let mut receiver = [0u8; LOCK_HASH_PREFIX_LEN];
        let mut sender = [0u8; LOCK_HASH_PREFIX_LEN];
        receiver.copy_from_slice(&args[..LOCK_HASH_PREFIX_LEN]);
        sender.copy_from_slice(&args[LOCK_HASH_PREFIX_LEN..]);
        Ok(ChequeArgs { receiver, sender })
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut args = Vec::with_capacity(CHEQUE_ARGS_LEN);
        args.extend_from_slice(&self.receiver);
        args.extend_from_slice(&self.sender);
        Bytes::from(args)
    }

    pub fn receiver_prefix(&self) -> &[u8] {
        &self.receiver
    }

    pub fn sender_prefix(&self) -> &[u8] {
        &self.sender
    }

    /// Whether `lock` hashes to the embedded sender prefix.
    pub fn is_sender(&self, lock: &Script) -> bool {
        lock_hash_prefix(lock) == self.sender
    }
}
