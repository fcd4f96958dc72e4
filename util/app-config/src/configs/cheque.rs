use serde::{Deserialize, Serialize};

const ONE_CKB: u64 = 100_000_000;

/// Occupied capacity of a cheque cell: 40 bytes of lock args and an sUDT
/// type with 16 bytes of data.
pub const MIN_CHEQUE_CELL_CAPACITY: u64 = 162 * ONE_CKB;
/// Occupied capacity of an sUDT cell under a 20-byte-args lock.
pub const MIN_UDT_CELL_CAPACITY: u64 = 142 * ONE_CKB;

/// Capacities locked into cells the cheque flows create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChequeConfig {
    /// Capacity of an issued cheque cell, in shannons. Independent of the
    /// amount of token it carries.
    #[serde(default = "default_cell_capacity")]
    pub cell_capacity: u64,
    /// Capacity of a plain sUDT cell (token change on issue, claimed tokens on
    /// claim), in shannons.
    #[serde(default = "default_udt_cell_capacity")]
    pub udt_cell_capacity: u64,
}

impl Default for ChequeConfig {
    fn default() -> Self {
        ChequeConfig {
            cell_capacity: default_cell_capacity(),
            udt_cell_capacity: default_udt_cell_capacity(),
        }
    }
}

const fn default_cell_capacity() -> u64 {
    MIN_CHEQUE_CELL_CAPACITY
}

const fn default_udt_cell_capacity() -> u64 {
    MIN_UDT_CELL_CAPACITY
}
