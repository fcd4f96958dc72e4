mod cheque;
mod network_type;
mod scripts;

pub use cheque::{ChequeConfig, MIN_CHEQUE_CELL_CAPACITY, MIN_UDT_CELL_CAPACITY};
pub use network_type::NetworkType;
pub use scripts::{DepTypeConfig, HashTypeConfig, ScriptConfig, ScriptsConfig};
