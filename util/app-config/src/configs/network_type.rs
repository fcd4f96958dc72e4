use serde::{Deserialize, Serialize};
use std::fmt;

/// The chain the assembler builds transactions for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// Mirana, the main network.
    #[default]
    Mainnet,
    /// Pudge, the public test network.
    Testnet,
    /// A local chain. System scripts must be configured explicitly.
    Dev,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            NetworkType::Mainnet => "mainnet",
            NetworkType::Testnet => "testnet",
            NetworkType::Dev => "dev",
        };
        write!(f, "{name}")
    }
}
