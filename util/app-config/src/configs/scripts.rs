use super::NetworkType;
use ckb_types::{H256, core, h256};
use serde::{Deserialize, Serialize};

/// How a script's `code_hash` is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashTypeConfig {
    /// `code_hash` is the hash of the script binary, run with VM version 0.
    Data,
    /// `code_hash` is the hash of the type script of the cell holding the binary.
    Type,
    /// `code_hash` is the hash of the script binary, run with VM version 1.
    Data1,
    /// `code_hash` is the hash of the script binary, run with VM version 2.
    Data2,
}

impl From<HashTypeConfig> for core::ScriptHashType {
    fn from(hash_type: HashTypeConfig) -> Self {
        match hash_type {
            HashTypeConfig::Data => core::ScriptHashType::Data,
            HashTypeConfig::Type => core::ScriptHashType::Type,
            HashTypeConfig::Data1 => core::ScriptHashType::Data1,
            HashTypeConfig::Data2 => core::ScriptHashType::Data2,
        }
    }
}

/// How the cell dep of a script is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepTypeConfig {
    /// The dep cell holds the script binary.
    Code,
    /// The dep cell holds a list of out points to expand.
    DepGroup,
}

impl From<DepTypeConfig> for core::DepType {
    fn from(dep_type: DepTypeConfig) -> Self {
        match dep_type {
            DepTypeConfig::Code => core::DepType::Code,
            DepTypeConfig::DepGroup => core::DepType::DepGroup,
        }
    }
}

/// Where a system script lives and how to reference it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
    /// Code hash used in `Script::code_hash`.
    pub code_hash: H256,
    /// Hash type used in `Script::hash_type`.
    pub hash_type: HashTypeConfig,
    /// Transaction of the cell dep.
    pub tx_hash: H256,
    /// Output index of the cell dep.
    pub index: u32,
    /// Dep type of the cell dep.
    pub dep_type: DepTypeConfig,
}

/// The system scripts the assembler references.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptsConfig {
    /// The default `secp256k1_blake160_sighash_all` lock.
    pub secp256k1_blake160: ScriptConfig,
    /// The Nervos DAO type script.
    pub dao: ScriptConfig,
    /// The simple UDT type script.
    pub sudt: ScriptConfig,
    /// The cheque lock script.
    pub cheque: ScriptConfig,
}

impl ScriptsConfig {
    /// Returns the well-known deployment of `network`, `None` for devnets.
    pub fn for_network(network: NetworkType) -> Option<Self> {
        match network {
            NetworkType::Mainnet => Some(Self::mainnet()),
            NetworkType::Testnet => Some(Self::testnet()),
            NetworkType::Dev => None,
        }
    }

    /// System scripts deployed on mainnet.
    pub fn mainnet() -> Self {
        ScriptsConfig {
            secp256k1_blake160: ScriptConfig {
                code_hash: h256!(
                    "0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8"
                ),
                hash_type: HashTypeConfig::Type,
                tx_hash: h256!(
                    "0x71a7ba8fc96349fea0ed3a5c47992e3b4084b031a42264a018e0072e8172e46c"
                ),
                index: 0,
                dep_type: DepTypeConfig::DepGroup,
            },
            dao: ScriptConfig {
                code_hash: h256!(
                    "0x82d76d1b75fe2fd9a27dfbaa65a039221a380d76c926f378d3f81cf3e7e13f2e"
                ),
                hash_type: HashTypeConfig::Type,
                tx_hash: h256!(
                    "0xe2fb199810d49a4d8beec56718ba2593b665db9d52299a0f9e6e75416d73ff5c"
                ),
                index: 2,
                dep_type: DepTypeConfig::Code,
            },
            sudt: ScriptConfig {
                code_hash: h256!(
                    "0x5e7a36a77e68eecc013dfa2fe6a23f3b6c344b04005808694ae6dd45eea4cfd5"
                ),
                hash_type: HashTypeConfig::Type,
                tx_hash: h256!(
                    "0xc7813f6a415144643970c2e88e0bb6ca6a8edc5dd7c1022746f628284a9936d5"
                ),
                index: 0,
                dep_type: DepTypeConfig::Code,
            },
            cheque: ScriptConfig {
                code_hash: h256!(
                    "0xe4d4ecc6e5f9a059bf2f7a82cca292083aebc0c421566a52484fe2ec51a9fb0c"
                ),
                hash_type: HashTypeConfig::Type,
                tx_hash: h256!(
                    "0x04632cc459459cf5c9d384b43dee3e36f542a464bdd4127be7d6618ac6f8d268"
                ),
                index: 0,
                dep_type: DepTypeConfig::DepGroup,
            },
        }
    }

    /// System scripts deployed on testnet.
    pub fn testnet() -> Self {
        ScriptsConfig {
            secp256k1_blake160: ScriptConfig {
                code_hash: h256!(
                    "0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8"
                ),
                hash_type: HashTypeConfig::Type,
                tx_hash: h256!(
                    "0xf8de3bb47d055cdf460d93a2a6e1b05f7432f9777c8c474abf4eec1d4aee5d37"
                ),
                index: 0,
                dep_type: DepTypeConfig::DepGroup,
            },
            dao: ScriptConfig {
                code_hash: h256!(
                    "0x82d76d1b75fe2fd9a27dfbaa65a039221a380d76c926f378d3f81cf3e7e13f2e"
                ),
                hash_type: HashTypeConfig::Type,
                tx_hash: h256!(
                    "0x8f8c79eb6671709633fe6a46de93c0fedc9c1b8a6527a18d3983879542635c9f"
                ),
                index: 2,
                dep_type: DepTypeConfig::Code,
            },
            sudt: ScriptConfig {
                code_hash: h256!(
                    "0xc5e5dcf215925f7ef4dfaf5f4b4f105bc321c02776d6e7d52a1db3fcd9d011a4"
                ),
                hash_type: HashTypeConfig::Type,
                tx_hash: h256!(
                    "0xe12877ebd2c3c364dc46c5c992bcfaf4fee33fa13eebdf82c591fc9825aab769"
                ),
                index: 0,
                dep_type: DepTypeConfig::Code,
            },
            cheque: ScriptConfig {
                code_hash: h256!(
                    "0x60d5f39efce409c587cb9ea359cefdead650ca128f0bd9cb3855348f98c70d5b"
                ),
                hash_type: HashTypeConfig::Type,
                tx_hash: h256!(
                    "0x7f96858be0a9d584b4a9ea190e0420835156a6010a5fde15ffcdc9d9c721ccab"
                ),
                index: 0,
                dep_type: DepTypeConfig::DepGroup,
            },
        }
    }
}
