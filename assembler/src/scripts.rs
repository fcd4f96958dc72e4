//! Packed forms of the configured system scripts.

use ckb_assembler_config::{ScriptConfig, ScriptsConfig};
use ckb_types::{
    bytes::Bytes,
    core::{DepType, ScriptHashType},
    packed::{Byte32, CellDep, OutPoint, Script},
    prelude::*,
};

/// The system scripts a flow references, with their cell deps.
#[derive(Clone, Debug)]
pub struct SystemScripts {
    config: ScriptsConfig,
}

impl SystemScripts {
    pub fn new(config: ScriptsConfig) -> Self {
        SystemScripts { config }
    }

    /// The Nervos DAO type script.
    pub fn dao_type(&self) -> Script {
        script(&self.config.dao, Bytes::new())
    }

    /// The sUDT type script of the token issued by the owner of `owner_lock_hash`.
    pub fn sudt_type(&self, owner_lock_hash: &Byte32) -> Script {
        script(&self.config.sudt, owner_lock_hash.as_bytes())
    }

    /// The cheque lock script with `args`.
    pub fn cheque_lock(&self, args: Bytes) -> Script {
        script(&self.config.cheque, args)
    }

    pub fn secp256k1_blake160_dep(&self) -> CellDep {
        cell_dep(&self.config.secp256k1_blake160)
    }

    pub fn dao_dep(&self) -> CellDep {
        cell_dep(&self.config.dao)
    }

    pub fn sudt_dep(&self) -> CellDep {
        cell_dep(&self.config.sudt)
    }

    pub fn cheque_dep(&self) -> CellDep {
        cell_dep(&self.config.cheque)
    }

    /// Whether `script` is the DAO type script.
    pub fn is_dao_type(&self, script: &Script) -> bool {
        script.as_slice() == self.dao_type().as_slice()
    }
}

fn script(config: &ScriptConfig, args: Bytes) -> Script {
    Script::new_builder()
        .code_hash(config.code_hash.pack())
        .hash_type(ScriptHashType::from(config.hash_type).into())
        .args(args.pack())
        .build()
}

fn cell_dep(config: &ScriptConfig) -> CellDep {
    CellDep::new_builder()
        .out_point(OutPoint::new(config.tx_hash.pack(), config.index))
        .dep_type(DepType::from(config.dep_type).into())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckb_types::h256;

    #[test]
    fn sudt_args_are_the_owner_lock_hash() {
        let scripts = SystemScripts::new(ScriptsConfig::testnet());
        let owner: Byte32 = h256!("0x5").pack();
        let sudt = scripts.sudt_type(&owner);
        assert_eq!(sudt.args().raw_data(), owner.as_bytes());
        assert_eq!(sudt.code_hash(), ScriptsConfig::testnet().sudt.code_hash.pack());
    }

    #[test]
    fn dao_type_has_no_args() {
        let scripts = SystemScripts::new(ScriptsConfig::mainnet());
        let dao = scripts.dao_type();
        assert!(dao.args().raw_data().is_empty());
        assert!(scripts.is_dao_type(&dao));
        assert!(!scripts.is_dao_type(&scripts.cheque_lock(Bytes::new())));
    }

    #[test]
    fn dep_group_is_kept() {
        let scripts = SystemScripts::new(ScriptsConfig::mainnet());
        let dep = scripts.secp256k1_blake160_dep();
        let dep_group: ckb_types::packed::Byte = DepType::DepGroup.into();
        assert_eq!(dep.dep_type().as_slice(), dep_group.as_slice());
        let index: u32 = dep.out_point().index().unpack();
        assert_eq!(index, 0);
    }
}
