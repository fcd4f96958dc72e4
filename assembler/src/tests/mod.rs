mod iterator;
mod transfer;

use crate::amount::ONE_CKB;
use crate::director::AssembledTransaction;
use crate::fee::SizeFeeEstimator;
use crate::skeleton::SIGNATURE_PLACEHOLDER_LEN;
use ckb_assembler_config::{AssemblerConfig, ScriptsConfig};
use ckb_assembler_traits::FeeEstimator;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, ScriptHashType},
    packed::{Script, WitnessArgs},
    prelude::*,
};

pub(crate) use self::mock_ledger::MockLedger;

pub(crate) const FEE_RATE: u64 = 1_000;

pub(crate) fn config() -> AssemblerConfig {
    AssemblerConfig {
        fee_rate: FEE_RATE,
        ..Default::default()
    }
}

pub(crate) fn ckb(amount: u64) -> Capacity {
    Capacity::shannons(amount * ONE_CKB)
}

/// A default lock with `[byte; 20]` as args.
pub(crate) fn lock(byte: u8) -> Script {
    let secp = ScriptsConfig::mainnet().secp256k1_blake160;
    Script::new_builder()
        .code_hash(secp.code_hash.pack())
        .hash_type(ScriptHashType::from(secp.hash_type).into())
        .args(Bytes::from(vec![byte; 20]).pack())
        .build()
}

pub(crate) fn output_capacity(assembled: &AssembledTransaction, index: usize) -> Capacity {
    let output = assembled
        .transaction
        .output(index)
        .expect("output exists");
    output.capacity().unpack()
}

/// Checks what every assembled transaction must satisfy given the
/// capacity its inputs are worth.
pub(crate) fn assert_well_formed(assembled: &AssembledTransaction, inputs_capacity: Capacity) {
    let tx = &assembled.transaction;
    let outputs_capacity = tx.outputs_capacity().expect("no overflow");
    assert_eq!(
        inputs_capacity,
        outputs_capacity.safe_add(assembled.fee).expect("no overflow"),
        "inputs must equal outputs plus fee"
    );

    let minimal_fee = SizeFeeEstimator
        .estimate_fee(tx, FEE_RATE)
        .expect("size fee never fails");
    assert!(
        assembled.fee.as_u64() >= minimal_fee,
        "fee {} below {}",
        assembled.fee.as_u64(),
        minimal_fee
    );

    for (index, (output, data)) in tx.outputs_with_data_iter().enumerate() {
        let occupied = output
            .occupied_capacity(Capacity::bytes(data.len()).expect("no overflow"))
            .expect("no overflow");
        let capacity: Capacity = output.capacity().unpack();
        assert!(capacity >= occupied, "output {index} below occupied");
    }

    let mut grouped: Vec<usize> = assembled
        .groups
        .iter()
        .flat_map(|group| group.input_indices.iter().copied())
        .collect();
    grouped.sort_unstable();
    assert_eq!(grouped, (0..tx.inputs().len()).collect::<Vec<_>>());

    for group in &assembled.groups {
        let Some(&first) = group.input_indices.first() else {
            continue;
        };
        let witness = tx.witnesses().get(first).expect("witness of first input");
        let args = WitnessArgs::from_slice(&witness.raw_data()).expect("witness args");
        let placeholder = args.lock().to_opt().expect("lock placeholder");
        assert_eq!(placeholder.raw_data(), vec![0u8; SIGNATURE_PLACEHOLDER_LEN]);
    }
}
