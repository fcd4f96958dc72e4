use super::{MockLedger, assert_well_formed, ckb, config, lock, output_capacity};
use crate::transfer::TransferRequest;
use crate::udt;
use crate::{Assembler, Error};
use ckb_assembler_config::{AssemblerConfig, ConfigError, NetworkType};
use ckb_types::{
    core::Capacity,
    packed::{CellOutput, Script},
    prelude::*,
};
use pretty_assertions::assert_eq;

fn request(
    from: Vec<Script>,
    to: Vec<(Script, Capacity)>,
    change: Option<Script>,
) -> TransferRequest {
    TransferRequest { from, to, change }
}

#[test]
fn test_transfer_with_change() {
    let mut ledger = MockLedger::new();
    ledger.fund_plain(&lock(1), &[ckb(1000)]);

    let assembler = Assembler::new(&config(), &ledger).unwrap();
    let assembled = assembler
        .transfer(request(vec![lock(1)], vec![(lock(2), ckb(100))], Some(lock(1))))
        .unwrap();
    let tx = &assembled.transaction;

    assert_well_formed(&assembled, ledger.inputs_capacity(tx));
    assert_eq!(tx.inputs().len(), 1);
    assert_eq!(tx.outputs().len(), 2);
    assert_eq!(tx.cell_deps().len(), 1);
    assert_eq!(output_capacity(&assembled, 0), ckb(100));
    assert_eq!(tx.output(1).unwrap().lock(), lock(1));
    assert_eq!(
        output_capacity(&assembled, 1),
        ckb(900).safe_sub(assembled.fee).unwrap()
    );
    assert_eq!(assembled.groups.len(), 1);
    assert_eq!(assembled.groups[0].input_indices, vec![0]);
}

#[test]
fn test_zero_leftover_removes_change() {
    // learn the fee of a one input, two outputs transfer
    let fee = {
        let mut ledger = MockLedger::new();
        ledger.fund_plain(&lock(1), &[ckb(1000)]);
        Assembler::new(&config(), &ledger)
            .unwrap()
            .transfer(request(vec![lock(1)], vec![(lock(2), ckb(100))], Some(lock(1))))
            .unwrap()
            .fee
    };

    let mut ledger = MockLedger::new();
    ledger.fund_plain(&lock(1), &[ckb(100).safe_add(fee).unwrap()]);
    let assembled = Assembler::new(&config(), &ledger)
        .unwrap()
        .transfer(request(vec![lock(1)], vec![(lock(2), ckb(100))], Some(lock(1))))
        .unwrap();

    assert_well_formed(&assembled, ledger.inputs_capacity(&assembled.transaction));
    assert_eq!(assembled.transaction.outputs().len(), 1);
    assert_eq!(assembled.fee, fee);
}

#[test]
fn test_small_leftover_keeps_collecting() {
    let mut ledger = MockLedger::new();
    // 20 CKB left after the first cell can't fund a 61 CKB change cell
    ledger.fund_plain(&lock(1), &[ckb(120), ckb(100)]);
    let assembled = Assembler::new(&config(), &ledger)
        .unwrap()
        .transfer(request(vec![lock(1)], vec![(lock(2), ckb(100))], Some(lock(1))))
        .unwrap();

    assert_well_formed(&assembled, ledger.inputs_capacity(&assembled.transaction));
    assert_eq!(assembled.transaction.inputs().len(), 2);
    assert_eq!(
        output_capacity(&assembled, 1),
        ckb(120).safe_sub(assembled.fee).unwrap()
    );
}

#[test]
fn test_sweep_without_change() {
    let mut ledger = MockLedger::new();
    ledger.fund_plain(&lock(1), &[ckb(50), ckb(60), ckb(70)]);
    let assembled = Assembler::new(&config(), &ledger)
        .unwrap()
        .transfer(request(vec![lock(1)], vec![(lock(2), ckb(100))], None))
        .unwrap();

    assert_well_formed(&assembled, ledger.inputs_capacity(&assembled.transaction));
    assert_eq!(assembled.transaction.inputs().len(), 2);
    assert_eq!(assembled.transaction.outputs().len(), 1);
    assert_eq!(assembled.fee, ckb(10));
}

#[test]
fn test_drain_senders_in_order() {
    let mut ledger = MockLedger::new();
    ledger.fund_plain(&lock(1), &[ckb(30)]);
    ledger.fund_plain(&lock(3), &[ckb(200)]);
    let assembled = Assembler::new(&config(), &ledger)
        .unwrap()
        .transfer(request(
            vec![lock(1), lock(3)],
            vec![(lock(2), ckb(100))],
            Some(lock(1)),
        ))
        .unwrap();

    assert_well_formed(&assembled, ledger.inputs_capacity(&assembled.transaction));
    let groups: Vec<(Script, Vec<usize>)> = assembled
        .groups
        .iter()
        .map(|group| (group.script.clone(), group.input_indices.clone()))
        .collect();
    assert_eq!(groups, vec![(lock(1), vec![0]), (lock(3), vec![1])]);
}

#[test]
fn test_only_plain_cells_pay() {
    let mut ledger = MockLedger::new();
    let sudt = crate::scripts::SystemScripts::new(config().scripts().unwrap())
        .sudt_type(&lock(9).calc_script_hash());
    let token_cell = CellOutput::new_builder()
        .capacity(ckb(10_000).pack())
        .lock(lock(1))
        .type_(Some(sudt).pack())
        .build();
    let token_tx = ledger.fund(vec![(token_cell, udt::encode_amount(1))]);
    ledger.fund_plain(&lock(1), &[ckb(500)]);

    let assembled = Assembler::new(&config(), &ledger)
        .unwrap()
        .transfer(request(vec![lock(1)], vec![(lock(2), ckb(100))], Some(lock(1))))
        .unwrap();

    let spends_token = assembled
        .transaction
        .inputs()
        .into_iter()
        .any(|input| input.previous_output().tx_hash() == token_tx.hash());
    assert!(!spends_token);
    assert_well_formed(&assembled, ledger.inputs_capacity(&assembled.transaction));
}

#[test]
fn test_insufficient_capacity() {
    let mut ledger = MockLedger::new();
    ledger.fund_plain(&lock(1), &[ckb(50), ckb(40)]);
    let err = Assembler::new(&config(), &ledger)
        .unwrap()
        .transfer(request(vec![lock(1)], vec![(lock(2), ckb(100))], Some(lock(1))))
        .unwrap_err();

    match err {
        Error::InsufficientCapacity {
            required,
            collected,
        } => {
            assert_eq!(collected, u128::from(ckb(90).as_u64()));
            assert!(required > u128::from(ckb(100).as_u64()));
        }
        err => panic!("unexpected error {err}"),
    }
    assert_eq!(ledger.live_cells().len(), 2);
}

#[test]
fn test_reject_malformed_requests() {
    let mut ledger = MockLedger::new();
    ledger.fund_plain(&lock(1), &[ckb(1000)]);
    let assembler = Assembler::new(&config(), &ledger).unwrap();

    let err = assembler
        .transfer(request(vec![], vec![(lock(2), ckb(100))], None))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAddressOrScript(_)), "{err}");

    let err = assembler
        .transfer(request(vec![lock(1)], vec![], None))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAddressOrScript(_)), "{err}");

    let err = assembler
        .transfer(request(vec![lock(1)], vec![(lock(2), ckb(60))], None))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidAmount(_)), "{err}");
}

#[test]
fn test_query_failure_aborts() {
    let mut ledger = MockLedger::new();
    ledger.fund_plain(&lock(1), &[ckb(1000)]);
    ledger.break_down();
    let err = Assembler::new(&config(), &ledger)
        .unwrap()
        .transfer(request(vec![lock(1)], vec![(lock(2), ckb(100))], Some(lock(1))))
        .unwrap_err();
    assert!(matches!(err, Error::RemoteQueryFailure(_)), "{err}");
}

#[test]
fn test_dev_network_needs_scripts() {
    let ledger = MockLedger::new();
    let config = AssemblerConfig {
        network: NetworkType::Dev,
        ..Default::default()
    };
    let result = Assembler::new(&config, &ledger);
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_higher_fee_rate_costs_more() {
    let mut ledger = MockLedger::new();
    ledger.fund_plain(&lock(1), &[ckb(1000)]);
    let assembler = Assembler::new(&config(), &ledger).unwrap();
    let send = || request(vec![lock(1)], vec![(lock(2), ckb(100))], Some(lock(1)));

    let cheap = assembler.transfer(send()).unwrap();
    let expensive = Assembler::new(&config(), &ledger)
        .unwrap()
        .with_fee_rate(10_000)
        .transfer(send())
        .unwrap();
    assert_eq!(
        expensive.fee.as_u64(),
        cheap.fee.as_u64() * 10,
        "same shape, ten times the rate"
    );
}
