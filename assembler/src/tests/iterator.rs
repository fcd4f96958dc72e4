use super::{MockLedger, assert_well_formed, ckb, config, lock};
use crate::iterator::LiveCellIterator;
use crate::transfer::TransferRequest;
use crate::{Assembler, Error};
use ckb_assembler_config::AssemblerConfig;
use ckb_assembler_traits::{Order, SearchKey};
use ckb_types::{core::Capacity, packed::OutPoint};
use pretty_assertions::assert_eq;

fn fund_seven(ledger: &mut MockLedger) -> Vec<OutPoint> {
    let capacities: Vec<Capacity> = (1..=7).map(|hundreds| ckb(hundreds * 100)).collect();
    let tx = ledger.fund_plain(&lock(1), &capacities);
    (0..7).map(|index| OutPoint::new(tx.hash(), index)).collect()
}

#[test]
fn test_pages_until_empty() {
    let mut ledger = MockLedger::new();
    let out_points = fund_seven(&mut ledger);
    ledger.fund_plain(&lock(2), &[ckb(100)]);

    let cells = LiveCellIterator::new(&ledger, SearchKey::by_lock(lock(1)), Order::Asc, 3)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let found: Vec<OutPoint> = cells.into_iter().map(|cell| cell.out_point).collect();
    assert_eq!(found, out_points);
    // 3 + 3 + 1, then the empty page
    assert_eq!(ledger.page_requests(), 4);
}

#[test]
fn test_descending_order() {
    let mut ledger = MockLedger::new();
    let mut out_points = fund_seven(&mut ledger);
    out_points.reverse();

    let found: Vec<OutPoint> =
        LiveCellIterator::new(&ledger, SearchKey::by_lock(lock(1)), Order::Desc, 2)
            .map(|cell| cell.unwrap().out_point)
            .collect();
    assert_eq!(found, out_points);
}

#[test]
fn test_pages_fetched_lazily() {
    let mut ledger = MockLedger::new();
    fund_seven(&mut ledger);
    let config = AssemblerConfig {
        search_page_size: 2,
        ..config()
    };

    let mut iter = LiveCellIterator::new(&ledger, SearchKey::by_lock(lock(1)), Order::Asc, 2);
    assert!(iter.next().is_some());
    assert!(iter.next().is_some());
    assert_eq!(ledger.page_requests(), 1);
    assert!(iter.next().is_some());
    assert_eq!(ledger.page_requests(), 2);

    // 100 + 200 + 300 + 400 + 500 is the first sum above 1450
    let assembled = Assembler::new(&config, &ledger)
        .unwrap()
        .transfer(TransferRequest {
            from: vec![lock(1)],
            to: vec![(lock(2), ckb(1450))],
            change: None,
        })
        .unwrap();
    assert_well_formed(&assembled, ledger.inputs_capacity(&assembled.transaction));
    assert_eq!(assembled.transaction.inputs().len(), 5);
    assert_eq!(ledger.page_requests(), 2 + 3);
}

#[test]
fn test_error_fuses_iterator() {
    let mut ledger = MockLedger::new();
    fund_seven(&mut ledger);
    ledger.break_down();

    let mut iter = LiveCellIterator::new(&ledger, SearchKey::by_lock(lock(1)), Order::Asc, 3);
    assert!(matches!(iter.next(), Some(Err(Error::RemoteQueryFailure(_)))));
    assert!(iter.next().is_none());
    assert_eq!(ledger.page_requests(), 0);
}
