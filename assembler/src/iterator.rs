//! Lazy paging over a live cell search.

use crate::error::Error;
use ckb_assembler_traits::{LedgerProvider, LiveCell, Order, SearchKey};
use ckb_logger::trace;
use ckb_types::bytes::Bytes;
use std::collections::VecDeque;

/// Yields the live cells matching a search key, asking the ledger for the
/// next page only once the current one is drained.
///
/// An empty page ends the iteration. After the first error the iterator is
/// fused and yields nothing more.
pub struct LiveCellIterator<'a, L> {
    ledger: &'a L,
    search_key: SearchKey,
    order: Order,
    limit: u32,
    cursor: Option<Bytes>,
    buffer: VecDeque<LiveCell>,
    finished: bool,
}

impl<'a, L: LedgerProvider> LiveCellIterator<'a, L> {
    pub fn new(ledger: &'a L, search_key: SearchKey, order: Order, limit: u32) -> Self {
        LiveCellIterator {
            ledger,
            search_key,
            order,
            limit,
            cursor: None,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    pub fn search_key(&self) -> &SearchKey {
        &self.search_key
    }

    fn fetch_page(&mut self) -> Result<(), Error> {
        let page = self.ledger.get_cells(
            &self.search_key,
            self.order,
            self.limit,
            self.cursor.clone(),
        )?;
        trace!(
            "fetched {} live cells after cursor {:?}",
            page.objects.len(),
            self.cursor
        );
        if page.objects.is_empty() {
            self.finished = true;
        } else {
            self.cursor = Some(page.last_cursor);
            self.buffer.extend(page.objects);
        }
        Ok(())
    }
}

impl<L: LedgerProvider> Iterator for LiveCellIterator<'_, L> {
    type Item = Result<LiveCell, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.buffer.is_empty() && !self.finished {
            if let Err(err) = self.fetch_page() {
                self.finished = true;
                return Some(Err(err));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
