//! Sequential scan over every live record in a heap, in physical order:
//! ascending page id, then ascending slot within page.

use crate::heap::Heap;
use crate::rid::Rid;
use page::errors::heap_page_error::HeapPageError;
use page::heap_data_page::HeapDataPage;
use page::PageId;
use std::sync::Mutex;
use store::PageStore;

enum State {
    AtBof,
    ReadingPage,
    ReadingRecord,
    AtEof,
}

struct ScannerState {
    state: State,
    page_id: PageId,
    slot: i16,
    page: HeapDataPage,
}

/// Yields `(Rid, bytes)` for every live record, once. Holds its own page
/// object and its own mutex: concurrent calls serialize through that
/// mutex but each still produces a distinct Rid until exhaustion.
pub struct HeapScanner<'h, S: PageStore> {
    heap: &'h Heap<S>,
    inner: Mutex<ScannerState>,
}

impl<'h, S: PageStore> HeapScanner<'h, S> {
    pub fn new(heap: &'h Heap<S>) -> Self {
        HeapScanner {
            heap,
            inner: Mutex::new(ScannerState {
                state: State::AtBof,
                page_id: PageId::new(0),
                slot: 0,
                page: HeapDataPage::new(),
            }),
        }
    }

    /// Returns the next live record, or `None` once every page has been
    /// exhausted.
    pub fn next_record(&self) -> Option<(Rid, Vec<u8>)> {
        let mut st = self.inner.lock().expect("scanner mutex poisoned");
        loop {
            match st.state {
                State::AtBof => st.state = State::ReadingPage,
                State::AtEof => return None,
                State::ReadingPage => {
                    let next_id = PageId::new(st.page_id.value() + 1);
                    match self.heap.store().read(next_id) {
                        Ok(page) => {
                            st.page_id = next_id;
                            st.page = page.as_heap_data().clone();
                            st.slot = 0;
                            st.state = State::ReadingRecord;
                        }
                        Err(_) => {
                            st.state = State::AtEof;
                            return None;
                        }
                    }
                }
                State::ReadingRecord => {
                    st.slot += 1;
                    match st.page.get_record(st.slot as u16) {
                        Ok(bytes) => {
                            let rid = Rid::new(st.page_id, st.slot);
                            return Some((rid, bytes.to_vec()));
                        }
                        Err(HeapPageError::RecordDeleted { .. }) => {}
                        Err(_) => st.state = State::ReadingPage,
                    }
                }
            }
        }
    }
}

impl<'h, S: PageStore> Iterator for HeapScanner<'h, S> {
    type Item = (Rid, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    #[test]
    fn scanning_an_empty_heap_yields_nothing() {
        let heap = Heap::open(MemoryStore::new()).unwrap();
        let scanner = HeapScanner::new(&heap);
        assert!(scanner.next_record().is_none());
    }

    #[test]
    fn scan_visits_every_put_record_in_order() {
        let heap = Heap::open(MemoryStore::new()).unwrap();
        let rids: Vec<_> = (0..5)
            .map(|i| heap.put(format!("record-{i}").as_bytes()).unwrap())
            .collect();

        let scanner = HeapScanner::new(&heap);
        let mut seen = Vec::new();
        while let Some((rid, bytes)) = scanner.next_record() {
            seen.push((rid, bytes));
        }

        assert_eq!(seen.len(), rids.len());
        for (i, (rid, bytes)) in seen.iter().enumerate() {
            assert_eq!(*rid, rids[i]);
            assert_eq!(bytes, format!("record-{i}").as_bytes());
        }
        assert!(scanner.next_record().is_none());
    }

    #[test]
    fn scan_skips_a_deleted_record_without_skipping_its_neighbors() {
        let heap = Heap::open(MemoryStore::new()).unwrap();
        let first = heap.put(b"keep-1").unwrap();
        let doomed = heap.put(b"delete-me").unwrap();
        let last = heap.put(b"keep-2").unwrap();
        heap.delete(doomed).unwrap();

        let scanner = HeapScanner::new(&heap);
        let seen: Vec<_> = std::iter::from_fn(|| scanner.next_record()).collect();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (first, b"keep-1".to_vec()));
        assert_eq!(seen[1], (last, b"keep-2".to_vec()));
    }
}
