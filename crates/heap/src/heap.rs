//! The heap manager: drives record writes to the tail page, persists the
//! header, and satisfies point reads/updates/deletes by [`Rid`].

use crate::errors::{HeapError, HeapResult};
use crate::pool::PagePool;
use crate::rid::Rid;
use page::errors::page_error::WithPageId;
use page::heap_data_page::HeapDataPage;
use page::heap_header_page::HeapHeaderPage;
use page::{Page, PageId};
use std::sync::Mutex;
use store::PageStore;

const HEADER_PAGE_ID: PageId = PageId::new(0);

struct HeapState {
    header: HeapHeaderPage,
    tail: HeapDataPage,
}

/// Owns the heap header page and a cached copy of the tail data page.
/// `put`/`set`/`delete`/`clear` serialize through a single mutex; `get`
/// does not, since it only ever reads immutable-on-disk state into a
/// thread-local page borrowed from the pool.
pub struct Heap<S: PageStore> {
    store: S,
    state: Mutex<HeapState>,
    pages: PagePool,
}

impl<S: PageStore> Heap<S> {
    /// Opens a heap over `store`, initializing header and tail pages if
    /// the store is empty.
    pub fn open(store: S) -> HeapResult<Self> {
        if store.count() == 0 {
            let mut header = HeapHeaderPage::new();
            let header_id = store.append(&Page::HeapHeader(header.clone()))?;
            header.set_page_id(header_id);

            let mut tail = HeapDataPage::new();
            let tail_id = store.append(&Page::HeapData(tail.clone()))?;
            tail.set_page_id(tail_id);

            header.set_last_page_id(tail_id);
            store.write(header_id, &Page::HeapHeader(header.clone()))?;
            store.write(tail_id, &Page::HeapData(tail))?;
        }

        let header = store.read(HEADER_PAGE_ID)?.as_heap_header().clone();
        let tail_id = header.last_page_id();
        let tail = store.read(tail_id)?.as_heap_data().clone();

        Ok(Heap {
            store,
            state: Mutex::new(HeapState { header, tail }),
            pages: PagePool::new(),
        })
    }

    /// Number of live records in the heap.
    pub fn count(&self) -> i64 {
        self.state.lock().expect("heap mutex poisoned").header.record_count()
    }

    /// Appends `bytes` as a new record, returning its [`Rid`].
    pub fn put(&self, bytes: &[u8]) -> HeapResult<Rid> {
        if bytes.is_empty() {
            return Err(HeapError::ZeroLengthRecord);
        }
        let mut state = self.state.lock().expect("heap mutex poisoned");

        if bytes.len() > state.tail.get_free_space() {
            state.tail.clear();
            let new_tail_id = self.store.append(&Page::HeapData(state.tail.clone()))?;
            state.tail.set_page_id(new_tail_id);
            state.header.set_last_page_id(new_tail_id);
            self.store
                .write(HEADER_PAGE_ID, &Page::HeapHeader(state.header.clone()))?;
        }

        let tail_id = state.header.last_page_id();
        let slot = state.tail.add_record(bytes).with_page_id(tail_id)?;
        self.store.write(tail_id, &Page::HeapData(state.tail.clone()))?;

        let new_record_count = state.header.record_count() + 1;
        state.header.set_record_count(new_record_count);
        self.store
            .write(HEADER_PAGE_ID, &Page::HeapHeader(state.header.clone()))?;

        let rid = Rid::new(tail_id, slot as i16);
        tracing::debug!(%rid, len = bytes.len(), "put record");
        Ok(rid)
    }

    /// Reads the record at `rid`, returning a copy of its bytes.
    pub fn get(&self, rid: Rid) -> HeapResult<Vec<u8>> {
        let mut page = self.pages.acquire();
        self.store.read_into(rid.page_id, &mut page)?;
        Ok(page
            .as_heap_data()
            .get_record(rid.slot as u16)
            .with_page_id(rid.page_id)?
            .to_vec())
    }

    /// Overwrites the record at `rid` with `bytes`. The heap does not
    /// migrate records between pages: a record that no longer fits on its
    /// own page fails with `InsufficientPageSpace` rather than moving.
    pub fn set(&self, rid: Rid, bytes: &[u8]) -> HeapResult<()> {
        let _guard = self.state.lock().expect("heap mutex poisoned");
        let mut loaded = self.store.read(rid.page_id)?;
        loaded
            .as_heap_data_mut()
            .set_record(rid.slot as u16, bytes)
            .with_page_id(rid.page_id)?;
        self.store.write(rid.page_id, &loaded)?;
        tracing::debug!(%rid, len = bytes.len(), "set record");
        Ok(())
    }

    /// Deletes the record at `rid`, decrementing the live record count.
    pub fn delete(&self, rid: Rid) -> HeapResult<()> {
        let mut state = self.state.lock().expect("heap mutex poisoned");
        let mut loaded = self.store.read(rid.page_id)?;
        loaded
            .as_heap_data_mut()
            .delete_record(rid.slot as u16)
            .with_page_id(rid.page_id)?;
        self.store.write(rid.page_id, &loaded)?;

        let new_record_count = state.header.record_count() - 1;
        state.header.set_record_count(new_record_count);
        self.store
            .write(HEADER_PAGE_ID, &Page::HeapHeader(state.header.clone()))?;
        tracing::debug!(%rid, "deleted record");
        Ok(())
    }

    /// Resets the heap to the freshly-initialized form: header and tail
    /// are reset in place and written back; no new pages are appended.
    pub fn clear(&self) -> HeapResult<()> {
        let mut state = self.state.lock().expect("heap mutex poisoned");
        let header_id = state.header.page_id();
        let tail_id = state.header.last_page_id();

        state.header.clear();
        state.header.set_page_id(header_id);
        state.header.set_last_page_id(tail_id);
        state.tail.clear();
        state.tail.set_page_id(tail_id);

        self.store
            .write(HEADER_PAGE_ID, &Page::HeapHeader(state.header.clone()))?;
        self.store.write(tail_id, &Page::HeapData(state.tail.clone()))?;
        tracing::debug!("cleared heap");
        Ok(())
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the heap, handing back the underlying store. Used when a
    /// caller wants to close out one heap and reopen another over the same
    /// backing storage.
    pub fn into_store(self) -> S {
        self.store
    }
}
