use crate::api::PageStore;
use crate::errors::{StoreError, StoreResult};
use crate::stats::{Stats, StatsSnapshot};
use page::page_id::PageId;
use page::{Page, PAGE_SIZE};
use std::sync::Mutex;

/// An in-memory [`PageStore`], retaining the exact same contract as
/// [`crate::FileStore`]. Used for tests and single-process caches where
/// durability is not required.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Mutex<Vec<Box<[u8; PAGE_SIZE]>>>,
    stats: Stats,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            pages: Mutex::new(Vec::new()),
            stats: Stats::default(),
        }
    }

    fn last_page_id(pages: &[Box<[u8; PAGE_SIZE]>]) -> PageId {
        PageId::new(pages.len() as i64 - 1)
    }
}

impl PageStore for MemoryStore {
    fn read(&self, id: PageId) -> StoreResult<Page> {
        let pages = self.pages.lock().expect("store mutex poisoned");
        let last = Self::last_page_id(&pages);
        if id.value() > last.value() || id.value() < 0 {
            return Err(StoreError::InvalidPageId(id, last));
        }
        self.stats.record_read();
        Ok(Page::unmarshal(pages[id.value() as usize].as_ref()))
    }

    fn read_into(&self, id: PageId, page: &mut Page) -> StoreResult<()> {
        let pages = self.pages.lock().expect("store mutex poisoned");
        let last = Self::last_page_id(&pages);
        if id.value() > last.value() || id.value() < 0 {
            return Err(StoreError::InvalidPageId(id, last));
        }
        self.stats.record_read();
        page.unmarshal_into(pages[id.value() as usize].as_ref());
        Ok(())
    }

    fn write(&self, id: PageId, page: &Page) -> StoreResult<()> {
        let mut pages = self.pages.lock().expect("store mutex poisoned");
        let last = Self::last_page_id(&pages);
        if id.value() > last.value() || id.value() < 0 {
            return Err(StoreError::InvalidPageId(id, last));
        }
        pages[id.value() as usize] = Box::new(page.marshal());
        self.stats.record_write();
        Ok(())
    }

    fn new_page(&self) -> StoreResult<PageId> {
        let mut pages = self.pages.lock().expect("store mutex poisoned");
        pages.push(Box::new([0u8; PAGE_SIZE]));
        self.stats.record_new();
        Ok(Self::last_page_id(&pages))
    }

    fn append(&self, page: &Page) -> StoreResult<PageId> {
        let mut pages = self.pages.lock().expect("store mutex poisoned");
        pages.push(Box::new(page.marshal()));
        self.stats.record_append();
        Ok(Self::last_page_id(&pages))
    }

    fn wipe(&self, id: PageId) -> StoreResult<()> {
        let mut pages = self.pages.lock().expect("store mutex poisoned");
        let last = Self::last_page_id(&pages);
        if id.value() > last.value() || id.value() < 0 {
            return Err(StoreError::InvalidPageId(id, last));
        }
        pages[id.value() as usize] = Box::new([0u8; PAGE_SIZE]);
        self.stats.record_wipe();
        Ok(())
    }

    fn count(&self) -> i64 {
        self.pages.lock().expect("store mutex poisoned").len() as i64
    }

    fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}
