use crate::errors::StoreResult;
use crate::stats::StatsSnapshot;
use page::page_id::PageId;
use page::Page;

/// A durable, indexable array of `PAGE_SIZE` pages with concurrent access.
///
/// Implementations guarantee: `read` takes no lock beyond what the OS
/// provides for concurrent positional reads; `write`/`new_page`/`append`/
/// `wipe` serialize with each other through a single internal mutex.
/// Durability (fsync) is not guaranteed per-write — see the implementation
/// docs for the trade-off.
pub trait PageStore {
    /// Reads the page at `id`, deserializing it into the variant its
    /// on-disk type tag names. Fails with `InvalidPageId` if `id` is
    /// beyond the store's last page.
    fn read(&self, id: PageId) -> StoreResult<Page>;

    /// Reads the page at `id` into `page` in place, reusing its existing
    /// buffer instead of allocating a new one. Fails with `InvalidPageId`
    /// if `id` is beyond the store's last page.
    fn read_into(&self, id: PageId, page: &mut Page) -> StoreResult<()>;

    /// Serializes `page` and writes it at `id`. Fails with `InvalidPageId`
    /// if `id` is beyond the store's last page.
    fn write(&self, id: PageId, page: &Page) -> StoreResult<()>;

    /// Appends a fresh, zero-filled page and returns its id.
    fn new_page(&self) -> StoreResult<PageId>;

    /// Serializes `page` and appends it, returning its new id.
    fn append(&self, page: &Page) -> StoreResult<PageId>;

    /// Overwrites the page at `id` with zero bytes without changing `count`.
    fn wipe(&self, id: PageId) -> StoreResult<()>;

    /// Total number of pages currently in the store.
    fn count(&self) -> i64;

    /// Operation counters (reads/writes/news/appends/wipes) since open.
    fn stats(&self) -> StatsSnapshot;

    /// Releases the store's underlying resources.
    fn close(&self) -> StoreResult<()>;
}
