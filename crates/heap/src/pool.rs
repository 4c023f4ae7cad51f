use page::Page;
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// A pool of reusable [`Page`] objects, so a hot `Get` path doesn't allocate
/// a fresh 8192-byte page on every call. Borrowers get scoped ownership via
/// [`PooledPage`]; the page returns to the pool on `Drop`. The caller is
/// expected to overwrite the borrowed page's contents in full (via
/// `PageStore::read_into`) before reading from it — `acquire` does not clear
/// stale data itself, since doing so would be wasted work ahead of that
/// overwrite.
#[derive(Debug, Default)]
pub struct PagePool {
    pages: Mutex<Vec<Page>>,
}

impl PagePool {
    pub fn new() -> Self {
        PagePool {
            pages: Mutex::new(Vec::new()),
        }
    }

    pub fn acquire(&self) -> PooledPage<'_> {
        let page = self
            .pages
            .lock()
            .expect("page pool mutex poisoned")
            .pop()
            .unwrap_or_else(Page::new_heap_data);
        PooledPage {
            pool: self,
            page: Some(page),
        }
    }

    fn release(&self, page: Page) {
        self.pages
            .lock()
            .expect("page pool mutex poisoned")
            .push(page);
    }
}

/// A [`Page`] borrowed from a [`PagePool`]. Returned to the pool
/// automatically when dropped.
#[derive(Debug)]
pub struct PooledPage<'a> {
    pool: &'a PagePool,
    page: Option<Page>,
}

impl Deref for PooledPage<'_> {
    type Target = Page;
    fn deref(&self) -> &Self::Target {
        self.page.as_ref().expect("page taken before drop")
    }
}

impl DerefMut for PooledPage<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.page.as_mut().expect("page taken before drop")
    }
}

impl Drop for PooledPage<'_> {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            self.pool.release(page);
        }
    }
}
