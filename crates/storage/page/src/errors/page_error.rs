use crate::errors::heap_page_error::HeapPageError;
use crate::page_id::PageId;

/// Public-facing error type returned by page operations: a [`HeapPageError`]
/// with the offending page's id attached, so a caller several layers up
/// (the heap manager, the scanner) can log or report which page misbehaved
/// without threading the id through every call site by hand.
#[derive(Debug, thiserror::Error)]
#[error("error on page {page_id}: {source}")]
pub struct PageError {
    pub page_id: PageId,
    pub source: HeapPageError,
}

pub type PageResult<T> = Result<T, PageError>;

/// Attaches page-id context when surfacing a [`HeapPageError`] to callers.
pub trait WithPageId<T> {
    fn with_page_id(self, page_id: PageId) -> PageResult<T>;
}

impl<T> WithPageId<T> for Result<T, HeapPageError> {
    fn with_page_id(self, page_id: PageId) -> PageResult<T> {
        self.map_err(|source| PageError { page_id, source })
    }
}
