use page::errors::page_error::PageError;
use store::StoreError;
use thiserror::Error;

/// Failures from the heap manager and its scanner.
#[derive(Debug, Error)]
pub enum HeapError {
    #[error("cannot store a zero-length record")]
    ZeroLengthRecord,
    #[error("error from the underlying page store")]
    Store(#[from] StoreError),
    #[error("error from a heap page operation")]
    Page(#[from] PageError),
}

pub type HeapResult<T> = Result<T, HeapError>;
