use page::page_id::PageId;
use thiserror::Error;

/// Errors a [`crate::PageStore`] implementation can surface. `MarshalError`
/// (a wrong page type or buffer size discovered during unmarshal) is not
/// part of this enum — the page crate treats it as a programmer error or
/// corrupt storage and panics rather than returning a `Result`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page id {0} is beyond the store's last page ({1})")]
    InvalidPageId(PageId, PageId),
    #[error("underlying storage error")]
    Io(#[from] std::io::Error),
    #[error("store is open read-only; mutating operations are rejected")]
    ReadOnlyViolation,
}

pub type StoreResult<T> = Result<T, StoreError>;
