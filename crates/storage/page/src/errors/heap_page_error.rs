use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use thiserror::Error;

/// Domain-level failures of a heap page operation (`AddRecord`, `GetRecord`,
/// `SetRecord`, `DeleteRecord`), plus the lower-level header/slot failures
/// that can bubble up while locating a slot.
#[derive(Debug, Error)]
pub enum HeapPageError {
    #[error("error while accessing the page header")]
    Header(#[from] HeaderError),
    #[error("error while accessing the slot array")]
    Slot(#[from] SlotError),
    #[error("slot {slot} is not a valid record slot on this page")]
    InvalidRid { slot: i16 },
    #[error("record at slot {slot} has been deleted")]
    RecordDeleted { slot: i16 },
    #[error("record of {needed} bytes does not fit in {available} free bytes on this page")]
    InsufficientPageSpace { needed: usize, available: usize },
    #[error("record of {len} bytes exceeds the per-page maximum of {max} bytes")]
    RecordExceedsMaxSize { len: usize, max: usize },
}
