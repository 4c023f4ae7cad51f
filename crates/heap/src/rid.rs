use page::PageId;
use std::fmt;

/// A record identifier: the page it lives on plus its slot index. Stable
/// across compaction within the page — compaction may move a record's
/// bytes but never renumbers its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rid {
    pub page_id: PageId,
    pub slot: i16,
}

impl Rid {
    pub const fn new(page_id: PageId, slot: i16) -> Self {
        Rid { page_id, slot }
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_id, self.slot)
    }
}
