//! The single page (always `PageID = 0`) that anchors a heap: its tail
//! page pointer and live record count.

use crate::header::{impl_header_accessors, HeaderMut, HeaderRef, HEADER_SIZE};
use crate::page_id::PageId;
use crate::page_type::PageType;
use crate::PAGE_SIZE;

const LAST_PAGE_ID_OFFSET: usize = 9;
const RECORD_COUNT_OFFSET: usize = 17;

impl_header_accessors! {
    last_page_id_raw: u64 = LAST_PAGE_ID_OFFSET;
    record_count: i64 = RECORD_COUNT_OFFSET;
}

/// The heap header page.
#[derive(Debug, Clone)]
pub struct HeapHeaderPage {
    bytes: Box<[u8; PAGE_SIZE]>,
}

impl HeapHeaderPage {
    /// Creates a fresh header: `last_page_id = 1`, `record_count = 0`.
    pub fn new() -> Self {
        let mut page = HeapHeaderPage {
            bytes: Box::new([0u8; PAGE_SIZE]),
        };
        page.header_mut()
            .set_page_type(PageType::HeapHeader)
            .expect("header write cannot fail");
        page.set_last_page_id(PageId::new(1));
        page.set_record_count(0);
        page
    }

    pub fn page_id(&self) -> PageId {
        self.header_ref().page_id().expect("header read cannot fail")
    }

    pub fn set_page_id(&mut self, id: PageId) {
        self.header_mut().set_page_id(id).expect("header write cannot fail");
    }

    pub fn last_page_id(&self) -> PageId {
        PageId::from_wire(
            self.header_ref()
                .last_page_id_raw()
                .expect("header read cannot fail"),
        )
    }

    pub fn set_last_page_id(&mut self, id: PageId) {
        self.header_mut()
            .set_last_page_id_raw(id.to_wire())
            .expect("header write cannot fail");
    }

    pub fn record_count(&self) -> i64 {
        self.header_ref()
            .record_count()
            .expect("header read cannot fail")
    }

    pub fn set_record_count(&mut self, count: i64) {
        self.header_mut()
            .set_record_count(count)
            .expect("header write cannot fail");
    }

    /// Resets to the freshly-created values: `last_page_id = 1`, `record_count = 0`.
    pub fn clear(&mut self) {
        self.set_last_page_id(PageId::new(1));
        self.set_record_count(0);
    }

    pub fn marshal(&self) -> [u8; PAGE_SIZE] {
        *self.bytes
    }

    pub fn unmarshal(buf: &[u8]) -> Self {
        assert_eq!(buf.len(), PAGE_SIZE, "heap header page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        assert_eq!(
            tag,
            u8::from(PageType::HeapHeader),
            "buffer does not carry the heap-header page type tag"
        );
        let mut bytes = Box::new([0u8; PAGE_SIZE]);
        bytes.copy_from_slice(buf);
        HeapHeaderPage { bytes }
    }

    /// Like [`Self::unmarshal`], but overwrites this page's existing buffer
    /// in place instead of allocating a new one.
    pub fn unmarshal_into(&mut self, buf: &[u8]) {
        assert_eq!(buf.len(), PAGE_SIZE, "heap header page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        assert_eq!(
            tag,
            u8::from(PageType::HeapHeader),
            "buffer does not carry the heap-header page type tag"
        );
        self.bytes.copy_from_slice(buf);
    }

    fn header_ref(&self) -> HeaderRef<'_> {
        HeaderRef::new((&self.bytes[0..HEADER_SIZE]).try_into().expect("fixed size"))
    }

    fn header_mut(&mut self) -> HeaderMut<'_> {
        HeaderMut::new((&mut self.bytes[0..HEADER_SIZE]).try_into().expect("fixed size"))
    }
}

impl Default for HeapHeaderPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_header_has_last_page_one_and_zero_records() {
        let header = HeapHeaderPage::new();
        assert_eq!(header.last_page_id(), PageId::new(1));
        assert_eq!(header.record_count(), 0);
    }

    #[test]
    fn set_fields_then_marshal_unmarshal_roundtrips() {
        let mut header = HeapHeaderPage::new();
        header.set_page_id(PageId::new(0));
        header.set_last_page_id(PageId::new(42));
        header.set_record_count(17);
        let bytes = header.marshal();
        let restored = HeapHeaderPage::unmarshal(&bytes);
        assert_eq!(restored.last_page_id(), PageId::new(42));
        assert_eq!(restored.record_count(), 17);
    }

    #[test]
    fn clear_resets_to_fresh_values() {
        let mut header = HeapHeaderPage::new();
        header.set_last_page_id(PageId::new(99));
        header.set_record_count(500);
        header.clear();
        assert_eq!(header.last_page_id(), PageId::new(1));
        assert_eq!(header.record_count(), 0);
    }

    #[test]
    #[should_panic]
    fn unmarshal_panics_on_wrong_type_tag() {
        let mut buf = vec![0u8; PAGE_SIZE];
        buf[crate::header::PAGE_TYPE_OFFSET] = u8::from(PageType::HeapData);
        HeapHeaderPage::unmarshal(&buf);
    }
}
