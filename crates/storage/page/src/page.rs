//! [`Page`]: the enum a store reads and writes, dispatching to one of the
//! concrete page types by its on-disk type tag. An enum over concrete
//! variants is used here rather than a page trait object, since the set of
//! page types is closed and known at compile time.

use crate::allocation_map_page::AllocationMapPage;
use crate::heap_data_page::HeapDataPage;
use crate::heap_header_page::HeapHeaderPage;
use crate::overflow_page::OverflowPage;
use crate::page_id::PageId;
use crate::page_type::PageType;
use crate::PAGE_SIZE;

/// A page, tagged by its on-disk type.
#[derive(Debug, Clone)]
pub enum Page {
    HeapData(HeapDataPage),
    HeapHeader(HeapHeaderPage),
    Overflow(OverflowPage),
    AllocationMap(AllocationMapPage),
}

impl Page {
    pub fn new_heap_data() -> Self {
        Page::HeapData(HeapDataPage::new())
    }

    pub fn new_heap_header() -> Self {
        Page::HeapHeader(HeapHeaderPage::new())
    }

    pub fn new_overflow() -> Self {
        Page::Overflow(OverflowPage::new())
    }

    pub fn new_allocation_map() -> Self {
        Page::AllocationMap(AllocationMapPage::new())
    }

    pub fn page_id(&self) -> PageId {
        match self {
            Page::HeapData(p) => p.page_id(),
            Page::HeapHeader(p) => p.page_id(),
            Page::Overflow(p) => p.page_id(),
            Page::AllocationMap(p) => p.page_id(),
        }
    }

    pub fn set_page_id(&mut self, id: PageId) {
        match self {
            Page::HeapData(p) => p.set_page_id(id),
            Page::HeapHeader(p) => p.set_page_id(id),
            Page::Overflow(p) => p.set_page_id(id),
            Page::AllocationMap(p) => p.set_page_id(id),
        }
    }

    pub fn page_type(&self) -> PageType {
        match self {
            Page::HeapData(_) => PageType::HeapData,
            Page::HeapHeader(_) => PageType::HeapHeader,
            Page::Overflow(_) => PageType::Overflow,
            Page::AllocationMap(_) => PageType::AllocationMap,
        }
    }

    pub fn marshal(&self) -> [u8; PAGE_SIZE] {
        match self {
            Page::HeapData(p) => p.marshal(),
            Page::HeapHeader(p) => p.marshal(),
            Page::Overflow(p) => p.marshal(),
            Page::AllocationMap(p) => p.marshal(),
        }
    }

    /// Deserializes `buf` into the page variant its type tag names.
    /// `buf` must be exactly [`PAGE_SIZE`] bytes; a malformed length or an
    /// unrecognized type tag indicates corrupt storage and is fatal.
    pub fn unmarshal(buf: &[u8]) -> Self {
        assert_eq!(buf.len(), PAGE_SIZE, "page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        match PageType::try_from(tag) {
            Ok(PageType::HeapData) => Page::HeapData(HeapDataPage::unmarshal(buf)),
            Ok(PageType::HeapHeader) => Page::HeapHeader(HeapHeaderPage::unmarshal(buf)),
            Ok(PageType::Overflow) => Page::Overflow(OverflowPage::unmarshal(buf)),
            Ok(PageType::AllocationMap) => Page::AllocationMap(AllocationMapPage::unmarshal(buf)),
            Err(unknown) => panic!("buffer carries unrecognized page type tag {unknown:#x}"),
        }
    }

    /// Like [`Self::unmarshal`], but reuses `self`'s existing buffer when
    /// its variant already matches `buf`'s type tag, instead of always
    /// allocating a fresh page. Falls back to allocating when the variant
    /// changes (e.g. the slot this page id occupies used to hold a
    /// different page type).
    pub fn unmarshal_into(&mut self, buf: &[u8]) {
        assert_eq!(buf.len(), PAGE_SIZE, "page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        match (PageType::try_from(tag), &mut *self) {
            (Ok(PageType::HeapData), Page::HeapData(p)) => p.unmarshal_into(buf),
            (Ok(PageType::HeapHeader), Page::HeapHeader(p)) => p.unmarshal_into(buf),
            (Ok(PageType::Overflow), Page::Overflow(p)) => p.unmarshal_into(buf),
            (Ok(PageType::AllocationMap), Page::AllocationMap(p)) => p.unmarshal_into(buf),
            _ => *self = Page::unmarshal(buf),
        }
    }

    /// Returns the heap data page, panicking if this is a different variant.
    /// Used by callers (the heap manager, the scanner) that already know
    /// which variant a given page id must hold.
    pub fn as_heap_data(&self) -> &HeapDataPage {
        match self {
            Page::HeapData(p) => p,
            other => panic!("expected a heap data page, found {:?}", other.page_type()),
        }
    }

    pub fn as_heap_data_mut(&mut self) -> &mut HeapDataPage {
        match self {
            Page::HeapData(p) => p,
            other => panic!("expected a heap data page, found {:?}", other.page_type()),
        }
    }

    pub fn as_heap_header(&self) -> &HeapHeaderPage {
        match self {
            Page::HeapHeader(p) => p,
            other => panic!("expected a heap header page, found {:?}", other.page_type()),
        }
    }

    pub fn as_heap_header_mut(&mut self) -> &mut HeapHeaderPage {
        match self {
            Page::HeapHeader(p) => p,
            other => panic!("expected a heap header page, found {:?}", other.page_type()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marshal_unmarshal_roundtrips_through_the_enum() {
        let mut page = Page::new_heap_data();
        page.set_page_id(PageId::new(9));
        page.as_heap_data_mut().add_record(b"hi").unwrap();
        let bytes = page.marshal();
        let restored = Page::unmarshal(&bytes);
        assert_eq!(restored.page_id(), PageId::new(9));
        assert_eq!(restored.page_type(), PageType::HeapData);
        assert_eq!(restored.as_heap_data().get_record(1).unwrap(), b"hi");
    }

    #[test]
    #[should_panic]
    fn as_heap_data_panics_on_wrong_variant() {
        let page = Page::new_heap_header();
        page.as_heap_data();
    }

    #[test]
    fn unmarshal_into_reuses_the_buffer_for_a_matching_variant() {
        let mut source = Page::new_heap_data();
        source.set_page_id(PageId::new(3));
        source.as_heap_data_mut().add_record(b"reused").unwrap();
        let bytes = source.marshal();

        let mut target = Page::new_heap_data();
        target.as_heap_data_mut().add_record(b"stale").unwrap();
        target.unmarshal_into(&bytes);

        assert_eq!(target.page_id(), PageId::new(3));
        assert_eq!(target.as_heap_data().get_record(1).unwrap(), b"reused");
    }

    #[test]
    fn unmarshal_into_falls_back_to_allocating_on_a_variant_change() {
        let source = Page::new_heap_header();
        let bytes = source.marshal();

        let mut target = Page::new_heap_data();
        target.unmarshal_into(&bytes);

        assert_eq!(target.page_type(), PageType::HeapHeader);
    }
}
