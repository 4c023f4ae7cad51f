//! A reserved page type for oversize records spanning more than one page.
//! Not driven by the heap today — the heap rejects records exceeding the
//! in-page maximum rather than chaining them across overflow pages — but
//! the format round-trips so a future heap revision can wire it in without
//! a storage migration.

use crate::header::{impl_header_accessors, HeaderMut, HeaderRef, HEADER_SIZE};
use crate::page_id::PageId;
use crate::page_type::PageType;
use crate::PAGE_SIZE;

const PREVIOUS_PAGE_ID_OFFSET: usize = 9;
const NEXT_PAGE_ID_OFFSET: usize = 17;
const SEGMENT_ID_OFFSET: usize = 25;
const SEGMENT_LENGTH_OFFSET: usize = 29;

/// Maximum bytes of a single overflow segment (the whole body).
pub const MAX_SEGMENT_LEN: usize = PAGE_SIZE - HEADER_SIZE;

impl_header_accessors! {
    previous_page_id_raw: u64 = PREVIOUS_PAGE_ID_OFFSET;
    next_page_id_raw: u64 = NEXT_PAGE_ID_OFFSET;
    segment_id: i32 = SEGMENT_ID_OFFSET;
    segment_length: u16 = SEGMENT_LENGTH_OFFSET;
}

/// One segment of an oversize record, chained via previous/next page ids.
#[derive(Debug, Clone)]
pub struct OverflowPage {
    bytes: Box<[u8; PAGE_SIZE]>,
}

impl OverflowPage {
    pub fn new() -> Self {
        let mut page = OverflowPage {
            bytes: Box::new([0u8; PAGE_SIZE]),
        };
        page.header_mut()
            .set_page_type(PageType::Overflow)
            .expect("header write cannot fail");
        page.set_previous_page_id(PageId::NO_PAGE);
        page.set_next_page_id(PageId::NO_PAGE);
        page.set_segment_id(-1);
        page.set_segment_length(0);
        page
    }

    pub fn page_id(&self) -> PageId {
        self.header_ref().page_id().expect("header read cannot fail")
    }

    pub fn set_page_id(&mut self, id: PageId) {
        self.header_mut().set_page_id(id).expect("header write cannot fail");
    }

    pub fn previous_page_id(&self) -> PageId {
        PageId::from_wire(
            self.header_ref()
                .previous_page_id_raw()
                .expect("header read cannot fail"),
        )
    }

    pub fn set_previous_page_id(&mut self, id: PageId) {
        self.header_mut()
            .set_previous_page_id_raw(id.to_wire())
            .expect("header write cannot fail");
    }

    pub fn next_page_id(&self) -> PageId {
        PageId::from_wire(
            self.header_ref()
                .next_page_id_raw()
                .expect("header read cannot fail"),
        )
    }

    pub fn set_next_page_id(&mut self, id: PageId) {
        self.header_mut()
            .set_next_page_id_raw(id.to_wire())
            .expect("header write cannot fail");
    }

    pub fn segment_id(&self) -> i32 {
        self.header_ref()
            .segment_id()
            .expect("header read cannot fail")
    }

    fn set_segment_id(&mut self, id: i32) {
        self.header_mut()
            .set_segment_id(id)
            .expect("header write cannot fail");
    }

    pub fn segment_length(&self) -> usize {
        self.header_ref()
            .segment_length()
            .expect("header read cannot fail") as usize
    }

    fn set_segment_length(&mut self, len: u16) {
        self.header_mut()
            .set_segment_length(len)
            .expect("header write cannot fail");
    }

    pub fn segment(&self) -> &[u8] {
        let len = self.segment_length();
        &self.bytes[HEADER_SIZE..HEADER_SIZE + len]
    }

    /// Replaces the segment. `segment_id` identifies this chunk's position
    /// within the overflowing record; `bytes` must not exceed [`MAX_SEGMENT_LEN`].
    pub fn set_segment(&mut self, segment_id: i32, bytes: &[u8]) -> Result<(), usize> {
        if bytes.len() > MAX_SEGMENT_LEN {
            return Err(bytes.len());
        }
        self.set_segment_id(segment_id);
        self.set_segment_length(bytes.len() as u16);
        self.bytes[HEADER_SIZE..HEADER_SIZE + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn marshal(&self) -> [u8; PAGE_SIZE] {
        *self.bytes
    }

    pub fn unmarshal(buf: &[u8]) -> Self {
        assert_eq!(buf.len(), PAGE_SIZE, "overflow page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        assert_eq!(
            tag,
            u8::from(PageType::Overflow),
            "buffer does not carry the overflow page type tag"
        );
        let mut bytes = Box::new([0u8; PAGE_SIZE]);
        bytes.copy_from_slice(buf);
        OverflowPage { bytes }
    }

    /// Like [`Self::unmarshal`], but overwrites this page's existing buffer
    /// in place instead of allocating a new one.
    pub fn unmarshal_into(&mut self, buf: &[u8]) {
        assert_eq!(buf.len(), PAGE_SIZE, "overflow page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        assert_eq!(
            tag,
            u8::from(PageType::Overflow),
            "buffer does not carry the overflow page type tag"
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

impl Default for OverflowPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_page_has_no_segment() {
        let page = OverflowPage::new();
        assert_eq!(page.segment_length(), 0);
        assert_eq!(page.previous_page_id(), PageId::NO_PAGE);
    }

    #[test]
    fn set_segment_then_marshal_unmarshal_roundtrips() {
        let mut page = OverflowPage::new();
        page.set_previous_page_id(PageId::new(3));
        page.set_next_page_id(PageId::new(5));
        page.set_segment(2, b"overflow bytes").unwrap();
        let bytes = page.marshal();
        let restored = OverflowPage::unmarshal(&bytes);
        assert_eq!(restored.previous_page_id(), PageId::new(3));
        assert_eq!(restored.next_page_id(), PageId::new(5));
        assert_eq!(restored.segment_id(), 2);
        assert_eq!(restored.segment(), b"overflow bytes");
    }

    #[test]
    fn set_segment_rejects_oversize_bytes() {
        let mut page = OverflowPage::new();
        let oversized = vec![0u8; MAX_SEGMENT_LEN + 1];
        assert!(page.set_segment(0, &oversized).is_err());
    }
}
