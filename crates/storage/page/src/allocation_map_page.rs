//! A reserved free-page bitmap: 64,000 bits, one per page, tracking
//! allocation. Not wired into the heap (which only ever appends pages via
//! the store), but its format round-trips through marshal/unmarshal.

use crate::header::{HeaderMut, HeaderRef, HEADER_SIZE};
use crate::page_id::PageId;
use crate::page_type::PageType;
use crate::PAGE_SIZE;

/// Number of bits tracked by the bitmap (8,000 bytes × 8 bits).
pub const ALLOCATION_BITMAP_BITS: usize = 8_000 * 8;
const ALLOCATION_BITMAP_BYTES: usize = 8_000;

/// A free-page bitmap page.
#[derive(Debug, Clone)]
pub struct AllocationMapPage {
    bytes: Box<[u8; PAGE_SIZE]>,
}

impl AllocationMapPage {
    pub fn new() -> Self {
        let mut page = AllocationMapPage {
            bytes: Box::new([0u8; PAGE_SIZE]),
        };
        page.header_mut()
            .set_page_type(PageType::AllocationMap)
            .expect("header write cannot fail");
        page
    }

    pub fn page_id(&self) -> PageId {
        self.header_ref().page_id().expect("header read cannot fail")
    }

    pub fn set_page_id(&mut self, id: PageId) {
        self.header_mut().set_page_id(id).expect("header write cannot fail");
    }

    pub fn is_allocated(&self, page_index: usize) -> bool {
        let (byte, bit) = Self::bit_location(page_index);
        self.bitmap()[byte] & (1 << bit) != 0
    }

    pub fn set_allocated(&mut self, page_index: usize, allocated: bool) {
        let (byte, bit) = Self::bit_location(page_index);
        if allocated {
            self.bitmap_mut()[byte] |= 1 << bit;
        } else {
            self.bitmap_mut()[byte] &= !(1 << bit);
        }
    }

    fn bit_location(page_index: usize) -> (usize, u8) {
        assert!(page_index < ALLOCATION_BITMAP_BITS, "page index out of bitmap range");
        (page_index / 8, (page_index % 8) as u8)
    }

    fn bitmap(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..HEADER_SIZE + ALLOCATION_BITMAP_BYTES]
    }

    fn bitmap_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[HEADER_SIZE..HEADER_SIZE + ALLOCATION_BITMAP_BYTES]
    }

    pub fn marshal(&self) -> [u8; PAGE_SIZE] {
        *self.bytes
    }

    pub fn unmarshal(buf: &[u8]) -> Self {
        assert_eq!(buf.len(), PAGE_SIZE, "allocation map page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        assert_eq!(
            tag,
            u8::from(PageType::AllocationMap),
            "buffer does not carry the allocation-map page type tag"
        );
        let mut bytes = Box::new([0u8; PAGE_SIZE]);
        bytes.copy_from_slice(buf);
        AllocationMapPage { bytes }
    }

    /// Like [`Self::unmarshal`], but overwrites this page's existing buffer
    /// in place instead of allocating a new one.
    pub fn unmarshal_into(&mut self, buf: &[u8]) {
        assert_eq!(buf.len(), PAGE_SIZE, "allocation map page buffer has the wrong size");
        let tag = buf[crate::header::PAGE_TYPE_OFFSET];
        assert_eq!(
            tag,
            u8::from(PageType::AllocationMap),
            "buffer does not carry the allocation-map page type tag"
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

impl Default for AllocationMapPage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_page_has_no_bits_set() {
        let page = AllocationMapPage::new();
        assert!(!page.is_allocated(0));
        assert!(!page.is_allocated(ALLOCATION_BITMAP_BITS - 1));
    }

    #[test]
    fn set_and_clear_bit_roundtrips() {
        let mut page = AllocationMapPage::new();
        page.set_allocated(42, true);
        assert!(page.is_allocated(42));
        page.set_allocated(42, false);
        assert!(!page.is_allocated(42));
    }

    #[test]
    fn marshal_then_unmarshal_preserves_bitmap() {
        let mut page = AllocationMapPage::new();
        page.set_allocated(7, true);
        page.set_allocated(7999, true);
        let bytes = page.marshal();
        let restored = AllocationMapPage::unmarshal(&bytes);
        assert!(restored.is_allocated(7));
        assert!(restored.is_allocated(7999));
        assert!(!restored.is_allocated(8));
    }
}
