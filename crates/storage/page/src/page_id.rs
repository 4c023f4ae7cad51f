use std::fmt;

/// Identifies a page by its position in the store. Page `i` occupies bytes
/// `[i * PAGE_SIZE, (i + 1) * PAGE_SIZE)` of the underlying file.
///
/// `NO_PAGE` (`-1`) denotes the absence of a page, e.g. a not-yet-initialized
/// pointer field. On the wire every `PageID` is carried as its unsigned
/// little-endian two's-complement representation (see [`PageId::to_wire`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(pub i64);

impl PageId {
    /// Sentinel value meaning "no page".
    pub const NO_PAGE: PageId = PageId(-1);

    pub const fn new(id: i64) -> Self {
        PageId(id)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// The byte offset of this page within the store's backing file.
    pub fn byte_offset(self, page_size: usize) -> u64 {
        self.0 as u64 * page_size as u64
    }

    /// Two's-complement unsigned wire representation (the page header stores
    /// `PageID` as a little-endian `u64`).
    pub fn to_wire(self) -> u64 {
        self.0 as u64
    }

    /// Inverse of [`PageId::to_wire`].
    pub fn from_wire(raw: u64) -> Self {
        PageId(raw as i64)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PageId {
    fn from(value: i64) -> Self {
        PageId(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_page_is_minus_one() {
        assert_eq!(PageId::NO_PAGE.value(), -1);
    }

    #[test]
    fn byte_offset_scales_by_page_size() {
        assert_eq!(PageId::new(3).byte_offset(8192), 3 * 8192);
    }

    #[test]
    fn wire_roundtrip_preserves_value() {
        let id = PageId::new(42);
        assert_eq!(PageId::from_wire(id.to_wire()), id);
    }

    #[test]
    fn wire_roundtrip_is_twos_complement_for_no_page() {
        let wire = PageId::NO_PAGE.to_wire();
        assert_eq!(wire, u64::MAX);
        assert_eq!(PageId::from_wire(wire), PageId::NO_PAGE);
    }

    #[test]
    fn display_formats_as_plain_integer() {
        assert_eq!(PageId::new(7).to_string(), "7");
    }
}
