use std::convert::TryFrom;

/// The one-byte type tag stored at header offset 8 of every page.
///
/// `Overflow` and `AllocationMap` are reserved: their wire formats are
/// implemented and round-trip correctly, but nothing in the heap produces or
/// consumes them today.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    HeapData = 0x03,
    HeapHeader = 0x04,
    Overflow = 0x05,
    AllocationMap = 0x06,
}

impl From<PageType> for u8 {
    fn from(p: PageType) -> Self {
        p as u8
    }
}

impl TryFrom<u8> for PageType {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0x03 => Ok(PageType::HeapData),
            0x04 => Ok(PageType::HeapHeader),
            0x05 => Ok(PageType::Overflow),
            0x06 => Ok(PageType::AllocationMap),
            other => Err(other),
        }
    }
}
