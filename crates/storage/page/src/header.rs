//! Layout and accessors for the 56-byte page header shared by every page type.
//!
//! # Layout
//!
//! ```text
//! byte 0..7     PageID            (u64 LE, two's-complement of the signed value)
//! byte 8        PageType          (u8)
//! byte 9..55    type-specific fields
//! ```
//!
//! The first nine bytes are common to every page and accessed directly
//! through [`HeaderRef`]/[`HeaderMut`]. The remaining type-specific fields
//! (e.g. a heap header page's `lastPageID`/`recordCount`, a heap data page's
//! `slotCount`) are added to these same types by each page module via
//! [`impl_header_accessors`], mirroring how one on-disk header backs several
//! logical field sets depending on the page's type.

use crate::errors::header_error::HeaderError;
use crate::page_id::PageId;
use crate::page_type::PageType;
use binary_helpers::le::{read_le, write_le};

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 56;

/// Byte offset of the `PageID` field.
pub const PAGE_ID_OFFSET: usize = 0;
/// Byte offset of the `PageType` field.
pub const PAGE_TYPE_OFFSET: usize = 8;
/// First byte offset available to type-specific fields.
pub const TYPE_FIELDS_OFFSET: usize = 9;

/// Zero-copy immutable view into a page's header.
#[derive(Debug)]
pub struct HeaderRef<'a> {
    bytes: &'a [u8; HEADER_SIZE],
}

impl<'a> HeaderRef<'a> {
    pub fn new(bytes: &'a [u8; HEADER_SIZE]) -> Self {
        HeaderRef { bytes }
    }

    pub fn page_id(&self) -> Result<PageId, HeaderError> {
        Ok(PageId::from_wire(read_le::<u64>(self.bytes, PAGE_ID_OFFSET)?))
    }

    pub fn page_type(&self) -> u8 {
        self.bytes[PAGE_TYPE_OFFSET]
    }
}

/// Zero-copy mutable view into a page's header.
#[derive(Debug)]
pub struct HeaderMut<'a> {
    bytes: &'a mut [u8; HEADER_SIZE],
}

impl<'a> HeaderMut<'a> {
    pub fn new(bytes: &'a mut [u8; HEADER_SIZE]) -> Self {
        HeaderMut { bytes }
    }

    pub fn page_id(&self) -> Result<PageId, HeaderError> {
        Ok(PageId::from_wire(read_le::<u64>(self.bytes, PAGE_ID_OFFSET)?))
    }

    pub fn set_page_id(&mut self, id: PageId) -> Result<(), HeaderError> {
        write_le::<u64>(self.bytes, PAGE_ID_OFFSET, id.to_wire())?;
        Ok(())
    }

    pub fn set_page_type(&mut self, page_type: PageType) -> Result<(), HeaderError> {
        self.bytes[PAGE_TYPE_OFFSET] = page_type.into();
        Ok(())
    }
}

/// Defines a type-specific header field's offset constant plus a getter on
/// `HeaderRef` and a getter/setter pair on `HeaderMut`.
///
/// Pattern: `field_name(identifier): field_type(type) = field_offset(usize)`
macro_rules! impl_header_accessors {
    ( $( $field_name:ident : $field_type:ty = $field_offset:expr ; )* ) => {
        $(
            paste::paste! {
                impl<'a> $crate::header::HeaderRef<'a> {
                    pub fn [<$field_name>](&self) -> Result<$field_type, $crate::errors::header_error::HeaderError> {
                        Ok(binary_helpers::le::read_le::<$field_type>(self.as_bytes(), $field_offset)?)
                    }
                }

                impl<'a> $crate::header::HeaderMut<'a> {
                    pub fn [<$field_name>](&self) -> Result<$field_type, $crate::errors::header_error::HeaderError> {
                        Ok(binary_helpers::le::read_le::<$field_type>(self.as_bytes(), $field_offset)?)
                    }

                    pub fn [<set_ $field_name>](&mut self, value: $field_type) -> Result<(), $crate::errors::header_error::HeaderError> {
                        binary_helpers::le::write_le::<$field_type>(self.as_bytes_mut(), $field_offset, value)?;
                        Ok(())
                    }
                }
            }
        )*
    };
}

pub(crate) use impl_header_accessors;

// Internal byte-access helpers used only by the `impl_header_accessors!` macro
// expansions in the concrete page modules.
impl<'a> HeaderRef<'a> {
    pub(crate) fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        self.bytes
    }
}

impl<'a> HeaderMut<'a> {
    pub(crate) fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8; HEADER_SIZE] {
        self.bytes
    }
}
