use crate::bin_error::BinaryError;

/// A trait for types that can be serialized and deserialized in little-endian format.
/// Implemented for the fixed-width integers used throughout the on-disk page layout:
/// `u16`/`u32`/`u64` for the unsigned header fields, `i16`/`i64` for the signed
/// domain types (`PageID`, slot offset/length) that are carried on the wire in
/// their two's-complement unsigned form.
pub trait LittleEndianInteger: Sized + Copy {
    /// The size of the type in bytes.
    const SIZE: usize;

    /// Converts a slice of bytes in little-endian format to the target integer type.
    /// `source_bytes` must be exactly `Self::SIZE` bytes long.
    fn from_le(source_bytes: &[u8]) -> Result<Self, BinaryError>;

    /// Serializes the integer into a slice of bytes in little-endian format.
    /// `target_buffer` must be exactly `Self::SIZE` bytes long.
    fn to_le(self, target_buffer: &mut [u8]) -> Result<(), BinaryError>;
}

macro_rules! impl_little_endian_integer {
    ($t:ty) => {
        impl LittleEndianInteger for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            fn from_le(source_bytes: &[u8]) -> Result<Self, BinaryError> {
                if source_bytes.len() != Self::SIZE {
                    return Err(BinaryError::SliceTooShort {
                        from_offset: 0,
                        expected: Self::SIZE,
                        actual: source_bytes.len(),
                    });
                }
                Ok(<$t>::from_le_bytes(source_bytes.try_into()?))
            }

            fn to_le(self, target_buffer: &mut [u8]) -> Result<(), BinaryError> {
                let self_bytes = &self.to_le_bytes();
                if self_bytes.len() != target_buffer.len() {
                    return Err(BinaryError::WriteErrorSliceSizeMismatch {
                        src: self_bytes.len(),
                        target: target_buffer.len(),
                    });
                }
                target_buffer.copy_from_slice(self_bytes);
                Ok(())
            }
        }
    };
}

impl_little_endian_integer!(u16);
impl_little_endian_integer!(u32);
impl_little_endian_integer!(u64);
impl_little_endian_integer!(i16);
impl_little_endian_integer!(i32);
impl_little_endian_integer!(i64);

/// Reads a value of type `T` from `bytes` at `start_offset`, in little-endian format.
pub fn read_le<T: LittleEndianInteger>(
    bytes: &[u8],
    start_offset: usize,
) -> Result<T, BinaryError> {
    let Some(slice) = bytes.get(start_offset..start_offset + T::SIZE) else {
        return Err(BinaryError::SliceTooShort {
            from_offset: start_offset,
            expected: T::SIZE,
            actual: bytes.len().saturating_sub(start_offset),
        });
    };
    T::from_le(slice)
}

/// Writes `value` into `bytes` at `start_offset`, in little-endian format.
pub fn write_le<T: LittleEndianInteger>(
    bytes: &mut [u8],
    start_offset: usize,
    value: T,
) -> Result<(), BinaryError> {
    let Some(slice) = bytes.get_mut(start_offset..start_offset + T::SIZE) else {
        return Err(BinaryError::SliceTooShort {
            from_offset: start_offset,
            expected: T::SIZE,
            actual: 0,
        });
    };
    value.to_le(slice)
}
