use std::array::TryFromSliceError;
use thiserror::Error;

/// Errors raised while reading or writing fixed-width little-endian integers
/// over a raw byte slice.
#[derive(Error, Debug)]
pub enum BinaryError {
    #[error(
        "attempt to read {expected} bytes at offset {from_offset}, but the slice is only {actual} bytes long"
    )]
    SliceTooShort {
        from_offset: usize,
        expected: usize,
        actual: usize,
    },
    #[error("error converting a slice to a fixed-size array")]
    SliceConversionError(#[from] TryFromSliceError),
    #[error("cannot write {src} source bytes into a {target}-byte target slice")]
    WriteErrorSliceSizeMismatch { src: usize, target: usize },
    #[error("value {value} does not fit in the target integer type (max {max})")]
    NarrowingOverflow { value: u64, max: u64 },
}
