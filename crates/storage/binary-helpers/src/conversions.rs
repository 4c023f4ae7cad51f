use thiserror::Error;

/// Fallible narrowing conversions from `usize`, used when a measured length
/// (e.g. a record's byte length) must be stored in a fixed-width on-disk field.
pub trait UsizeConversion {
    fn to_u16(self) -> Result<u16, ConversionError>;
    fn to_u32(self) -> Result<u32, ConversionError>;
}

impl UsizeConversion for usize {
    fn to_u16(self) -> Result<u16, ConversionError> {
        u16::try_from(self).map_err(|_| ConversionError::Overflow {
            value: self as u64,
            max: u16::MAX as u64,
        })
    }

    fn to_u32(self) -> Result<u32, ConversionError> {
        u32::try_from(self).map_err(|_| ConversionError::Overflow {
            value: self as u64,
            max: u32::MAX as u64,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("value {value} exceeds maximum {max} for target type")]
    Overflow { value: u64, max: u64 },
}
