use crate::errors::header_error::HeaderError;
use binary_helpers::bin_error::BinaryError;
use thiserror::Error;

/// Errors raised while reading or writing the slot directory.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("slot array region expected to be {expected_size} bytes, but was {actual_size}")]
    SlotRegionSizeMismatch {
        expected_size: usize,
        actual_size: usize,
    },
    #[error("attempted to read a slot with wrong slice size: expected {expected_size}, got {actual_size}")]
    SlotSizeMismatch {
        expected_size: usize,
        actual_size: usize,
    },
    #[error("attempted to access slot index {slot_index}, which is out of range")]
    InvalidSlot { slot_index: usize },
    #[error("error while interpreting slot bytes")]
    Binary(#[from] BinaryError),
    #[error("error while reading the page header")]
    Header(#[from] HeaderError),
}
