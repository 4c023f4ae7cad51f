use binary_helpers::bin_error::BinaryError;
use thiserror::Error;

/// Errors raised while reading or writing the fixed header region of a page.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("error while interpreting a header field")]
    Binary(#[from] BinaryError),
}
