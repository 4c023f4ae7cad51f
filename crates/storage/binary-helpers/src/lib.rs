//! Bounds-checked little-endian integer I/O over raw byte slices.
//!
//! This is the leaf dependency of the page framing layer: every header and
//! slot accessor decodes its field through here instead of slicing bytes by
//! hand, so a malformed offset produces a typed error instead of a panic.

pub mod bin_error;
pub mod conversions;
pub mod le;
