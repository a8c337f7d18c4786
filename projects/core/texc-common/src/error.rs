//! Errors raised by the format registry and size helpers.

use thiserror::Error;

/// Errors describing malformed texture geometry or buffers.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum FormatError {
    /// Width or height was zero.
    #[error("Invalid dimensions {width}x{height}. Both must be at least 1.")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A buffer's length does not match the size implied by format and dimensions.
    #[error("Buffer length mismatch. Expected {expected} bytes, got {actual}.")]
    BufferLengthMismatch {
        /// Length implied by the format and dimensions.
        expected: usize,
        /// Length that was provided.
        actual: usize,
    },

    /// No envelope plane of at most 16383 pixels per side can hold the data.
    #[error("Cannot lay out {len} bytes as an image plane of at most 16383x16383 pixels.")]
    PlaneTooLarge {
        /// Length of the data that was to be laid out.
        len: usize,
    },
}
