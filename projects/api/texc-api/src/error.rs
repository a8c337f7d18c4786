//! Error types for texture operations.

use texc_block_encoders::BlockEncodeError;
use texc_common::{FormatError, PixelFormat};
use thiserror::Error;

/// Errors that can occur while creating or mutating a [`Texture`](crate::Texture).
///
/// Every failing operation leaves the texture exactly as it was.
#[derive(Debug, Error)]
pub enum TexcError {
    /// The operation is not available for the texture's current format.
    #[error("{operation} is not supported for format {format:?}.")]
    UnsupportedOperationForFormat {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Format of the texture at the time of the call.
        format: PixelFormat,
    },

    /// The conversion engine cannot convert between these formats.
    #[error("Cannot convert from {from:?} to {to:?}.")]
    UnsupportedConversion {
        /// Current format.
        from: PixelFormat,
        /// Requested format.
        to: PixelFormat,
    },

    /// The output buffer cannot hold the level's stored bytes.
    #[error("Output buffer too small: need {needed} bytes, but only {actual} bytes available.")]
    BufferTooSmall {
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// Input data does not match the size implied by format and dimensions.
    #[error("Invalid data length: expected {expected} bytes, got {actual}.")]
    InvalidDataLength {
        /// Size implied by format and dimensions.
        expected: usize,
        /// Size supplied.
        actual: usize,
    },

    /// Width or height was zero.
    #[error("Invalid dimensions {width}x{height}.")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The requested mip level does not exist.
    #[error("Mip level {index} does not exist, the texture has {count} levels.")]
    MipIndexOutOfRange {
        /// Requested level.
        index: usize,
        /// Number of levels.
        count: usize,
    },

    /// A hardware block encoder failed.
    #[error(transparent)]
    BlockEncode(#[from] BlockEncodeError),

    /// The compression envelope codec failed.
    #[error("Envelope codec failed: {0}")]
    Envelope(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Invalid format geometry.
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl TexcError {
    pub(crate) fn envelope<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Envelope(Box::new(error))
    }
}
