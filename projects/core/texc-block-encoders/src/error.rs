//! Block encoder errors.

use texc_common::{FormatError, PixelFormat};
use thiserror::Error;

/// Errors returned by [`BlockEncoder`](crate::BlockEncoder) implementations.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BlockEncodeError {
    /// The encoder cannot produce the requested format.
    #[error("Format {0:?} is not produced by this encoder.")]
    UnsupportedFormat(PixelFormat),

    /// PVRTC1 only handles power-of-two textures.
    #[error("Dimensions {width}x{height} are not powers of two.")]
    DimensionsNotPowerOfTwo {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },

    /// The RGBA input does not hold `width * height * 4` bytes.
    #[error("Invalid input length. Expected {expected} bytes, got {actual}.")]
    InvalidInputLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// The encoder produced a different number of bytes than the format requires.
    #[error("Encoder produced {actual} bytes, format requires {expected}.")]
    OutputSizeMismatch {
        /// Size required by the format.
        expected: usize,
        /// Size actually produced.
        actual: usize,
    },

    /// Invalid geometry.
    #[error(transparent)]
    Format(#[from] FormatError),
}
