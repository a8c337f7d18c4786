//! Common test imports and utilities for texc-api tests.

// External crates commonly used in tests
pub use rstest::rstest;

// Common types from the lower level crates
pub use texc_block_encoders::BlockEncoderRegistry;
pub use texc_common::{ColorSpace, CompressionLevel, CompressionType, PixelFormat, data_size};

// Re-export the crate root for convenience in test modules
pub use super::*;

/// RGBA test image: red follows x, green follows y, blue falls and alpha rises with
/// the pixel index.
pub(crate) fn rgba_gradient(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            data.extend_from_slice(&[
                (x & 0xFF) as u8,
                (y & 0xFF) as u8,
                (255 - (i & 0xFF)) as u8,
                (i & 0xFF) as u8,
            ]);
        }
    }
    data
}
