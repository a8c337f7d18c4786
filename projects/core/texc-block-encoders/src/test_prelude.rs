//! Common test imports and utilities for the block encoder tests.

// External crates commonly used in tests
pub use rstest::rstest;

// Common types from texc_common
pub use texc_common::{data_size, CompressionLevel, PixelFormat};

// Re-export the crate root for convenience in test modules
pub use super::*;

/// Builds a `width` x `height` RGBA gradient with a varying alpha channel.
pub(crate) fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            data.extend_from_slice(&[x as u8, y as u8, 255 - i as u8, i as u8]);
        }
    }
    data
}

/// Builds a `width` x `height` image filled with one colour.
pub(crate) fn solid(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    color.repeat(width as usize * height as usize)
}
