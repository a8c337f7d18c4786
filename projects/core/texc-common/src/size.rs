//! Byte-size and mip-chain bookkeeping.

use crate::error::FormatError;
use crate::format::PixelFormat;

/// Dimensions of mip level `level` of a `width` x `height` texture.
///
/// Each level halves both sides, never going below 1.
#[inline]
pub fn mip_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    let shrink = |v: u32| v.checked_shr(level).unwrap_or(0).max(1);
    (shrink(width), shrink(height))
}

/// Number of levels in a complete mip chain, down to and including 1x1.
#[inline]
pub fn max_mip_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    largest.ilog2() + 1
}

/// Number of bytes needed to store one `width` x `height` image in `format`.
///
/// Block formats round each side up to whole blocks and respect the format's minimum
/// block count, so PVRTC textures never use fewer than 2x2 blocks.
pub fn data_size(format: PixelFormat, width: u32, height: u32) -> Result<usize, FormatError> {
    if width == 0 || height == 0 {
        return Err(FormatError::InvalidDimensions { width, height });
    }

    let descriptor = format.describe();
    match descriptor.block {
        Some(block) => {
            let blocks_x = width.div_ceil(block.width).max(block.min_blocks_x) as usize;
            let blocks_y = height.div_ceil(block.height).max(block.min_blocks_y) as usize;
            Ok(blocks_x * blocks_y * block.bytes as usize)
        }
        None => {
            // Non-block formats always report a pixel size.
            let bpp = descriptor.bytes_per_pixel().unwrap_or(0);
            Ok(width as usize * height as usize * bpp)
        }
    }
}
