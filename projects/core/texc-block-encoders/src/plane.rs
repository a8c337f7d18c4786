//! RGBA input planes and the padding helpers encoders use to fill whole blocks.

use crate::error::BlockEncodeError;

/// A borrowed, tightly packed, 8 bits per channel RGBA image.
#[derive(Debug, Clone, Copy)]
pub struct RgbaPlane<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> RgbaPlane<'a> {
    /// Wraps `data`, which must hold exactly `width * height * 4` bytes.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self, BlockEncodeError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected || expected == 0 {
            return Err(BlockEncodeError::InvalidInputLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA bytes.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The pixel at (`x`, `y`).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }
}

/// An owned RGBA image produced by the padding helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OwnedPlane {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Pads `plane` to a multiple of `block_width` x `block_height` by repeating the last
/// row and column.
pub(crate) fn pad_edges(plane: &RgbaPlane, block_width: u32, block_height: u32) -> OwnedPlane {
    let width = plane.width().next_multiple_of(block_width);
    let height = plane.height().next_multiple_of(block_height);
    resample(plane, width, height, |x, y| {
        (x.min(plane.width() - 1), y.min(plane.height() - 1))
    })
}

/// Repeats `plane` until it covers `width` x `height`.
pub(crate) fn tile(plane: &RgbaPlane, width: u32, height: u32) -> OwnedPlane {
    resample(plane, width, height, |x, y| {
        (x % plane.width(), y % plane.height())
    })
}

fn resample(
    plane: &RgbaPlane,
    width: u32,
    height: u32,
    source: impl Fn(u32, u32) -> (u32, u32),
) -> OwnedPlane {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = source(x, y);
            data.extend_from_slice(&plane.pixel(sx, sy));
        }
    }

    OwnedPlane {
        data,
        width,
        height,
    }
}
