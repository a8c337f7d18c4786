//! Geometric and photometric transforms over raw level buffers.

use crate::error::TexcError;
use crate::mipgen::RgbaImage;
use image::imageops::{self, FilterType};

/// Axis to mirror a texture along.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipAxis {
    /// Mirror columns left to right.
    X = 0,
    /// Mirror rows top to bottom.
    Y = 1,
    /// Depth axis. Textures have no depth, so this flip never changes anything.
    Z = 2,
}

/// Mirrors a `width` x `height` buffer of `bytes_per_pixel` sized pixels.
pub fn flip(
    data: &[u8],
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
    axis: FlipAxis,
) -> Vec<u8> {
    let stride = width as usize * bytes_per_pixel;
    let rows = data.chunks_exact(stride).take(height as usize);
    match axis {
        FlipAxis::X => rows
            .flat_map(|row| row.chunks_exact(bytes_per_pixel).rev().flatten())
            .copied()
            .collect(),
        FlipAxis::Y => rows.rev().flatten().copied().collect(),
        FlipAxis::Z => data.to_vec(),
    }
}

/// Resamples `source` to `width` x `height` with a triangle (bilinear) filter.
pub fn resize(source: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage, TexcError> {
    if width == 0 || height == 0 {
        return Err(TexcError::InvalidDimensions { width, height });
    }

    let buffer = image::RgbaImage::from_raw(source.width, source.height, source.data.clone())
        .ok_or(TexcError::InvalidDataLength {
            expected: source.width as usize * source.height as usize * 4,
            actual: source.data.len(),
        })?;

    let resized = imageops::resize(&buffer, width, height, FilterType::Triangle);
    Ok(RgbaImage {
        data: resized.into_raw(),
        width,
        height,
    })
}

/// Scales the colour channels of every RGBA8 pixel by its alpha, rounding to nearest.
pub fn premultiply_alpha(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let alpha = px[3] as u32;
        for c in &mut px[..3] {
            *c = ((*c as u32 * alpha + 127) / 255) as u8;
        }
    }
}
