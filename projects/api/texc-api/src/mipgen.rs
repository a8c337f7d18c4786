//! Box-filter mip chain generation over RGBA8 planes.

use texc_common::max_mip_count;

/// An RGBA8 image and its dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    /// Tightly packed RGBA8 pixels.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Halves `image` in both directions, never going below 1.
///
/// Each output pixel averages the 2x2 source pixels it covers, with coordinates clamped
/// to the image. At a side of length 1 the clamped samples coincide and only the
/// distinct ones are averaged, so the filter degrades to 2x1, 1x2 or 1x1.
pub fn downsample(image: &RgbaImage) -> RgbaImage {
    let width = (image.width / 2).max(1);
    let height = (image.height / 2).max(1);
    let stride = image.width as usize * 4;
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);

    for y in 0..height {
        let y0 = (2 * y).min(image.height - 1);
        let y1 = (2 * y + 1).min(image.height - 1);
        let rows = [y0, y1];
        let rows = if y0 == y1 { &rows[..1] } else { &rows[..] };

        for x in 0..width {
            let x0 = (2 * x).min(image.width - 1);
            let x1 = (2 * x + 1).min(image.width - 1);
            let cols = [x0, x1];
            let cols = if x0 == x1 { &cols[..1] } else { &cols[..] };
            let count = (rows.len() * cols.len()) as u32;

            for c in 0..4 {
                let mut sum = 0u32;
                for &sy in rows {
                    for &sx in cols {
                        sum += image.data[sy as usize * stride + sx as usize * 4 + c] as u32;
                    }
                }
                data.push(((sum + count / 2) / count) as u8);
            }
        }
    }

    RgbaImage {
        data,
        width,
        height,
    }
}

/// Builds the complete chain from `base` down to 1x1. The first entry is `base`.
pub fn build_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let count = max_mip_count(base.width, base.height) as usize;
    let mut chain = Vec::with_capacity(count);
    chain.push(base);
    while chain.len() < count {
        // The chain is never empty here.
        let next = match chain.last() {
            Some(previous) => downsample(previous),
            None => break,
        };
        chain.push(next);
    }
    chain
}
