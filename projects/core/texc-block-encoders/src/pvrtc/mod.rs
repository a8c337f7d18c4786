//! PVRTC1 encoder.
//!
//! Encoding happens in two passes over a grid of blocks:
//!
//! 1. Each block gets a pair of endpoints, the per-channel minimum and maximum of the
//!    pixels it influences (its own plus half a block around it), quantized to the
//!    precision PVRTC1 can store.
//! 2. Each pixel picks the modulation weight that best matches it, where the endpoint
//!    colours are bilinearly interpolated from the four nearest blocks just like a
//!    decoder does.
//!
//! Blocks are written in Morton order. Every block is 8 bytes: the modulation word
//! followed by the colour word, both little-endian.

mod color;
mod morton;

use crate::error::BlockEncodeError;
use crate::plane::{tile, OwnedPlane, RgbaPlane};
use crate::registry::BlockEncoder;
use color::{color_word, pack_a, pack_b, PackedColor};
use morton::morton_index;
use texc_common::{data_size, BlockFootprint, CompressionLevel, PixelFormat};
use tracing::debug;

/// 4bpp modulation weights, in eighths of the way from colour A to colour B.
const WEIGHTS_4BPP: [i32; 4] = [0, 3, 5, 8];

/// Encodes one of the four PVRTC1 formats.
#[derive(Debug, Clone, Copy)]
pub struct PvrtcEncoder {
    format: PixelFormat,
    footprint: BlockFootprint,
    alpha: bool,
}

#[derive(Debug, Clone, Copy)]
struct Endpoints {
    a: PackedColor,
    b: PackedColor,
}

/// The block grid covering the (tiled) source image.
struct Grid {
    blocks_x: u32,
    blocks_y: u32,
    block_width: u32,
    block_height: u32,
}

impl PvrtcEncoder {
    /// Creates an encoder for `format`, which must be a PVRTC1 format.
    pub fn new(format: PixelFormat) -> Result<Self, BlockEncodeError> {
        let alpha = match format {
            PixelFormat::RgbPvrtc2Bpp | PixelFormat::RgbPvrtc4Bpp => false,
            PixelFormat::RgbaPvrtc2Bpp | PixelFormat::RgbaPvrtc4Bpp => true,
            _ => return Err(BlockEncodeError::UnsupportedFormat(format)),
        };

        let footprint = format
            .describe()
            .block
            .ok_or(BlockEncodeError::UnsupportedFormat(format))?;

        Ok(Self {
            format,
            footprint,
            alpha,
        })
    }

    fn is_2bpp(&self) -> bool {
        self.footprint.width == 8
    }

    fn source_pixel(&self, source: &OwnedPlane, x: u32, y: u32) -> [i32; 4] {
        let offset = (y as usize * source.width as usize + x as usize) * 4;
        let px = &source.data[offset..offset + 4];
        let alpha = if self.alpha { px[3] as i32 } else { 255 };
        [px[0] as i32, px[1] as i32, px[2] as i32, alpha]
    }

    fn block_endpoints(
        &self,
        source: &OwnedPlane,
        grid: &Grid,
        bx: u32,
        by: u32,
        quality: CompressionLevel,
    ) -> Endpoints {
        // A decoder blends each block's endpoints over its neighbours' pixels too, so the
        // fit covers the block widened by half a block on every side, wrapping.
        let (bw, bh) = (grid.block_width, grid.block_height);
        let (full_w, full_h) = (grid.blocks_x * bw, grid.blocks_y * bh);
        let mut low = [255i32; 4];
        let mut high = [0i32; 4];
        for y in 0..bh * 2 {
            for x in 0..bw * 2 {
                let px = self.source_pixel(
                    source,
                    (bx * bw + full_w + x - bw / 2) % full_w,
                    (by * bh + full_h + y - bh / 2) % full_h,
                );
                for c in 0..4 {
                    low[c] = low[c].min(px[c]);
                    high[c] = high[c].max(px[c]);
                }
            }
        }

        // Pull the endpoints towards each other, trading extremes for a tighter palette.
        if matches!(quality, CompressionLevel::High | CompressionLevel::Best) {
            for c in 0..4 {
                let inset = (high[c] - low[c]) / 16;
                low[c] += inset;
                high[c] -= inset;
            }
        }

        Endpoints {
            a: pack_a(low.map(|v| v as u8)),
            b: pack_b(high.map(|v| v as u8)),
        }
    }

    /// The endpoint colours a decoder sees at pixel (`x`, `y`).
    fn interpolate(
        endpoints: &[Endpoints],
        grid: &Grid,
        x: u32,
        y: u32,
    ) -> ([i32; 4], [i32; 4]) {
        let (bw, bh) = (grid.block_width, grid.block_height);
        let ox = x + grid.blocks_x * bw - bw / 2;
        let oy = y + grid.blocks_y * bh - bh / 2;
        let x0 = (ox / bw) % grid.blocks_x;
        let y0 = (oy / bh) % grid.blocks_y;
        let x1 = (x0 + 1) % grid.blocks_x;
        let y1 = (y0 + 1) % grid.blocks_y;
        let fx = (ox % bw) as i32;
        let fy = (oy % bh) as i32;
        let (bw, bh) = (bw as i32, bh as i32);

        let at = |bx: u32, by: u32| &endpoints[(by * grid.blocks_x + bx) as usize];
        let corners = [
            (at(x0, y0), (bw - fx) * (bh - fy)),
            (at(x1, y0), fx * (bh - fy)),
            (at(x0, y1), (bw - fx) * fy),
            (at(x1, y1), fx * fy),
        ];

        let area = bw * bh;
        let mut a = [0i32; 4];
        let mut b = [0i32; 4];
        for c in 0..4 {
            let (mut sum_a, mut sum_b) = (0, 0);
            for (e, weight) in corners.iter() {
                sum_a += e.a.rgba[c] as i32 * weight;
                sum_b += e.b.rgba[c] as i32 * weight;
            }
            a[c] = (sum_a + area / 2) / area;
            b[c] = (sum_b + area / 2) / area;
        }

        (a, b)
    }

    fn modulation_4bpp(
        pixel: [i32; 4],
        a: [i32; 4],
        b: [i32; 4],
        quality: CompressionLevel,
    ) -> u32 {
        if quality == CompressionLevel::Fast {
            let mut along = 0;
            let mut length = 0;
            for c in 0..4 {
                let d = b[c] - a[c];
                along += (pixel[c] - a[c]) * d;
                length += d * d;
            }
            if length == 0 {
                return 0;
            }

            let t = along * 16;
            return if t < 3 * length {
                0
            } else if t < 8 * length {
                1
            } else if t < 13 * length {
                2
            } else {
                3
            };
        }

        let mut best = (0u32, i32::MAX);
        for (index, weight) in WEIGHTS_4BPP.iter().enumerate() {
            let error = squared_error(pixel, a, b, *weight);
            if error < best.1 {
                best = (index as u32, error);
            }
        }
        best.0
    }

    fn modulation_2bpp(pixel: [i32; 4], a: [i32; 4], b: [i32; 4]) -> u32 {
        (squared_error(pixel, a, b, 8) < squared_error(pixel, a, b, 0)) as u32
    }
}

fn squared_error(pixel: [i32; 4], a: [i32; 4], b: [i32; 4], weight: i32) -> i32 {
    let mut error = 0;
    for c in 0..4 {
        let value = (a[c] * (8 - weight) + b[c] * weight + 4) / 8;
        let d = pixel[c] - value;
        error += d * d;
    }
    error
}

impl BlockEncoder for PvrtcEncoder {
    fn format(&self) -> PixelFormat {
        self.format
    }

    fn encode(
        &self,
        plane: &RgbaPlane,
        quality: CompressionLevel,
    ) -> Result<Vec<u8>, BlockEncodeError> {
        let (width, height) = (plane.width(), plane.height());
        if !width.is_power_of_two() || !height.is_power_of_two() {
            return Err(BlockEncodeError::DimensionsNotPowerOfTwo { width, height });
        }

        let footprint = self.footprint;
        let grid = Grid {
            blocks_x: width
                .div_ceil(footprint.width)
                .max(footprint.min_blocks_x),
            blocks_y: height
                .div_ceil(footprint.height)
                .max(footprint.min_blocks_y),
            block_width: footprint.width,
            block_height: footprint.height,
        };
        debug!(
            format = self.format.name(),
            width,
            height,
            blocks_x = grid.blocks_x,
            blocks_y = grid.blocks_y,
            ?quality,
            "encoding pvrtc"
        );

        let source = tile(
            plane,
            grid.blocks_x * grid.block_width,
            grid.blocks_y * grid.block_height,
        );

        let mut endpoints = Vec::with_capacity((grid.blocks_x * grid.blocks_y) as usize);
        for by in 0..grid.blocks_y {
            for bx in 0..grid.blocks_x {
                endpoints.push(self.block_endpoints(&source, &grid, bx, by, quality));
            }
        }

        let expected = data_size(self.format, width, height)?;
        let mut output = vec![0u8; (grid.blocks_x * grid.blocks_y * footprint.bytes) as usize];
        for by in 0..grid.blocks_y {
            for bx in 0..grid.blocks_x {
                let mut modulation = 0u32;
                for y in 0..grid.block_height {
                    for x in 0..grid.block_width {
                        let gx = bx * grid.block_width + x;
                        let gy = by * grid.block_height + y;
                        let pixel = self.source_pixel(&source, gx, gy);
                        let (a, b) = Self::interpolate(&endpoints, &grid, gx, gy);
                        modulation |= if self.is_2bpp() {
                            Self::modulation_2bpp(pixel, a, b) << (y * 8 + x)
                        } else {
                            Self::modulation_4bpp(pixel, a, b, quality) << (2 * (y * 4 + x))
                        };
                    }
                }

                let block = &endpoints[(by * grid.blocks_x + bx) as usize];
                let offset = morton_index(bx, by, grid.blocks_x, grid.blocks_y) * 8;
                output[offset..offset + 4].copy_from_slice(&modulation.to_le_bytes());
                output[offset + 4..offset + 8]
                    .copy_from_slice(&color_word(block.a, block.b).to_le_bytes());
            }
        }

        if output.len() != expected {
            return Err(BlockEncodeError::OutputSizeMismatch {
                expected,
                actual: output.len(),
            });
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn encode(format: PixelFormat, data: &[u8], width: u32, height: u32) -> Vec<u8> {
        let plane = RgbaPlane::new(data, width, height).unwrap();
        PvrtcEncoder::new(format)
            .unwrap()
            .encode(&plane, CompressionLevel::Normal)
            .unwrap()
    }

    #[rstest]
    #[case(PixelFormat::RgbPvrtc4Bpp, 1, 1)]
    #[case(PixelFormat::RgbaPvrtc4Bpp, 16, 16)]
    #[case(PixelFormat::RgbaPvrtc4Bpp, 32, 4)]
    #[case(PixelFormat::RgbPvrtc2Bpp, 2, 2)]
    #[case(PixelFormat::RgbaPvrtc2Bpp, 64, 16)]
    fn output_has_format_size(
        #[case] format: PixelFormat,
        #[case] width: u32,
        #[case] height: u32,
    ) {
        let data = gradient(width, height);
        let blocks = encode(format, &data, width, height);
        assert_eq!(blocks.len(), data_size(format, width, height).unwrap());
    }

    #[test]
    fn rejects_non_power_of_two() {
        let data = gradient(6, 4);
        let plane = RgbaPlane::new(&data, 6, 4).unwrap();
        let result = PvrtcEncoder::new(PixelFormat::RgbPvrtc4Bpp)
            .unwrap()
            .encode(&plane, CompressionLevel::Fast);
        assert_eq!(
            result,
            Err(BlockEncodeError::DimensionsNotPowerOfTwo {
                width: 6,
                height: 4
            })
        );
    }

    #[test]
    fn rejects_non_pvrtc_format() {
        assert_eq!(
            PvrtcEncoder::new(PixelFormat::RgbEtc1).unwrap_err(),
            BlockEncodeError::UnsupportedFormat(PixelFormat::RgbEtc1)
        );
    }

    #[rstest]
    #[case(PixelFormat::RgbPvrtc4Bpp)]
    #[case(PixelFormat::RgbaPvrtc4Bpp)]
    #[case(PixelFormat::RgbPvrtc2Bpp)]
    #[case(PixelFormat::RgbaPvrtc2Bpp)]
    fn solid_white_uses_opaque_endpoints(#[case] format: PixelFormat) {
        let data = solid(8, 8, [255, 255, 255, 255]);
        let blocks = encode(format, &data, 8, 8);
        for block in blocks.chunks_exact(8) {
            let color = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
            assert_eq!(color, 0xFFFF_FFFE);
        }
    }

    #[test]
    fn opaque_format_ignores_alpha() {
        let mut data = gradient(8, 8);
        let opaque = encode(PixelFormat::RgbPvrtc4Bpp, &data, 8, 8);
        for px in data.chunks_exact_mut(4) {
            px[3] = 0;
        }
        assert_eq!(encode(PixelFormat::RgbPvrtc4Bpp, &data, 8, 8), opaque);
    }

    #[rstest]
    #[case(CompressionLevel::Fast)]
    #[case(CompressionLevel::Normal)]
    #[case(CompressionLevel::High)]
    #[case(CompressionLevel::Best)]
    fn every_level_produces_the_same_size(#[case] quality: CompressionLevel) {
        let data = gradient(32, 32);
        let plane = RgbaPlane::new(&data, 32, 32).unwrap();
        let blocks = PvrtcEncoder::new(PixelFormat::RgbaPvrtc4Bpp)
            .unwrap()
            .encode(&plane, quality)
            .unwrap();
        assert_eq!(blocks.len(), 512);
    }

    #[test]
    fn two_tone_block_selects_both_endpoints() {
        // Left half black, right half white, 2bpp. Modulation bits must not be uniform.
        let mut data = Vec::new();
        for _y in 0..16 {
            for x in 0..16 {
                let v = if x < 8 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let blocks = encode(PixelFormat::RgbPvrtc2Bpp, &data, 16, 16);
        let any_set = blocks
            .chunks_exact(8)
            .any(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]) != 0);
        let any_clear = blocks
            .chunks_exact(8)
            .any(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]) != u32::MAX);
        assert!(any_set && any_clear);
    }

    #[rstest]
    #[case(PixelFormat::RgbPvrtc4Bpp)]
    #[case(PixelFormat::RgbPvrtc2Bpp)]
    fn edge_on_block_boundary_keeps_distinct_endpoints(#[case] format: PixelFormat) {
        let mut data = Vec::new();
        for _y in 0..16 {
            for x in 0..16 {
                let v = if x < 8 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let blocks = encode(format, &data, 16, 16);
        for block in blocks.chunks_exact(8) {
            let color = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
            let a = (color >> 1) & 0x7FFF;
            let b = color >> 16;
            // Opaque black A and opaque white B.
            assert_eq!(a, 1 << 14);
            assert_eq!(b, 0xFFFF);
        }
    }

    #[test]
    fn high_level_insets_2bpp_endpoints() {
        let mut data = Vec::new();
        for _y in 0..16 {
            for x in 0..16 {
                let v = if x < 8 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let plane = RgbaPlane::new(&data, 16, 16).unwrap();
        let encoder = PvrtcEncoder::new(PixelFormat::RgbPvrtc2Bpp).unwrap();
        let normal = encoder.encode(&plane, CompressionLevel::Normal).unwrap();
        let high = encoder.encode(&plane, CompressionLevel::High).unwrap();
        assert_ne!(normal, high);
    }
}
