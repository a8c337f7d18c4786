//! Per-pixel conversion between uncompressed formats and RGBA8.
//!
//! Missing colour channels are filled by replication, a missing alpha channel becomes
//! 255, and luminance uses integer Rec.601 weights so that `L -> RGB -> L` is exact.
//! Packed 16-bit formats are little-endian with the first channel in the high bits.

use texc_common::PixelFormat;

/// Rec.601 luma in 8-bit fixed point.
#[inline]
pub(crate) fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32 + 128) >> 8) as u8
}

#[inline]
fn quantize(value: u8, bits: u32) -> u16 {
    let max = (1u32 << bits) - 1;
    ((value as u32 * max + 127) / 255) as u16
}

#[inline]
fn expand(value: u16, bits: u32) -> u8 {
    let value = value as u32;
    let wide = value << (8 - bits) | value >> (2 * bits).saturating_sub(8);
    wide as u8
}

/// Expands one uncompressed level to RGBA8. `data` must already be length-checked.
///
/// Returns [`None`] for block-compressed formats.
pub(crate) fn to_rgba(format: PixelFormat, data: &[u8]) -> Option<Vec<u8>> {
    let rgba = match format {
        PixelFormat::R8G8B8A8 => data.to_vec(),
        PixelFormat::R8G8B8 => data
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        PixelFormat::L8 => data.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        PixelFormat::L8A8 => data
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        PixelFormat::R5G6B5 => data
            .chunks_exact(2)
            .flat_map(|px| {
                let v = u16::from_le_bytes([px[0], px[1]]);
                [
                    expand(v >> 11, 5),
                    expand(v >> 5 & 0x3F, 6),
                    expand(v & 0x1F, 5),
                    255,
                ]
            })
            .collect(),
        PixelFormat::R4G4B4A4 => data
            .chunks_exact(2)
            .flat_map(|px| {
                let v = u16::from_le_bytes([px[0], px[1]]);
                [
                    expand(v >> 12, 4),
                    expand(v >> 8 & 0xF, 4),
                    expand(v >> 4 & 0xF, 4),
                    expand(v & 0xF, 4),
                ]
            })
            .collect(),
        PixelFormat::RgbPvrtc2Bpp
        | PixelFormat::RgbPvrtc4Bpp
        | PixelFormat::RgbaPvrtc2Bpp
        | PixelFormat::RgbaPvrtc4Bpp
        | PixelFormat::RgbEtc1 => return None,
    };

    Some(rgba)
}

/// Packs an RGBA8 buffer into an uncompressed format.
///
/// Returns [`None`] for block-compressed formats.
pub(crate) fn from_rgba(format: PixelFormat, rgba: &[u8]) -> Option<Vec<u8>> {
    let pixels = rgba.chunks_exact(4);
    let data = match format {
        PixelFormat::R8G8B8A8 => rgba.to_vec(),
        PixelFormat::R8G8B8 => pixels.flat_map(|px| [px[0], px[1], px[2]]).collect(),
        PixelFormat::L8 => pixels.map(|px| luminance(px[0], px[1], px[2])).collect(),
        PixelFormat::L8A8 => pixels
            .flat_map(|px| [luminance(px[0], px[1], px[2]), px[3]])
            .collect(),
        PixelFormat::R5G6B5 => pixels
            .flat_map(|px| {
                let v =
                    quantize(px[0], 5) << 11 | quantize(px[1], 6) << 5 | quantize(px[2], 5);
                v.to_le_bytes()
            })
            .collect(),
        PixelFormat::R4G4B4A4 => pixels
            .flat_map(|px| {
                let v = quantize(px[0], 4) << 12
                    | quantize(px[1], 4) << 8
                    | quantize(px[2], 4) << 4
                    | quantize(px[3], 4);
                v.to_le_bytes()
            })
            .collect(),
        PixelFormat::RgbPvrtc2Bpp
        | PixelFormat::RgbPvrtc4Bpp
        | PixelFormat::RgbaPvrtc2Bpp
        | PixelFormat::RgbaPvrtc4Bpp
        | PixelFormat::RgbEtc1 => return None,
    };

    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const TEAL: [u8; 4] = [0, 128, 128, 64];

    #[rstest]
    #[case(PixelFormat::R8G8B8, RED, vec![255, 0, 0])]
    #[case(PixelFormat::L8, RED, vec![77])]
    #[case(PixelFormat::L8A8, TEAL, vec![90, 64])]
    #[case(PixelFormat::R5G6B5, RED, vec![0x00, 0xF8])]
    #[case(PixelFormat::R4G4B4A4, TEAL, vec![0x84, 0x08])]
    fn packs_channels(
        #[case] format: PixelFormat,
        #[case] rgba: [u8; 4],
        #[case] expected: Vec<u8>,
    ) {
        assert_eq!(from_rgba(format, &rgba).unwrap(), expected);
    }

    #[rstest]
    #[case(PixelFormat::R8G8B8, vec![1, 2, 3], [1, 2, 3, 255])]
    #[case(PixelFormat::L8, vec![9], [9, 9, 9, 255])]
    #[case(PixelFormat::L8A8, vec![9, 7], [9, 9, 9, 7])]
    #[case(PixelFormat::R5G6B5, vec![0xFF, 0xFF], [255, 255, 255, 255])]
    #[case(PixelFormat::R4G4B4A4, vec![0x84, 0x08], [0, 136, 136, 68])]
    fn expands_channels(
        #[case] format: PixelFormat,
        #[case] data: Vec<u8>,
        #[case] expected: [u8; 4],
    ) {
        assert_eq!(to_rgba(format, &data).unwrap(), expected);
    }

    #[test]
    fn luminance_round_trip_is_exact() {
        let grey: Vec<u8> = (0..=255).collect();
        let rgba = to_rgba(PixelFormat::L8, &grey).unwrap();
        assert_eq!(from_rgba(PixelFormat::L8, &rgba).unwrap(), grey);
    }

    #[rstest]
    #[case(PixelFormat::R5G6B5)]
    #[case(PixelFormat::R4G4B4A4)]
    #[case(PixelFormat::L8A8)]
    #[case(PixelFormat::R8G8B8)]
    fn packed_round_trip_is_exact(#[case] format: PixelFormat) {
        // Every representable value survives expand then quantize.
        let data: Vec<u8> = (0..=255u8).flat_map(|v| [v, v.wrapping_mul(7)]).collect();
        let data = &data[..data.len() / 6 * 6];
        let rgba = to_rgba(format, data).unwrap();
        assert_eq!(from_rgba(format, &rgba).unwrap(), data);
    }

    #[test]
    fn block_formats_are_rejected() {
        assert!(to_rgba(PixelFormat::RgbEtc1, &[0; 8]).is_none());
        assert!(from_rgba(PixelFormat::RgbaPvrtc4Bpp, &[0; 4]).is_none());
    }
}
