//! Endpoint quantization and packing for PVRTC1 colour words.
//!
//! A PVRTC1 block carries two endpoints. Colour A is the low precision one
//! (opaque `R5 G5 B4`, translucent `A3 R4 G4 B3`) and occupies bits 1-15 of the colour
//! word. Colour B (opaque `R5 G5 B5`, translucent `A3 R4 G4 B4`) occupies bits 16-31. The
//! top bit of each field selects between the opaque and translucent encodings.

/// Endpoints with alpha at or above this value are stored in the opaque encoding.
const OPAQUE_THRESHOLD: u8 = 247;

/// A packed endpoint along with the RGBA colour a decoder reconstructs from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PackedColor {
    pub bits: u16,
    pub rgba: [u8; 4],
}

/// Rounds an 8-bit value to `bits` bits.
#[inline]
pub(crate) fn quantize(value: u8, bits: u32) -> u32 {
    let max = (1u32 << bits) - 1;
    (value as u32 * max + 127) / 255
}

/// Widens a `bits`-bit value to 8 bits by bit replication.
#[inline]
pub(crate) fn expand(value: u32, bits: u32) -> u8 {
    let mut out = 0u32;
    let mut filled = 0i32;
    while filled < 8 {
        let shift = 8 - filled - bits as i32;
        out |= if shift >= 0 {
            value << shift
        } else {
            value >> -shift
        };
        filled += bits as i32;
    }
    out as u8
}

/// Translucent alpha is stored in 3 bits and read back as `a << 1` in 4 bits.
#[inline]
fn translucent_alpha(alpha: u8) -> (u32, u8) {
    let a = quantize(alpha, 3);
    (a, expand(a << 1, 4))
}

/// Packs colour A into its 15-bit field (flag in bit 14).
pub(crate) fn pack_a(color: [u8; 4]) -> PackedColor {
    let [r, g, b, a] = color;
    if a >= OPAQUE_THRESHOLD {
        let (r, g, b) = (quantize(r, 5), quantize(g, 5), quantize(b, 4));
        PackedColor {
            bits: (1 << 14 | r << 9 | g << 4 | b) as u16,
            rgba: [expand(r, 5), expand(g, 5), expand(b, 4), 255],
        }
    } else {
        let (a, alpha) = translucent_alpha(a);
        let (r, g, b) = (quantize(r, 4), quantize(g, 4), quantize(b, 3));
        PackedColor {
            bits: (a << 11 | r << 7 | g << 3 | b) as u16,
            rgba: [expand(r, 4), expand(g, 4), expand(b, 3), alpha],
        }
    }
}

/// Packs colour B into its 16-bit field (flag in bit 15).
pub(crate) fn pack_b(color: [u8; 4]) -> PackedColor {
    let [r, g, b, a] = color;
    if a >= OPAQUE_THRESHOLD {
        let (r, g, b) = (quantize(r, 5), quantize(g, 5), quantize(b, 5));
        PackedColor {
            bits: (1 << 15 | r << 10 | g << 5 | b) as u16,
            rgba: [expand(r, 5), expand(g, 5), expand(b, 5), 255],
        }
    } else {
        let (a, alpha) = translucent_alpha(a);
        let (r, g, b) = (quantize(r, 4), quantize(g, 4), quantize(b, 4));
        PackedColor {
            bits: (a << 12 | r << 8 | g << 4 | b) as u16,
            rgba: [expand(r, 4), expand(g, 4), expand(b, 4), alpha],
        }
    }
}

/// Assembles the colour word of a block using the standard (non punch-through)
/// modulation mode.
#[inline]
pub(crate) fn color_word(a: PackedColor, b: PackedColor) -> u32 {
    (a.bits as u32) << 1 | (b.bits as u32) << 16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(0, 5, 0)]
    #[case(255, 5, 31)]
    #[case(255, 4, 15)]
    #[case(128, 5, 16)]
    #[case(255, 3, 7)]
    fn quantize_rounds(#[case] value: u8, #[case] bits: u32, #[case] expected: u32) {
        assert_eq!(quantize(value, bits), expected);
    }

    #[rstest]
    #[case(31, 5, 255)]
    #[case(0, 5, 0)]
    #[case(15, 4, 255)]
    #[case(7, 3, 255)]
    #[case(16, 5, 132)]
    #[case(0b100, 3, 0b1001_0010)]
    fn expand_replicates_bits(#[case] value: u32, #[case] bits: u32, #[case] expected: u8) {
        assert_eq!(expand(value, bits), expected);
    }

    #[test]
    fn opaque_white_fills_the_colour_word() {
        let white = [255, 255, 255, 255];
        let a = pack_a(white);
        let b = pack_b(white);
        assert_eq!(a.rgba, white);
        assert_eq!(b.rgba, white);
        assert_eq!(color_word(a, b), 0xFFFF_FFFE);
    }

    #[test]
    fn translucent_endpoints_clear_the_flag() {
        let a = pack_a([255, 255, 255, 0]);
        let b = pack_b([255, 255, 255, 128]);
        assert_eq!(a.bits & 1 << 14, 0);
        assert_eq!(b.bits & 1 << 15, 0);
        assert_eq!(a.rgba[3], 0);
        assert!(b.rgba[3] > 96 && b.rgba[3] < 160);
    }
}
