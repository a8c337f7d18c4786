//! Linear to sRGB transfer, applied to colour channels through lookup tables.

use std::sync::OnceLock;
use texc_common::ColorSpace;

fn linear_to_srgb_table() -> &'static [u8; 256] {
    static TABLE: OnceLock<[u8; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        build_table(|c| {
            if c <= 0.003_130_8 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            }
        })
    })
}

fn srgb_to_linear_table() -> &'static [u8; 256] {
    static TABLE: OnceLock<[u8; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        build_table(|c| {
            if c <= 0.040_45 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        })
    })
}

fn build_table(curve: impl Fn(f32) -> f32) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (x, entry) in table.iter_mut().enumerate() {
        let value = curve(x as f32 / 255.0);
        *entry = (value * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    table
}

/// Re-encodes the colour channels of an RGBA buffer from `from` to `to`. Alpha is left
/// untouched.
pub(crate) fn convert_rgba(rgba: &mut [u8], from: ColorSpace, to: ColorSpace) {
    let table = match (from, to) {
        (ColorSpace::Linear, ColorSpace::Srgb) => linear_to_srgb_table(),
        (ColorSpace::Srgb, ColorSpace::Linear) => srgb_to_linear_table(),
        _ => return,
    };

    for px in rgba.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            *c = table[*c as usize];
        }
    }
}
