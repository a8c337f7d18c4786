#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageError, ImageFormat};
use texc_common::{CompressionType, EnvelopeCodec, PlaneColor, PlaneLayout};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while wrapping or unwrapping a WebP envelope.
#[derive(Debug, Error)]
pub enum WebPEnvelopeError {
    /// Encoding or decoding failed inside the image codec.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The decoded image does not have the dimensions of the level it belongs to.
    #[error("Decoded image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}.")]
    DimensionMismatch {
        /// Plane width.
        expected_width: u32,
        /// Plane height.
        expected_height: u32,
        /// Decoded width.
        actual_width: u32,
        /// Decoded height.
        actual_height: u32,
    },

    /// A buffer does not match the plane size.
    #[error("Buffer length mismatch. Expected {expected} bytes, got {actual}.")]
    LengthMismatch {
        /// Plane size in bytes.
        expected: usize,
        /// Size of the supplied buffer.
        actual: usize,
    },

    /// Invalid lossy precision.
    #[error("Invalid lossy precision: {0} bits dropped. Must be between 1 and 4.")]
    InvalidLossyBits(u8),
}

/// WebP implementation of [`EnvelopeCodec`].
///
/// [`CompressionType::Default`] copies the data unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebPEnvelope {
    lossy_bits: u8,
}

impl WebPEnvelope {
    /// Creates an envelope that drops `lossy_bits` low bits of every colour sample
    /// when [`CompressionType::WebPLossy`] is requested.
    ///
    /// # Parameters
    /// * `lossy_bits` - Bits dropped per colour channel (1-4)
    pub fn with_lossy_bits(lossy_bits: u8) -> Result<Self, WebPEnvelopeError> {
        if !(1..=4).contains(&lossy_bits) {
            return Err(WebPEnvelopeError::InvalidLossyBits(lossy_bits));
        }

        Ok(Self { lossy_bits })
    }

    /// Creates an envelope that drops 2 bits per colour sample in lossy mode.
    pub fn new() -> Self {
        Self { lossy_bits: 2 }
    }

    /// Bits dropped per colour sample in lossy mode.
    pub fn lossy_bits(&self) -> u8 {
        self.lossy_bits
    }
}

impl Default for WebPEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeCodec for WebPEnvelope {
    type Error = WebPEnvelopeError;

    fn encode(
        &self,
        kind: CompressionType,
        layout: &PlaneLayout,
        data: &[u8],
    ) -> Result<Vec<u8>, Self::Error> {
        check_length(layout.len(), data.len())?;

        match kind {
            CompressionType::Default => Ok(data.to_vec()),
            CompressionType::WebP => encode_lossless(layout, data),
            CompressionType::WebPLossy if layout.quantizable => {
                let reduced = reduce_precision(layout.color, data, self.lossy_bits);
                encode_lossless(layout, &reduced)
            }
            // Bytes that are not colour samples cannot tolerate loss.
            CompressionType::WebPLossy => encode_lossless(layout, data),
        }
    }

    fn decode(
        &self,
        kind: CompressionType,
        layout: &PlaneLayout,
        data: &[u8],
        output: &mut [u8],
    ) -> Result<(), Self::Error> {
        check_length(layout.len(), output.len())?;

        if kind == CompressionType::Default {
            check_length(layout.len(), data.len())?;
            output.copy_from_slice(data);
            return Ok(());
        }

        let image = image::load_from_memory_with_format(data, ImageFormat::WebP)?;
        if image.width() != layout.width || image.height() != layout.height {
            return Err(WebPEnvelopeError::DimensionMismatch {
                expected_width: layout.width,
                expected_height: layout.height,
                actual_width: image.width(),
                actual_height: image.height(),
            });
        }

        // The codec may widen grey planes to RGB(A); pick the channels back out.
        match layout.color {
            PlaneColor::L8 => {
                let rgb = image.into_rgb8();
                for (out, px) in output.iter_mut().zip(rgb.pixels()) {
                    *out = px.0[0];
                }
            }
            PlaneColor::La8 => {
                let rgba = image.into_rgba8();
                for (out, px) in output.chunks_exact_mut(2).zip(rgba.pixels()) {
                    out[0] = px.0[0];
                    out[1] = px.0[3];
                }
            }
            PlaneColor::Rgb8 => output.copy_from_slice(image.into_rgb8().as_raw()),
            PlaneColor::Rgba8 => output.copy_from_slice(image.into_rgba8().as_raw()),
        }

        Ok(())
    }
}

fn check_length(expected: usize, actual: usize) -> Result<(), WebPEnvelopeError> {
    if expected != actual {
        return Err(WebPEnvelopeError::LengthMismatch { expected, actual });
    }
    Ok(())
}

fn encode_lossless(layout: &PlaneLayout, data: &[u8]) -> Result<Vec<u8>, WebPEnvelopeError> {
    let color = match layout.color {
        PlaneColor::L8 => ExtendedColorType::L8,
        PlaneColor::La8 => ExtendedColorType::La8,
        PlaneColor::Rgb8 => ExtendedColorType::Rgb8,
        PlaneColor::Rgba8 => ExtendedColorType::Rgba8,
    };

    let mut encoded = Vec::new();
    WebPEncoder::new_lossless(&mut encoded).encode(data, layout.width, layout.height, color)?;
    debug!(
        width = layout.width,
        height = layout.height,
        raw = data.len(),
        encoded = encoded.len(),
        "webp envelope encoded"
    );
    Ok(encoded)
}

/// Drops the low `bits` bits of every colour sample, rounding towards the middle of the
/// dropped range. Alpha samples are kept intact.
fn reduce_precision(color: PlaneColor, data: &[u8], bits: u8) -> Vec<u8> {
    let mask = 0xFFu8 << bits;
    let half = 1u8 << (bits - 1);
    let alpha = color.alpha_index();
    let bpp = color.bytes_per_pixel();

    data.iter()
        .enumerate()
        .map(|(x, &v)| {
            if alpha == Some(x % bpp) {
                v
            } else {
                (v & mask) | half
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use texc_common::PixelFormat;

    /// RGBA test image used across the envelope tests.
    fn gradient(width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::new();
        for i in 0..width * height {
            let (x, y) = (i % width, i / width);
            data.extend_from_slice(&[x as u8, y as u8, 255 - i as u8, i as u8]);
        }
        data
    }

    fn plane_bytes(format: PixelFormat, width: u32, height: u32) -> Vec<u8> {
        let len = texc_common::data_size(format, width, height).unwrap();
        (0..len).map(|x| (x * 37 + x / 7) as u8).collect()
    }

    #[rstest]
    #[case(PixelFormat::L8, 16, 16)]
    #[case(PixelFormat::L8A8, 16, 8)]
    #[case(PixelFormat::R8G8B8, 5, 3)]
    #[case(PixelFormat::R8G8B8A8, 16, 16)]
    #[case(PixelFormat::R5G6B5, 8, 8)]
    #[case(PixelFormat::RgbEtc1, 64, 64)]
    #[case(PixelFormat::RgbaPvrtc2Bpp, 1, 1)]
    fn lossless_restores_every_byte(
        #[case] format: PixelFormat,
        #[case] width: u32,
        #[case] height: u32,
    ) {
        let layout = PlaneLayout::for_level(format, width, height).unwrap();
        let data = plane_bytes(format, width, height);
        let envelope = WebPEnvelope::new();

        let encoded = envelope
            .encode(CompressionType::WebP, &layout, &data)
            .unwrap();
        let mut decoded = vec![0u8; data.len()];
        envelope
            .decode(CompressionType::WebP, &layout, &encoded, &mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn lossy_reduces_colour_but_keeps_alpha() {
        let layout = PlaneLayout::for_level(PixelFormat::R8G8B8A8, 16, 16).unwrap();
        let data = gradient(16, 16);
        let envelope = WebPEnvelope::new();

        let encoded = envelope
            .encode(CompressionType::WebPLossy, &layout, &data)
            .unwrap();
        let mut decoded = vec![0u8; data.len()];
        envelope
            .decode(CompressionType::WebPLossy, &layout, &encoded, &mut decoded)
            .unwrap();

        assert_ne!(decoded, data);
        for (original, restored) in data.chunks_exact(4).zip(decoded.chunks_exact(4)) {
            assert_eq!(original[3], restored[3]);
            for c in 0..3 {
                assert!(original[c].abs_diff(restored[c]) <= 2);
            }
        }
    }

    #[test]
    fn lossy_keeps_block_streams_intact() {
        let layout = PlaneLayout::for_level(PixelFormat::RgbEtc1, 32, 32).unwrap();
        let data = plane_bytes(PixelFormat::RgbEtc1, 32, 32);
        let envelope = WebPEnvelope::new();

        let encoded = envelope
            .encode(CompressionType::WebPLossy, &layout, &data)
            .unwrap();
        let mut decoded = vec![0u8; data.len()];
        envelope
            .decode(CompressionType::WebPLossy, &layout, &encoded, &mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn default_kind_is_a_copy() {
        let layout = PlaneLayout::for_level(PixelFormat::R8G8B8A8, 2, 2).unwrap();
        let data = gradient(2, 2);
        let encoded = WebPEnvelope::new()
            .encode(CompressionType::Default, &layout, &data)
            .unwrap();
        assert_eq!(encoded, data);
    }

    #[test]
    fn compressed_payload_differs_from_raw() {
        let layout = PlaneLayout::for_level(PixelFormat::R8G8B8A8, 16, 16).unwrap();
        let data = gradient(16, 16);
        let encoded = WebPEnvelope::new()
            .encode(CompressionType::WebP, &layout, &data)
            .unwrap();
        assert!(!encoded.is_empty());
        assert_ne!(encoded.len(), data.len());
    }

    #[test]
    fn rejects_wrong_length() {
        let layout = PlaneLayout::for_level(PixelFormat::R8G8B8A8, 2, 2).unwrap();
        assert!(matches!(
            WebPEnvelope::new().encode(CompressionType::WebP, &layout, &[0; 15]),
            Err(WebPEnvelopeError::LengthMismatch {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(4, true)]
    #[case(5, false)]
    fn lossy_bits_range(#[case] bits: u8, #[case] valid: bool) {
        assert_eq!(WebPEnvelope::with_lossy_bits(bits).is_ok(), valid);
    }

    #[test]
    fn reduce_precision_skips_alpha() {
        let reduced = reduce_precision(PlaneColor::La8, &[0xFF, 0xFF, 0x00, 0x01], 2);
        assert_eq!(reduced, vec![0xFE, 0xFF, 0x02, 0x01]);
    }
}
