//! Format conversion engine.
//!
//! Every conversion goes through an RGBA8 intermediate:
//!
//! 1. The source level is expanded to RGBA8 (see [`pixels`]).
//! 2. Colour channels are re-encoded when the colour space changes.
//! 3. The RGBA8 plane is packed into the target format, either per pixel or through the
//!    block encoder registered for it.
//!
//! Block-compressed sources cannot be converted; the only accepted "conversion" of
//! a block stream is to its own format and colour space, which is a copy.

pub(crate) mod color_space;
pub(crate) mod pixels;

use crate::error::TexcError;
use texc_block_encoders::{BlockEncoderRegistry, RgbaPlane};
use texc_common::{ColorSpace, CompressionLevel, PixelFormat, data_size};

/// A format paired with the colour space its values are encoded in.
pub type FormatSpace = (PixelFormat, ColorSpace);

/// Converts one level of `width` x `height` pixels from `from` to `to`.
///
/// `data` must be exactly the size of a `from` level of these dimensions.
pub fn convert_level(
    data: &[u8],
    width: u32,
    height: u32,
    from: FormatSpace,
    to: FormatSpace,
    quality: CompressionLevel,
    encoders: &BlockEncoderRegistry,
) -> Result<Vec<u8>, TexcError> {
    let expected = data_size(from.0, width, height)?;
    if data.len() != expected {
        return Err(TexcError::InvalidDataLength {
            expected,
            actual: data.len(),
        });
    }

    if from == to {
        return Ok(data.to_vec());
    }

    let unsupported = || TexcError::UnsupportedConversion {
        from: from.0,
        to: to.0,
    };

    let mut rgba = pixels::to_rgba(from.0, data).ok_or_else(unsupported)?;
    color_space::convert_rgba(&mut rgba, from.1, to.1);

    if !to.0.is_block_compressed() {
        return pixels::from_rgba(to.0, &rgba).ok_or_else(unsupported);
    }

    let encoder = encoders.get(to.0).ok_or_else(unsupported)?;
    let plane = RgbaPlane::new(&rgba, width, height)?;
    Ok(encoder.encode(&plane, quality)?)
}

/// Expands an uncompressed level to RGBA8 without touching colour space.
pub(crate) fn level_to_rgba(format: PixelFormat, data: &[u8]) -> Result<Vec<u8>, TexcError> {
    pixels::to_rgba(format, data).ok_or(TexcError::UnsupportedConversion {
        from: format,
        to: PixelFormat::R8G8B8A8,
    })
}

/// Packs an RGBA8 plane back into an uncompressed format without touching colour space.
pub(crate) fn level_from_rgba(format: PixelFormat, rgba: &[u8]) -> Result<Vec<u8>, TexcError> {
    pixels::from_rgba(format, rgba).ok_or(TexcError::UnsupportedConversion {
        from: PixelFormat::R8G8B8A8,
        to: format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    fn linear(format: PixelFormat) -> FormatSpace {
        (format, ColorSpace::Linear)
    }

    fn run(
        data: &[u8],
        w: u32,
        h: u32,
        from: FormatSpace,
        to: FormatSpace,
    ) -> Result<Vec<u8>, TexcError> {
        convert_level(
            data,
            w,
            h,
            from,
            to,
            CompressionLevel::Fast,
            &BlockEncoderRegistry::with_defaults(),
        )
    }

    #[test]
    fn identity_is_a_copy() {
        let data = rgba_gradient(4, 4);
        let rgba = linear(PixelFormat::R8G8B8A8);
        let out = run(&data, 4, 4, rgba, rgba).unwrap();
        assert_eq!(out, data);
    }

    #[rstest]
    #[case(PixelFormat::L8)]
    #[case(PixelFormat::L8A8)]
    #[case(PixelFormat::R8G8B8)]
    #[case(PixelFormat::R5G6B5)]
    #[case(PixelFormat::R4G4B4A4)]
    #[case(PixelFormat::RgbEtc1)]
    #[case(PixelFormat::RgbPvrtc2Bpp)]
    #[case(PixelFormat::RgbaPvrtc4Bpp)]
    fn output_matches_target_size(#[case] target: PixelFormat) {
        let data = rgba_gradient(16, 8);
        let out = run(
            &data,
            16,
            8,
            linear(PixelFormat::R8G8B8A8),
            linear(target),
        )
        .unwrap();
        assert_eq!(out.len(), data_size(target, 16, 8).unwrap());
    }

    #[test]
    fn block_source_is_unsupported() {
        let blocks = vec![0u8; 8];
        let result = run(
            &blocks,
            4,
            4,
            linear(PixelFormat::RgbEtc1),
            linear(PixelFormat::R8G8B8A8),
        );
        assert!(matches!(
            result,
            Err(TexcError::UnsupportedConversion {
                from: PixelFormat::RgbEtc1,
                to: PixelFormat::R8G8B8A8
            })
        ));
    }

    #[test]
    fn block_to_same_block_is_a_copy() {
        let blocks: Vec<u8> = (0..8).collect();
        let etc1 = linear(PixelFormat::RgbEtc1);
        let out = run(&blocks, 4, 4, etc1, etc1).unwrap();
        assert_eq!(out, blocks);
    }

    #[test]
    fn missing_encoder_is_unsupported() {
        let data = rgba_gradient(4, 4);
        let result = convert_level(
            &data,
            4,
            4,
            linear(PixelFormat::R8G8B8A8),
            linear(PixelFormat::RgbEtc1),
            CompressionLevel::Fast,
            &BlockEncoderRegistry::empty(),
        );
        assert!(matches!(
            result,
            Err(TexcError::UnsupportedConversion { .. })
        ));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let result = run(
            &[0; 15],
            2,
            2,
            linear(PixelFormat::R8G8B8A8),
            linear(PixelFormat::L8),
        );
        assert!(matches!(
            result,
            Err(TexcError::InvalidDataLength {
                expected: 16,
                actual: 15
            })
        ));
    }

    #[test]
    fn colour_space_change_keeps_alpha() {
        let data = vec![128, 128, 128, 10];
        let out = run(
            &data,
            1,
            1,
            (PixelFormat::R8G8B8A8, ColorSpace::Linear),
            (PixelFormat::R8G8B8A8, ColorSpace::Srgb),
        )
        .unwrap();
        assert_eq!(out[3], 10);
        assert!(out[0] > 128);
    }
}
