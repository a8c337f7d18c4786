//! The compression envelope contract.
//!
//! An envelope wraps the stored bytes of one mip level in an optional secondary
//! compression. Envelope codecs see every level as an image plane described by a
//! [`PlaneLayout`], which is how formats that are not plain 8-bit pixels (packed 16-bit
//! and hardware block streams) can still be carried by an image codec.

use crate::error::FormatError;
use crate::format::PixelFormat;
use crate::size::data_size;
use alloc::boxed::Box;
use alloc::vec::Vec;
use derive_enum_all_values::AllValues;

/// Largest plane side accepted by envelope codecs.
pub const MAX_PLANE_DIMENSION: u32 = 16383;

/// Secondary compression applied on top of a level's stored bytes.
///
/// The discriminants are part of the C ABI.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, AllValues)]
pub enum CompressionType {
    /// No secondary compression.
    #[default]
    Default = 0,
    /// Lossless WebP.
    WebP = 1,
    /// WebP after reducing colour precision. Formats whose bytes are not 8-bit
    /// colour channels are carried losslessly.
    WebPLossy = 2,
}

/// Pixel layout of an envelope plane.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaneColor {
    /// One byte per pixel.
    L8,
    /// Two bytes per pixel, second one treated as alpha.
    La8,
    /// Three bytes per pixel.
    Rgb8,
    /// Four bytes per pixel, last one alpha.
    Rgba8,
}

impl PlaneColor {
    /// Bytes per plane pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PlaneColor::L8 => 1,
            PlaneColor::La8 => 2,
            PlaneColor::Rgb8 => 3,
            PlaneColor::Rgba8 => 4,
        }
    }

    /// Index of the alpha byte inside a pixel, if the layout has one.
    pub const fn alpha_index(self) -> Option<usize> {
        match self {
            PlaneColor::La8 => Some(1),
            PlaneColor::Rgba8 => Some(3),
            PlaneColor::L8 | PlaneColor::Rgb8 => None,
        }
    }
}

/// How a mip level's stored bytes are presented to an envelope codec.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Plane width in pixels.
    pub width: u32,
    /// Plane height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub color: PlaneColor,
    /// Whether the bytes are 8-bit colour samples that tolerate precision loss.
    pub quantizable: bool,
}

impl PlaneLayout {
    /// Bytes per plane row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.color.bytes_per_pixel()
    }

    /// Total plane size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.stride() * self.height as usize
    }

    /// Whether the plane holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the plane used for a `width` x `height` level stored in `format`.
    ///
    /// - Formats with 8-bit channels map one to one onto a plane of the same size.
    /// - Packed 16-bit formats become two-byte planes of the same size.
    /// - Block streams become RGBA planes; the row count is the largest divisor of
    ///   the pixel count not exceeding the level height, provided the resulting width
    ///   stays within [`MAX_PLANE_DIMENSION`].
    pub fn for_level(format: PixelFormat, width: u32, height: u32) -> Result<Self, FormatError> {
        let len = data_size(format, width, height)?;
        let descriptor = format.describe();

        if descriptor.is_block_compressed() {
            return block_plane(len, height);
        }

        if width > MAX_PLANE_DIMENSION || height > MAX_PLANE_DIMENSION {
            return Err(FormatError::PlaneTooLarge { len });
        }

        let (color, quantizable) = match format {
            PixelFormat::L8 => (PlaneColor::L8, true),
            PixelFormat::L8A8 => (PlaneColor::La8, true),
            PixelFormat::R8G8B8 => (PlaneColor::Rgb8, true),
            PixelFormat::R8G8B8A8 => (PlaneColor::Rgba8, true),
            // Packed 16-bit pixels, two opaque bytes each.
            _ => (PlaneColor::La8, false),
        };

        Ok(Self {
            width,
            height,
            color,
            quantizable,
        })
    }
}

fn block_plane(len: usize, height: u32) -> Result<PlaneLayout, FormatError> {
    let pixels = len / 4;
    let max_rows = (height as usize).min(pixels).min(MAX_PLANE_DIMENSION as usize);

    for rows in (1..=max_rows).rev() {
        if pixels % rows != 0 {
            continue;
        }

        let columns = pixels / rows;
        if columns <= MAX_PLANE_DIMENSION as usize {
            return Ok(PlaneLayout {
                width: columns as u32,
                height: rows as u32,
                color: PlaneColor::Rgba8,
                quantizable: false,
            });
        }
    }

    Err(FormatError::PlaneTooLarge { len })
}

/// A secondary compression codec for mip level bytes.
///
/// Implementations must round-trip [`CompressionType::Default`] and
/// [`CompressionType::WebP`] exactly. [`CompressionType::WebPLossy`] only needs to
/// preserve bytes of planes that are not [`quantizable`](PlaneLayout::quantizable).
pub trait EnvelopeCodec {
    /// Error produced by this codec.
    type Error;

    /// Compresses `data`, laid out as described by `layout`.
    fn encode(
        &self,
        kind: CompressionType,
        layout: &PlaneLayout,
        data: &[u8],
    ) -> Result<Vec<u8>, Self::Error>;

    /// Decompresses `data` into `output`, which holds exactly `layout.len()` bytes.
    fn decode(
        &self,
        kind: CompressionType,
        layout: &PlaneLayout,
        data: &[u8],
        output: &mut [u8],
    ) -> Result<(), Self::Error>;
}

impl<T: EnvelopeCodec + ?Sized> EnvelopeCodec for Box<T> {
    type Error = T::Error;

    fn encode(
        &self,
        kind: CompressionType,
        layout: &PlaneLayout,
        data: &[u8],
    ) -> Result<Vec<u8>, Self::Error> {
        (**self).encode(kind, layout, data)
    }

    fn decode(
        &self,
        kind: CompressionType,
        layout: &PlaneLayout,
        data: &[u8],
        output: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).decode(kind, layout, data, output)
    }
}

/// Codec that stores bytes as they are, whatever the requested kind.
///
/// Useful in tests and for builds that ship without an image codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEnvelope;

impl EnvelopeCodec for NoEnvelope {
    type Error = FormatError;

    fn encode(
        &self,
        _kind: CompressionType,
        layout: &PlaneLayout,
        data: &[u8],
    ) -> Result<Vec<u8>, Self::Error> {
        if data.len() != layout.len() {
            return Err(FormatError::BufferLengthMismatch {
                expected: layout.len(),
                actual: data.len(),
            });
        }

        Ok(data.to_vec())
    }

    fn decode(
        &self,
        _kind: CompressionType,
        layout: &PlaneLayout,
        data: &[u8],
        output: &mut [u8],
    ) -> Result<(), Self::Error> {
        if data.len() != layout.len() || output.len() != layout.len() {
            return Err(FormatError::BufferLengthMismatch {
                expected: layout.len(),
                actual: data.len().min(output.len()),
            });
        }

        output.copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(PixelFormat::L8, PlaneColor::L8, true)]
    #[case(PixelFormat::L8A8, PlaneColor::La8, true)]
    #[case(PixelFormat::R8G8B8, PlaneColor::Rgb8, true)]
    #[case(PixelFormat::R8G8B8A8, PlaneColor::Rgba8, true)]
    #[case(PixelFormat::R5G6B5, PlaneColor::La8, false)]
    #[case(PixelFormat::R4G4B4A4, PlaneColor::La8, false)]
    fn pixel_planes_keep_dimensions(
        #[case] format: PixelFormat,
        #[case] color: PlaneColor,
        #[case] quantizable: bool,
    ) {
        let layout = PlaneLayout::for_level(format, 7, 3).unwrap();
        assert_eq!(layout.width, 7);
        assert_eq!(layout.height, 3);
        assert_eq!(layout.color, color);
        assert_eq!(layout.quantizable, quantizable);
        assert_eq!(layout.len(), data_size(format, 7, 3).unwrap());
    }

    #[rstest]
    #[case(PixelFormat::RgbEtc1, 256, 256)]
    #[case(PixelFormat::RgbEtc1, 5, 3)]
    #[case(PixelFormat::RgbEtc1, 1, 1)]
    #[case(PixelFormat::RgbaPvrtc4Bpp, 256, 256)]
    #[case(PixelFormat::RgbPvrtc2Bpp, 1, 1)]
    #[case(PixelFormat::RgbaPvrtc2Bpp, 2048, 2)]
    fn block_planes_cover_the_stream(
        #[case] format: PixelFormat,
        #[case] width: u32,
        #[case] height: u32,
    ) {
        let layout = PlaneLayout::for_level(format, width, height).unwrap();
        assert_eq!(layout.color, PlaneColor::Rgba8);
        assert!(!layout.quantizable);
        assert!(layout.height <= height);
        assert!(layout.width <= MAX_PLANE_DIMENSION);
        assert_eq!(layout.len(), data_size(format, width, height).unwrap());
    }

    #[test]
    fn block_plane_prefers_tallest_layout() {
        // 256x256 ETC1 is 32768 bytes, 8192 plane pixels.
        let layout = PlaneLayout::for_level(PixelFormat::RgbEtc1, 256, 256).unwrap();
        assert_eq!((layout.width, layout.height), (32, 256));
    }

    #[test]
    fn no_envelope_is_identity() {
        let layout = PlaneLayout::for_level(PixelFormat::R8G8B8A8, 2, 2).unwrap();
        let data: Vec<u8> = (0..16).collect();
        let encoded = NoEnvelope
            .encode(CompressionType::WebP, &layout, &data)
            .unwrap();
        let mut decoded = vec![0u8; 16];
        NoEnvelope
            .decode(CompressionType::WebP, &layout, &encoded, &mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn boxed_codec_forwards() {
        let codec: Box<dyn EnvelopeCodec<Error = FormatError>> = Box::new(NoEnvelope);
        let layout = PlaneLayout::for_level(PixelFormat::L8, 2, 2).unwrap();
        assert!(codec
            .encode(CompressionType::Default, &layout, &[1, 2, 3])
            .is_err());
    }
}
