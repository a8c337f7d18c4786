//! The texture facade: a texture, its mip chain and every operation on it.

use crate::convert::{convert_level, level_from_rgba, level_to_rgba};
use crate::envelope;
use crate::error::TexcError;
use crate::mip::MipLevel;
use crate::mipgen::{RgbaImage, build_chain};
use crate::options::TextureOptions;
use crate::transform::{self, FlipAxis};
use texc_common::{
    ColorSpace, CompressionLevel, CompressionType, EnvelopeCodec, PixelFormat, data_size,
};
use texc_webp::WebPEnvelope;
use tracing::{debug, instrument};

/// Dimensions and format tag of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Width of level 0.
    pub width: u32,
    /// Height of level 0.
    pub height: u32,
    /// 8-byte format tag, see [`PixelFormatDescriptor::tag`](texc_common::PixelFormatDescriptor::tag).
    pub pixel_format: [u8; 8],
}

/// A texture and its mip chain.
///
/// Level 0 always exists and matches the texture's dimensions. Level `k` is
/// `max(1, width >> k)` x `max(1, height >> k)`, and the chain either holds only level
/// 0 or runs all the way down to 1x1.
///
/// Every mutating method either succeeds completely or returns an error and leaves the
/// texture untouched: new levels are built first and swapped in at the end.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    format: PixelFormat,
    color_space: ColorSpace,
    levels: Vec<MipLevel>,
    options: TextureOptions,
}

impl Texture {
    /// Creates a single level texture from a copy of `data`.
    ///
    /// `data` must be exactly the size of one `width` x `height` image in `format`.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        color_space: ColorSpace,
        data: &[u8],
    ) -> Result<Self, TexcError> {
        Self::with_options(
            width,
            height,
            format,
            color_space,
            data,
            TextureOptions::default(),
        )
    }

    /// Like [`Texture::new`], with explicit options.
    pub fn with_options(
        width: u32,
        height: u32,
        format: PixelFormat,
        color_space: ColorSpace,
        data: &[u8],
        options: TextureOptions,
    ) -> Result<Self, TexcError> {
        if width == 0 || height == 0 {
            return Err(TexcError::InvalidDimensions { width, height });
        }

        let expected = data_size(format, width, height)?;
        if data.len() != expected {
            return Err(TexcError::InvalidDataLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            format,
            color_space,
            levels: vec![MipLevel::new(width, height, data.to_vec())],
            options,
        })
    }

    /// Width of level 0.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of level 0.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current pixel format.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Current colour space.
    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    /// Options this texture was created with.
    pub fn options(&self) -> &TextureOptions {
        &self.options
    }

    /// Dimensions and format tag.
    pub fn header(&self) -> Header {
        Header {
            width: self.width,
            height: self.height,
            pixel_format: self.format.describe().tag(),
        }
    }

    /// All levels, finest first.
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// Number of levels.
    pub fn mip_count(&self) -> usize {
        self.levels.len()
    }

    /// Level `index`.
    pub fn level(&self, index: usize) -> Result<&MipLevel, TexcError> {
        self.levels.get(index).ok_or(TexcError::MipIndexOutOfRange {
            index,
            count: self.levels.len(),
        })
    }

    /// Stored bytes of level `index`: the envelope payload if one was applied, the raw
    /// pixel or block bytes otherwise.
    pub fn mip_data(&self, index: usize) -> Result<&[u8], TexcError> {
        Ok(self.level(index)?.stored())
    }

    /// Copies the stored bytes of level 0 into `output` and returns how many were written.
    ///
    /// Fails with [`TexcError::BufferTooSmall`] without writing anything if `output`
    /// cannot hold them.
    pub fn get_data(&self, output: &mut [u8]) -> Result<usize, TexcError> {
        let stored = self.mip_data(0)?;
        if output.len() < stored.len() {
            return Err(TexcError::BufferTooSmall {
                needed: stored.len(),
                actual: output.len(),
            });
        }

        output[..stored.len()].copy_from_slice(stored);
        Ok(stored.len())
    }

    /// Size of the raw bytes of level `index`.
    pub fn data_size_uncompressed(&self, index: usize) -> Result<usize, TexcError> {
        Ok(self.level(index)?.size_uncompressed())
    }

    /// Size of the stored bytes of level `index`. Equal to
    /// [`data_size_uncompressed`](Self::data_size_uncompressed) when no envelope is applied.
    pub fn data_size_compressed(&self, index: usize) -> Result<usize, TexcError> {
        Ok(self.level(index)?.size_compressed())
    }

    /// Resamples level 0 to `width` x `height` and drops every other level.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TexcError> {
        self.require_pixel_ops("resize")?;
        let base = self.rgba_level(&self.levels[0])?;
        let resized = transform::resize(&base, width, height)?;
        let level = self.pack_rgba(resized)?;

        debug!(
            from_width = self.width,
            from_height = self.height,
            width,
            height,
            "resized texture"
        );
        self.width = width;
        self.height = height;
        self.levels = vec![level];
        Ok(())
    }

    /// Multiplies the colour channels of every pixel of every level by its alpha.
    ///
    /// Not idempotent: call at most once per texture.
    pub fn pre_multiply_alpha(&mut self) -> Result<(), TexcError> {
        self.require_pixel_ops("pre_multiply_alpha")?;
        let levels = self
            .levels
            .iter()
            .map(|level| {
                let mut image = self.rgba_level(level)?;
                transform::premultiply_alpha(&mut image.data);
                self.pack_rgba(image)
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.levels = levels;
        Ok(())
    }

    /// Rebuilds the mip chain from level 0 down to 1x1 with a box filter.
    pub fn gen_mip_maps(&mut self) -> Result<(), TexcError> {
        self.require_pixel_ops("gen_mip_maps")?;
        let base = self.rgba_level(&self.levels[0])?;
        let levels = build_chain(base)
            .into_iter()
            .map(|image| self.pack_rgba(image))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            width = self.width,
            height = self.height,
            levels = levels.len(),
            "generated mip chain"
        );
        self.levels = levels;
        Ok(())
    }

    /// Mirrors every level along `axis`.
    ///
    /// [`FlipAxis::Z`] always succeeds without changing anything. X and Y flips are not
    /// available for block-compressed formats.
    pub fn flip(&mut self, axis: FlipAxis) -> Result<(), TexcError> {
        if axis == FlipAxis::Z {
            return Ok(());
        }

        let bytes_per_pixel = self.format.describe().bytes_per_pixel().ok_or(
            TexcError::UnsupportedOperationForFormat {
                operation: "flip",
                format: self.format,
            },
        )?;

        self.levels = self
            .levels
            .iter()
            .map(|level| {
                let data = transform::flip(
                    &level.data,
                    level.width,
                    level.height,
                    bytes_per_pixel,
                    axis,
                );
                MipLevel::new(level.width, level.height, data)
            })
            .collect();
        Ok(())
    }

    /// Converts every level to `format` in `color_space`, then wraps each in the
    /// envelope `kind` using the WebP codec.
    ///
    /// Existing levels are converted independently; the chain is not regenerated.
    pub fn transcode(
        &mut self,
        format: PixelFormat,
        color_space: ColorSpace,
        quality: CompressionLevel,
        kind: CompressionType,
    ) -> Result<(), TexcError> {
        let codec =
            WebPEnvelope::with_lossy_bits(self.options.lossy_bits).map_err(TexcError::envelope)?;
        self.transcode_with(&codec, format, color_space, quality, kind)
    }

    /// [`Texture::transcode`] with a caller-supplied envelope codec.
    #[instrument(
        level = "debug",
        skip(self, codec),
        fields(width = self.width, height = self.height)
    )]
    pub fn transcode_with<C>(
        &mut self,
        codec: &C,
        format: PixelFormat,
        color_space: ColorSpace,
        quality: CompressionLevel,
        kind: CompressionType,
    ) -> Result<(), TexcError>
    where
        C: EnvelopeCodec,
        C::Error: std::error::Error + Send + Sync + 'static,
    {
        let from = (self.format, self.color_space);
        let mut levels = Vec::with_capacity(self.levels.len());
        for (index, level) in self.levels.iter().enumerate() {
            let data = convert_level(
                &level.data,
                level.width,
                level.height,
                from,
                (format, color_space),
                quality,
                &self.options.block_encoders,
            )?;

            let envelope =
                envelope::apply(codec, kind, format, level.width, level.height, &data)?;
            let mut converted = MipLevel::new(level.width, level.height, data);
            converted.envelope = envelope;
            debug!(
                level = index,
                uncompressed_size = converted.size_uncompressed(),
                compressed_size = converted.size_compressed(),
                "transcoded level"
            );
            levels.push(converted);
        }

        self.format = format;
        self.color_space = color_space;
        self.levels = levels;
        Ok(())
    }

    fn require_pixel_ops(&self, operation: &'static str) -> Result<(), TexcError> {
        if self.options.pixel_op_support.allows(self.format) {
            return Ok(());
        }

        Err(TexcError::UnsupportedOperationForFormat {
            operation,
            format: self.format,
        })
    }

    fn rgba_level(&self, level: &MipLevel) -> Result<RgbaImage, TexcError> {
        Ok(RgbaImage {
            data: level_to_rgba(self.format, &level.data)?,
            width: level.width,
            height: level.height,
        })
    }

    fn pack_rgba(&self, image: RgbaImage) -> Result<MipLevel, TexcError> {
        let data = level_from_rgba(self.format, &image.data)?;
        Ok(MipLevel::new(image.width, image.height, data))
    }
}
