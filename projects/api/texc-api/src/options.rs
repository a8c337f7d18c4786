//! Per-texture configuration.

use texc_block_encoders::BlockEncoderRegistry;
use texc_common::{FormatFamily, PixelFormat};

/// Which formats support resize, alpha premultiplication and mip generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelOpSupport {
    /// Only 8 bits per channel RGBA.
    #[default]
    Rgba8Only,
    /// Every uncompressed format, processed through an RGBA intermediate.
    AllUncompressed,
}

impl PixelOpSupport {
    /// Whether pixel operations are available for `format`.
    pub fn allows(self, format: PixelFormat) -> bool {
        match (self, format.describe().family()) {
            (_, FormatFamily::Rgba8) => true,
            (PixelOpSupport::AllUncompressed, FormatFamily::Uncompressed) => true,
            (_, FormatFamily::Uncompressed | FormatFamily::BlockCompressed) => false,
        }
    }
}

/// Resolved texture configuration. Build one with [`TextureOptionsBuilder`].
#[derive(Debug, Clone)]
pub struct TextureOptions {
    pub(crate) pixel_op_support: PixelOpSupport,
    pub(crate) lossy_bits: u8,
    pub(crate) block_encoders: BlockEncoderRegistry,
}

impl TextureOptions {
    /// Formats that support pixel operations.
    pub fn pixel_op_support(&self) -> PixelOpSupport {
        self.pixel_op_support
    }

    /// Low bits dropped per colour channel by the lossy envelope.
    pub fn lossy_bits(&self) -> u8 {
        self.lossy_bits
    }

    /// Encoders used for block-compressed targets.
    pub fn block_encoders(&self) -> &BlockEncoderRegistry {
        &self.block_encoders
    }
}

impl Default for TextureOptions {
    fn default() -> Self {
        TextureOptionsBuilder::new().build()
    }
}

/// Builder for [`TextureOptions`].
///
/// # Examples
///
/// ```
/// use texc_api::{PixelOpSupport, TextureOptionsBuilder};
///
/// let options = TextureOptionsBuilder::new()
///     .pixel_op_support(PixelOpSupport::AllUncompressed)
///     .lossy_bits(3)
///     .build();
/// assert_eq!(options.lossy_bits(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TextureOptionsBuilder {
    pixel_op_support: Option<PixelOpSupport>,
    lossy_bits: Option<u8>,
    block_encoders: Option<BlockEncoderRegistry>,
}

impl TextureOptionsBuilder {
    /// Create a new builder with all settings at their defaults.
    pub fn new() -> Self {
        Self {
            pixel_op_support: None,
            lossy_bits: None,
            block_encoders: None,
        }
    }

    /// Set which formats support resize, premultiplication and mip generation.
    ///
    /// Defaults to [`PixelOpSupport::Rgba8Only`].
    pub fn pixel_op_support(mut self, support: PixelOpSupport) -> Self {
        self.pixel_op_support = Some(support);
        self
    }

    /// Set how many low bits per colour channel the lossy envelope drops.
    ///
    /// Clamped to `1..=4`. Defaults to 2.
    pub fn lossy_bits(mut self, bits: u8) -> Self {
        self.lossy_bits = Some(bits.clamp(1, 4));
        self
    }

    /// Replace the encoders used for block-compressed targets.
    pub fn block_encoders(mut self, encoders: BlockEncoderRegistry) -> Self {
        self.block_encoders = Some(encoders);
        self
    }

    /// Resolve the options.
    pub fn build(self) -> TextureOptions {
        TextureOptions {
            pixel_op_support: self.pixel_op_support.unwrap_or_default(),
            lossy_bits: self.lossy_bits.unwrap_or(2),
            block_encoders: self
                .block_encoders
                .unwrap_or_else(BlockEncoderRegistry::with_defaults),
        }
    }
}

impl Default for TextureOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
