//! Pixel format registry.
//!
//! Every supported format has exactly one immutable [`PixelFormatDescriptor`]. The
//! descriptor is the single source of truth for channel layout, per channel bit depth,
//! block footprint and the stable 8-byte tag used to identify a format externally.

use derive_enum_all_values::AllValues;

/// Pixel formats understood by the transcoder.
///
/// The discriminants are part of the C ABI and must not be reordered.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
pub enum PixelFormat {
    /// 8-bit luminance.
    L8 = 0,
    /// 8 bits per channel RGB.
    R8G8B8 = 1,
    /// 8 bits per channel RGBA.
    R8G8B8A8 = 2,
    /// PVRTC1, 2 bits per pixel, opaque.
    RgbPvrtc2Bpp = 3,
    /// PVRTC1, 4 bits per pixel, opaque.
    RgbPvrtc4Bpp = 4,
    /// PVRTC1, 2 bits per pixel, with alpha.
    RgbaPvrtc2Bpp = 5,
    /// PVRTC1, 4 bits per pixel, with alpha.
    RgbaPvrtc4Bpp = 6,
    /// ETC1, opaque.
    RgbEtc1 = 7,
    /// Packed 16-bit RGB, 5:6:5.
    R5G6B5 = 8,
    /// Packed 16-bit RGBA, 4:4:4:4.
    R4G4B4A4 = 9,
    /// 8-bit luminance with 8-bit alpha.
    L8A8 = 10,
}

/// A single colour channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Luminance
    L,
    /// Red
    R,
    /// Green
    G,
    /// Blue
    B,
    /// Alpha
    A,
}

impl Channel {
    /// The lowercase ASCII letter used for this channel in format tags.
    pub const fn letter(self) -> u8 {
        match self {
            Channel::L => b'l',
            Channel::R => b'r',
            Channel::G => b'g',
            Channel::B => b'b',
            Channel::A => b'a',
        }
    }
}

/// Transfer function of the stored channel values.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, AllValues)]
pub enum ColorSpace {
    /// Linear RGB.
    #[default]
    Linear = 0,
    /// Perceptual (sRGB) encoding.
    Srgb = 1,
}

/// Encoder effort knob for block-compressed targets.
///
/// Only the approximation error of the produced blocks depends on this value, never the
/// block size or the output length.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, AllValues)]
pub enum CompressionLevel {
    /// Cheapest search. PVRTC 4bpp picks modulation by projecting onto the endpoint
    /// axis; ETC1 refines a single candidate table.
    Fast = 0,
    /// PVRTC 4bpp searches every modulation weight; ETC1 refines three tables.
    #[default]
    Normal = 1,
    /// Adds an endpoint inset to both PVRTC rates; ETC1 refines five tables.
    High = 2,
    /// Same PVRTC fit as `High`; ETC1 runs the encoder's slow profile.
    Best = 3,
}

/// Footprint of one compressed block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlockFootprint {
    /// Block width in pixels.
    pub width: u32,
    /// Block height in pixels.
    pub height: u32,
    /// Bytes per encoded block.
    pub bytes: u32,
    /// Minimum number of blocks along X, regardless of the image width.
    pub min_blocks_x: u32,
    /// Minimum number of blocks along Y, regardless of the image height.
    pub min_blocks_y: u32,
}

/// Coarse classification used to decide which operations a format supports.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormatFamily {
    /// 8 bits per channel RGBA, the engine's working format.
    Rgba8,
    /// Any other format with per-pixel addressable storage.
    Uncompressed,
    /// Hardware block-compressed format.
    BlockCompressed,
}

/// Immutable registry entry describing a [`PixelFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFormatDescriptor {
    /// The described format.
    pub format: PixelFormat,
    /// Channels in storage order.
    pub channels: &'static [Channel],
    /// Bit depth of each entry in [`channels`](Self::channels).
    pub bits_per_channel: &'static [u8],
    /// Block footprint for block-compressed formats, [`None`] otherwise.
    pub block: Option<BlockFootprint>,
    /// Hardware format identifier for block-compressed formats.
    pub compressed_id: Option<u8>,
}

const PVRTC_4BPP_BLOCK: BlockFootprint = BlockFootprint {
    width: 4,
    height: 4,
    bytes: 8,
    min_blocks_x: 2,
    min_blocks_y: 2,
};

const PVRTC_2BPP_BLOCK: BlockFootprint = BlockFootprint {
    width: 8,
    height: 4,
    bytes: 8,
    min_blocks_x: 2,
    min_blocks_y: 2,
};

const ETC1_BLOCK: BlockFootprint = BlockFootprint {
    width: 4,
    height: 4,
    bytes: 8,
    min_blocks_x: 1,
    min_blocks_y: 1,
};

const RGB: &[Channel] = &[Channel::R, Channel::G, Channel::B];
const RGBA: &[Channel] = &[Channel::R, Channel::G, Channel::B, Channel::A];

static L8: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::L8,
    channels: &[Channel::L],
    bits_per_channel: &[8],
    block: None,
    compressed_id: None,
};

static R8G8B8: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::R8G8B8,
    channels: RGB,
    bits_per_channel: &[8, 8, 8],
    block: None,
    compressed_id: None,
};

static R8G8B8A8: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::R8G8B8A8,
    channels: RGBA,
    bits_per_channel: &[8, 8, 8, 8],
    block: None,
    compressed_id: None,
};

static RGB_PVRTC_2BPP: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::RgbPvrtc2Bpp,
    channels: RGB,
    bits_per_channel: &[],
    block: Some(PVRTC_2BPP_BLOCK),
    compressed_id: Some(0),
};

static RGBA_PVRTC_2BPP: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::RgbaPvrtc2Bpp,
    channels: RGBA,
    bits_per_channel: &[],
    block: Some(PVRTC_2BPP_BLOCK),
    compressed_id: Some(1),
};

static RGB_PVRTC_4BPP: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::RgbPvrtc4Bpp,
    channels: RGB,
    bits_per_channel: &[],
    block: Some(PVRTC_4BPP_BLOCK),
    compressed_id: Some(2),
};

static RGBA_PVRTC_4BPP: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::RgbaPvrtc4Bpp,
    channels: RGBA,
    bits_per_channel: &[],
    block: Some(PVRTC_4BPP_BLOCK),
    compressed_id: Some(3),
};

static RGB_ETC1: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::RgbEtc1,
    channels: RGB,
    bits_per_channel: &[],
    block: Some(ETC1_BLOCK),
    compressed_id: Some(6),
};

static R5G6B5: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::R5G6B5,
    channels: RGB,
    bits_per_channel: &[5, 6, 5],
    block: None,
    compressed_id: None,
};

static R4G4B4A4: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::R4G4B4A4,
    channels: RGBA,
    bits_per_channel: &[4, 4, 4, 4],
    block: None,
    compressed_id: None,
};

static L8A8: PixelFormatDescriptor = PixelFormatDescriptor {
    format: PixelFormat::L8A8,
    channels: &[Channel::L, Channel::A],
    bits_per_channel: &[8, 8],
    block: None,
    compressed_id: None,
};

impl PixelFormat {
    /// Returns the registry entry for this format.
    pub fn describe(self) -> &'static PixelFormatDescriptor {
        match self {
            PixelFormat::L8 => &L8,
            PixelFormat::R8G8B8 => &R8G8B8,
            PixelFormat::R8G8B8A8 => &R8G8B8A8,
            PixelFormat::RgbPvrtc2Bpp => &RGB_PVRTC_2BPP,
            PixelFormat::RgbPvrtc4Bpp => &RGB_PVRTC_4BPP,
            PixelFormat::RgbaPvrtc2Bpp => &RGBA_PVRTC_2BPP,
            PixelFormat::RgbaPvrtc4Bpp => &RGBA_PVRTC_4BPP,
            PixelFormat::RgbEtc1 => &RGB_ETC1,
            PixelFormat::R5G6B5 => &R5G6B5,
            PixelFormat::R4G4B4A4 => &R4G4B4A4,
            PixelFormat::L8A8 => &L8A8,
        }
    }

    /// Shorthand for [`PixelFormatDescriptor::is_block_compressed`].
    #[inline]
    pub fn is_block_compressed(self) -> bool {
        self.describe().is_block_compressed()
    }

    /// Short lowercase name, used in logs and by the CLI.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::L8 => "l8",
            PixelFormat::R8G8B8 => "rgb8",
            PixelFormat::R8G8B8A8 => "rgba8",
            PixelFormat::RgbPvrtc2Bpp => "pvrtc2-rgb",
            PixelFormat::RgbPvrtc4Bpp => "pvrtc4-rgb",
            PixelFormat::RgbaPvrtc2Bpp => "pvrtc2-rgba",
            PixelFormat::RgbaPvrtc4Bpp => "pvrtc4-rgba",
            PixelFormat::RgbEtc1 => "etc1",
            PixelFormat::R5G6B5 => "rgb565",
            PixelFormat::R4G4B4A4 => "rgba4444",
            PixelFormat::L8A8 => "la8",
        }
    }
}

impl PixelFormatDescriptor {
    /// Whether the format stores fixed-size blocks rather than pixels.
    #[inline]
    pub fn is_block_compressed(&self) -> bool {
        self.block.is_some()
    }

    /// Whether the format carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.channels.contains(&Channel::A)
    }

    /// Bytes used by one pixel, [`None`] for block-compressed formats.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        if self.is_block_compressed() {
            return None;
        }

        let bits: usize = self.bits_per_channel.iter().map(|&b| b as usize).sum();
        Some(bits.div_ceil(8))
    }

    /// Whether every channel is stored as an independent 8-bit byte.
    pub fn has_byte_channels(&self) -> bool {
        !self.is_block_compressed() && self.bits_per_channel.iter().all(|&b| b == 8)
    }

    /// The family this format belongs to.
    pub fn family(&self) -> FormatFamily {
        match self.format {
            PixelFormat::R8G8B8A8 => FormatFamily::Rgba8,
            _ if self.is_block_compressed() => FormatFamily::BlockCompressed,
            _ => FormatFamily::Uncompressed,
        }
    }

    /// Stable 8-byte identification tag.
    ///
    /// Uncompressed formats: bytes 0-3 hold the channel letters in storage order and
    /// bytes 4-7 the matching bit depths, both zero padded. Block-compressed formats
    /// hold their hardware format identifier in byte 0 and zero elsewhere.
    pub fn tag(&self) -> [u8; 8] {
        let mut tag = [0u8; 8];
        if let Some(id) = self.compressed_id {
            tag[0] = id;
            return tag;
        }

        for (x, (channel, bits)) in self
            .channels
            .iter()
            .zip(self.bits_per_channel.iter())
            .enumerate()
        {
            tag[x] = channel.letter();
            tag[4 + x] = *bits;
        }

        tag
    }
}
