//! The mip store: one [`MipLevel`] per level of a texture.

use texc_common::CompressionType;

/// Secondary compression applied to a level's raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Envelope {
    pub kind: CompressionType,
    pub payload: Vec<u8>,
}

/// One level of a texture's mip chain.
///
/// A level owns its raw pixel or block bytes and, when an envelope was applied during
/// transcoding, the encoded payload. Levels are never shared between textures and are
/// replaced wholesale by every mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
    pub(crate) envelope: Option<Envelope>,
}

impl MipLevel {
    pub(crate) fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
            envelope: None,
        }
    }

    /// Level width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Level height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw pixel or block bytes.
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// The bytes as stored: the envelope payload if one was applied, the raw bytes
    /// otherwise.
    pub fn stored(&self) -> &[u8] {
        match &self.envelope {
            Some(envelope) => &envelope.payload,
            None => &self.data,
        }
    }

    /// The envelope applied to this level.
    pub fn compression(&self) -> CompressionType {
        self.envelope
            .as_ref()
            .map_or(CompressionType::Default, |e| e.kind)
    }

    /// Size of the raw bytes.
    pub fn size_uncompressed(&self) -> usize {
        self.data.len()
    }

    /// Size of the stored bytes.
    pub fn size_compressed(&self) -> usize {
        self.stored().len()
    }
}
