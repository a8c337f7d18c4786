//! The [`BlockEncoder`] seam and the registry the transcoder looks encoders up in.

use crate::error::BlockEncodeError;
use crate::etc1::Etc1Encoder;
use crate::plane::RgbaPlane;
use crate::pvrtc::PvrtcEncoder;
use core::fmt;
use std::sync::Arc;
use texc_common::{CompressionLevel, PixelFormat};

/// Encodes RGBA images into one hardware block format.
///
/// The output of [`encode`](BlockEncoder::encode) must be exactly
/// [`data_size`](texc_common::data_size) bytes for the plane's dimensions.
pub trait BlockEncoder: Send + Sync {
    /// The block format this encoder produces.
    fn format(&self) -> PixelFormat;

    /// Encodes `plane` with the given effort.
    fn encode(
        &self,
        plane: &RgbaPlane,
        quality: CompressionLevel,
    ) -> Result<Vec<u8>, BlockEncodeError>;
}

impl<T: BlockEncoder + ?Sized> BlockEncoder for Box<T> {
    fn format(&self) -> PixelFormat {
        (**self).format()
    }

    fn encode(
        &self,
        plane: &RgbaPlane,
        quality: CompressionLevel,
    ) -> Result<Vec<u8>, BlockEncodeError> {
        (**self).encode(plane, quality)
    }
}

/// A set of [`BlockEncoder`]s keyed by the format they produce.
///
/// Registering an encoder for a format that already has one replaces the old encoder.
#[derive(Clone, Default)]
pub struct BlockEncoderRegistry {
    encoders: Vec<Arc<dyn BlockEncoder>>,
}

impl BlockEncoderRegistry {
    /// Creates a registry without any encoders.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in PVRTC1 and ETC1 encoders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for format in [
            PixelFormat::RgbPvrtc2Bpp,
            PixelFormat::RgbPvrtc4Bpp,
            PixelFormat::RgbaPvrtc2Bpp,
            PixelFormat::RgbaPvrtc4Bpp,
        ] {
            if let Ok(encoder) = PvrtcEncoder::new(format) {
                registry.register(encoder);
            }
        }
        registry.register(Etc1Encoder);
        registry
    }

    /// Adds `encoder`, replacing any previous encoder for the same format.
    pub fn register(&mut self, encoder: impl BlockEncoder + 'static) -> &mut Self {
        let format = encoder.format();
        self.encoders.retain(|e| e.format() != format);
        self.encoders.push(Arc::new(encoder));
        self
    }

    /// The encoder for `format`, if one is registered.
    pub fn get(&self, format: PixelFormat) -> Option<&dyn BlockEncoder> {
        self.encoders
            .iter()
            .find(|e| e.format() == format)
            .map(|e| e.as_ref())
    }

    /// Formats that currently have an encoder.
    pub fn formats(&self) -> impl Iterator<Item = PixelFormat> + '_ {
        self.encoders.iter().map(|e| e.format())
    }
}

impl fmt::Debug for BlockEncoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.formats()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    struct Zeroes;

    impl BlockEncoder for Zeroes {
        fn format(&self) -> PixelFormat {
            PixelFormat::RgbEtc1
        }

        fn encode(
            &self,
            plane: &RgbaPlane,
            _quality: CompressionLevel,
        ) -> Result<Vec<u8>, BlockEncodeError> {
            Ok(vec![
                0;
                data_size(PixelFormat::RgbEtc1, plane.width(), plane.height())?
            ])
        }
    }

    #[test]
    fn defaults_cover_every_block_format() {
        let registry = BlockEncoderRegistry::with_defaults();
        for format in PixelFormat::all_values().iter() {
            assert_eq!(
                registry.get(*format).is_some(),
                format.is_block_compressed(),
                "{format:?}"
            );
        }
    }

    #[test]
    fn register_replaces_existing_encoder() {
        let mut registry = BlockEncoderRegistry::with_defaults();
        registry.register(Zeroes);
        assert_eq!(registry.formats().count(), 5);

        let data = solid(4, 4, [255, 0, 0, 255]);
        let plane = RgbaPlane::new(&data, 4, 4).unwrap();
        let encoded = registry
            .get(PixelFormat::RgbEtc1)
            .unwrap()
            .encode(&plane, CompressionLevel::Fast)
            .unwrap();
        assert_eq!(encoded, vec![0; 8]);
    }

    #[test]
    fn empty_registry_has_nothing() {
        assert!(BlockEncoderRegistry::empty()
            .get(PixelFormat::RgbEtc1)
            .is_none());
    }
}
