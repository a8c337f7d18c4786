//! ETC1 encoding through the ISPC texture compressor.

use crate::error::BlockEncodeError;
use crate::plane::{pad_edges, RgbaPlane};
use crate::registry::BlockEncoder;
use intel_tex_2::{etc1, RgbaSurface};
use texc_common::{data_size, CompressionLevel, PixelFormat};
use tracing::debug;

/// Encodes opaque RGB data as ETC1.
///
/// Alpha is ignored. Images that are not a multiple of 4 in either direction are
/// padded by repeating their edge pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct Etc1Encoder;

impl BlockEncoder for Etc1Encoder {
    fn format(&self) -> PixelFormat {
        PixelFormat::RgbEtc1
    }

    fn encode(
        &self,
        plane: &RgbaPlane,
        quality: CompressionLevel,
    ) -> Result<Vec<u8>, BlockEncodeError> {
        let expected = data_size(PixelFormat::RgbEtc1, plane.width(), plane.height())?;
        let padded = pad_edges(plane, 4, 4);
        let surface = RgbaSurface {
            data: &padded.data,
            width: padded.width,
            height: padded.height,
            stride: padded.width * 4,
        };

        debug!(
            width = plane.width(),
            height = plane.height(),
            ?quality,
            "encoding etc1"
        );
        let blocks = etc1::compress_blocks(&settings(quality), &surface);
        if blocks.len() != expected {
            return Err(BlockEncodeError::OutputSizeMismatch {
                expected,
                actual: blocks.len(),
            });
        }

        Ok(blocks)
    }
}

/// Maps a level onto how many candidate tables the kernel refines per block.
///
/// [`CompressionLevel::Best`] is the kernel's own slow profile.
fn settings(quality: CompressionLevel) -> etc1::EncodeSettings {
    let fast_skip_threshold = match quality {
        CompressionLevel::Fast => 1,
        CompressionLevel::Normal => 3,
        CompressionLevel::High => 5,
        CompressionLevel::Best => return etc1::slow_settings(),
    };
    etc1::EncodeSettings {
        fast_skip_threshold,
    }
}
