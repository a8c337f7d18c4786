#![doc = include_str!("../README.MD")]
#![warn(missing_docs)]

#[cfg(test)]
pub mod test_prelude;

#[cfg(feature = "c-exports")]
pub mod c_api;

pub mod convert;
pub mod envelope;
pub mod error;
pub mod mip;
pub mod mipgen;
pub mod options;
pub mod texture;
pub mod transform;

pub use envelope::{decode_envelope, decode_envelope_with};
pub use error::TexcError;
pub use mip::MipLevel;
pub use options::{PixelOpSupport, TextureOptions, TextureOptionsBuilder};
pub use texture::{Header, Texture};
pub use transform::FlipAxis;

// Re-exports so callers need a single dependency.
pub use texc_block_encoders::{BlockEncoder, BlockEncoderRegistry, RgbaPlane};
pub use texc_common::{
    ColorSpace, CompressionLevel, CompressionType, PixelFormat, PixelFormatDescriptor,
};
