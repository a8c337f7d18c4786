#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![no_std]
#![warn(missing_docs)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[cfg(test)]
pub mod test_prelude;

pub mod envelope;
pub mod error;
pub mod format;
pub mod size;

pub use envelope::{CompressionType, EnvelopeCodec, NoEnvelope, PlaneColor, PlaneLayout};
pub use error::FormatError;
pub use format::{
    BlockFootprint, Channel, ColorSpace, CompressionLevel, FormatFamily, PixelFormat,
    PixelFormatDescriptor,
};
pub use size::{data_size, max_mip_count, mip_dimensions};
