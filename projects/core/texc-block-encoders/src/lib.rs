#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

#[cfg(test)]
pub mod test_prelude;

pub mod error;
pub mod etc1;
pub mod plane;
pub mod pvrtc;
pub mod registry;

pub use error::BlockEncodeError;
pub use etc1::Etc1Encoder;
pub use plane::RgbaPlane;
pub use pvrtc::PvrtcEncoder;
pub use registry::{BlockEncoder, BlockEncoderRegistry};
