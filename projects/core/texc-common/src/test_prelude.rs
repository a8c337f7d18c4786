//! Common test imports shared by the unit test modules of this crate.

// External crates commonly used in tests
pub use rstest::rstest;

// Allocation helpers, the crate is no_std
pub use alloc::boxed::Box;
pub use alloc::vec;
pub use alloc::vec::Vec;

// Re-export the crate root for convenience in test modules
pub use super::*;
