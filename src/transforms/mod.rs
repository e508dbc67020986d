//! Geometry transforms applied after decoding
//!
//! - [`scale`] - 2x2 pixel doubling and row duplication

pub mod scale;

pub use scale::{double_height_indexed, double_size, double_size_indexed, double_size_rgba};
