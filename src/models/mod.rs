//! Data models shared by the decoders and the output layer

mod palette;
mod pixels;
mod result;

pub use palette::{Palette, MSX_PALETTE_BYTES, MSX_PALETTE_SIZE};
pub use pixels::{IndexedImage, PixelBuffer};
pub use result::DecodeResult;
