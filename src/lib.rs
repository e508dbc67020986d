//! msxconv - Library for decoding MSX binary formats
//!
//! This library provides functionality to:
//! - Decode BSAVE screen dumps (screens 5, 7, 8, 10 and 12) and Dynamic
//!   Publisher stamps into pixel buffers
//! - Detokenize MSX BASIC programs and WBASS2 assembler sources into text
//! - Encode decoded images as PNG, BMP or JPEG
//!
//! ```ignore
//! use msxconv::{decode, DecodeConfig, Format};
//!
//! let data = std::fs::read("TITLE.SC5")?;
//! let result = decode(Format::Sc5, &data, &DecodeConfig::default())?;
//! ```

pub mod cli;
pub mod color;
pub mod config;
pub mod decoders;
pub mod error;
pub mod format;
pub mod models;
pub mod output;
pub mod palettes;
pub mod transforms;

pub use decoders::{decode, DecodeConfig, Decoder};
pub use error::{DecodeError, PaletteError};
pub use format::{detect_format, resolve_format, Format};
pub use models::{DecodeResult, IndexedImage, Palette, PixelBuffer};
pub use output::{encode_image, OutputError, OutputFormat};
