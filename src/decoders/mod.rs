//! Decoders for the supported MSX formats
//!
//! Each format has a unit-struct decoder implementing [`Decoder`]. Callers
//! normally go through [`decode`], which dispatches on the closed [`Format`]
//! set.

pub mod bcd;
pub mod msx_basic;
pub mod screen;
pub mod stamp;
pub mod wbass2;

use crate::error::DecodeError;
use crate::format::Format;
use crate::models::DecodeResult;
use crate::output::OutputFormat;

pub use msx_basic::BasicDecoder;
pub use screen::{ScreenDecoder, ScreenHeader, ScreenInfo, ScreenMode};
pub use stamp::StampDecoder;
pub use wbass2::Wbass2Decoder;

/// Options shared by every decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Container format the caller will encode images to
    pub output_format: OutputFormat,
    /// Replicate every pixel into a 2x2 block
    pub double_size: bool,
    /// Print diagnostics to stderr
    pub verbose: bool,
    /// Palette file contents, used when a dump has no embedded palette
    pub palette: Option<Vec<u8>>,
}

/// A decoder for one input format.
pub trait Decoder {
    /// Decode a whole input file.
    fn decode(&self, data: &[u8], config: &DecodeConfig) -> Result<DecodeResult, DecodeError>;
}

/// The decoder responsible for `format`.
pub fn decoder_for(format: Format) -> &'static dyn Decoder {
    match format {
        Format::Bas => &BasicDecoder,
        Format::Wb2 => &Wbass2Decoder,
        Format::Sc5 => &SCREEN5,
        Format::Sc7 => &SCREEN7,
        Format::Sc8 => &SCREEN8,
        Format::S10 => &SCREEN10,
        Format::S12 => &SCREEN12,
        Format::Stp => &StampDecoder,
    }
}

static SCREEN5: ScreenDecoder = ScreenDecoder::new(ScreenMode::SCREEN5);
static SCREEN7: ScreenDecoder = ScreenDecoder::new(ScreenMode::SCREEN7);
static SCREEN8: ScreenDecoder = ScreenDecoder::new(ScreenMode::SCREEN8);
static SCREEN10: ScreenDecoder = ScreenDecoder::new(ScreenMode::SCREEN10);
static SCREEN12: ScreenDecoder = ScreenDecoder::new(ScreenMode::SCREEN12);

/// Screen mode geometry for the BSAVE formats, `None` for the others.
pub fn screen_mode(format: Format) -> Option<ScreenMode> {
    match format {
        Format::Sc5 => Some(ScreenMode::SCREEN5),
        Format::Sc7 => Some(ScreenMode::SCREEN7),
        Format::Sc8 => Some(ScreenMode::SCREEN8),
        Format::S10 => Some(ScreenMode::SCREEN10),
        Format::S12 => Some(ScreenMode::SCREEN12),
        Format::Bas | Format::Wb2 | Format::Stp => None,
    }
}

/// Decode `data` as `format`.
///
/// Decoding is a pure function of its inputs: the same bytes and config
/// always give the same result.
pub fn decode(
    format: Format,
    data: &[u8],
    config: &DecodeConfig,
) -> Result<DecodeResult, DecodeError> {
    if config.verbose {
        eprintln!("Decoding {} bytes as {}", data.len(), format);
    }
    decoder_for(format).decode(data, config)
}

/// Check the leading signature byte of a listing.
pub(crate) fn check_signature(data: &[u8], format: Format, expected: u8) -> Result<(), DecodeError> {
    match data.first() {
        Some(&found) if found == expected => Ok(()),
        found => Err(DecodeError::InvalidSignature { format, expected, found: found.copied() }),
    }
}
