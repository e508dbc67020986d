//! Error types for decoding

use thiserror::Error;

use crate::format::Format;

/// Failure to read a palette dump.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// The palette would start before the first payload byte
    #[error("palette address {palette:#06X} lies before payload start {begin:#06X}")]
    BeforePayload { palette: u16, begin: u16 },
    /// Fewer than 32 bytes available at the palette offset
    #[error("palette needs {needed} bytes at offset {offset}, only {available} available")]
    OutOfRange { offset: usize, needed: usize, available: usize },
}

/// Error produced by any decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Leading byte does not match the format's signature
    #[error("not a {format} file: expected signature {expected:#04X}, found {}", found.map(|b| format!("{:#04X}", b)).unwrap_or_else(|| "empty input".to_string()))]
    InvalidSignature { format: Format, expected: u8, found: Option<u8> },
    /// Header too short or internally inconsistent
    #[error("malformed {format} header: {reason}")]
    MalformedHeader { format: Format, reason: String },
    /// A declared address range or length runs past the end of the data
    #[error("truncated {format} {section}: needs {needed} bytes, only {available} available")]
    TruncatedPayload { format: Format, section: &'static str, needed: usize, available: usize },
    /// The WBASS2 end-of-listing marker was never found
    #[error("corrupt WBASS2 label table: end-of-listing marker not found")]
    CorruptLabelTable,
    /// Format tag outside the supported set
    #[error("unknown file format: {0}")]
    UnknownFormat(String),
    /// Palette could not be read
    #[error(transparent)]
    Palette(#[from] PaletteError),
}

impl DecodeError {
    pub(crate) fn truncated(
        format: Format,
        section: &'static str,
        needed: usize,
        available: usize,
    ) -> Self {
        DecodeError::TruncatedPayload { format, section, needed, available }
    }

    pub(crate) fn malformed(format: Format, reason: impl Into<String>) -> Self {
        DecodeError::MalformedHeader { format, reason: reason.into() }
    }
}
