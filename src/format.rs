//! Supported input formats and their detection
//!
//! The format set is closed: every tag maps to exactly one decoder in
//! [`crate::decoders::decode`].

use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::DecodeError;

/// First byte of a tokenized MSX BASIC program.
pub const BASIC_SIGNATURE: u8 = 0xFF;
/// First byte of a WBASS2 source file.
pub const WBASS2_SIGNATURE: u8 = 0xFD;
/// First byte of a BSAVE'd binary (screen dumps).
pub const BSAVE_SIGNATURE: u8 = 0xFE;

/// BSAVE header size: signature, begin, end and start addresses.
const BSAVE_HEADER_LEN: usize = 7;

/// Input formats understood by the decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
pub enum Format {
    /// Tokenized MSX BASIC listing
    Bas,
    /// WBASS2 assembler source
    Wb2,
    /// Screen 5: 256 wide, 4 bits per pixel
    Sc5,
    /// Screen 7: 512 wide, 4 bits per pixel
    Sc7,
    /// Screen 8: 256 wide, 8-bit RGB
    Sc8,
    /// Screen 10: YJK with palette escape (YAE)
    S10,
    /// Screen 12: pure YJK
    S12,
    /// Dynamic Publisher stamp
    Stp,
}

impl Format {
    /// All formats, in tag order.
    pub const ALL: [Format; 8] = [
        Format::Bas,
        Format::Wb2,
        Format::Sc5,
        Format::Sc7,
        Format::Sc8,
        Format::S10,
        Format::S12,
        Format::Stp,
    ];

    /// Upper-case tag used on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            Format::Bas => "BAS",
            Format::Wb2 => "WB2",
            Format::Sc5 => "SC5",
            Format::Sc7 => "SC7",
            Format::Sc8 => "SC8",
            Format::S10 => "S10",
            Format::S12 => "S12",
            Format::Stp => "STP",
        }
    }

    /// Whether the decoder produces a text listing rather than an image.
    pub fn is_listing(self) -> bool {
        matches!(self, Format::Bas | Format::Wb2)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<Format> for &'static str {
    fn from(format: Format) -> Self {
        format.tag()
    }
}

impl FromStr for Format {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Format::ALL
            .iter()
            .copied()
            .find(|format| format.tag() == upper)
            .ok_or_else(|| DecodeError::UnknownFormat(s.to_string()))
    }
}

/// Upper-case extension of `path` without the dot, or an empty string.
fn upper_extension(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_uppercase()).unwrap_or_default()
}

/// Map a BSAVE file extension to its screen format.
fn screen_from_extension(extension: &str) -> Option<Format> {
    match extension {
        "GE5" | "SC5" | "SR5" => Some(Format::Sc5),
        "SC7" | "SR7" => Some(Format::Sc7),
        "SC8" | "PIC" | "SR8" => Some(Format::Sc8),
        "S10" | "SCA" => Some(Format::S10),
        "S12" | "SCC" | "SRS" => Some(Format::S12),
        _ => None,
    }
}

/// Work out the format of `data` loaded from `path`.
///
/// Listings are recognized by their signature byte. BSAVE dumps all share
/// one signature, so the screen mode comes from the file extension. Anything
/// else falls back to reading the extension as a format tag.
pub fn detect_format(data: &[u8], path: &Path) -> Option<Format> {
    let first = *data.first()?;
    let extension = upper_extension(path);

    match first {
        BASIC_SIGNATURE => Some(Format::Bas),
        WBASS2_SIGNATURE => Some(Format::Wb2),
        BSAVE_SIGNATURE => {
            if data.len() >= BSAVE_HEADER_LEN {
                screen_from_extension(&extension)
            } else {
                None
            }
        }
        _ => extension.parse().ok(),
    }
}

/// Resolve the format to decode with: an explicit tag wins over detection.
pub fn resolve_format(
    explicit: Option<Format>,
    data: &[u8],
    path: &Path,
) -> Result<Format, DecodeError> {
    if let Some(format) = explicit {
        return Ok(format);
    }
    detect_format(data, path)
        .ok_or_else(|| DecodeError::UnknownFormat(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_case_insensitive() {
        assert_eq!("sc5".parse::<Format>().unwrap(), Format::Sc5);
        assert_eq!("WB2".parse::<Format>().unwrap(), Format::Wb2);
        assert_eq!(" s12 ".parse::<Format>().unwrap(), Format::S12);
        assert!(matches!("SC9".parse::<Format>(), Err(DecodeError::UnknownFormat(_))));
    }

    #[test]
    fn test_tag_roundtrip() {
        for format in Format::ALL {
            assert_eq!(format.tag().parse::<Format>().unwrap(), format);
            assert_eq!(format.to_string(), format.tag());
        }
    }

    #[test]
    fn test_detect_by_signature() {
        assert_eq!(detect_format(&[0xFF, 0x00], Path::new("x.txt")), Some(Format::Bas));
        assert_eq!(detect_format(&[0xFD, 0xFF], Path::new("x")), Some(Format::Wb2));
    }

    #[test]
    fn test_detect_bsave_by_extension() {
        let header = [0xFE, 0, 0, 0, 0, 0, 0];
        assert_eq!(detect_format(&header, Path::new("pic.ge5")), Some(Format::Sc5));
        assert_eq!(detect_format(&header, Path::new("pic.SR7")), Some(Format::Sc7));
        assert_eq!(detect_format(&header, Path::new("pic.pic")), Some(Format::Sc8));
        assert_eq!(detect_format(&header, Path::new("pic.sca")), Some(Format::S10));
        assert_eq!(detect_format(&header, Path::new("pic.srs")), Some(Format::S12));
        assert_eq!(detect_format(&header, Path::new("pic.bin")), None);
    }

    #[test]
    fn test_detect_bsave_short_header() {
        assert_eq!(detect_format(&[0xFE, 0, 0], Path::new("pic.sc5")), None);
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(detect_format(&[0x20, 0x00], Path::new("logo.stp")), Some(Format::Stp));
        assert_eq!(detect_format(&[0x20], Path::new("readme.txt")), None);
    }

    #[test]
    fn test_detect_empty() {
        assert_eq!(detect_format(&[], Path::new("a.sc5")), None);
    }

    #[test]
    fn test_resolve_explicit_wins() {
        let format = resolve_format(Some(Format::Sc8), &[0xFF], Path::new("a.bas")).unwrap();
        assert_eq!(format, Format::Sc8);
        assert!(resolve_format(None, &[], Path::new("a.bin")).is_err());
    }
}
