//! Palette resolution for the indexed screen modes.
//!
//! A screen dump may carry its own palette registers after the pixel data.
//! When it doesn't, a palette file supplied by the user is used, and failing
//! that the MSX2 power-on palette.

use serde::Serialize;

use crate::error::PaletteError;
use crate::models::{Palette, MSX_PALETTE_BYTES};

/// Palette register words loaded by the MSX2 BIOS at power-on.
pub const DEFAULT_PALETTE: [u8; MSX_PALETTE_BYTES] = [
    0x00, 0x00, 0x00, 0x00, 0x11, 0x06, 0x33, 0x07, 0x17, 0x01, 0x27, 0x03, 0x51, 0x01, 0x27, 0x06,
    0x71, 0x01, 0x73, 0x03, 0x61, 0x06, 0x64, 0x06, 0x11, 0x04, 0x65, 0x02, 0x55, 0x05, 0x77, 0x07,
];

/// Where a resolved palette came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteSource {
    /// Stored after the pixel data in the dump itself
    Embedded,
    /// Supplied separately by the user
    External,
    /// Built-in power-on palette
    Default,
}

/// Inputs for resolving a screen palette.
#[derive(Debug, Clone, Copy)]
pub struct PaletteRequest<'a> {
    /// Payload bytes, starting at the dump's begin address
    pub payload: &'a [u8],
    /// Dump begin address
    pub begin: u16,
    /// Dump end address
    pub end: u16,
    /// VRAM address of the palette table for this screen mode
    pub palette_offset: u16,
    /// Palette file contents, if any
    pub external: Option<&'a [u8]>,
}

/// Which source a request will be served from, without reading anything.
pub fn palette_source(request: &PaletteRequest<'_>) -> PaletteSource {
    if request.end >= request.palette_offset {
        PaletteSource::Embedded
    } else if request.external.is_some() {
        PaletteSource::External
    } else {
        PaletteSource::Default
    }
}

/// Resolve the 16-color palette for a screen dump.
///
/// The embedded palette always wins when the dump reaches the palette table,
/// even if an external palette was supplied.
pub fn resolve_palette(request: &PaletteRequest<'_>) -> Result<(Palette, PaletteSource), PaletteError> {
    let source = palette_source(request);
    let palette = match source {
        PaletteSource::Embedded => {
            if request.palette_offset < request.begin {
                return Err(PaletteError::BeforePayload {
                    palette: request.palette_offset,
                    begin: request.begin,
                });
            }
            let offset = (request.palette_offset - request.begin) as usize;
            read_palette(request.payload, offset)?
        }
        PaletteSource::External => read_palette(request.external.unwrap_or_default(), 0)?,
        PaletteSource::Default => read_palette(&DEFAULT_PALETTE, 0)?,
    };
    Ok((palette, source))
}

/// Read 16 palette register words starting at `offset`.
pub fn read_palette(data: &[u8], offset: usize) -> Result<Palette, PaletteError> {
    data.get(offset..)
        .and_then(Palette::from_register_words)
        .ok_or(PaletteError::OutOfRange {
            offset,
            needed: MSX_PALETTE_BYTES,
            available: data.len().saturating_sub(offset),
        })
}

/// The power-on palette.
pub fn default_palette() -> Palette {
    // The table is a compile-time constant of the right length.
    Palette::from_register_words(&DEFAULT_PALETTE).unwrap_or_else(Palette::monochrome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn red_palette_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; MSX_PALETTE_BYTES];
        for i in 0..16 {
            bytes[i * 2] = 0x70;
        }
        bytes
    }

    #[test]
    fn test_default_palette_colors() {
        let palette = default_palette();
        assert_eq!(palette.len(), 16);
        assert_eq!(palette.color(0), Rgba([0, 0, 0, 255]));
        assert_eq!(palette.color(15), Rgba([255, 255, 255, 255]));
        // 0x11 0x06 -> R=1, B=1, G=6
        assert_eq!(palette.color(2), Rgba([0x24, 0xdb, 0x24, 255]));
    }

    #[test]
    fn test_embedded_wins_over_external() {
        let mut payload = vec![0u8; 0x40];
        payload[0x20..0x40].copy_from_slice(&red_palette_bytes());
        let external = vec![0x07u8; MSX_PALETTE_BYTES];
        let request = PaletteRequest {
            payload: &payload,
            begin: 0x1000,
            end: 0x1040,
            palette_offset: 0x1020,
            external: Some(&external),
        };
        let (palette, source) = resolve_palette(&request).unwrap();
        assert_eq!(source, PaletteSource::Embedded);
        assert_eq!(palette.color(5), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_external_when_not_embedded() {
        let external = red_palette_bytes();
        let request = PaletteRequest {
            payload: &[],
            begin: 0,
            end: 0x100,
            palette_offset: 0x7680,
            external: Some(&external),
        };
        let (palette, source) = resolve_palette(&request).unwrap();
        assert_eq!(source, PaletteSource::External);
        assert_eq!(palette.color(0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_default_fallback() {
        let request =
            PaletteRequest { payload: &[], begin: 0, end: 0x100, palette_offset: 0x7680, external: None };
        let (palette, source) = resolve_palette(&request).unwrap();
        assert_eq!(source, PaletteSource::Default);
        assert_eq!(palette, default_palette());
    }

    #[test]
    fn test_embedded_out_of_range_fails() {
        let payload = vec![0u8; 0x10];
        let request =
            PaletteRequest { payload: &payload, begin: 0, end: 0x20, palette_offset: 0x08, external: None };
        assert_eq!(
            resolve_palette(&request),
            Err(PaletteError::OutOfRange { offset: 8, needed: 32, available: 8 })
        );
    }

    #[test]
    fn test_embedded_before_payload_fails() {
        let request =
            PaletteRequest { payload: &[], begin: 0x8000, end: 0x9000, palette_offset: 0x7680, external: None };
        assert!(matches!(resolve_palette(&request), Err(PaletteError::BeforePayload { .. })));
    }

    #[test]
    fn test_short_external_fails() {
        let external = [0u8; 10];
        let request = PaletteRequest {
            payload: &[],
            begin: 0,
            end: 0,
            palette_offset: 0x7680,
            external: Some(&external),
        };
        assert!(resolve_palette(&request).is_err());
    }
}
