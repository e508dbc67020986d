//! BSAVE screen dump decoders (screens 5, 7, 8, 10 and 12).
//!
//! All dumps share the 7-byte BSAVE header:
//!
//! ```text
//! 0      FE signature
//! 1..3   begin address (LE)
//! 3..5   end address (LE)
//! 5..7   execution address (unused)
//! 7..    VRAM bytes from `begin`
//! ```
//!
//! The image height is not stored. Dumps that end within the first 192 rows
//! are treated as 192-line screens, anything longer as 212 lines.

use image::RgbaImage;

use super::{DecodeConfig, Decoder};
use crate::color::{rgb332_to_rgba, rgb555_to_rgba, BLACK};
use crate::error::DecodeError;
use crate::format::Format;
use crate::models::{DecodeResult, IndexedImage, Palette, PixelBuffer};
use crate::palettes::{
    default_palette, palette_source, resolve_palette, PaletteRequest, PaletteSource,
};
use crate::transforms::double_size;

/// Size of the BSAVE header preceding the VRAM bytes.
pub const HEADER_LEN: usize = 7;

/// Width of screens 5, 8, 10 and 12.
pub const SCREEN_WIDTH: u32 = 256;
/// Width of screen 7.
pub const SCREEN_WIDTH_7: u32 = 512;
/// Line count of the tall screen mode.
pub const SCREEN_HEIGHT: u32 = 212;
/// Line count of the short screen mode.
pub const SCREEN_HEIGHT_192: u32 = 192;

/// Palette table address in screen 5 VRAM.
pub const PALETTE_OFFSET_5: u16 = 0x7680;
/// Palette table address in screen 7/10 VRAM.
pub const PALETTE_OFFSET: u16 = 0xFA80;

/// Parsed BSAVE header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenHeader {
    pub begin: u16,
    pub end: u16,
}

impl ScreenHeader {
    /// Read the begin/end addresses of a dump.
    pub fn parse(data: &[u8], format: Format) -> Result<Self, DecodeError> {
        if data.len() < HEADER_LEN {
            return Err(DecodeError::malformed(
                format,
                format!("{} bytes, need at least {}", data.len(), HEADER_LEN),
            ));
        }
        let begin = u16::from_le_bytes([data[1], data[2]]);
        let end = u16::from_le_bytes([data[3], data[4]]);
        if begin > end {
            return Err(DecodeError::malformed(
                format,
                format!("begin address {:#06X} is past end address {:#06X}", begin, end),
            ));
        }
        Ok(Self { begin, end })
    }
}

/// Line count implied by the end address for rows of `row_bytes` bytes.
pub fn screen_height(end: u16, row_bytes: u32) -> u32 {
    let end_line = u32::from(end) / row_bytes;
    if end_line <= SCREEN_HEIGHT_192 {
        SCREEN_HEIGHT_192
    } else {
        SCREEN_HEIGHT
    }
}

/// Interpret a 6-bit two's-complement chroma value.
pub fn sign_extend_6(value: u8) -> i32 {
    let value = i32::from(value & 0x3F);
    if value > 31 {
        value - 64
    } else {
        value
    }
}

/// Chroma pair (K, J) of a 4-byte YJK group.
pub fn yjk_chroma(group: [u8; 4]) -> (i32, i32) {
    let k = (group[0] & 7) | ((group[1] & 7) << 3);
    let j = (group[2] & 7) | ((group[3] & 7) << 3);
    (sign_extend_6(k), sign_extend_6(j))
}

/// Reconstruct a pixel from luma and chroma, each channel clamped to 5 bits.
pub fn yjk_to_rgb(y: i32, j: i32, k: i32) -> (i32, i32, i32) {
    let r = y + j;
    let g = y + k;
    let b = 5 * y / 4 - j / 2 - k / 4;
    (r, g, b)
}

/// How the bytes of a screen mode encode pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// Two 4-bit palette indices per byte
    Nibble,
    /// One `GGGRRRBB` byte per pixel
    Rgb332,
    /// Four-pixel YJK groups; `yae` enables the odd-luma palette escape
    Yjk { yae: bool },
}

/// Geometry and encoding of one screen mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMode {
    pub format: Format,
    pub width: u32,
    pub layout: PixelLayout,
    /// VRAM address of the palette table, if the mode has one
    pub palette_offset: Option<u16>,
}

impl ScreenMode {
    pub const SCREEN5: ScreenMode = ScreenMode {
        format: Format::Sc5,
        width: SCREEN_WIDTH,
        layout: PixelLayout::Nibble,
        palette_offset: Some(PALETTE_OFFSET_5),
    };
    pub const SCREEN7: ScreenMode = ScreenMode {
        format: Format::Sc7,
        width: SCREEN_WIDTH_7,
        layout: PixelLayout::Nibble,
        palette_offset: Some(PALETTE_OFFSET),
    };
    pub const SCREEN8: ScreenMode = ScreenMode {
        format: Format::Sc8,
        width: SCREEN_WIDTH,
        layout: PixelLayout::Rgb332,
        palette_offset: None,
    };
    pub const SCREEN10: ScreenMode = ScreenMode {
        format: Format::S10,
        width: SCREEN_WIDTH,
        layout: PixelLayout::Yjk { yae: true },
        palette_offset: Some(PALETTE_OFFSET),
    };
    pub const SCREEN12: ScreenMode = ScreenMode {
        format: Format::S12,
        width: SCREEN_WIDTH,
        layout: PixelLayout::Yjk { yae: false },
        palette_offset: None,
    };

    /// VRAM bytes per screen row.
    pub fn row_bytes(&self) -> u32 {
        match self.layout {
            PixelLayout::Nibble => self.width / 2,
            PixelLayout::Rgb332 | PixelLayout::Yjk { .. } => self.width,
        }
    }
}

/// Summary of a dump's header and geometry, without decoding pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    pub header: ScreenHeader,
    pub width: u32,
    pub height: u32,
    pub palette_source: Option<PaletteSource>,
}

/// Decoder for one BSAVE screen mode.
#[derive(Debug, Clone, Copy)]
pub struct ScreenDecoder {
    mode: ScreenMode,
}

impl ScreenDecoder {
    pub const fn new(mode: ScreenMode) -> Self {
        Self { mode }
    }

    /// Inspect header and geometry.
    pub fn info(
        &self,
        data: &[u8],
        external_palette: Option<&[u8]>,
    ) -> Result<ScreenInfo, DecodeError> {
        let header = ScreenHeader::parse(data, self.mode.format)?;
        let height = screen_height(header.end, self.mode.row_bytes());
        let source = self
            .palette_request(&data[HEADER_LEN..], header, external_palette)
            .map(|request| palette_source(&request));
        Ok(ScreenInfo { header, width: self.mode.width, height, palette_source: source })
    }

    fn palette_request<'a>(
        &self,
        payload: &'a [u8],
        header: ScreenHeader,
        external: Option<&'a [u8]>,
    ) -> Option<PaletteRequest<'a>> {
        self.mode.palette_offset.map(|palette_offset| PaletteRequest {
            payload,
            begin: header.begin,
            end: header.end,
            palette_offset,
            external,
        })
    }

    /// Resolve the palette, when the mode uses one.
    fn palette(
        &self,
        payload: &[u8],
        header: ScreenHeader,
        config: &DecodeConfig,
    ) -> Result<Option<Palette>, DecodeError> {
        let Some(request) = self.palette_request(payload, header, config.palette.as_deref()) else {
            return Ok(None);
        };
        let (palette, source) = resolve_palette(&request)?;
        if config.verbose {
            eprintln!("{}: using {:?} palette", self.mode.format, source);
        }
        Ok(Some(palette))
    }

    /// Check that the payload holds every byte up to `end` (exclusive).
    fn require(&self, payload: &[u8], begin: usize, end: usize) -> Result<(), DecodeError> {
        let needed = end.saturating_sub(begin);
        if needed > payload.len() {
            return Err(DecodeError::truncated(self.mode.format, "pixel data", needed, payload.len()));
        }
        Ok(())
    }

    fn decode_nibbles(
        &self,
        payload: &[u8],
        header: ScreenHeader,
        height: u32,
        palette: Palette,
    ) -> Result<PixelBuffer, DecodeError> {
        let row_bytes = self.mode.row_bytes() as usize;
        let begin = header.begin as usize;
        let end = (header.end as usize).min(height as usize * row_bytes);
        self.require(payload, begin, end)?;

        let mut img = IndexedImage::new(self.mode.width, height, palette);
        for addr in begin..end {
            let y = (addr / row_bytes) as u32;
            let x = (addr % row_bytes) as u32;
            let byte = payload[addr - begin];
            img.set_index(x * 2, y, byte >> 4);
            img.set_index(x * 2 + 1, y, byte & 0x0F);
        }
        Ok(PixelBuffer::Indexed(img))
    }

    fn decode_rgb332(
        &self,
        payload: &[u8],
        header: ScreenHeader,
        height: u32,
    ) -> Result<PixelBuffer, DecodeError> {
        let width = self.mode.width as usize;
        let begin = header.begin as usize;
        let end = (header.end as usize).min(height as usize * width);
        self.require(payload, begin, end)?;

        let mut img = RgbaImage::from_pixel(self.mode.width, height, BLACK);
        for addr in begin..end {
            let y = (addr / width) as u32;
            let x = (addr % width) as u32;
            img.put_pixel(x, y, rgb332_to_rgba(payload[addr - begin]));
        }
        Ok(PixelBuffer::Rgba(img))
    }

    fn decode_yjk(
        &self,
        payload: &[u8],
        header: ScreenHeader,
        height: u32,
        palette: Option<&Palette>,
        yae: bool,
    ) -> Result<PixelBuffer, DecodeError> {
        let width = self.mode.width as usize;
        let capacity = height as usize * width;
        let begin = header.begin as usize;
        let end = (header.end as usize).min(capacity);
        // Groups are aligned to four pixels on screen.
        let first_group = begin.next_multiple_of(4);
        let last_byte = end.next_multiple_of(4).min(capacity);
        if first_group < end {
            self.require(payload, begin, last_byte)?;
        }

        let mut img = RgbaImage::from_pixel(self.mode.width, height, BLACK);
        let mut group_addr = first_group;
        while group_addr < end {
            let at = group_addr - begin;
            let group = [payload[at], payload[at + 1], payload[at + 2], payload[at + 3]];
            let (k, j) = yjk_chroma(group);
            let y = (group_addr / width) as u32;
            let x = (group_addr % width) as u32;

            for (i, byte) in group.iter().enumerate() {
                let luma = i32::from(byte >> 3);
                let color = match palette {
                    Some(palette) if yae && luma & 1 == 1 => palette.color((luma >> 1) as u8),
                    _ => {
                        let (r, g, b) = yjk_to_rgb(luma, j, k);
                        rgb555_to_rgba(r, g, b)
                    }
                };
                img.put_pixel(x + i as u32, y, color);
            }
            group_addr += 4;
        }
        Ok(PixelBuffer::Rgba(img))
    }
}

impl Decoder for ScreenDecoder {
    fn decode(&self, data: &[u8], config: &DecodeConfig) -> Result<DecodeResult, DecodeError> {
        let header = ScreenHeader::parse(data, self.mode.format)?;
        let payload = &data[HEADER_LEN..];
        let height = screen_height(header.end, self.mode.row_bytes());

        if config.verbose {
            eprintln!(
                "{}: begin={:#06X} end={:#06X} size={}x{}",
                self.mode.format, header.begin, header.end, self.mode.width, height
            );
        }

        let palette = self.palette(payload, header, config)?;
        let buffer = match self.mode.layout {
            PixelLayout::Nibble => {
                let palette = palette.unwrap_or_else(default_palette);
                self.decode_nibbles(payload, header, height, palette)?
            }
            PixelLayout::Rgb332 => self.decode_rgb332(payload, header, height)?,
            PixelLayout::Yjk { yae } => {
                self.decode_yjk(payload, header, height, palette.as_ref(), yae)?
            }
        };

        let buffer = if config.double_size { double_size(&buffer) } else { buffer };
        Ok(DecodeResult::Image(buffer))
    }
}
