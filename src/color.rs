//! Color channel conversion for the MSX video hardware
//!
//! The V9938/V9958 store color channels with 2, 3 or 5 bits of precision.
//! These tables expand them to the full 8-bit range exactly as the reference
//! hardware palettes do (not a plain bit-replication).

use image::Rgba;

/// 2-bit channel (screen 8 blue) to 8-bit intensity.
pub const COLOR_2BIT: [u8; 4] = [0x00, 0x55, 0xaa, 0xff];

/// 3-bit channel (palette registers, screen 8 red/green) to 8-bit intensity.
pub const COLOR_3BIT: [u8; 8] = [0x00, 0x24, 0x49, 0x6d, 0x92, 0xb6, 0xdb, 0xff];

/// 5-bit channel (YJK/YAE reconstruction) to 8-bit intensity.
pub const COLOR_5BIT: [u8; 32] = [
    0, 8, 16, 24, 33, 41, 49, 57, 66, 74, 82, 90, 99, 107, 115, 123, 132, 140, 148, 156, 165, 173,
    181, 189, 198, 206, 214, 222, 231, 239, 247, 255,
];

/// Opaque black, the value of every pixel a decoder never writes.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Opaque white.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Decode a palette register word (`0RRR0BBB 00000GGG` as a little-endian u16).
///
/// Bits 3 and 7 and the top five bits are ignored.
pub fn palette_word_to_rgba(word: u16) -> Rgba<u8> {
    let r = COLOR_3BIT[((word >> 4) & 0b111) as usize];
    let g = COLOR_3BIT[((word >> 8) & 0b111) as usize];
    let b = COLOR_3BIT[(word & 0b111) as usize];
    Rgba([r, g, b, 255])
}

/// Decode a screen 8 pixel byte (`GGGRRRBB`).
pub fn rgb332_to_rgba(byte: u8) -> Rgba<u8> {
    let r = COLOR_3BIT[((byte >> 2) & 0b111) as usize];
    let g = COLOR_3BIT[((byte >> 5) & 0b111) as usize];
    let b = COLOR_2BIT[(byte & 0b11) as usize];
    Rgba([r, g, b, 255])
}

/// Expand three 5-bit channels, clamping each to `0..=31` first.
pub fn rgb555_to_rgba(r: i32, g: i32, b: i32) -> Rgba<u8> {
    Rgba([
        COLOR_5BIT[r.clamp(0, 31) as usize],
        COLOR_5BIT[g.clamp(0, 31) as usize],
        COLOR_5BIT[b.clamp(0, 31) as usize],
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_span_full_range() {
        assert_eq!(COLOR_2BIT[0], 0);
        assert_eq!(COLOR_2BIT[3], 255);
        assert_eq!(COLOR_3BIT[0], 0);
        assert_eq!(COLOR_3BIT[7], 255);
        assert_eq!(COLOR_5BIT[0], 0);
        assert_eq!(COLOR_5BIT[31], 255);
    }

    #[test]
    fn test_palette_word_channels() {
        // R=7 only
        assert_eq!(palette_word_to_rgba(0x0070), Rgba([255, 0, 0, 255]));
        // G=7 only
        assert_eq!(palette_word_to_rgba(0x0700), Rgba([0, 255, 0, 255]));
        // B=7 only
        assert_eq!(palette_word_to_rgba(0x0007), Rgba([0, 0, 255, 255]));
        // Unused bits are ignored
        assert_eq!(palette_word_to_rgba(0xF888), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_rgb332() {
        assert_eq!(rgb332_to_rgba(0x00), BLACK);
        assert_eq!(rgb332_to_rgba(0xFF), WHITE);
        assert_eq!(rgb332_to_rgba(0b000_111_00), Rgba([255, 0, 0, 255]));
        assert_eq!(rgb332_to_rgba(0b111_000_00), Rgba([0, 255, 0, 255]));
        assert_eq!(rgb332_to_rgba(0b000_000_10), Rgba([0, 0, 0xaa, 255]));
    }

    #[test]
    fn test_rgb555_clamps() {
        assert_eq!(rgb555_to_rgba(-3, 40, 16), Rgba([0, 255, 132, 255]));
        assert_eq!(rgb555_to_rgba(31, 0, -1), Rgba([255, 0, 0, 255]));
    }
}
