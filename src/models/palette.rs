//! Palette type shared by the indexed decoders.

use image::Rgba;

use crate::color::{palette_word_to_rgba, BLACK, WHITE};

/// Number of palette registers on the V9938.
pub const MSX_PALETTE_SIZE: usize = 16;

/// Bytes occupied by a full palette dump (16 little-endian words).
pub const MSX_PALETTE_BYTES: usize = MSX_PALETTE_SIZE * 2;

/// An ordered list of opaque colors addressed by pixel index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    /// Decode 16 palette register words from `bytes`.
    ///
    /// Returns `None` when fewer than [`MSX_PALETTE_BYTES`] bytes are given.
    pub fn from_register_words(bytes: &[u8]) -> Option<Self> {
        let words = bytes.get(..MSX_PALETTE_BYTES)?;
        let colors = words
            .chunks_exact(2)
            .map(|pair| palette_word_to_rgba(u16::from_le_bytes([pair[0], pair[1]])))
            .collect();
        Some(Self { colors })
    }

    /// The two-color palette used by stamp bitmaps: index 0 black, index 1 white.
    pub fn monochrome() -> Self {
        Self { colors: vec![BLACK, WHITE] }
    }

    /// Color for `index`, or opaque black when the index is out of range.
    pub fn color(&self, index: u8) -> Rgba<u8> {
        self.colors.get(index as usize).copied().unwrap_or(BLACK)
    }

    /// All colors in register order.
    pub fn colors(&self) -> &[Rgba<u8>] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_register_words() {
        let mut bytes = vec![0u8; MSX_PALETTE_BYTES];
        bytes[2] = 0x70; // color 1: red
        bytes[5] = 0x07; // color 2: green
        bytes[6] = 0x07; // color 3: blue
        let palette = Palette::from_register_words(&bytes).unwrap();
        assert_eq!(palette.len(), MSX_PALETTE_SIZE);
        assert_eq!(palette.color(0), BLACK);
        assert_eq!(palette.color(1), Rgba([255, 0, 0, 255]));
        assert_eq!(palette.color(2), Rgba([0, 255, 0, 255]));
        assert_eq!(palette.color(3), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_from_register_words_too_short() {
        assert!(Palette::from_register_words(&[0u8; 31]).is_none());
    }

    #[test]
    fn test_monochrome() {
        let palette = Palette::monochrome();
        assert_eq!(palette.colors(), &[BLACK, WHITE]);
        assert_eq!(palette.color(5), BLACK);
    }
}
