//! Decode result handed to the output layer.

use super::pixels::PixelBuffer;

/// What a decoder produced: a reconstructed listing or a finished image.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult {
    /// Detokenized program text
    Text(String),
    /// Decoded screen or stamp
    Image(PixelBuffer),
}

impl DecodeResult {
    pub fn is_text(&self) -> bool {
        matches!(self, DecodeResult::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodeResult::Text(text) => Some(text),
            DecodeResult::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&PixelBuffer> {
        match self {
            DecodeResult::Text(_) => None,
            DecodeResult::Image(buffer) => Some(buffer),
        }
    }
}
