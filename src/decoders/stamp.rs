//! Dynamic Publisher stamp (`.STP`) decoder.
//!
//! Layout: width and height as LE u16, then a 1-bit bitmap packed four
//! pixels per byte in the even bit positions (bits 6, 4, 2, 0). A set bit is
//! ink. Stamp pixels are twice as tall as wide, so every row is emitted twice.

use super::{DecodeConfig, Decoder};
use crate::error::DecodeError;
use crate::format::Format;
use crate::models::{DecodeResult, IndexedImage, Palette, PixelBuffer};
use crate::transforms::{double_height_indexed, double_size};

const HEADER_LEN: usize = 4;
const PIXELS_PER_BYTE: usize = 4;

/// Bitmap bit for pixel `i` of the stream.
fn pixel_bit(bitmap: &[u8], i: usize) -> u8 {
    let shift = 6 - 2 * (i % PIXELS_PER_BYTE);
    (bitmap[i / PIXELS_PER_BYTE] >> shift) & 1
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StampDecoder;

impl Decoder for StampDecoder {
    fn decode(&self, data: &[u8], config: &DecodeConfig) -> Result<DecodeResult, DecodeError> {
        if data.len() < HEADER_LEN {
            return Err(DecodeError::malformed(
                Format::Stp,
                format!("{} bytes, need at least {}", data.len(), HEADER_LEN),
            ));
        }
        let width = u16::from_le_bytes([data[0], data[1]]) as u32;
        let height = u16::from_le_bytes([data[2], data[3]]) as u32;
        let bitmap = &data[HEADER_LEN..];

        let pixels = width as usize * height as usize;
        let needed = pixels.div_ceil(PIXELS_PER_BYTE);
        if bitmap.len() < needed {
            return Err(DecodeError::truncated(Format::Stp, "bitmap", needed, bitmap.len()));
        }

        if config.verbose {
            eprintln!("STP: {}x{} stamp", width, height);
        }

        let mut img = IndexedImage::new(width, height, Palette::monochrome());
        for i in 0..pixels {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            // Ink is black, index 0
            img.set_index(x, y, 1 - pixel_bit(bitmap, i));
        }

        let buffer = PixelBuffer::Indexed(double_height_indexed(&img));
        let buffer = if config.double_size { double_size(&buffer) } else { buffer };
        Ok(DecodeResult::Image(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn stamp(width: u16, height: u16, bitmap: &[u8]) -> Vec<u8> {
        let mut data = width.to_le_bytes().to_vec();
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(bitmap);
        data
    }

    fn decode_indexed(data: &[u8], config: &DecodeConfig) -> IndexedImage {
        match StampDecoder.decode(data, config).unwrap() {
            DecodeResult::Image(PixelBuffer::Indexed(img)) => img,
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_pixel_bit_positions() {
        let bitmap = [0b0100_0000, 0b0000_0001];
        assert_eq!(pixel_bit(&bitmap, 0), 1);
        assert_eq!(pixel_bit(&bitmap, 1), 0);
        assert_eq!(pixel_bit(&bitmap, 7), 1);
        // Odd bit positions are never read
        assert_eq!(pixel_bit(&[0b1010_1010], 0), 0);
    }

    #[test]
    fn test_rows_are_doubled() {
        // 4x1: ink, paper, ink, paper
        let data = stamp(4, 1, &[0b0100_0100]);
        let img = decode_indexed(&data, &DecodeConfig::default());
        assert_eq!(img.dimensions(), (4, 2));
        for y in 0..2 {
            assert_eq!(img.index_at(0, y), 0);
            assert_eq!(img.index_at(1, y), 1);
            assert_eq!(img.index_at(2, y), 0);
            assert_eq!(img.index_at(3, y), 1);
        }
        let rgba = img.to_rgba();
        assert_eq!(*rgba.get_pixel(0, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*rgba.get_pixel(1, 1), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_stream_wraps_rows() {
        // 2x2 reads a single byte across both rows
        let data = stamp(2, 2, &[0b0000_0100]);
        let img = decode_indexed(&data, &DecodeConfig::default());
        assert_eq!(img.dimensions(), (2, 4));
        assert_eq!(img.index_at(0, 0), 1);
        assert_eq!(img.index_at(0, 2), 0);
        assert_eq!(img.index_at(1, 2), 1);
        assert_eq!(img.index_at(0, 3), 0);
    }

    #[test]
    fn test_double_size_after_row_doubling() {
        let data = stamp(1, 1, &[0b0100_0000]);
        let config = DecodeConfig { double_size: true, ..DecodeConfig::default() };
        let img = decode_indexed(&data, &config);
        assert_eq!(img.dimensions(), (2, 4));
        assert!(img.indices().iter().all(|&i| i == 0));
    }

    #[test]
    fn test_short_header() {
        let err = StampDecoder.decode(&[1, 0, 1], &DecodeConfig::default()).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedHeader { format: Format::Stp, .. }));
    }

    #[test]
    fn test_truncated_bitmap() {
        // 5x1 needs two bytes
        let data = stamp(5, 1, &[0xFF]);
        let err = StampDecoder.decode(&data, &DecodeConfig::default()).unwrap_err();
        assert_eq!(err, DecodeError::truncated(Format::Stp, "bitmap", 2, 1));
    }

    #[test]
    fn test_empty_stamp() {
        let img = decode_indexed(&stamp(0, 0, &[]), &DecodeConfig::default());
        assert_eq!(img.dimensions(), (0, 0));
    }
}
