//! Integer pixel replication for aspect-ratio correction and doubling.
//!
//! All routines are exact: every source pixel maps to a uniform block in the
//! output, and indexed images keep their palette and index plane.

use image::RgbaImage;

use crate::models::{IndexedImage, PixelBuffer};

/// Replicate every pixel into a 2x2 block.
pub fn double_size_rgba(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut output = RgbaImage::new(width * 2, height * 2);

    for y in 0..height {
        for x in 0..width {
            let pixel = *image.get_pixel(x, y);
            output.put_pixel(x * 2, y * 2, pixel);
            output.put_pixel(x * 2 + 1, y * 2, pixel);
            output.put_pixel(x * 2, y * 2 + 1, pixel);
            output.put_pixel(x * 2 + 1, y * 2 + 1, pixel);
        }
    }

    output
}

/// Replicate every index into a 2x2 block, keeping the palette.
pub fn double_size_indexed(image: &IndexedImage) -> IndexedImage {
    let (width, height) = image.dimensions();
    let mut output = IndexedImage::new(width * 2, height * 2, image.palette().clone());

    for y in 0..height {
        for x in 0..width {
            let index = image.index_at(x, y);
            output.set_index(x * 2, y * 2, index);
            output.set_index(x * 2 + 1, y * 2, index);
            output.set_index(x * 2, y * 2 + 1, index);
            output.set_index(x * 2 + 1, y * 2 + 1, index);
        }
    }

    output
}

/// Duplicate every row, for formats drawn with pixels twice as tall as wide.
pub fn double_height_indexed(image: &IndexedImage) -> IndexedImage {
    let (width, height) = image.dimensions();
    let mut output = IndexedImage::new(width, height * 2, image.palette().clone());

    for y in 0..height {
        for x in 0..width {
            let index = image.index_at(x, y);
            output.set_index(x, y * 2, index);
            output.set_index(x, y * 2 + 1, index);
        }
    }

    output
}

/// Double a finished buffer in both axes, preserving its color representation.
pub fn double_size(buffer: &PixelBuffer) -> PixelBuffer {
    match buffer {
        PixelBuffer::Indexed(img) => PixelBuffer::Indexed(double_size_indexed(img)),
        PixelBuffer::Rgba(img) => PixelBuffer::Rgba(double_size_rgba(img)),
    }
}
