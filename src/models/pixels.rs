//! Pixel buffers produced by the image decoders.

use image::RgbaImage;

use super::palette::Palette;

/// A palette-indexed image: one index byte per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    palette: Palette,
    indices: Vec<u8>,
}

impl IndexedImage {
    /// Create an image with every pixel set to index 0.
    pub fn new(width: u32, height: u32, palette: Palette) -> Self {
        let indices = vec![0; width as usize * height as usize];
        Self { width, height, palette, indices }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Raw index plane, row-major.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Index at `(x, y)`. Panics when out of bounds, like `RgbaImage::get_pixel`.
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        self.indices[self.offset(x, y)]
    }

    /// Set the index at `(x, y)`. Panics when out of bounds.
    pub fn set_index(&mut self, x: u32, y: u32, index: u8) {
        let offset = self.offset(x, y);
        self.indices[offset] = index;
    }

    /// Expand the indices through the palette into a direct-color image.
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| self.palette.color(self.index_at(x, y)))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}

/// A finished decoder image: indexed or direct color.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    /// Palette plus index plane (screens 5 and 7, stamps)
    Indexed(IndexedImage),
    /// Direct RGBA pixels (screens 8, 10 and 12)
    Rgba(RgbaImage),
}

impl PixelBuffer {
    pub fn width(&self) -> u32 {
        match self {
            PixelBuffer::Indexed(img) => img.width(),
            PixelBuffer::Rgba(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            PixelBuffer::Indexed(img) => img.height(),
            PixelBuffer::Rgba(img) => img.height(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Direct-color view of the buffer, expanding indices when needed.
    pub fn to_rgba(&self) -> RgbaImage {
        match self {
            PixelBuffer::Indexed(img) => img.to_rgba(),
            PixelBuffer::Rgba(img) => img.clone(),
        }
    }
}
