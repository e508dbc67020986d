//! Image encoding and output writing

use image::{DynamicImage, ImageOutputFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::models::{DecodeResult, IndexedImage, PixelBuffer};

/// JPEG quality used for lossy output.
const JPEG_QUALITY: u8 = 90;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// Paletted PNG encoding error
    #[error("PNG error: {0}")]
    Png(#[from] png::EncodingError),
}

/// Container format for decoded images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Bmp,
    Jpeg,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Jpeg => "jpg",
        }
    }

    fn image_format(self) -> ImageOutputFormat {
        match self {
            OutputFormat::Png => ImageOutputFormat::Png,
            OutputFormat::Bmp => ImageOutputFormat::Bmp,
            OutputFormat::Jpeg => ImageOutputFormat::Jpeg(JPEG_QUALITY),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Jpeg => "jpeg",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "bmp" => Ok(OutputFormat::Bmp),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            other => Err(format!("unsupported output format '{}' (expected png, bmp or jpeg)", other)),
        }
    }
}

/// Encode a decoded image into container bytes.
///
/// Indexed images become paletted PNGs. For the other containers they are
/// expanded through their palette first. JPEG has no alpha channel, so it is
/// encoded from RGB.
pub fn encode_image(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>, OutputError> {
    if let (PixelBuffer::Indexed(indexed), OutputFormat::Png) = (buffer, format) {
        return encode_indexed_png(indexed);
    }

    let rgba = DynamicImage::ImageRgba8(buffer.to_rgba());
    let image = match format {
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(rgba.to_rgb8()),
        OutputFormat::Png | OutputFormat::Bmp => rgba,
    };

    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format.image_format())?;
    Ok(bytes.into_inner())
}

/// Write an 8-bit paletted PNG carrying the image's own palette.
fn encode_indexed_png(image: &IndexedImage) -> Result<Vec<u8>, OutputError> {
    let palette: Vec<u8> =
        image.palette().colors().iter().flat_map(|color| [color[0], color[1], color[2]]).collect();

    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, image.width(), image.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(palette);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.indices())?;
    }
    Ok(bytes)
}

/// Write bytes to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// Default image path: the input path with the container's extension.
///
/// | Input | Format | Output |
/// |-------|--------|--------|
/// | `pics/title.sc5` | png | `pics/title.png` |
/// | `LOGO.S12` | jpeg | `LOGO.jpg` |
pub fn generate_output_path(input: &Path, output_arg: Option<&Path>, format: OutputFormat) -> PathBuf {
    match output_arg {
        Some(output) => output.to_path_buf(),
        None => input.with_extension(format.extension()),
    }
}

/// Write a decode result.
///
/// Text goes to `output` when given, otherwise to stdout. Images always go
/// to a file, named after the input when no output path was given.
///
/// Returns the path written, or `None` for text sent to stdout.
pub fn write_result(
    result: &DecodeResult,
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<Option<PathBuf>, OutputError> {
    match result {
        DecodeResult::Text(text) => match output {
            Some(path) => {
                write_file(path, text.as_bytes())?;
                Ok(Some(path.to_path_buf()))
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
                Ok(None)
            }
        },
        DecodeResult::Image(buffer) => {
            let path = generate_output_path(input, output, format);
            let bytes = encode_image(buffer, format)?;
            write_file(&path, &bytes)?;
            Ok(Some(path))
        }
    }
}
