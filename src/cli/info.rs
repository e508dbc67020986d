//! Info command implementation

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::decoders::{decode, screen_mode, DecodeConfig, ScreenDecoder};
use crate::error::DecodeError;
use crate::format::{resolve_format, Format};
use crate::models::DecodeResult;
use crate::palettes::PaletteSource;

use super::{read_input, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Summary of an input file
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub file: String,
    pub format: Format,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<PaletteSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<usize>,
}

/// Build the report for `data` decoded as `format`.
pub fn build_report(path: &Path, format: Format, data: &[u8]) -> Result<InfoReport, DecodeError> {
    let mut report = InfoReport {
        file: path.display().to_string(),
        format,
        bytes: data.len(),
        begin: None,
        end: None,
        width: None,
        height: None,
        palette: None,
        lines: None,
    };

    if let Some(mode) = screen_mode(format) {
        // Header only: the pixel data is not validated.
        let info = ScreenDecoder::new(mode).info(data, None)?;
        report.begin = Some(info.header.begin);
        report.end = Some(info.header.end);
        report.width = Some(info.width);
        report.height = Some(info.height);
        report.palette = info.palette_source;
        return Ok(report);
    }

    match decode(format, data, &DecodeConfig::default())? {
        DecodeResult::Text(text) => report.lines = Some(text.lines().count()),
        DecodeResult::Image(buffer) => {
            report.width = Some(buffer.width());
            report.height = Some(buffer.height());
        }
    }
    Ok(report)
}

fn print_text(report: &InfoReport) {
    println!("File:    {}", report.file);
    println!("Format:  {}", report.format);
    println!("Size:    {} bytes", report.bytes);
    if let (Some(begin), Some(end)) = (report.begin, report.end) {
        println!("Begin:   {:#06X}", begin);
        println!("End:     {:#06X}", end);
    }
    if let (Some(width), Some(height)) = (report.width, report.height) {
        println!("Image:   {}x{}", width, height);
    }
    if let Some(palette) = report.palette {
        let source = match palette {
            PaletteSource::Embedded => "embedded",
            PaletteSource::External => "external",
            PaletteSource::Default => "default",
        };
        println!("Palette: {}", source);
    }
    if let Some(lines) = report.lines {
        println!("Lines:   {}", lines);
    }
}

/// Execute the info command
pub fn run_info(input: &Path, file_type: Option<Format>, json: bool) -> ExitCode {
    let data = match read_input(input, "input") {
        Ok(data) => data,
        Err(code) => return code,
    };

    let format = match resolve_format(file_type, &data, input) {
        Ok(format) => format,
        Err(_) => {
            eprintln!("Error: Could not detect format of '{}'", input.display());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let report = match build_report(input, format, &data) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        print_text(&report);
    }
    ExitCode::from(EXIT_SUCCESS)
}
