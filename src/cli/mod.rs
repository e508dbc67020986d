//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod convert;
mod info;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::format::Format;
use crate::output::OutputFormat;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// msxconv - Convert MSX screen dumps, stamps and tokenized listings
#[derive(Parser)]
#[command(name = "msxconv")]
#[command(about = "Convert MSX screen dumps (SC5-S12), stamps and BASIC/WBASS2 listings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a file to an image or a text listing
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file.
        /// If omitted: listings go to stdout, images to {input stem}.{ext}
        output: Option<PathBuf>,

        /// Input type, skipping detection (BAS, WB2, SC5, SC7, SC8, S10, S12, STP)
        #[arg(short = 't', long = "type")]
        file_type: Option<Format>,

        /// Image container: png, bmp or jpeg
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Double the image size
        #[arg(long)]
        double: bool,

        /// Print decoder diagnostics to stderr
        #[arg(long)]
        verbose: bool,

        /// Palette dump used when the screen carries no palette of its own
        #[arg(long)]
        palette: Option<PathBuf>,

        /// Configuration file (default: msxconv.toml found from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the detected format and header summary of a file
    Info {
        /// Input file
        input: PathBuf,

        /// Input type, skipping detection
        #[arg(short = 't', long = "type")]
        file_type: Option<Format>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Read a whole input file, reporting failures as invalid arguments.
pub(crate) fn read_input(path: &Path, what: &str) -> Result<Vec<u8>, ExitCode> {
    std::fs::read(path).map_err(|e| {
        eprintln!("Error: Cannot read {} '{}': {}", what, path.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert { input, output, file_type, format, double, verbose, palette, config } => {
            convert::run_convert(&convert::ConvertArgs {
                input: &input,
                output: output.as_deref(),
                file_type,
                format,
                double,
                verbose,
                palette: palette.as_deref(),
                config: config.as_deref(),
            })
        }
        Commands::Info { input, file_type, json } => info::run_info(&input, file_type, json),
    }
}
