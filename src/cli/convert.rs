//! Convert command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::decoders::{decode, DecodeConfig};
use crate::format::{resolve_format, Format};
use crate::output::{write_result, OutputFormat};

use super::{read_input, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of the convert command
pub struct ConvertArgs<'a> {
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub file_type: Option<Format>,
    pub format: Option<OutputFormat>,
    pub double: bool,
    pub verbose: bool,
    pub palette: Option<&'a Path>,
    pub config: Option<&'a Path>,
}

impl ConvertArgs<'_> {
    /// Flags given on the command line; unset switches leave the config alone.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            format: self.format,
            double: self.double.then_some(true),
            verbose: self.verbose.then_some(true),
        }
    }
}

/// Execute the convert command
pub fn run_convert(args: &ConvertArgs<'_>) -> ExitCode {
    let mut config = match load_config(args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    merge_cli_overrides(&mut config, &args.overrides());
    let verbose = config.defaults.verbose;

    let data = match read_input(args.input, "input") {
        Ok(data) => data,
        Err(code) => return code,
    };

    let palette = match args.palette {
        Some(path) => match read_input(path, "palette") {
            Ok(bytes) => Some(bytes),
            Err(code) => return code,
        },
        None => None,
    };

    let format = match resolve_format(args.file_type, &data, args.input) {
        Ok(format) => format,
        Err(_) => {
            eprintln!("Error: Could not detect format of '{}'", args.input.display());
            eprintln!("Pass the type explicitly with -t (BAS, WB2, SC5, SC7, SC8, S10, S12, STP)");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let decode_config = DecodeConfig {
        output_format: config.output_format(),
        double_size: config.defaults.double,
        verbose,
        palette,
    };

    let result = match decode(format, &data, &decode_config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match write_result(&result, args.input, args.output, decode_config.output_format) {
        Ok(written) => {
            if verbose {
                if let Some(path) = written {
                    eprintln!("Wrote {}", path.display());
                }
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
