//! msxconv - Command-line tool for decoding MSX screen dumps and listings

use std::process::ExitCode;

use msxconv::cli;

fn main() -> ExitCode {
    cli::run()
}
