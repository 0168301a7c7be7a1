//! Terminal output. stdout carries only the result token so CI steps can
//! capture it; everything else goes to stderr.

use std::io::{self, Write};

use console::style;

use crate::cli::Resolution;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a hint below an error.
pub fn display_hint(message: &str) {
    eprintln!("{} {}", style("hint:").yellow(), message);
}

/// The line written to stdout for a resolution
pub fn result_line(resolution: &Resolution, print_level: bool) -> &str {
    if print_level {
        resolution.level_token()
    } else {
        resolution.output_token()
    }
}

/// Write the resolution token followed by a newline
pub fn write_resolution<W: Write>(
    out: &mut W,
    resolution: &Resolution,
    print_level: bool,
) -> io::Result<()> {
    writeln!(out, "{}", result_line(resolution, print_level))?;
    out.flush()
}
