//! Check command - validate SPROLA source files without executing

use super::{report, Options, Outcome};
use anyhow::Result;

/// Lex and parse a source file, reporting any static errors
pub fn run(source: &str, options: &Options) -> Result<Outcome> {
    match options.runtime().check(source) {
        Ok(()) => {
            println!("{}: No errors found", options.file);
            Ok(Outcome::Success)
        }
        Err(diagnostics) => {
            report(&diagnostics, options)?;
            Ok(Outcome::Failed)
        }
    }
}
