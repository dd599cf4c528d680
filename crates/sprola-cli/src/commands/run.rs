//! Run command - execute SPROLA source files

use super::{report, Options, Outcome};
use anyhow::Result;

/// Run a SPROLA program
///
/// Program output and the final `Returned value: N` line go to stdout;
/// diagnostics go to stderr.
pub fn run(source: &str, options: &Options) -> Result<Outcome> {
    log::debug!("running {}", options.file);

    match options.runtime().run(source) {
        Ok(value) => {
            log::debug!("entry returned {}", value);
            Ok(Outcome::Success)
        }
        Err(diagnostics) => {
            report(&diagnostics, options)?;
            Ok(Outcome::Failed)
        }
    }
}
