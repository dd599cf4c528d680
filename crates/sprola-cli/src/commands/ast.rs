//! AST dump command - output AST as JSON

use super::{report, Options, Outcome};
use anyhow::Result;
use sprola_runtime::VersionedProgram;

/// Parse the source and print the versioned AST as JSON to stdout
pub fn run(source: &str, options: &Options) -> Result<Outcome> {
    match options.runtime().parse(source) {
        Ok(program) => {
            let json = VersionedProgram::new(program).to_json()?;
            println!("{}", json);
            Ok(Outcome::Success)
        }
        Err(diagnostics) => {
            report(&diagnostics, options)?;
            Ok(Outcome::Failed)
        }
    }
}
