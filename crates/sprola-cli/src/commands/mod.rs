//! CLI command implementations

pub mod ast;
pub mod check;
pub mod run;

use anyhow::{Context, Result};
use sprola_runtime::diagnostic::formatter::{ColorMode, DiagnosticFormatter};
use sprola_runtime::{Diagnostic, Sprola};
use std::fs;

/// Call depth used when neither flag nor environment sets one; the
/// interpreter thread's stack is sized to hold it
pub const DEFAULT_CLI_MAX_CALL_DEPTH: usize = 1024;

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Program ran (or checked) cleanly
    Success,
    /// Diagnostics were reported
    Failed,
}

/// Settings shared by every command, after flags and environment are merged
#[derive(Debug, Clone)]
pub struct Options {
    pub file: String,
    pub json: bool,
    pub no_color: bool,
    pub entry: Option<String>,
    pub max_call_depth: usize,
}

impl Options {
    /// Runtime configured from these options
    pub fn runtime(&self) -> Sprola {
        let mut runtime = Sprola::new()
            .with_file_name(self.file.clone())
            .with_max_call_depth(self.max_call_depth);
        if let Some(entry) = &self.entry {
            runtime = runtime.with_entry(entry.clone());
        }
        runtime
    }
}

/// Read a source file
pub fn read_source(file_path: &str) -> Result<String> {
    fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))
}

/// Print diagnostics to stderr as text or one JSON object per line
pub fn report(diagnostics: &[Diagnostic], options: &Options) -> Result<()> {
    if options.json {
        for diag in diagnostics {
            eprintln!("{}", diag.to_json_compact()?);
        }
        return Ok(());
    }

    let mode = if options.no_color {
        ColorMode::Never
    } else {
        ColorMode::Auto
    };
    DiagnosticFormatter::new(mode).emit_all(diagnostics);
    Ok(())
}
