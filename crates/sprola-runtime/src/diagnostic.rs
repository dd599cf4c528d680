//! Diagnostic system for errors
//!
//! All lexer, parser and runtime errors flow through the unified Diagnostic
//! type, so the CLI renders every failure the same way.

pub mod error_codes;
pub mod formatter;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic schema version
pub const DIAG_VERSION: u32 = 1;

/// Severity level of a diagnostic
///
/// Every diagnostic SPROLA raises is fatal; the level is kept in the JSON
/// schema so consumers can filter on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Fatal error that stops the run
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// Which stage of the pipeline produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lexer,
    Parser,
    Runtime,
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic schema version
    pub diag_version: u32,
    /// Severity level
    pub level: DiagnosticLevel,
    /// Pipeline stage that raised it
    pub stage: Stage,
    /// Error code (e.g., "SP2002")
    pub code: String,
    /// Main diagnostic message
    pub message: String,
    /// File path
    pub file: String,
    /// Line number (1-based)
    pub line: usize,
    /// Source line string
    pub snippet: String,
    /// Short label describing the offending token
    pub label: String,
    /// Additional notes (optional)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
    /// Suggested fix (optional)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic with code
    pub fn error_with_code(
        stage: Stage,
        code: impl Into<String>,
        message: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            diag_version: DIAG_VERSION,
            level: DiagnosticLevel::Error,
            stage,
            code: code.into(),
            message: message.into(),
            file: "<unknown>".to_string(),
            line,
            snippet: String::new(),
            label: String::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    /// Create a lexer error
    pub fn lexer(code: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self::error_with_code(Stage::Lexer, code, message, line)
    }

    /// Create a parser error
    pub fn parser(code: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self::error_with_code(Stage::Parser, code, message, line)
    }

    /// Create a runtime error
    pub fn runtime(code: impl Into<String>, message: impl Into<String>, line: usize) -> Self {
        Self::error_with_code(Stage::Runtime, code, message, line)
    }

    /// Set the file path
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Set the snippet (source line)
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a help message
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Fill in file name and snippet from the full source text
    pub fn with_source(self, file: impl Into<String>, source: &str) -> Self {
        let snippet = formatter::extract_snippet(source, self.line).unwrap_or_default();
        self.with_file(file).with_snippet(snippet)
    }

    /// Format as human-readable string
    pub fn to_human_string(&self) -> String {
        let mut output = String::new();

        // Header: error[SP2002]: Variable 'x' is already declared in this scope
        output.push_str(&format!("{}[{}]: {}\n", self.level, self.code, self.message));

        // Location: --> path/to/file.spr:12
        output.push_str(&format!("  --> {}:{}\n", self.file, self.line));

        if !self.snippet.is_empty() {
            output.push_str("   |\n");
            output.push_str(&format!("{:>2} | {}\n", self.line, self.snippet));
            if !self.label.is_empty() {
                output.push_str(&format!("   | {}\n", self.label));
            }
        }

        for note in &self.notes {
            output.push_str(&format!("   = note: {}\n", note));
        }

        if let Some(help) = &self.help {
            output.push_str(&format!("   = help: {}\n", help));
        }

        output
    }

    /// Format as JSON string
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] line {}: {}",
            self.level, self.code, self.line, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}
