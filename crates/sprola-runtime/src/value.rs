//! Runtime values and errors
//!
//! SPROLA has a single value type, the signed 64-bit integer. Conditions
//! treat zero as false and anything else as true.

use crate::diagnostic::error_codes;
use crate::diagnostic::Diagnostic;
use thiserror::Error;

/// Runtime value
pub type Value = i64;

/// Truthiness of a value
pub fn is_truthy(value: Value) -> bool {
    value != 0
}

/// Encode a comparison result as 1 or 0
pub fn from_bool(b: bool) -> Value {
    if b {
        1
    } else {
        0
    }
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

/// Runtime error type with source line information
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// Variable read or assigned but never declared
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String, line: usize },
    /// Call to a name that is neither builtin nor user function
    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String, line: usize },
    /// Wrong number of call arguments
    #[error("Function '{name}' expects {expected} argument{}, got {found}", plural(.expected))]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
    },
    /// Division or modulo by zero
    #[error("Division by zero")]
    DivideByZero { line: usize },
    /// Input stream held no integer where one was needed
    #[error("Invalid input: {msg}")]
    InvalidInput { msg: String, line: usize },
    /// Result does not fit in a 64-bit signed integer
    #[error("Integer overflow in '{op}'")]
    Overflow { op: &'static str, line: usize },
    /// Writing to the output stream failed
    #[error("Failed to write output: {msg}")]
    Output { msg: String, line: usize },
    /// Too many nested calls
    #[error("Maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize, line: usize },
    /// Declaring a name twice in one frame
    #[error("Variable '{name}' is already declared in this scope")]
    Redeclared { name: String, line: usize },
}

impl RuntimeError {
    /// Get the source line for this error
    pub fn line(&self) -> usize {
        match self {
            RuntimeError::UndefinedVariable { line, .. }
            | RuntimeError::UndefinedFunction { line, .. }
            | RuntimeError::ArityMismatch { line, .. }
            | RuntimeError::DivideByZero { line }
            | RuntimeError::InvalidInput { line, .. }
            | RuntimeError::Overflow { line, .. }
            | RuntimeError::Output { line, .. }
            | RuntimeError::CallDepthExceeded { line, .. }
            | RuntimeError::Redeclared { line, .. } => *line,
        }
    }

    /// Error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::UndefinedVariable { .. } => error_codes::UNDEFINED_VARIABLE,
            RuntimeError::UndefinedFunction { .. } => error_codes::UNDEFINED_FUNCTION,
            RuntimeError::ArityMismatch { .. } => error_codes::ARITY_MISMATCH,
            RuntimeError::DivideByZero { .. } => error_codes::DIVIDE_BY_ZERO,
            RuntimeError::InvalidInput { .. } => error_codes::INVALID_INPUT,
            RuntimeError::Overflow { .. } => error_codes::INTEGER_OVERFLOW,
            RuntimeError::Output { .. } => error_codes::OUTPUT_FAILURE,
            RuntimeError::CallDepthExceeded { .. } => error_codes::CALL_DEPTH_EXCEEDED,
            RuntimeError::Redeclared { .. } => error_codes::RUNTIME_REDECLARATION,
        }
    }

    /// Convert into a user-facing diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        let diag = Diagnostic::runtime(code, self.to_string(), self.line());
        match error_codes::help_for(code) {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}

impl From<RuntimeError> for Diagnostic {
    fn from(err: RuntimeError) -> Self {
        err.to_diagnostic()
    }
}
