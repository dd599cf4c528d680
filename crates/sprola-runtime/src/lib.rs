//! SPROLA Runtime - Core language implementation
//!
//! This library provides the complete SPROLA pipeline:
//! - Lexical analysis and parsing with static scope checks
//! - Tree-walking interpretation over 64-bit integers
//! - Builtin functions and program I/O
//! - Diagnostics with text and JSON rendering

/// SPROLA runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod stdlib;
pub mod symbol;
pub mod token;
pub mod value;

// Re-export commonly used types
pub use ast::{Program, VersionedProgram, AST_VERSION};
pub use diagnostic::{error_codes, Diagnostic, DiagnosticLevel, Stage, DIAG_VERSION};
pub use environment::Environment;
pub use interpreter::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use lexer::Lexer;
pub use parser::{Parser, MAX_NESTING_DEPTH};
pub use runtime::{RuntimeResult, Sprola, DEFAULT_ENTRY};
pub use stdlib::ProgramIo;
pub use symbol::{ScopeError, ScopeTable};
pub use token::{Token, TokenKind};
pub use value::{RuntimeError, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        assert_eq!(VERSION, "0.1.0");
    }
}
