//! SPROLA runtime API for embedding
//!
//! Drives the full pipeline: lex, parse, register functions, run top-level
//! statements, call the entry function and report its return value.

use crate::ast::Program;
use crate::diagnostic::Diagnostic;
use crate::interpreter::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::stdlib::ProgramIo;
use crate::value::Value;
use std::io::{BufRead, Write};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// Function invoked after the top-level statements have run
pub const DEFAULT_ENTRY: &str = "entry";

/// SPROLA runtime instance
///
/// # Examples
///
/// ```
/// use sprola_runtime::Sprola;
/// use std::io::Cursor;
///
/// let output = Vec::new();
/// let runtime = Sprola::new().with_io(Cursor::new(""), output);
/// let value = runtime.run("function entry() { return 6 * 7; }").unwrap();
/// assert_eq!(value, 42);
/// ```
pub struct Sprola {
    io: ProgramIo,
    entry: String,
    max_call_depth: usize,
    file_name: String,
}

impl Sprola {
    /// Create a runtime reading stdin and writing stdout
    pub fn new() -> Self {
        Self {
            io: ProgramIo::stdio(),
            entry: DEFAULT_ENTRY.to_string(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            file_name: "<input>".to_string(),
        }
    }

    /// Use custom input and output streams
    pub fn with_io(mut self, input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        self.io = ProgramIo::new(input, output);
        self
    }

    /// Name of the zero-argument function called after top-level code
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }

    /// Limit on nested user function calls
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// File name shown in diagnostics
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Lex and parse `source` without running it
    ///
    /// Lexer diagnostics are all reported at once; a parse error is reported alone.
    pub fn parse(&self, source: &str) -> RuntimeResult<Program> {
        let mut lexer = Lexer::new(source);
        let (tokens, lex_diagnostics) = lexer.tokenize();
        if !lex_diagnostics.is_empty() {
            log::debug!("lexing failed with {} diagnostics", lex_diagnostics.len());
            return Err(self.enrich_all(lex_diagnostics, source));
        }

        let mut parser = Parser::new(tokens);
        parser
            .parse()
            .map_err(|diag| vec![self.enrich(diag, source)])
    }

    /// Check that `source` is statically valid
    pub fn check(&self, source: &str) -> RuntimeResult<()> {
        self.parse(source).map(|_| ())
    }

    /// Run a program and return the entry function's value
    ///
    /// Writes `Returned value: N` to the output stream on success.
    pub fn run(self, source: &str) -> RuntimeResult<Value> {
        let program = self.parse(source)?;
        let Sprola {
            io,
            entry,
            max_call_depth,
            file_name,
        } = self;

        let mut interpreter = Interpreter::new(io).with_max_call_depth(max_call_depth);
        let result = Self::execute(&mut interpreter, &program, &entry, source);

        let stats = interpreter.stats();
        log::debug!(
            "executed {} statements, {} calls (max depth {})",
            stats.statements,
            stats.calls,
            stats.max_call_depth
        );

        result.map_err(|err| vec![err.to_diagnostic().with_source(file_name, source)])
    }

    fn execute(
        interpreter: &mut Interpreter,
        program: &Program,
        entry: &str,
        source: &str,
    ) -> Result<Value, crate::value::RuntimeError> {
        interpreter.register_functions(program);
        log::debug!("running top-level statements");
        interpreter.execute(&program.statements)?;

        // A missing entry function is reported at the end of the file
        let entry_line = program
            .functions()
            .find(|f| f.name == entry)
            .map(|f| f.line)
            .unwrap_or_else(|| source.lines().count().max(1));

        log::debug!("calling entry function '{}'", entry);
        let value = interpreter.call_function(entry, Vec::new(), entry_line)?;
        interpreter.write_line(&format!("Returned value: {}", value), entry_line)?;
        Ok(value)
    }

    fn enrich(&self, diag: Diagnostic, source: &str) -> Diagnostic {
        diag.with_source(self.file_name.clone(), source)
    }

    fn enrich_all(&self, diags: Vec<Diagnostic>, source: &str) -> Vec<Diagnostic> {
        diags
            .into_iter()
            .map(|diag| self.enrich(diag, source))
            .collect()
    }
}

impl Default for Sprola {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn run(source: &str) -> (RuntimeResult<Value>, String) {
        let out = Capture::default();
        let result = Sprola::new()
            .with_io(Cursor::new(String::new()), out.clone())
            .run(source);
        let text = String::from_utf8(out.0.borrow().clone()).unwrap();
        (result, text)
    }

    #[test]
    fn test_run_prints_returned_value() {
        let (result, out) = run("print 1;\nfunction entry() { print 2; return 3; }");
        assert_eq!(result, Ok(3));
        assert_eq!(out, "1\n2\nReturned value: 3\n");
    }

    #[test]
    fn test_functions_registered_before_top_level() {
        let (result, out) = run("print twice(4);\nfunction twice(n) { return n * 2; }\nfunction entry() { return 0; }");
        assert_eq!(result, Ok(0));
        assert_eq!(out, "8\nReturned value: 0\n");
    }

    #[test]
    fn test_missing_entry() {
        let (result, out) = run("print 1;\nprint 2;");
        let diags = result.unwrap_err();
        assert_eq!(diags[0].code, "SP3002");
        assert_eq!(diags[0].line, 2);
        assert_eq!(out, "1\n2\n");
    }

    #[test]
    fn test_custom_entry() {
        let out = Capture::default();
        let result = Sprola::new()
            .with_io(Cursor::new(String::new()), out.clone())
            .with_entry("main")
            .run("function main() { return 5; }");
        assert_eq!(result, Ok(5));
    }

    #[test]
    fn test_lex_errors_are_all_reported() {
        let diags = Sprola::new().check("var a <- 1 @;\nvar b <- 2 #;").unwrap_err();
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.code == "SP1001"));
    }

    #[test]
    fn test_diagnostics_carry_file_and_snippet() {
        let diags = Sprola::new()
            .with_file_name("prog.spr")
            .check("var a <- 1;\nb <- 2;")
            .unwrap_err();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].file, "prog.spr");
        assert_eq!(diags[0].snippet, "b <- 2;");
    }

    #[test]
    fn test_runtime_error_diagnostic() {
        let (result, _) = run("function entry() {\n  return 1 / 0;\n}");
        let diags = result.unwrap_err();
        assert_eq!(diags[0].code, "SP3004");
        assert_eq!(diags[0].line, 2);
        assert_eq!(diags[0].snippet, "  return 1 / 0;");
    }
}
