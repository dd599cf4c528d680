//! Shared test utilities
//!
//! Helpers for running SPROLA programs against in-memory input and output.

#![allow(dead_code)]

use sprola_runtime::{Diagnostic, Program, RuntimeResult, Sprola, Value};
use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// In-memory output sink that can be read after the runtime consumed it
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("program output is UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Outcome of a program run: result plus everything written to stdout
pub struct RunOutput {
    pub result: RuntimeResult<Value>,
    pub stdout: String,
}

/// Run `source` with `stdin` as its input stream
pub fn run_with_input(source: &str, stdin: &str) -> RunOutput {
    run_with(Sprola::new(), source, stdin)
}

/// Run `source` with empty input
pub fn run(source: &str) -> RunOutput {
    run_with_input(source, "")
}

/// Run `source` on a preconfigured runtime
pub fn run_with(runtime: Sprola, source: &str, stdin: &str) -> RunOutput {
    let out = SharedBuffer::default();
    let result = runtime
        .with_io(Cursor::new(stdin.to_string()), out.clone())
        .run(source);
    RunOutput {
        result,
        stdout: out.contents(),
    }
}

/// Run `source` with default settings on a fresh thread with `stack_size` bytes of stack
///
/// Only the result crosses back; the runtime and its buffers stay on the thread.
pub fn run_on_stack(stack_size: usize, source: &str) -> RuntimeResult<Value> {
    let source = source.to_string();
    std::thread::Builder::new()
        .stack_size(stack_size)
        .spawn(move || run(&source).result)
        .expect("spawn interpreter thread")
        .join()
        .expect("interpreter thread did not overflow its stack")
}

/// Wrap `body` in an entry function and return its value
///
/// # Example
/// ```ignore
/// assert_entry_returns("return 5 + 3;", 8);
/// ```
pub fn assert_entry_returns(body: &str, expected: Value) {
    let source = format!("function entry() {{\n{}\n}}", body);
    let output = run(&source);
    match output.result {
        Ok(value) => assert_eq!(value, expected, "source:\n{}", source),
        Err(diags) => panic!("Expected {}, got errors: {:?}", expected, diags),
    }
}

/// Value of `expr` evaluated inside an entry function
pub fn eval_expr(expr: &str) -> Result<Value, Vec<Diagnostic>> {
    run(&format!("function entry() {{ return {}; }}", expr)).result
}

/// Assert that running `source` fails with `expected_code` as the first diagnostic
pub fn assert_error_code(source: &str, expected_code: &str) {
    match run(source).result {
        Err(diags) => {
            assert!(!diags.is_empty(), "Expected error, got success");
            assert_eq!(
                diags[0].code, expected_code,
                "Expected error code {}, got {}: {}",
                expected_code, diags[0].code, diags[0].message
            );
        }
        Ok(value) => panic!(
            "Expected error {}, but program returned {}",
            expected_code, value
        ),
    }
}

/// Parse `source`, panicking with the diagnostics on failure
pub fn parse_ok(source: &str) -> Program {
    match Sprola::new().parse(source) {
        Ok(program) => program,
        Err(diags) => panic!("Expected successful parse, got {:?}", diags),
    }
}

/// First diagnostic from a failing parse
pub fn parse_err(source: &str) -> Diagnostic {
    match Sprola::new().parse(source) {
        Ok(program) => panic!("Expected parse error, got {:?}", program),
        Err(mut diags) => diags.remove(0),
    }
}
