//! Builtin functions and program I/O
//!
//! The builtin set is closed: `abs`, `max`, `min`, `print` and `input`.
//! Builtins are resolved before user functions at every call site.

use crate::value::{RuntimeError, Value};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Builtin names with their fixed arity
pub const BUILTINS: &[(&str, usize)] = &[
    ("abs", 1),
    ("max", 2),
    ("min", 2),
    ("print", 1),
    ("input", 0),
];

/// Check if a function name is a builtin
pub fn is_builtin(name: &str) -> bool {
    builtin_arity(name).is_some()
}

/// Arity of a builtin, if `name` is one
pub fn builtin_arity(name: &str) -> Option<usize> {
    BUILTINS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, arity)| *arity)
}

/// Call a builtin function
///
/// `line` is the line of the call expression, used for error reporting.
pub fn call_builtin(
    name: &str,
    args: &[Value],
    line: usize,
    io: &mut ProgramIo,
) -> Result<Value, RuntimeError> {
    let expected = builtin_arity(name).ok_or_else(|| RuntimeError::UndefinedFunction {
        name: name.to_string(),
        line,
    })?;
    if args.len() != expected {
        return Err(RuntimeError::ArityMismatch {
            name: name.to_string(),
            expected,
            found: args.len(),
            line,
        });
    }

    match name {
        "abs" => args[0]
            .checked_abs()
            .ok_or(RuntimeError::Overflow { op: "abs", line }),
        "max" => Ok(args[0].max(args[1])),
        "min" => Ok(args[0].min(args[1])),
        "print" => {
            io.print_value(args[0], line)?;
            Ok(args[0])
        }
        "input" => io.read_int(line),
        _ => Err(RuntimeError::UndefinedFunction {
            name: name.to_string(),
            line,
        }),
    }
}

/// Whitespace-token reader over the program's input stream
pub struct InputReader {
    source: Box<dyn BufRead>,
    pending: VecDeque<String>,
}

impl InputReader {
    pub fn new(source: impl BufRead + 'static) -> Self {
        Self {
            source: Box::new(source),
            pending: VecDeque::new(),
        }
    }

    /// Read the next whitespace-delimited integer
    ///
    /// Reads more lines only when the current one is used up, so interactive
    /// input is consumed one line at a time.
    pub fn read_int(&mut self, line: usize) -> Result<Value, RuntimeError> {
        while self.pending.is_empty() {
            let mut buf = String::new();
            let read = self
                .source
                .read_line(&mut buf)
                .map_err(|e| RuntimeError::InvalidInput {
                    msg: e.to_string(),
                    line,
                })?;
            if read == 0 {
                return Err(RuntimeError::InvalidInput {
                    msg: "unexpected end of input".to_string(),
                    line,
                });
            }
            self.pending
                .extend(buf.split_whitespace().map(str::to_string));
        }

        let token = self.pending.pop_front().unwrap_or_default();
        token
            .parse::<Value>()
            .map_err(|_| RuntimeError::InvalidInput {
                msg: format!("expected an integer, found '{}'", token),
                line,
            })
    }
}

/// Input and output streams of a running program
pub struct ProgramIo {
    input: InputReader,
    output: Box<dyn Write>,
}

impl ProgramIo {
    pub fn new(input: impl BufRead + 'static, output: impl Write + 'static) -> Self {
        Self {
            input: InputReader::new(input),
            output: Box::new(output),
        }
    }

    /// Process stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }

    /// Write `value` followed by a newline
    pub fn print_value(&mut self, value: Value, line: usize) -> Result<(), RuntimeError> {
        self.write_line(&value.to_string(), line)
    }

    /// Write a line of text to the program output
    pub fn write_line(&mut self, text: &str, line: usize) -> Result<(), RuntimeError> {
        writeln!(self.output, "{}", text).map_err(|e| output_error(e, line))
    }

    /// Flush pending output, then read one integer
    pub fn read_int(&mut self, line: usize) -> Result<Value, RuntimeError> {
        self.flush(line)?;
        self.input.read_int(line)
    }

    pub fn flush(&mut self, line: usize) -> Result<(), RuntimeError> {
        self.output.flush().map_err(|e| output_error(e, line))
    }
}

fn output_error(err: io::Error, line: usize) -> RuntimeError {
    RuntimeError::Output {
        msg: err.to_string(),
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn io_with_input(input: &str) -> (ProgramIo, Sink) {
        let sink = Sink::default();
        let io = ProgramIo::new(Cursor::new(input.to_string()), sink.clone());
        (io, sink)
    }

    fn call(name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let (mut io, _) = io_with_input("");
        call_builtin(name, args, 1, &mut io)
    }

    #[test]
    fn test_is_builtin() {
        for name in ["abs", "max", "min", "print", "input"] {
            assert!(is_builtin(name), "{}", name);
        }
        assert!(!is_builtin("entry"));
        assert!(!is_builtin("Abs"));
    }

    #[test]
    fn test_math_builtins() {
        assert_eq!(call("abs", &[-7]), Ok(7));
        assert_eq!(call("abs", &[0]), Ok(0));
        assert_eq!(call("max", &[4, 9]), Ok(9));
        assert_eq!(call("max", &[12, 3]), Ok(12));
        assert_eq!(call("min", &[4, 9]), Ok(4));
    }

    #[test]
    fn test_abs_of_min_overflows() {
        assert_eq!(
            call("abs", &[i64::MIN]),
            Err(RuntimeError::Overflow { op: "abs", line: 1 })
        );
    }

    #[test]
    fn test_arity_mismatch() {
        assert_eq!(
            call("abs", &[1, 2]),
            Err(RuntimeError::ArityMismatch {
                name: "abs".to_string(),
                expected: 1,
                found: 2,
                line: 1,
            })
        );
        assert!(call("input", &[1]).is_err());
    }

    #[test]
    fn test_print_returns_argument() {
        let (mut io, sink) = io_with_input("");
        assert_eq!(call_builtin("print", &[-3], 1, &mut io), Ok(-3));
        assert_eq!(String::from_utf8(sink.0.borrow().clone()).unwrap(), "-3\n");
    }

    #[test]
    fn test_input_reads_whitespace_tokens() {
        let (mut io, _) = io_with_input("  10 -20\n\n30\n");
        assert_eq!(io.read_int(1), Ok(10));
        assert_eq!(io.read_int(1), Ok(-20));
        assert_eq!(io.read_int(1), Ok(30));
        assert!(matches!(
            io.read_int(4),
            Err(RuntimeError::InvalidInput { line: 4, .. })
        ));
    }

    #[test]
    fn test_input_rejects_non_integer() {
        let (mut io, _) = io_with_input("seven\n");
        match io.read_int(2) {
            Err(RuntimeError::InvalidInput { msg, line }) => {
                assert_eq!(line, 2);
                assert!(msg.contains("'seven'"));
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }
}
