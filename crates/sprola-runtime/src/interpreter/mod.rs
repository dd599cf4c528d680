//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation over an `Environment` of integer variables.
//! Supports:
//! - Expression evaluation with checked 64-bit arithmetic
//! - Statement execution (declarations, assignments, loops, conditionals)
//! - User function calls with a bounded call depth
//! - Block scoping with shadowing

mod expr;
mod stmt;

use crate::ast::{FunctionDecl, Program, Stmt};
use crate::environment::{EnvError, Environment};
use crate::stdlib::ProgramIo;
use crate::value::{RuntimeError, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Default limit on nested user function calls
///
/// Sized so an unoptimized build hits the limit before exhausting an 8 MiB
/// thread stack. Callers running on a larger stack can raise it with
/// `with_max_call_depth`.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

/// Outcome of executing a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ControlFlow {
    /// Fall through to the next statement
    Continue,
    /// Unwind to the innermost call with this value
    Return(Value),
}

/// Execution counters, reported through `log` after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecStats {
    pub statements: u64,
    pub calls: u64,
    pub max_call_depth: usize,
}

/// Interpreter state
pub struct Interpreter {
    pub(super) env: Environment,
    /// User functions by name; never removed once registered
    pub(super) functions: HashMap<String, Rc<FunctionDecl>>,
    pub(super) io: ProgramIo,
    pub(super) max_call_depth: usize,
    pub(super) stats: ExecStats,
}

impl Interpreter {
    /// Create an interpreter writing to and reading from `io`
    pub fn new(io: ProgramIo) -> Self {
        Self {
            env: Environment::new(),
            functions: HashMap::new(),
            io,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            stats: ExecStats::default(),
        }
    }

    /// Limit how many user function calls may be active at once
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Register a user function, replacing nothing if it already exists
    ///
    /// The declaration is shared with the AST, not copied.
    pub fn register_function(&mut self, func: &Rc<FunctionDecl>) {
        if !self.functions.contains_key(&func.name) {
            log::trace!("register function '{}'/{}", func.name, func.params.len());
            self.functions.insert(func.name.clone(), Rc::clone(func));
        }
    }

    /// Register every top-level function of `program`
    pub fn register_functions(&mut self, program: &Program) {
        for func in program.functions() {
            self.register_function(func);
        }
    }

    /// Execute top-level statements in order
    ///
    /// A top-level `return` (only possible in hand-built ASTs) stops execution.
    pub fn execute(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in statements {
            if let ControlFlow::Return(_) = self.exec_stmt(stmt)? {
                break;
            }
        }
        Ok(())
    }

    /// Call a user function by name with already-evaluated arguments
    pub fn call_function(
        &mut self,
        name: &str,
        args: Vec<Value>,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        let func = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
                line,
            })?;
        self.call_user_function(&func, args, line)
    }

    /// Value of a variable visible from the current scope
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.env.lookup(name).ok()
    }

    /// Write a line of text to the program output and flush it
    ///
    /// `line` is reported if the write fails.
    pub fn write_line(&mut self, text: &str, line: usize) -> Result<(), RuntimeError> {
        self.io.write_line(text, line)?;
        self.io.flush(line)
    }

    pub fn stats(&self) -> ExecStats {
        self.stats
    }

    /// Run `f` inside a fresh scope frame, popping it on every exit path
    pub(super) fn with_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        self.env.enter_scope();
        let result = f(self);
        self.env.exit_scope();
        result
    }

    /// Run `f` as a function activation, restoring the caller's frames afterwards
    pub(super) fn with_call<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        self.env.enter_call();
        let result = f(self);
        self.env.exit_call();
        result
    }
}

/// Attach a source line to an environment failure
pub(super) fn env_error(err: EnvError, line: usize) -> RuntimeError {
    match err {
        EnvError::AlreadyDeclared(name) => RuntimeError::Redeclared { name, line },
        EnvError::Undefined(name) => RuntimeError::UndefinedVariable { name, line },
    }
}
