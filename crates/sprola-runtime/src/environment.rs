//! Runtime variable storage
//!
//! A stack of name→integer frames. Frame 0 holds globals. While a function
//! runs, the caller's local frames are set aside so the callee only sees the
//! globals and its own frames.

use std::collections::HashMap;
use thiserror::Error;

/// Binding failures; the interpreter attaches the source line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("Variable '{0}' is already declared in this scope")]
    AlreadyDeclared(String),
    #[error("Undefined variable '{0}'")]
    Undefined(String),
}

type Frame = HashMap<String, i64>;

#[derive(Debug)]
pub struct Environment {
    /// Innermost frame is last
    frames: Vec<Frame>,
    /// Local frames of suspended callers, innermost call last
    suspended: Vec<Vec<Frame>>,
}

impl Environment {
    /// Create an environment with an empty global frame
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
            suspended: Vec::new(),
        }
    }

    /// Push an empty frame
    pub fn enter_scope(&mut self) {
        self.frames.push(Frame::new());
    }

    /// Pop the innermost frame
    ///
    /// # Panics
    ///
    /// Panics when asked to pop the global frame.
    pub fn exit_scope(&mut self) {
        assert!(
            self.frames.len() > 1,
            "environment underflow: attempted to exit the global scope"
        );
        self.frames.pop();
    }

    /// Start a function activation: park the caller's locals, push a parameter frame
    pub fn enter_call(&mut self) {
        let caller_locals = self.frames.split_off(1);
        self.suspended.push(caller_locals);
        self.frames.push(Frame::new());
    }

    /// End a function activation and restore the caller's locals
    ///
    /// # Panics
    ///
    /// Panics if no call is active.
    pub fn exit_call(&mut self) {
        let caller_locals = self
            .suspended
            .pop()
            .expect("environment underflow: exit_call without a matching enter_call");
        self.frames.truncate(1);
        self.frames.extend(caller_locals);
    }

    /// Bind `name` in the innermost frame
    pub fn declare(&mut self, name: &str, value: i64) -> Result<(), EnvError> {
        let frame = self.innermost_mut();
        if frame.contains_key(name) {
            return Err(EnvError::AlreadyDeclared(name.to_string()));
        }
        frame.insert(name.to_string(), value);
        Ok(())
    }

    /// Overwrite the nearest existing binding of `name`
    pub fn assign(&mut self, name: &str, value: i64) -> Result<(), EnvError> {
        for frame in self.frames.iter_mut().rev() {
            if let Some(slot) = frame.get_mut(name) {
                *slot = value;
                return Ok(());
            }
        }
        Err(EnvError::Undefined(name.to_string()))
    }

    /// Value of the nearest binding of `name`
    pub fn lookup(&self, name: &str) -> Result<i64, EnvError> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
            .ok_or_else(|| EnvError::Undefined(name.to_string()))
    }

    /// Number of visible frames (1 = global only)
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of active function calls
    pub fn call_depth(&self) -> usize {
        self.suspended.len()
    }

    fn innermost_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut env = Environment::new();
        env.declare("x", 5).unwrap();
        assert_eq!(env.lookup("x"), Ok(5));
        assert_eq!(env.lookup("y"), Err(EnvError::Undefined("y".to_string())));
    }

    #[test]
    fn test_redeclare_in_same_frame() {
        let mut env = Environment::new();
        env.declare("x", 1).unwrap();
        assert_eq!(
            env.declare("x", 2),
            Err(EnvError::AlreadyDeclared("x".to_string()))
        );
        assert_eq!(env.lookup("x"), Ok(1));
    }

    #[test]
    fn test_shadowing_and_restore() {
        let mut env = Environment::new();
        env.declare("x", 1).unwrap();
        env.enter_scope();
        env.declare("x", 2).unwrap();
        assert_eq!(env.lookup("x"), Ok(2));
        env.exit_scope();
        assert_eq!(env.lookup("x"), Ok(1));
    }

    #[test]
    fn test_assign_updates_nearest_binding() {
        let mut env = Environment::new();
        env.declare("x", 1).unwrap();
        env.enter_scope();
        env.assign("x", 10).unwrap();
        env.exit_scope();
        assert_eq!(env.lookup("x"), Ok(10));
    }

    #[test]
    fn test_assign_never_declares() {
        let mut env = Environment::new();
        assert_eq!(
            env.assign("ghost", 1),
            Err(EnvError::Undefined("ghost".to_string()))
        );
        assert!(env.lookup("ghost").is_err());
    }

    #[test]
    fn test_call_hides_caller_locals() {
        let mut env = Environment::new();
        env.declare("g", 1).unwrap();
        env.enter_scope();
        env.declare("local", 2).unwrap();

        env.enter_call();
        assert_eq!(env.call_depth(), 1);
        assert_eq!(env.depth(), 2);
        assert_eq!(env.lookup("g"), Ok(1));
        assert!(env.lookup("local").is_err());
        env.declare("local", 99).unwrap();
        env.exit_call();

        assert_eq!(env.call_depth(), 0);
        assert_eq!(env.depth(), 2);
        assert_eq!(env.lookup("local"), Ok(2));
    }

    #[test]
    fn test_call_exit_discards_callee_frames() {
        let mut env = Environment::new();
        env.enter_call();
        env.enter_scope();
        env.declare("tmp", 3).unwrap();
        env.exit_scope();
        env.exit_call();
        assert_eq!(env.depth(), 1);
        assert!(env.lookup("tmp").is_err());
    }

    #[test]
    #[should_panic(expected = "environment underflow")]
    fn test_exit_global_scope_panics() {
        let mut env = Environment::new();
        env.exit_scope();
    }

    #[test]
    #[should_panic(expected = "environment underflow")]
    fn test_exit_call_without_call_panics() {
        let mut env = Environment::new();
        env.exit_call();
    }
}
