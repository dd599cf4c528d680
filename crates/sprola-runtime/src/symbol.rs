//! Compile-time scope table used by the parser
//!
//! Tracks which variable names are declared in each open block and which
//! functions exist. Only names are recorded; values live in the runtime
//! `Environment`.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Name binding failures reported to the parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("Variable '{0}' is already declared in this scope")]
    AlreadyDeclared(String),
    #[error("Function '{0}' is already declared")]
    FunctionAlreadyDeclared(String),
}

/// Stack of declared-name sets plus a flat function-arity table
#[derive(Debug, Clone)]
pub struct ScopeTable {
    /// Innermost frame is last; index 0 is the global frame
    scopes: Vec<HashSet<String>>,
    functions: HashMap<String, usize>,
}

impl ScopeTable {
    /// Create a table with only the global frame open
    pub fn new() -> Self {
        Self {
            scopes: vec![HashSet::new()],
            functions: HashMap::new(),
        }
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashSet::new());
    }

    /// Exit the current scope
    ///
    /// # Panics
    ///
    /// Panics when asked to pop the global frame.
    pub fn exit_scope(&mut self) {
        assert!(
            self.scopes.len() > 1,
            "scope table underflow: attempted to exit the global scope"
        );
        self.scopes.pop();
    }

    /// Declare a variable in the current frame
    pub fn define_variable(&mut self, name: &str) -> Result<(), ScopeError> {
        let scope = self
            .scopes
            .last_mut()
            .expect("scope table always holds the global frame");
        if !scope.insert(name.to_string()) {
            return Err(ScopeError::AlreadyDeclared(name.to_string()));
        }
        Ok(())
    }

    /// Whether `name` is declared in any open frame
    pub fn is_defined(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }

    /// Whether `name` is declared in the innermost frame
    pub fn is_defined_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|scope| scope.contains(name))
    }

    /// Register a top-level function with its parameter count
    pub fn define_function(&mut self, name: &str, arity: usize) -> Result<(), ScopeError> {
        if self.functions.contains_key(name) {
            return Err(ScopeError::FunctionAlreadyDeclared(name.to_string()));
        }
        self.functions.insert(name.to_string(), arity);
        Ok(())
    }

    /// Whether a function named `name` has been declared so far
    ///
    /// The parser does not consult this at call sites: a call may precede
    /// the declaration it targets, so unknown functions are reported when the
    /// call runs (SP3002).
    pub fn is_function_defined(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Declared parameter count of `name`
    ///
    /// Argument counts are likewise checked at call time (SP3003), so a
    /// mismatched call on a path that never runs is not an error.
    pub fn function_arity(&self, name: &str) -> Option<usize> {
        self.functions.get(name).copied()
    }

    /// Number of open frames (1 = global only)
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Whether only the global frame is open
    pub fn is_global_scope(&self) -> bool {
        self.scopes.len() == 1
    }
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_global() {
        let table = ScopeTable::new();
        assert_eq!(table.depth(), 1);
        assert!(table.is_global_scope());
    }

    #[test]
    fn test_define_and_lookup() {
        let mut table = ScopeTable::new();
        table.define_variable("x").unwrap();
        assert!(table.is_defined("x"));
        assert!(!table.is_defined("y"));
    }

    #[test]
    fn test_redeclare_same_frame_fails() {
        let mut table = ScopeTable::new();
        table.define_variable("x").unwrap();
        assert_eq!(
            table.define_variable("x"),
            Err(ScopeError::AlreadyDeclared("x".to_string()))
        );
    }

    #[test]
    fn test_shadowing_across_frames() {
        let mut table = ScopeTable::new();
        table.define_variable("x").unwrap();
        table.enter_scope();
        assert!(!table.is_defined_in_current_scope("x"));
        assert!(table.define_variable("x").is_ok());
        assert!(table.is_defined_in_current_scope("x"));
        assert_eq!(table.depth(), 2);
        table.exit_scope();
        assert!(table.is_defined("x"));
    }

    #[test]
    fn test_inner_names_vanish_on_exit() {
        let mut table = ScopeTable::new();
        table.enter_scope();
        table.define_variable("tmp").unwrap();
        table.exit_scope();
        assert!(!table.is_defined("tmp"));
    }

    #[test]
    fn test_functions_are_global() {
        let mut table = ScopeTable::new();
        table.enter_scope();
        table.define_function("inc", 1).unwrap();
        table.exit_scope();
        assert!(table.is_function_defined("inc"));
        assert_eq!(table.function_arity("inc"), Some(1));
        assert_eq!(table.function_arity("dec"), None);
        assert_eq!(
            table.define_function("inc", 2),
            Err(ScopeError::FunctionAlreadyDeclared("inc".to_string()))
        );
    }

    #[test]
    fn test_variables_and_functions_are_separate_namespaces() {
        let mut table = ScopeTable::new();
        table.define_function("f", 0).unwrap();
        assert!(table.define_variable("f").is_ok());
    }

    #[test]
    #[should_panic(expected = "scope table underflow")]
    fn test_exit_global_scope_panics() {
        let mut table = ScopeTable::new();
        table.exit_scope();
    }
}
