//! Abstract Syntax Tree (AST) definitions
//!
//! Every node records the source line it starts on. Nodes are immutable once
//! built and live for the whole run, since function bodies are re-walked on
//! every call.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// AST schema version
///
/// This version number is included in JSON dumps to ensure compatibility.
/// Increment when making breaking changes to the AST structure.
pub const AST_VERSION: u32 = 1;

/// Top-level program: the statements of a source file in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    /// Top-level function declarations, in source order
    pub fn functions(&self) -> impl Iterator<Item = &Rc<FunctionDecl>> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Stmt::FunctionDecl(func) => Some(func),
            _ => None,
        })
    }
}

/// Versioned AST wrapper for JSON serialization
///
/// Used by `sprola --dump-ast` so tooling can detect schema changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedProgram {
    /// AST schema version
    pub ast_version: u32,
    /// The actual program AST
    #[serde(flatten)]
    pub program: Program,
}

impl VersionedProgram {
    /// Create a new versioned program wrapper
    pub fn new(program: Program) -> Self {
        Self {
            ast_version: AST_VERSION,
            program,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl From<Program> for VersionedProgram {
    fn from(program: Program) -> Self {
        Self::new(program)
    }
}

/// A `{ ... }` statement list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub line: usize,
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    VarDecl(VarDecl),
    Assign(Assign),
    Expr(ExprStmt),
    Print(PrintStmt),
    If(IfStmt),
    While(WhileStmt),
    Run(RunStmt),
    Return(ReturnStmt),
    /// Shared with the interpreter's function table once registered
    FunctionDecl(Rc<FunctionDecl>),
}

/// `var a <- 1, b <- a + 1;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub declarators: Vec<Declarator>,
    pub line: usize,
}

/// One `name <- init` entry of a `var` statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub name: String,
    pub init: Expr,
    pub line: usize,
}

/// `name <- value;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub name: String,
    pub value: Expr,
    pub line: usize,
}

/// Expression evaluated for its side effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub expr: Expr,
    pub line: usize,
}

/// `print expr;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintStmt {
    pub expr: Expr,
    pub line: usize,
}

/// `if (...) {...} elif (...) {...} else {...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    pub elif_branches: Vec<ElifBranch>,
    pub else_block: Option<Block>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElifBranch {
    pub cond: Expr,
    pub block: Block,
}

/// Pre-test loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
    pub line: usize,
}

/// Post-test loop: `run { ... } while (cond);`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStmt {
    pub body: Block,
    pub cond: Expr,
    pub line: usize,
}

/// `return;` or `return expr;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub line: usize,
}

/// `function name(a, b) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
    pub line: usize,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    Variable(Identifier),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Group(GroupExpr),
    Call(CallExpr),
    /// Read one integer from the input stream
    Input(usize),
}

/// Integer literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: i64,
    pub line: usize,
}

/// Variable reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub line: usize,
}

/// Binary expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub line: usize,
}

/// Unary expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub expr: Box<Expr>,
    pub line: usize,
}

/// Parenthesized expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupExpr {
    pub expr: Box<Expr>,
    pub line: usize,
}

/// Call of a builtin or user function by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub callee: String,
    pub args: Vec<Expr>,
    pub line: usize,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    /// Source spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "~",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
        }
    }
}

impl Expr {
    /// Get the source line of this expression
    pub fn line(&self) -> usize {
        match self {
            Expr::Literal(lit) => lit.line,
            Expr::Variable(id) => id.line,
            Expr::Binary(b) => b.line,
            Expr::Unary(u) => u.line,
            Expr::Group(g) => g.line,
            Expr::Call(c) => c.line,
            Expr::Input(line) => *line,
        }
    }
}

impl Stmt {
    /// Get the source line of this statement
    pub fn line(&self) -> usize {
        match self {
            Stmt::VarDecl(v) => v.line,
            Stmt::Assign(a) => a.line,
            Stmt::Expr(e) => e.line,
            Stmt::Print(p) => p.line,
            Stmt::If(i) => i.line,
            Stmt::While(w) => w.line,
            Stmt::Run(r) => r.line,
            Stmt::Return(r) => r.line,
            Stmt::FunctionDecl(f) => f.line,
        }
    }
}
