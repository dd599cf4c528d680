//! Parsing (tokens to AST)
//!
//! Recursive descent with one token of lookahead. Scope legality is checked
//! while parsing against a `ScopeTable`, and the first violation aborts the
//! parse: there is no error recovery.

mod expr;
mod stmt;

use crate::ast::*;
use crate::diagnostic::error_codes;
use crate::diagnostic::Diagnostic;
use crate::symbol::ScopeTable;
use crate::token::{Token, TokenKind};

/// Deepest nesting of expressions, operator chains and blocks the parser accepts
pub const MAX_NESTING_DEPTH: usize = 256;

/// Result of a parse step; the error is the single fatal diagnostic
pub(super) type ParseResult<T> = Result<T, Diagnostic>;

/// Parser state for building AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    pub(super) scopes: ScopeTable,
    /// Set while parsing a function body
    pub(super) in_function: bool,
    /// Current nesting of expressions and blocks
    pub(super) depth: usize,
}

impl Parser {
    /// Create a new parser for the given tokens
    ///
    /// A missing trailing `Eof` is supplied so lookahead never runs off the end.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::new(TokenKind::Eof, "", line));
        }
        Self {
            tokens,
            current: 0,
            scopes: ScopeTable::new(),
            in_function: false,
            depth: 0,
        }
    }

    /// Parse tokens into an AST
    pub fn parse(&mut self) -> Result<Program, Diagnostic> {
        if let Some(bad) = self.tokens.iter().find(|t| t.kind == TokenKind::Error) {
            return Err(Diagnostic::parser(
                error_codes::UNEXPECTED_CHARACTER,
                format!("Unexpected character '{}'", bad.lexeme),
                bad.line,
            )
            .with_label(format!("at '{}'", bad.lexeme)));
        }

        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        log::debug!("parsed {} top-level statements", statements.len());
        Ok(Program { statements })
    }

    /// Run `f` inside a fresh scope frame, closing it on every exit path
    pub(super) fn with_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.scopes.enter_scope();
        let result = f(self);
        self.scopes.exit_scope();
        result
    }

    /// Run `f` one nesting level deeper, failing with SP2011 past `MAX_NESTING_DEPTH`
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.check_nesting(1)?;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Fail if `extra` more levels on top of the current depth would exceed the limit
    pub(super) fn check_nesting(&self, extra: usize) -> ParseResult<()> {
        if self.depth + extra > MAX_NESTING_DEPTH {
            return Err(self.error_at_current(
                error_codes::NESTING_TOO_DEEP,
                &format!("Nesting exceeds the limit of {} levels", MAX_NESTING_DEPTH),
            ));
        }
        Ok(())
    }

    // === Helper methods ===

    /// Advance to next token and return reference to previous
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[self.current - 1]
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Kind of the token after the current one
    pub(super) fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.current + 1)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume token of given kind or fail with a syntax error
    pub(super) fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(error_codes::SYNTAX_ERROR, message))
        }
    }

    /// Consume an identifier, naming what was expected on failure
    pub(super) fn consume_identifier(&mut self, context: &str) -> ParseResult<Token> {
        let current = self.peek();
        if current.kind == TokenKind::Identifier {
            return Ok(self.advance().clone());
        }

        let message = if TokenKind::is_keyword(&current.lexeme).is_some() {
            format!("Cannot use keyword '{}' as {}", current.lexeme, context)
        } else {
            format!("Expected {}", context)
        };
        Err(self.error_at_current(error_codes::SYNTAX_ERROR, &message))
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Build a diagnostic pointing at the current token
    pub(super) fn error_at_current(&self, code: &str, message: &str) -> Diagnostic {
        Self::error_at(self.peek(), code, message)
    }

    /// Build a diagnostic pointing at `token`
    pub(super) fn error_at(token: &Token, code: &str, message: &str) -> Diagnostic {
        let label = if token.kind == TokenKind::Eof {
            "at end of input".to_string()
        } else {
            format!("at '{}'", token.lexeme)
        };
        let diag = Diagnostic::parser(code, message, token.line).with_label(label);
        match error_codes::help_for(code) {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse_source(source: &str) -> Result<Program, Diagnostic> {
        let (tokens, _) = Lexer::new(source).tokenize();
        Parser::new(tokens).parse()
    }

    fn error_code(source: &str) -> String {
        parse_source(source).unwrap_err().code
    }

    #[test]
    fn test_empty_program() {
        let program = parse_source("").unwrap();
        assert!(program.statements.is_empty());
    }

    #[test]
    fn test_missing_eof_is_supplied() {
        let mut parser = Parser::new(vec![
            Token::new(TokenKind::Print, "print", 1),
            Token::new(TokenKind::Number, "1", 1),
            Token::new(TokenKind::Semicolon, ";", 1),
        ]);
        let program = parser.parse().unwrap();
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_error_token_is_rejected() {
        let err = parse_source("var x <- 1;\nprint x @ 2;").unwrap_err();
        assert_eq!(err.code, "SP1001");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_parse_var_decl() {
        let program = parse_source("var a <- 1, b <- a + 1;").unwrap();
        match &program.statements[0] {
            Stmt::VarDecl(decl) => {
                let names: Vec<_> = decl.declarators.iter().map(|d| d.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("expected var declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_decl() {
        let program = parse_source("function add(a, b) { return a + b; }").unwrap();
        match &program.statements[0] {
            Stmt::FunctionDecl(func) => {
                assert_eq!(func.name, "add");
                assert_eq!(func.params, vec!["a".to_string(), "b".to_string()]);
                assert_eq!(func.body.statements.len(), 1);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_source("var x <- 1\nprint x;").unwrap_err();
        assert_eq!(err.code, "SP2001");
        assert_eq!(err.line, 2);
        assert_eq!(err.label, "at 'print'");
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse_source("while (1) {\n print 1;\n").unwrap_err();
        assert_eq!(err.code, "SP2001");
        assert_eq!(err.label, "at end of input");
    }

    #[test]
    fn test_keyword_as_variable_name() {
        let err = parse_source("var while <- 1;").unwrap_err();
        assert_eq!(err.code, "SP2001");
        assert!(err.message.contains("keyword 'while'"));
    }

    #[test]
    fn test_static_errors_have_codes() {
        assert_eq!(error_code("var x <- 1; var x <- 2;"), "SP2002");
        assert_eq!(error_code("print y;"), "SP2003");
        assert_eq!(error_code("x <- 42;"), "SP2004");
        assert_eq!(error_code("5 <- 10;"), "SP2005");
        assert_eq!(error_code("function f() {} function f() {}"), "SP2006");
        assert_eq!(error_code("function abs(x) { return x; }"), "SP2007");
        assert_eq!(error_code("if (1) { function g() {} }"), "SP2008");
        assert_eq!(error_code("return 1;"), "SP2009");
        assert_eq!(error_code("print 9223372036854775808;"), "SP2010");
    }

    #[test]
    fn test_scope_depth_restored_after_parse() {
        let (tokens, _) = Lexer::new("function f(a) { if (a) { var b <- 1; } }").tokenize();
        let mut parser = Parser::new(tokens);
        parser.parse().unwrap();
        assert_eq!(parser.scopes.depth(), 1);
    }

    #[test]
    fn test_help_attached_from_registry() {
        let err = parse_source("x <- 1;").unwrap_err();
        assert!(err.help.is_some());
    }
}
