//! Statement parsing

use crate::ast::*;
use crate::diagnostic::error_codes;
use crate::parser::{ParseResult, Parser};
use crate::stdlib;
use crate::token::TokenKind;
use std::rc::Rc;

impl Parser {
    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Function => self.parse_function_decl(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Run => self.parse_run_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::Identifier if self.peek_next_kind() == TokenKind::Assign => {
                self.parse_assign_stmt()
            }
            _ if self.peek_next_kind() == TokenKind::Assign => {
                Err(self.error_at_current(
                    error_codes::INVALID_ASSIGNMENT_TARGET,
                    "Left side of assignment must be a variable name",
                ))
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse `var name <- expr ("," name <- expr)* ;`
    ///
    /// Each name becomes visible right after its own initializer, so later
    /// declarators can refer to earlier ones.
    fn parse_var_decl(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().line;
        let mut declarators = Vec::new();

        loop {
            let name_token = self.consume_identifier("a variable name")?;
            if self.scopes.is_defined_in_current_scope(&name_token.lexeme) {
                return Err(Self::error_at(
                    &name_token,
                    error_codes::REDECLARED_VARIABLE,
                    &format!(
                        "Variable '{}' is already declared in this scope",
                        name_token.lexeme
                    ),
                ));
            }

            self.consume(TokenKind::Assign, "Expected '<-' after variable name")?;
            let init = self.parse_expression()?;

            if let Err(e) = self.scopes.define_variable(&name_token.lexeme) {
                return Err(Self::error_at(
                    &name_token,
                    error_codes::REDECLARED_VARIABLE,
                    &e.to_string(),
                ));
            }

            declarators.push(Declarator {
                name: name_token.lexeme,
                init,
                line: name_token.line,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.consume(TokenKind::Semicolon, "Expected ';' after variable declaration")?;
        Ok(Stmt::VarDecl(VarDecl { declarators, line }))
    }

    /// Parse `name <- expr ;`
    fn parse_assign_stmt(&mut self) -> ParseResult<Stmt> {
        let name_token = self.advance().clone();
        if !self.scopes.is_defined(&name_token.lexeme) {
            return Err(Self::error_at(
                &name_token,
                error_codes::ASSIGN_TO_UNDECLARED,
                &format!(
                    "Cannot assign to undeclared variable '{}'",
                    name_token.lexeme
                ),
            ));
        }

        self.consume(TokenKind::Assign, "Expected '<-' in assignment")?;
        let value = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after assignment")?;

        Ok(Stmt::Assign(Assign {
            name: name_token.lexeme,
            value,
            line: name_token.line,
        }))
    }

    /// Parse an expression statement, rejecting `expr <- ...`
    fn parse_expr_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.peek().line;
        let expr = self.parse_expression()?;

        if self.check(TokenKind::Assign) {
            return Err(self.error_at_current(
                error_codes::INVALID_ASSIGNMENT_TARGET,
                "Left side of assignment must be a variable name",
            ));
        }

        self.consume(TokenKind::Semicolon, "Expected ';' after expression")?;
        Ok(Stmt::Expr(ExprStmt { expr, line }))
    }

    /// Parse `print expr ;`
    fn parse_print_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().line;
        let expr = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after print statement")?;
        Ok(Stmt::Print(PrintStmt { expr, line }))
    }

    /// Parse a function declaration (top level only)
    fn parse_function_decl(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance().clone();
        if !self.scopes.is_global_scope() || self.in_function {
            return Err(Self::error_at(
                &keyword,
                error_codes::NESTED_FUNCTION,
                "Functions can only be declared at the top level",
            ));
        }

        let name_token = self.consume_identifier("a function name")?;
        let name = name_token.lexeme.clone();
        if stdlib::is_builtin(&name) {
            return Err(Self::error_at(
                &name_token,
                error_codes::BUILTIN_REDEFINITION,
                &format!("Cannot redefine builtin function '{}'", name),
            ));
        }

        self.consume(TokenKind::LeftParen, "Expected '(' after function name")?;
        let mut param_tokens = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                param_tokens.push(self.consume_identifier("a parameter name")?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after parameters")?;

        // Registered before the body so the function can call itself
        if let Err(e) = self.scopes.define_function(&name, param_tokens.len()) {
            return Err(Self::error_at(
                &name_token,
                error_codes::DUPLICATE_FUNCTION,
                &e.to_string(),
            ));
        }

        let body = self.with_scope(|this| {
            for param in &param_tokens {
                if let Err(e) = this.scopes.define_variable(&param.lexeme) {
                    return Err(Self::error_at(
                        param,
                        error_codes::REDECLARED_VARIABLE,
                        &e.to_string(),
                    ));
                }
            }

            this.in_function = true;
            let body = this.parse_block();
            this.in_function = false;
            body
        })?;

        log::trace!("parsed function '{}'/{}", name, param_tokens.len());

        Ok(Stmt::FunctionDecl(Rc::new(FunctionDecl {
            name,
            params: param_tokens.into_iter().map(|t| t.lexeme).collect(),
            body,
            line: keyword.line,
        })))
    }

    /// Parse `if (...) {...} (elif (...) {...})* (else {...})?`
    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().line;
        let cond = self.parse_condition("if")?;
        let then_block = self.parse_block()?;

        let mut elif_branches = Vec::new();
        while self.match_token(TokenKind::Elif) {
            let cond = self.parse_condition("elif")?;
            let block = self.parse_block()?;
            elif_branches.push(ElifBranch { cond, block });
        }

        let else_block = if self.match_token(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            elif_branches,
            else_block,
            line,
        }))
    }

    /// Parse `while (...) {...}`
    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().line;
        let cond = self.parse_condition("while")?;
        let body = self.parse_block()?;
        Ok(Stmt::While(WhileStmt { cond, body, line }))
    }

    /// Parse `run {...} while (...);`
    fn parse_run_stmt(&mut self) -> ParseResult<Stmt> {
        let line = self.advance().line;
        let body = self.parse_block()?;
        self.consume(TokenKind::While, "Expected 'while' after run block")?;
        let cond = self.parse_condition("while")?;
        self.consume(TokenKind::Semicolon, "Expected ';' after run-while condition")?;
        Ok(Stmt::Run(RunStmt { body, cond, line }))
    }

    /// Parse `return expr? ;`
    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.advance().clone();
        if !self.in_function {
            return Err(Self::error_at(
                &keyword,
                error_codes::RETURN_OUTSIDE_FUNCTION,
                "Cannot return from top-level code",
            ));
        }

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after return value")?;

        Ok(Stmt::Return(ReturnStmt {
            value,
            line: keyword.line,
        }))
    }

    /// Parse `( expr )` after a control keyword
    fn parse_condition(&mut self, keyword: &str) -> ParseResult<Expr> {
        self.consume(
            TokenKind::LeftParen,
            &format!("Expected '(' after '{}'", keyword),
        )?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after condition")?;
        Ok(cond)
    }

    /// Parse a block, opening one scope frame for its statements
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        let line = self.consume(TokenKind::LeftBrace, "Expected '{'")?.line;

        let statements = self.nested(|this| {
            this.with_scope(|this| {
                let mut statements = Vec::new();
                while !this.check(TokenKind::RightBrace) && !this.is_at_end() {
                    statements.push(this.parse_statement()?);
                }
                Ok(statements)
            })
        })?;

        self.consume(TokenKind::RightBrace, "Expected '}' after block")?;
        Ok(Block { statements, line })
    }
}
