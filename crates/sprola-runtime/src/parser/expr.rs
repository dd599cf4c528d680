//! Expression parsing
//!
//! One function per precedence level, lowest first:
//! equality, comparison, term, factor, unary, primary.
//! All binary levels are left-associative.

use crate::ast::*;
use crate::diagnostic::error_codes;
use crate::parser::{ParseResult, Parser};
use crate::token::TokenKind;

impl Parser {
    /// Parse an expression
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.nested(|this| this.parse_equality())
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_comparison()?;
        let mut chain = 0;
        while let Some(op) = self.match_binary_op(&[TokenKind::Equal, TokenKind::NotEqual]) {
            chain += 1;
            self.check_nesting(chain)?;
            let line = self.tokens[self.current - 1].line;
            let right = self.parse_comparison()?;
            expr = binary(op, expr, right, line);
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_term()?;
        let mut chain = 0;
        while let Some(op) = self.match_binary_op(&[
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ]) {
            chain += 1;
            self.check_nesting(chain)?;
            let line = self.tokens[self.current - 1].line;
            let right = self.parse_term()?;
            expr = binary(op, expr, right, line);
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_factor()?;
        let mut chain = 0;
        while let Some(op) = self.match_binary_op(&[TokenKind::Plus, TokenKind::Minus]) {
            chain += 1;
            self.check_nesting(chain)?;
            let line = self.tokens[self.current - 1].line;
            let right = self.parse_factor()?;
            expr = binary(op, expr, right, line);
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_unary()?;
        let mut chain = 0;
        while let Some(op) =
            self.match_binary_op(&[TokenKind::Star, TokenKind::Slash, TokenKind::Percent])
        {
            chain += 1;
            self.check_nesting(chain)?;
            let line = self.tokens[self.current - 1].line;
            let right = self.parse_unary()?;
            expr = binary(op, expr, right, line);
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if self.check(TokenKind::Minus) {
            let line = self.advance().line;
            let operand = self.nested(|this| this.parse_unary())?;
            return Ok(Expr::Unary(UnaryExpr {
                op: UnaryOp::Negate,
                expr: Box::new(operand),
                line,
            }));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                match token.lexeme.parse::<i64>() {
                    Ok(value) => Ok(Expr::Literal(Literal {
                        value,
                        line: token.line,
                    })),
                    Err(_) => Err(Self::error_at(
                        &token,
                        error_codes::LITERAL_OUT_OF_RANGE,
                        &format!("Integer literal {} is out of range", token.lexeme),
                    )),
                }
            }
            TokenKind::Input => {
                self.advance();
                if self.match_token(TokenKind::LeftParen) {
                    self.consume(TokenKind::RightParen, "Expected ')' after 'input('")?;
                }
                Ok(Expr::Input(token.line))
            }
            TokenKind::Print => {
                self.advance();
                if !self.check(TokenKind::LeftParen) {
                    return Err(self.error_at_current(
                        error_codes::SYNTAX_ERROR,
                        "Expected '(' after 'print' in an expression",
                    ));
                }
                self.finish_call("print".to_string(), token.line)
            }
            TokenKind::Identifier => {
                self.advance();
                if self.check(TokenKind::LeftParen) {
                    return self.finish_call(token.lexeme, token.line);
                }
                if !self.scopes.is_defined(&token.lexeme) {
                    return Err(Self::error_at(
                        &token,
                        error_codes::UNDECLARED_VARIABLE,
                        &format!("Undeclared variable '{}'", token.lexeme),
                    ));
                }
                Ok(Expr::Variable(Identifier {
                    name: token.lexeme,
                    line: token.line,
                }))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "Expected ')' after expression")?;
                Ok(Expr::Group(GroupExpr {
                    expr: Box::new(inner),
                    line: token.line,
                }))
            }
            _ => Err(self.error_at_current(error_codes::SYNTAX_ERROR, "Expected expression")),
        }
    }

    /// Parse `( args )` after a callee name
    fn finish_call(&mut self, callee: String, line: usize) -> ParseResult<Expr> {
        self.consume(TokenKind::LeftParen, "Expected '(' after function name")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after arguments")?;
        Ok(Expr::Call(CallExpr { callee, args, line }))
    }

    /// Consume the current token if it is one of `kinds` and map it to an operator
    fn match_binary_op(&mut self, kinds: &[TokenKind]) -> Option<BinaryOp> {
        let kind = self.peek().kind;
        if !kinds.contains(&kind) {
            return None;
        }
        let op = match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Equal => BinaryOp::Eq,
            TokenKind::NotEqual => BinaryOp::Ne,
            TokenKind::Less => BinaryOp::Lt,
            TokenKind::LessEqual => BinaryOp::Le,
            TokenKind::Greater => BinaryOp::Gt,
            TokenKind::GreaterEqual => BinaryOp::Ge,
            _ => return None,
        };
        self.advance();
        Some(op)
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr, line: usize) -> Expr {
    Expr::Binary(BinaryExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        line,
    })
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    /// Parse `print <expr>;` and return the expression
    fn parse_expr(source: &str) -> Expr {
        let (tokens, _) = Lexer::new(format!("var x <- 1;\nprint {};", source)).tokenize();
        let mut program = Parser::new(tokens).parse().unwrap();
        match program.statements.remove(1) {
            Stmt::Print(p) => p.expr,
            other => panic!("expected print, got {:?}", other),
        }
    }

    /// Render an expression fully parenthesized
    fn show(expr: &Expr) -> String {
        match expr {
            Expr::Literal(lit) => lit.value.to_string(),
            Expr::Variable(id) => id.name.clone(),
            Expr::Binary(b) => format!("({} {} {})", show(&b.left), b.op.as_str(), show(&b.right)),
            Expr::Unary(u) => format!("({}{})", u.op.as_str(), show(&u.expr)),
            Expr::Group(g) => show(&g.expr),
            Expr::Call(c) => {
                let args: Vec<_> = c.args.iter().map(show).collect();
                format!("{}({})", c.callee, args.join(", "))
            }
            Expr::Input(_) => "input".to_string(),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(show(&parse_expr("1 + 2 * 3")), "(1 + (2 * 3))");
        assert_eq!(show(&parse_expr("1 - 2 - 3")), "((1 - 2) - 3)");
        assert_eq!(show(&parse_expr("1 < 2 = 3 >= x")), "((1 < 2) = (3 >= x))");
        assert_eq!(show(&parse_expr("-x % 4")), "((-x) % 4)");
        assert_eq!(show(&parse_expr("(1 + 2) * 3")), "((1 + 2) * 3)");
        assert_eq!(show(&parse_expr("--x")), "(-(-x))");
    }

    #[test]
    fn test_input_forms() {
        assert!(matches!(parse_expr("input"), Expr::Input(2)));
        assert!(matches!(parse_expr("input()"), Expr::Input(2)));
        assert_eq!(show(&parse_expr("input + input()")), "(input + input)");
    }

    #[test]
    fn test_call_args() {
        assert_eq!(show(&parse_expr("max(x, min(2, 3))")), "max(x, min(2, 3))");
        assert_eq!(show(&parse_expr("f()")), "f()");
    }

    #[test]
    fn test_large_literal_in_range() {
        assert_eq!(
            show(&parse_expr("9223372036854775807")),
            "9223372036854775807"
        );
    }

    #[test]
    fn test_binary_line_is_operator_line() {
        match parse_expr("x\n/\n0") {
            Expr::Binary(b) => assert_eq!(b.line, 3),
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_print_in_expression_requires_parens() {
        let (tokens, _) = Lexer::new("var y <- print 3;").tokenize();
        let err = Parser::new(tokens).parse().unwrap_err();
        assert_eq!(err.code, "SP2001");
    }
}
