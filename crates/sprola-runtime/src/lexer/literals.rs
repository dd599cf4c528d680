//! Number and identifier scanning for the lexer

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl Lexer {
    /// Scan an unsigned integer literal (maximal run of ASCII digits)
    ///
    /// Range checking happens in the parser, so any digit run lexes.
    pub(super) fn number(&mut self) -> Token {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        let lexeme = self.current_lexeme();
        self.make_token(TokenKind::Number, &lexeme)
    }

    /// Scan an identifier or keyword: `[A-Za-z][A-Za-z0-9_]*`
    pub(super) fn identifier(&mut self) -> Token {
        while !self.is_at_end() {
            let c = self.peek();
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme = self.current_lexeme();
        let kind = TokenKind::is_keyword(&lexeme).unwrap_or(TokenKind::Identifier);

        self.make_token(kind, &lexeme)
    }
}
