//! Lexical analysis (tokenization)
//!
//! The lexer converts SPROLA source code into a stream of tokens tagged with
//! the line they start on. Lexing never aborts: unexpected characters become
//! `Error` tokens plus a diagnostic, and scanning carries on.

use crate::diagnostic::error_codes;
use crate::diagnostic::Diagnostic;
use crate::token::{Token, TokenKind};

mod literals;

/// Lexer state for tokenizing source code
pub struct Lexer {
    /// Original source code
    pub(super) source: String,
    /// Characters of source code
    pub(super) chars: Vec<char>,
    /// Current position in chars
    pub(super) current: usize,
    /// Start position of current token
    pub(super) start_pos: usize,
    /// Current line number (1-indexed)
    pub(super) line: usize,
    /// Collected diagnostics
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let chars: Vec<char> = source.chars().collect();
        Self {
            source,
            chars,
            current: 0,
            start_pos: 0,
            line: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the source code, returning tokens and any diagnostics
    ///
    /// The token stream always ends with exactly one `Eof` token.
    pub fn tokenize(&mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        log::trace!(
            "lexed {} tokens ({} diagnostics)",
            tokens.len(),
            self.diagnostics.len()
        );
        (tokens, std::mem::take(&mut self.diagnostics))
    }

    /// Scan the next token
    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.start_pos = self.current;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof, "");
        }

        let c = self.advance();

        match c {
            '(' => self.make_token(TokenKind::LeftParen, "("),
            ')' => self.make_token(TokenKind::RightParen, ")"),
            '{' => self.make_token(TokenKind::LeftBrace, "{"),
            '}' => self.make_token(TokenKind::RightBrace, "}"),
            ';' => self.make_token(TokenKind::Semicolon, ";"),
            ',' => self.make_token(TokenKind::Comma, ","),
            '+' => self.make_token(TokenKind::Plus, "+"),
            '-' => self.make_token(TokenKind::Minus, "-"),
            '*' => self.make_token(TokenKind::Star, "*"),
            '/' => self.make_token(TokenKind::Slash, "/"),
            '%' => self.make_token(TokenKind::Percent, "%"),
            '=' => self.make_token(TokenKind::Equal, "="),
            '~' => self.make_token(TokenKind::NotEqual, "~"),

            '<' => {
                if self.match_char('-') {
                    self.make_token(TokenKind::Assign, "<-")
                } else if self.match_char('=') {
                    self.make_token(TokenKind::LessEqual, "<=")
                } else {
                    self.make_token(TokenKind::Less, "<")
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::GreaterEqual, ">=")
                } else {
                    self.make_token(TokenKind::Greater, ">")
                }
            }

            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() => self.identifier(),

            _ => self.error_token(c),
        }
    }

    /// Skip whitespace and `---` line comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.is_at_end() {
                return;
            }

            match self.peek() {
                ' ' | '\r' | '\t' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                }
                '-' if self.starts_comment() => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Three dashes open a comment; one or two are minus tokens
    fn starts_comment(&self) -> bool {
        self.chars[self.current..].starts_with(&['-', '-', '-'])
    }

    // === Character navigation ===

    /// Advance to next character and return it
    pub(super) fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    /// Peek at current character without advancing
    pub(super) fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    /// Consume the current character if it matches `expected`
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.chars[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    /// Check if we're at the end of the source
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    /// Text of the token scanned so far
    pub(super) fn current_lexeme(&self) -> String {
        self.chars[self.start_pos..self.current].iter().collect()
    }

    /// Create a token on the current line
    pub(super) fn make_token(&self, kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, self.line)
    }

    /// Record an unexpected-character diagnostic and return an `Error` token
    fn error_token(&mut self, c: char) -> Token {
        let snippet = self.get_line_snippet(self.line);
        self.diagnostics.push(
            Diagnostic::lexer(
                error_codes::UNEXPECTED_CHARACTER,
                format!("Unexpected character '{}'", c),
                self.line,
            )
            .with_snippet(snippet)
            .with_label(format!("at '{}'", c)),
        );

        self.make_token(TokenKind::Error, &c.to_string())
    }

    /// Get the source line for a given line number
    fn get_line_snippet(&self, line: usize) -> String {
        self.source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or("")
            .to_string()
    }
}
