//! Plan tokenizer.
//!
//! Produces tokens on demand with a single token of lookahead. The lexer
//! itself never fails: characters outside the plan alphabet come out as
//! [`TokenKind::Invalid`] tokens and the parser reports them.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::SyntaxError;

/// Single-character operators and punctuation.
const SYMBOLS: &[char] = &['+', '-', '*', '/', '%', '^', '=', '(', ')', '{', '}'];

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of letters, digits and underscores starting with a non-digit.
    Word,
    /// A run of letters, digits and underscores starting with a digit.
    Number,
    /// One of `+ - * / % ^ = ( ) { }`.
    Symbol,
    /// A character that belongs to no token class.
    Invalid,
}

/// A lexeme with the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token class.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

impl Token {
    /// Whether this token's text is exactly `text`.
    #[must_use]
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

/// Lazy, forward-only tokenizer over plan text.
#[derive(Debug)]
pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    lookahead: Option<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned before the first token of `src`.
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        let mut lexer = Self {
            src,
            chars: src.char_indices().peekable(),
            line: 1,
            lookahead: None,
        };
        lexer.lookahead = lexer.scan_token();
        lexer
    }

    /// Whether any token remains.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    /// The next token, without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&Token> {
        self.lookahead.as_ref()
    }

    /// Whether the next token is exactly `expected`.
    #[must_use]
    pub fn peek_is(&self, expected: &str) -> bool {
        self.lookahead.as_ref().is_some_and(|t| t.is(expected))
    }

    /// Consume and return the next token.
    pub fn consume(&mut self) -> Option<Token> {
        let next = self.scan_token();
        std::mem::replace(&mut self.lookahead, next)
    }

    /// Consume the next token, which must be exactly `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnexpectedToken`] on a mismatch (nothing is
    /// consumed) and [`SyntaxError::UnexpectedEnd`] at end of input.
    pub fn consume_expected(&mut self, expected: &str) -> Result<Token, SyntaxError> {
        if self.peek_is(expected) {
            let line = self.line;
            return self.consume().ok_or(SyntaxError::UnexpectedEnd { line });
        }
        match self.peek() {
            Some(token) => Err(SyntaxError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.text.clone(),
                line: token.line,
            }),
            None => Err(SyntaxError::UnexpectedEnd { line: self.line }),
        }
    }

    /// Line of the next token, or of the end of input once exhausted.
    #[must_use]
    pub fn line(&self) -> usize {
        self.lookahead.as_ref().map_or(self.line, |t| t.line)
    }

    /// Scan one token from the underlying characters.
    fn scan_token(&mut self) -> Option<Token> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '\n' {
                self.line += 1;
            }
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }

        let (start, c) = self.chars.next()?;
        let line = self.line;

        if SYMBOLS.contains(&c) {
            return Some(Token {
                kind: TokenKind::Symbol,
                text: c.to_string(),
                line,
            });
        }

        if !is_word_char(c) {
            return Some(Token {
                kind: TokenKind::Invalid,
                text: c.to_string(),
                line,
            });
        }

        let mut end = start + c.len_utf8();
        while let Some(&(idx, next)) = self.chars.peek() {
            if !is_word_char(next) {
                break;
            }
            end = idx + next.len_utf8();
            self.chars.next();
        }

        let kind = if c.is_ascii_digit() {
            TokenKind::Number
        } else {
            TokenKind::Word
        };
        Some(Token {
            kind,
            text: self.src[start..end].to_string(),
            line,
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.consume()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
