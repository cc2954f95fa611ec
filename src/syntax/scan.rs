//! Shared scanning primitives for the built-in lexers.
//!
//! `Scanner` walks a single line, tracking both the byte position (for
//! slicing) and the char column (for tokens).

use super::tokens::{Token, TokenKind};

pub struct Scanner<'a> {
    line: &'a str,
    pos: usize,
    col: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            col: 0,
            tokens: Vec::new(),
        }
    }

    /// Current char column
    pub fn col(&self) -> usize {
        self.col
    }

    /// Current byte position
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.line.len()
    }

    pub fn remaining(&self) -> &'a str {
        &self.line[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Peek `n` chars ahead (0 = current)
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.col += 1;
        Some(c)
    }

    /// Consume `s` if the remaining text starts with it
    pub fn eat(&mut self, s: &str) -> bool {
        if !self.starts_with(s) {
            return false;
        }
        self.pos += s.len();
        self.col += s.chars().count();
        true
    }

    /// Consume chars while `pred` holds and return the consumed slice
    pub fn eat_while<F>(&mut self, pred: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.line[start..self.pos]
    }

    /// Consume the rest of the line
    pub fn eat_rest(&mut self) {
        self.eat_while(|_| true);
    }

    /// Consume up to and including `delim`. Returns false if the line ended first.
    pub fn eat_through(&mut self, delim: &str) -> bool {
        match self.remaining().find(delim) {
            Some(idx) => {
                let consumed = &self.remaining()[..idx + delim.len()];
                self.col += consumed.chars().count();
                self.pos += consumed.len();
                true
            }
            None => {
                self.eat_rest();
                false
            }
        }
    }

    /// Consume a quoted body up to and including `quote`, honouring backslash
    /// escapes. The opening quote must already be consumed. Returns false if
    /// the line ended first.
    pub fn eat_quoted(&mut self, quote: char) -> bool {
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return true;
            }
        }
        false
    }

    /// Consume a number literal: digits, `_`, `.`, hex/binary prefixes,
    /// exponents and alphabetic suffixes (`1e10`, `0xff`, `2.5f32`)
    pub fn eat_number(&mut self) {
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E');
            let fraction = c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit());
            if c.is_ascii_alphanumeric() || c == '_' || fraction || exponent_sign {
                prev = c;
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Record a token from `start_col` to the current column (skipped if empty)
    pub fn push(&mut self, start_col: usize, kind: TokenKind) {
        if self.col > start_col {
            self.tokens.push(Token::new(start_col, self.col - start_col, kind));
        }
    }

    pub fn finish(self) -> Vec<Token> {
        self.tokens
    }
}

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_operator(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' | '~' | '?' | ':'
    )
}

pub fn is_punctuation(c: char) -> bool {
    matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | '.')
}
