//! HTML/XML lexer
//!
//! Tags may span lines (`TAG` state) and so may `<!-- -->` comments
//! (`MARKUP_COMMENT` state).

use crate::syntax::lexer::{LexResult, LexState, Lexer};
use crate::syntax::scan::Scanner;
use crate::syntax::tokens::TokenKind;

/// Inside `<!-- ... -->`
pub const MARKUP_COMMENT: LexState = LexState(4);

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupLexer;

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

impl MarkupLexer {
    /// Lex attributes up to the closing `>`. Returns `TAG` if the line ends
    /// inside the tag.
    fn tag_body(s: &mut Scanner<'_>) -> LexState {
        while let Some(c) = s.peek() {
            let start = s.col();
            if c.is_whitespace() {
                s.bump();
            } else if s.eat("/>") || s.eat("?>") || s.eat(">") {
                s.push(start, TokenKind::Tag);
                return LexState::DEFAULT;
            } else if c == '"' || c == '\'' {
                s.bump();
                s.eat_through(if c == '"' { "\"" } else { "'" });
                s.push(start, TokenKind::String);
            } else if c == '=' {
                s.bump();
                s.push(start, TokenKind::Operator);
            } else if is_name_char(c) {
                s.eat_while(is_name_char);
                s.push(start, TokenKind::Attribute);
            } else {
                s.bump();
            }
        }
        LexState::TAG
    }
}

impl Lexer for MarkupLexer {
    fn lex_line(&self, line: &str, entry: LexState) -> anyhow::Result<LexResult> {
        let mut s = Scanner::new(line);

        let mut state = match entry {
            MARKUP_COMMENT => {
                let closed = s.eat_through("-->");
                s.push(0, TokenKind::Comment);
                if closed {
                    LexState::DEFAULT
                } else {
                    MARKUP_COMMENT
                }
            }
            LexState::TAG => Self::tag_body(&mut s),
            _ => LexState::DEFAULT,
        };

        while state == LexState::DEFAULT {
            let Some(c) = s.peek() else { break };
            let start = s.col();

            if s.eat("<!--") {
                if !s.eat_through("-->") {
                    state = MARKUP_COMMENT;
                }
                s.push(start, TokenKind::Comment);
            } else if c == '<'
                && s
                    .peek_nth(1)
                    .is_some_and(|n| n.is_alphabetic() || matches!(n, '/' | '!' | '?'))
            {
                s.bump();
                if matches!(s.peek(), Some('/' | '!' | '?')) {
                    s.bump();
                }
                s.eat_while(is_name_char);
                s.push(start, TokenKind::Tag);
                state = Self::tag_body(&mut s);
            } else if c == '&' {
                s.bump();
                s.eat_while(|c| c.is_alphanumeric() || c == '#');
                if s.eat(";") {
                    s.push(start, TokenKind::Escape);
                }
            } else {
                s.bump();
            }
        }

        Ok(LexResult::new(s.finish(), state))
    }
}
