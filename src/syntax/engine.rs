//! Incremental relexing
//!
//! Given the previous `TokenMap`, the current text and the earliest line
//! that may have changed, produce a new map while calling the lexer only for
//! lines whose output could differ. Unchanged lines are shared with the
//! baseline by `Arc`, so consumers can detect them with `Arc::ptr_eq`.

use std::sync::Arc;

use super::lexer::Lexer;
use super::tokens::{LineTokens, TokenMap};
use crate::error::LexError;
use crate::util::text::split_lines;

/// Tokenize `text` from scratch
pub fn lex_all(text: &str, lexer: &dyn Lexer) -> Result<TokenMap, LexError> {
    relex(None, text, 0, lexer)
}

/// Recompute tokens for `text` starting at `dirty_line`.
///
/// Lines before `dirty_line` are taken from `baseline` as long as their text
/// still matches. From there on each line is either reused from the baseline
/// (same text and same entry state, at the same index or shifted by the
/// line-count delta) or lexed. Lexing stops being needed as soon as the
/// entry state re-converges with the baseline.
pub fn relex(
    baseline: Option<&TokenMap>,
    text: &str,
    dirty_line: usize,
    lexer: &dyn Lexer,
) -> Result<TokenMap, LexError> {
    let lines: Vec<&str> = split_lines(text).collect();
    let old: &[Arc<LineTokens>] = baseline.map(|b| b.lines.as_slice()).unwrap_or(&[]);
    let delta = lines.len() as isize - old.len() as isize;

    let start = lines
        .iter()
        .zip(old)
        .take(dirty_line)
        .take_while(|(line, prev)| prev.text == **line)
        .count();

    let mut out: Vec<Arc<LineTokens>> = Vec::with_capacity(lines.len());
    out.extend(old[..start].iter().cloned());

    let mut state = match out.last() {
        Some(prev) => prev.exit_state,
        None => lexer.initial_state(),
    };

    let mut lexed = 0usize;
    for (i, line) in lines.iter().enumerate().skip(start) {
        let same = old.get(i);
        let shifted = usize::try_from(i as isize - delta)
            .ok()
            .filter(|_| delta != 0)
            .and_then(|j| old.get(j));

        let reusable = [same, shifted]
            .into_iter()
            .flatten()
            .find(|prev| prev.entry_state == state && prev.text == *line);

        let line_tokens = match reusable {
            Some(prev) => Arc::clone(prev),
            None => {
                lexed += 1;
                let result = lexer
                    .lex_line(line, state)
                    .map_err(|source| LexError::new(i, source))?;
                Arc::new(LineTokens {
                    text: (*line).to_string(),
                    tokens: result.tokens,
                    entry_state: state,
                    exit_state: result.exit_state,
                })
            }
        };

        state = line_tokens.exit_state;
        out.push(line_tokens);
    }

    tracing::trace!(
        "relex: {} lines, start {}, lexed {}, reused {}",
        lines.len(),
        start,
        lexed,
        lines.len() - lexed
    );

    Ok(TokenMap::new(out))
}
