//! Text helpers shared by the buffer, the line index and the lexers

use std::borrow::Cow;

/// Normalize `\r\n` and lone `\r` to `\n`.
///
/// Borrows when the input has no carriage returns, which is the common case.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Number of chars in `text` (offsets in this crate are char offsets)
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split text into lines the way the line index counts them.
///
/// A trailing `\n` yields a final empty line, so `"a\n"` has two lines.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
}
