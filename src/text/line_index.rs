//! Line-start index for a text buffer.
//!
//! Maintains the char offset at which every line starts. `line_starts[0]` is
//! always 0 and the list is strictly increasing, so a buffer always has at
//! least one (possibly empty) line and a trailing `\n` opens a final empty
//! line.
//!
//! The index can be rebuilt from scratch in one pass or patched for a single
//! edit. Both paths produce the same starts; the tests check the incremental
//! path against a full rebuild over randomized edit sequences.

use crate::error::{TextError, TextResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Index for an empty buffer: one empty line.
    pub fn new() -> Self {
        Self {
            line_starts: vec![0],
        }
    }

    /// Build an index for `text`
    pub fn from_text(text: &str) -> Self {
        let mut index = Self::new();
        index.rebuild(text.chars());
        index
    }

    /// Recompute every line start. O(n) in the text length.
    pub fn rebuild<I>(&mut self, content: I)
    where
        I: IntoIterator<Item = char>,
    {
        self.line_starts.clear();
        self.line_starts.push(0);

        let mut offset = 0;
        for ch in content {
            offset += 1;
            if ch == '\n' {
                self.line_starts.push(offset);
            }
        }
    }

    /// Patch the index for `removed_len` chars at `start` being replaced by `inserted`.
    ///
    /// Line starts inside the removed span are dropped, starts for newlines in
    /// `inserted` are spliced in, and every later start is shifted by the net
    /// length change. Cost is O(changed lines + shifted lines).
    pub fn apply_edit(&mut self, start: usize, removed_len: usize, inserted: &str) {
        let old_end = start + removed_len;

        // A start `s` belongs to the removed span when the newline at `s - 1`
        // was inside `start..old_end`.
        let lo = self.line_starts.partition_point(|&s| s <= start);
        let hi = self.line_starts.partition_point(|&s| s <= old_end);

        let mut inserted_len = 0;
        let mut new_starts = Vec::new();
        for ch in inserted.chars() {
            inserted_len += 1;
            if ch == '\n' {
                new_starts.push(start + inserted_len);
            }
        }

        let added = new_starts.len();
        self.line_starts.splice(lo..hi, new_starts);

        for s in &mut self.line_starts[lo + added..] {
            *s = *s + inserted_len - removed_len;
        }
    }

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Raw line starts
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// Offset of the first char of `line`
    pub fn line_start_offset(&self, line: usize) -> TextResult<usize> {
        self.line_starts
            .get(line)
            .copied()
            .ok_or(TextError::LineOutOfBounds {
                line,
                line_count: self.line_count(),
            })
    }

    /// Offset just past the last char of `line`, excluding its newline.
    /// For the final line this is `text_len`.
    pub fn line_end_offset(&self, line: usize, text_len: usize) -> TextResult<usize> {
        self.line_start_offset(line)?;
        match self.line_starts.get(line + 1) {
            Some(next) => Ok(next - 1),
            None => Ok(text_len),
        }
    }

    /// Length of `line` in chars, excluding its newline
    pub fn line_length(&self, line: usize, text_len: usize) -> TextResult<usize> {
        Ok(self.line_end_offset(line, text_len)? - self.line_start_offset(line)?)
    }

    /// Line containing `offset`. An offset exactly at a line start belongs to that line.
    pub fn line_for_offset(&self, offset: usize, text_len: usize) -> TextResult<usize> {
        if offset > text_len {
            return Err(TextError::OffsetOutOfBounds {
                offset,
                len: text_len,
            });
        }
        match self.line_starts.binary_search(&offset) {
            Ok(line) => Ok(line),
            Err(line) => Ok(line - 1),
        }
    }

    /// Column of `offset` within its line
    pub fn column_for_offset(&self, offset: usize, text_len: usize) -> TextResult<usize> {
        let line = self.line_for_offset(offset, text_len)?;
        Ok(offset - self.line_starts[line])
    }

    /// Offset of `(line, column)`, with `column` clamped to the line's length
    pub fn to_offset(&self, line: usize, column: usize, text_len: usize) -> TextResult<usize> {
        let start = self.line_start_offset(line)?;
        let len = self.line_length(line, text_len)?;
        Ok(start + column.min(len))
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_one_line() {
        let index = LineIndex::from_text("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_end_offset(0, 0), Ok(0));
    }

    #[test]
    fn test_trailing_newline_opens_empty_line() {
        let index = LineIndex::from_text("ab\n");
        assert_eq!(index.line_starts(), &[0, 3]);
        assert_eq!(index.line_length(1, 3), Ok(0));
    }

    #[test]
    fn test_line_end_excludes_newline() {
        let index = LineIndex::from_text("abc\nde");
        assert_eq!(index.line_end_offset(0, 6), Ok(3));
        assert_eq!(index.line_end_offset(1, 6), Ok(6));
    }

    #[test]
    fn test_line_for_offset_at_line_start() {
        let index = LineIndex::from_text("abc\nde\n");
        assert_eq!(index.line_for_offset(0, 7), Ok(0));
        assert_eq!(index.line_for_offset(3, 7), Ok(0));
        assert_eq!(index.line_for_offset(4, 7), Ok(1));
        assert_eq!(index.line_for_offset(7, 7), Ok(2));
    }

    #[test]
    fn test_to_offset_clamps_column() {
        let index = LineIndex::from_text("abc\nde");
        assert_eq!(index.to_offset(0, 99, 6), Ok(3));
        assert_eq!(index.to_offset(1, 1, 6), Ok(5));
    }

    #[test]
    fn test_bounds_errors() {
        let index = LineIndex::from_text("abc");
        assert_eq!(
            index.line_start_offset(1),
            Err(TextError::LineOutOfBounds {
                line: 1,
                line_count: 1
            })
        );
        assert_eq!(
            index.line_for_offset(4, 3),
            Err(TextError::OffsetOutOfBounds { offset: 4, len: 3 })
        );
    }

    #[test]
    fn test_apply_edit_insert_newlines() {
        let mut index = LineIndex::from_text("ab\ncd");
        index.apply_edit(1, 0, "x\ny\n");
        assert_eq!(index, LineIndex::from_text("ax\ny\nb\ncd"));
    }

    #[test]
    fn test_apply_edit_delete_across_lines() {
        let mut index = LineIndex::from_text("ab\ncd\nef\ngh");
        // remove "b\ncd\ne"
        index.apply_edit(1, 7, "");
        assert_eq!(index, LineIndex::from_text("af\ngh"));
    }

    #[test]
    fn test_apply_edit_delete_newline_at_line_end() {
        let mut index = LineIndex::from_text("ab\ncd");
        index.apply_edit(2, 1, "");
        assert_eq!(index, LineIndex::from_text("abcd"));
    }

    #[test]
    fn test_apply_edit_replace_keeps_later_lines_shifted() {
        let mut index = LineIndex::from_text("one\ntwo\nthree");
        index.apply_edit(4, 3, "2\n2");
        assert_eq!(index, LineIndex::from_text("one\n2\n2\nthree"));
    }

    /// Small deterministic LCG so failures reproduce
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: usize) -> usize {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((self.0 >> 33) as usize) % bound.max(1)
        }
    }

    #[test]
    fn test_apply_edit_matches_rebuild_randomized() {
        let pieces = ["", "a", "\n", "xy\n", "\n\n", "é\nz", "long line"];
        let mut rng = Lcg(0x5eed);
        let mut text: Vec<char> = "first\nsecond\n\nfourth".chars().collect();
        let mut index = LineIndex::from_text(&text.iter().collect::<String>());

        for _ in 0..500 {
            let start = rng.next(text.len() + 1);
            let removed = rng.next(text.len() - start + 1).min(6);
            let inserted = pieces[rng.next(pieces.len())];

            text.splice(start..start + removed, inserted.chars());
            index.apply_edit(start, removed, inserted);

            let rebuilt = LineIndex::from_text(&text.iter().collect::<String>());
            assert_eq!(index, rebuilt);
        }
    }
}
