//! Line index for efficient byte offset to line/column conversion.

use crate::Position;

/// An index over the line starts of a text, for converting byte offsets to
/// [`Position`] values without rescanning the text each time.
///
/// Columns are byte offsets within the line, matching the convention used
/// everywhere else in the system.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    /// `line_starts[i]` is the offset where line `i` begins.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Returns the number of lines in the source.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a position.
    ///
    /// Offsets past the end of the text are clamped to the end position.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        Position::new(offset, line as u32, (offset - line_start) as u32)
    }

    /// Returns the byte offset where a line starts, or `None` if the line is
    /// out of bounds.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("hello world");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.position(0), Position::new(0, 0, 0));
        assert_eq!(index.position(5), Position::new(5, 0, 5));
    }

    #[test]
    fn test_multiple_lines() {
        let index = LineIndex::new("hello\nworld\nfoo");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.position(0), Position::new(0, 0, 0));
        assert_eq!(index.position(5), Position::new(5, 0, 5));
        assert_eq!(index.position(6), Position::new(6, 1, 0));
        assert_eq!(index.position(10), Position::new(10, 1, 4));
        assert_eq!(index.position(12), Position::new(12, 2, 0));
    }

    #[test]
    fn test_multibyte_columns_count_bytes() {
        // "€" is 3 bytes, so the character after it is at col 3.
        let text = "€x";
        let index = LineIndex::new(text);
        assert_eq!(index.position(3), Position::new(3, 0, 3));
    }

    #[test]
    fn test_offset_clamped_to_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position(100), Position::new(2, 0, 2));
    }

    #[test]
    fn test_line_start() {
        let index = LineIndex::new("hello\nworld\n");
        assert_eq!(index.line_start(0), Some(0));
        assert_eq!(index.line_start(1), Some(6));
        assert_eq!(index.line_start(2), Some(12));
        assert_eq!(index.line_start(3), None);
    }
}
