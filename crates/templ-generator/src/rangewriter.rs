//! A writer that knows where it is.

use source_map::{Position, Range};

/// Accumulates generated output while tracking the current position with the
/// same conventions as the parser's cursor: the index and column count bytes,
/// and a line feed resets the column to zero.
///
/// Every write returns the range it covered in the output, which is what the
/// generator feeds into the source map for copied expressions.
#[derive(Debug, Default)]
pub struct RangeWriter {
    buf: String,
    current: Position,
}

impl RangeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The position the next write will start at.
    pub fn current(&self) -> Position {
        self.current
    }

    /// Appends `s` and returns the range it occupies in the output.
    pub fn write(&mut self, s: &str) -> Range {
        let from = self.current;
        for c in s.chars() {
            let width = c.len_utf8();
            self.current.index += width;
            self.current.col += width as u32;
            if c == '\n' {
                self.current.line += 1;
                self.current.col = 0;
            }
        }
        self.buf.push_str(s);
        Range::new(from, self.current)
    }

    /// Appends `level` tabs followed by `s`, returning the range of `s`
    /// alone so indentation never ends up in the source map.
    pub fn write_indent(&mut self, level: usize, s: &str) -> Range {
        for _ in 0..level {
            self.write("\t");
        }
        self.write(s)
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
