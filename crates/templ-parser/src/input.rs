//! Position-tracking cursor over template source text.

use source_map::Position;

/// A cursor over source text that tracks byte index, line, and column as it
/// advances.
///
/// Columns count bytes and reset to 0 after a line feed. Backtracking is done
/// by capturing [`Cursor::position`] before a speculative parse and calling
/// [`Cursor::seek`] with it on failure; both are O(1).
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    index: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            index: 0,
            line: 0,
            col: 0,
        }
    }

    /// The full source text the cursor was created over.
    #[inline]
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Current byte offset from the start of the source.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current position.
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.index, self.line, self.col)
    }

    /// Restores the cursor to a position previously returned by
    /// [`Cursor::position`].
    #[inline]
    pub fn seek(&mut self, position: Position) {
        self.index = position.index;
        self.line = position.line;
        self.col = position.col;
    }

    /// The unconsumed remainder of the source.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.src[self.index..]
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.index >= self.src.len()
    }

    /// The next character, without advancing.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the next one, without advancing.
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Returns true if the unconsumed input starts with `s`.
    #[inline]
    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Consumes and returns the next character.
    pub fn take(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.advance_bytes(c.len_utf8());
        Some(c)
    }

    /// Consumes exactly `n` bytes and returns them.
    ///
    /// `n` must lie on a character boundary within the remaining input;
    /// callers always derive it from a slice of the input, so this holds.
    pub fn take_bytes(&mut self, n: usize) -> &'a str {
        let taken = &self.src[self.index..self.index + n];
        self.advance_bytes(n);
        taken
    }

    /// Consumes characters while `pred` holds and returns the consumed slice.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.take_bytes(end)
    }

    fn advance_bytes(&mut self, n: usize) {
        for b in self.src.as_bytes()[self.index..self.index + n].iter() {
            if *b == b'\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
        self.index += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_advance_tracks_lines_and_cols() {
        let mut c = Cursor::new("ab\ncd");
        assert_eq!(c.position(), Position::new(0, 0, 0));
        c.take();
        c.take();
        assert_eq!(c.position(), Position::new(2, 0, 2));
        c.take(); // newline
        assert_eq!(c.position(), Position::new(3, 1, 0));
        c.take();
        assert_eq!(c.position(), Position::new(4, 1, 1));
    }

    #[test]
    fn test_multibyte_advances_col_by_byte_count() {
        let mut c = Cursor::new("€x");
        c.take();
        assert_eq!(c.position(), Position::new(3, 0, 3));
        c.take();
        assert_eq!(c.position(), Position::new(4, 0, 4));
    }

    #[test]
    fn test_seek_restores_position() {
        let mut c = Cursor::new("hello\nworld");
        let start = c.position();
        c.take_bytes(8);
        assert_eq!(c.position(), Position::new(8, 1, 2));
        c.seek(start);
        assert_eq!(c.position(), Position::new(0, 0, 0));
        assert_eq!(c.rest(), "hello\nworld");
    }

    #[test]
    fn test_take_while() {
        let mut c = Cursor::new("abc123");
        assert_eq!(c.take_while(|ch| ch.is_ascii_alphabetic()), "abc");
        assert_eq!(c.rest(), "123");
    }
}
