//! Position and range types for source locations.

use std::fmt;

/// A location in a source or generated file.
///
/// Columns count encoded bytes, not code points: advancing over a 3-byte
/// character advances `col` by 3. A line feed increments `line` and resets
/// `col` to 0. This convention is shared by the parser cursor, the generated
/// output writer, and position consumers such as editor tooling, and must be
/// applied consistently by all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Byte offset from the start of the file.
    pub index: usize,
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column, in bytes from the start of the line.
    pub col: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub fn new(index: usize, line: u32, col: u32) -> Self {
        Self { index, line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {} (index {})", self.line, self.col, self.index)
    }
}

/// A half-open region of text between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// The start position (inclusive).
    pub from: Position,
    /// The end position (exclusive).
    pub to: Position,
}

impl Range {
    /// Creates a new range from two positions.
    #[inline]
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Returns the length of this range in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.to.index.saturating_sub(self.from.index)
    }

    /// Returns true if this range covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.to.index == self.from.index
    }

    /// Returns true if the byte offset falls within this range.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.from.index <= index && index < self.to.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_position_display() {
        let p = Position::new(14, 2, 5);
        assert_eq!(p.to_string(), "line 2, col 5 (index 14)");
    }

    #[test]
    fn test_range_contains() {
        let r = Range::new(Position::new(5, 0, 5), Position::new(15, 0, 15));
        assert!(!r.contains(4));
        assert!(r.contains(5));
        assert!(r.contains(14));
        assert!(!r.contains(15));
        assert_eq!(r.len(), 10);
    }

    #[test]
    fn test_position_ordering() {
        let a = Position::new(3, 0, 3);
        let b = Position::new(7, 1, 0);
        assert!(a < b);
    }
}
