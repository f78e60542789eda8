//! Bidirectional mapping between source and generated positions.

use rustc_hash::FxHashMap;

use crate::{Position, Range};

/// A bidirectional index between positions in the template source and
/// positions in the generated output.
///
/// The generator appends to the map as it copies expression text into the
/// output; afterwards the map is read-only. Lookups are keyed by
/// `(line, col)` in each direction, with columns in bytes.
#[derive(Debug, Default)]
pub struct SourceMap {
    source_lines_to_target: FxHashMap<u32, FxHashMap<u32, Position>>,
    target_lines_to_source: FxHashMap<u32, FxHashMap<u32, Position>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the expression text `value`, located at `source` in the
    /// template, was written to `target` in the generated output.
    ///
    /// The value is walked line by line. The first line starts at the
    /// recorded columns; subsequent lines start at column 0 on both sides.
    /// Each line maps `len + 1` columns so that a position one past the end
    /// of the expression still resolves.
    pub fn add(&mut self, value: &str, source: Range, target: Range) -> Position {
        let mut src_index = source.from.index;
        let mut tgt_index = target.from.index;
        for (line_offset, line) in value.split('\n').enumerate() {
            let src_line = source.from.line + line_offset as u32;
            let tgt_line = target.from.line + line_offset as u32;
            let (src_start_col, tgt_start_col) = if line_offset == 0 {
                (source.from.col, target.from.col)
            } else {
                (0, 0)
            };
            let src_cols = self.source_lines_to_target.entry(src_line).or_default();
            let tgt_cols = self.target_lines_to_source.entry(tgt_line).or_default();
            for col in 0..=line.len() as u32 {
                src_cols.insert(
                    src_start_col + col,
                    Position::new(tgt_index, tgt_line, tgt_start_col + col),
                );
                tgt_cols.insert(
                    tgt_start_col + col,
                    Position::new(src_index, src_line, src_start_col + col),
                );
                src_index += 1;
                tgt_index += 1;
            }
        }
        source.from
    }

    /// Looks up the generated position for a source `(line, col)`.
    ///
    /// The lookup is exact: unmapped lines or columns return `None`.
    pub fn target_position_from_source(&self, line: u32, col: u32) -> Option<Position> {
        self.source_lines_to_target.get(&line)?.get(&col).copied()
    }

    /// Looks up the source position for a generated `(line, col)`.
    ///
    /// If the exact column is not mapped, the lookup walks backward to the
    /// nearest mapped column at or before it. It never walks forward, so a
    /// position before any mapped span on the line returns `None`.
    pub fn source_position_from_target(&self, line: u32, col: u32) -> Option<Position> {
        let cols = self.target_lines_to_source.get(&line)?;
        let mut col = col;
        loop {
            if let Some(src) = cols.get(&col) {
                return Some(*src);
            }
            if col == 0 {
                return None;
            }
            col -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(from: (usize, u32, u32), to: (usize, u32, u32)) -> Range {
        Range::new(
            Position::new(from.0, from.1, from.2),
            Position::new(to.0, to.1, to.2),
        )
    }

    #[test]
    fn test_single_line_mapping() {
        let mut sm = SourceMap::new();
        // "p.Name" at source line 2 col 7, written to target line 10 col 20.
        sm.add(
            "p.Name",
            range((30, 2, 7), (36, 2, 13)),
            range((200, 10, 20), (206, 10, 26)),
        );

        let tgt = sm.target_position_from_source(2, 7).unwrap();
        assert_eq!(tgt, Position::new(200, 10, 20));

        // Middle of the expression.
        let tgt = sm.target_position_from_source(2, 10).unwrap();
        assert_eq!(tgt, Position::new(203, 10, 23));

        // One past the end is still mapped.
        let tgt = sm.target_position_from_source(2, 13).unwrap();
        assert_eq!(tgt, Position::new(206, 10, 26));

        // Beyond that is not.
        assert_eq!(sm.target_position_from_source(2, 14), None);
        assert_eq!(sm.target_position_from_source(3, 7), None);
    }

    #[test]
    fn test_multiline_mapping_interior_lines_start_at_col_zero() {
        let mut sm = SourceMap::new();
        // Two-line expression starting mid-line in both files.
        sm.add(
            "ab\ncd",
            range((10, 1, 4), (15, 2, 2)),
            range((50, 5, 8), (55, 6, 2)),
        );

        // First line honors the start columns.
        assert_eq!(
            sm.target_position_from_source(1, 4),
            Some(Position::new(50, 5, 8))
        );
        assert_eq!(
            sm.target_position_from_source(1, 5),
            Some(Position::new(51, 5, 9))
        );
        // Second line starts at col 0.
        assert_eq!(
            sm.target_position_from_source(2, 0),
            Some(Position::new(53, 6, 0))
        );
        assert_eq!(
            sm.target_position_from_source(2, 2),
            Some(Position::new(55, 6, 2))
        );
        // Col 4 on the second line is outside the expression.
        assert_eq!(sm.target_position_from_source(2, 3), None);
    }

    #[test]
    fn test_reverse_lookup_walks_backward_only() {
        let mut sm = SourceMap::new();
        sm.add(
            "p.Name",
            range((30, 2, 7), (36, 2, 13)),
            range((200, 10, 20), (206, 10, 26)),
        );

        // Exact hit.
        assert_eq!(
            sm.source_position_from_target(10, 20),
            Some(Position::new(30, 2, 7))
        );
        // Past the mapped span: walks back to the last mapped column.
        assert_eq!(
            sm.source_position_from_target(10, 40),
            Some(Position::new(36, 2, 13))
        );
        // Before the mapped span: never walks forward.
        assert_eq!(sm.source_position_from_target(10, 19), None);
        // Unknown line.
        assert_eq!(sm.source_position_from_target(11, 20), None);
    }

    #[test]
    fn test_bidirectional_consistency() {
        let mut sm = SourceMap::new();
        let src = range((100, 4, 12), (110, 4, 22));
        let tgt = range((900, 31, 6), (910, 31, 16));
        sm.add("count + 1!", src, tgt);

        for offset in 0..=10u32 {
            let t = sm.target_position_from_source(4, 12 + offset).unwrap();
            let s = sm.source_position_from_target(t.line, t.col).unwrap();
            assert_eq!(s.line, 4);
            assert_eq!(s.col, 12 + offset);
        }
    }

    #[test]
    fn test_later_additions_overwrite_overlaps() {
        let mut sm = SourceMap::new();
        sm.add("x", range((0, 0, 0), (1, 0, 1)), range((10, 1, 0), (11, 1, 1)));
        sm.add("x", range((0, 0, 0), (1, 0, 1)), range((20, 2, 0), (21, 2, 1)));
        assert_eq!(
            sm.target_position_from_source(0, 0),
            Some(Position::new(20, 2, 0))
        );
    }
}
