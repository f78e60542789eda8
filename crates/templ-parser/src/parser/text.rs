//! Literal text runs and insignificant whitespace between nodes.

use source_map::Range;

use crate::ast::{Node, Text, Whitespace};
use crate::combinator::{until_match, whitespace};
use crate::error::ParseError;
use crate::input::Cursor;

/// A run of whitespace between nodes, kept so the formatter can decide
/// whether to collapse it to a space.
pub(super) fn whitespace_node(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    Ok(whitespace(input).map(|ws| {
        Node::Whitespace(Whitespace {
            value: ws.to_string(),
        })
    }))
}

/// Literal text, up to the next tag, expression brace, close brace, or line
/// break.
pub(super) fn text_node(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    let from = input.position();
    let Some(value) = until_match(input, |c| {
        matches!(c.peek(), Some('<' | '{' | '}' | '\r' | '\n'))
    }) else {
        if input.is_eof() {
            return Ok(None);
        }
        return Err(ParseError::syntax(
            "text node: unterminated text, expected tag open, expression open, or newline",
            from,
        ));
    };
    if value.is_empty() {
        return Ok(None);
    }
    let value = value.to_string();
    let range = Range::new(from, input.position());
    let trailing_space = super::trailing_space(input);
    Ok(Some(Node::Text(Text {
        range,
        value,
        trailing_space,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TrailingSpace;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_stops_at_tag_open() {
        let mut c = Cursor::new("hello world<span>");
        let Some(Node::Text(t)) = text_node(&mut c).unwrap() else {
            panic!("expected text node");
        };
        assert_eq!(t.value, "hello world");
        assert_eq!(t.range, Range::new(source_map::Position::new(0, 0, 0), source_map::Position::new(11, 0, 11)));
        assert_eq!(t.trailing_space, TrailingSpace::None);
        assert_eq!(c.rest(), "<span>");
    }

    #[test]
    fn test_text_captures_trailing_space() {
        let mut c = Cursor::new("a\n\t<b>");
        let Some(Node::Text(t)) = text_node(&mut c).unwrap() else {
            panic!("expected text node");
        };
        assert_eq!(t.value, "a");
        assert_eq!(t.trailing_space, TrailingSpace::Vertical);
        assert_eq!(c.rest(), "<b>");
    }

    #[test]
    fn test_text_without_terminator_is_fatal() {
        let mut c = Cursor::new("runs off the end");
        assert!(text_node(&mut c).is_err());
    }

    #[test]
    fn test_text_at_terminator_is_no_match() {
        let mut c = Cursor::new("<div>");
        assert_eq!(text_node(&mut c).unwrap(), None);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_whitespace_node() {
        let mut c = Cursor::new("  \n\tx");
        let Some(Node::Whitespace(w)) = whitespace_node(&mut c).unwrap() else {
            panic!("expected whitespace node");
        };
        assert_eq!(w.value, "  \n\t");
        assert_eq!(c.rest(), "x");
    }
}
