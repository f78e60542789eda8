//! Per-construct node parsers and the template file parser.
//!
//! Every parser follows one shape: `Ok(None)` is a soft no-match with the
//! cursor restored, so the caller can try the next alternative; `Err` is a
//! fatal, positioned grammar violation after the input committed to a
//! construct. Embedded Go is carved out by [`crate::goexpr`], which returns
//! byte offsets; parsers slice the source by those offsets and never
//! interpret the Go themselves.

mod comment;
mod control;
mod css;
mod element;
mod expression;
mod file;
mod script;
mod scripttemplate;
mod template;
mod text;

pub(crate) use file::{default_package_name, template_file};

use source_map::Range;

use crate::ast::{Expression, Node, TrailingSpace};
use crate::combinator::{literal, newline, optional_whitespace};
use crate::error::ParseError;
use crate::goexpr::{Header, ScanError};
use crate::input::Cursor;

pub(crate) const UNTERMINATED_MISSING_CURLY: &str = concat!(
    "unterminated (missing closing '{\\n') - ",
    r#"to escape "for", "if", "switch" etc. with braces, e.g. '{ "for" }'"#,
);
pub(crate) const UNTERMINATED_MISSING_END: &str = "missing end (expected '}')";

/// Carves one Go syntactic unit out of the input with `scan` and wraps it,
/// with its source range, as an [`Expression`].
fn parse_go(
    name: &str,
    input: &mut Cursor<'_>,
    scan: impl Fn(&str) -> Result<usize, ScanError>,
) -> Result<Expression, ParseError> {
    let from = input.position();
    let end = scan(input.rest())
        .map_err(|e| ParseError::syntax(format!("{name}: invalid go expression: {e}"), from))?;
    let value = input.take_bytes(end);
    Ok(Expression::new(value, Range::new(from, input.position())))
}

/// Like [`parse_go`] for control-flow headers, where the scan covers the
/// keyword but the captured expression starts after it.
fn parse_go_header(
    name: &str,
    input: &mut Cursor<'_>,
    scan: impl Fn(&str) -> Result<Header, ScanError>,
) -> Result<Expression, ParseError> {
    let at = input.position();
    let header = scan(input.rest())
        .map_err(|e| ParseError::syntax(format!("{name}: invalid go expression: {e}"), at))?;
    input.take_bytes(header.start);
    let from = input.position();
    let value = input.take_bytes(header.end - header.start);
    Ok(Expression::new(value, Range::new(from, input.position())))
}

fn open_brace_with_optional_padding(input: &mut Cursor<'_>) -> Option<()> {
    literal(input, " {").or_else(|| literal(input, "{")).map(|_| ())
}

fn close_brace_with_optional_padding(input: &mut Cursor<'_>) -> Option<()> {
    literal(input, " }").or_else(|| literal(input, "}")).map(|_| ())
}

fn dbl_close_brace_with_optional_padding(input: &mut Cursor<'_>) -> Option<()> {
    literal(input, " }}").or_else(|| literal(input, "}}")).map(|_| ())
}

/// The ` {\n` that opens a block body. Control-flow blocks require the
/// newline so single-line Go-looking text is not swallowed.
fn open_block(input: &mut Cursor<'_>) -> Option<()> {
    let start = input.position();
    open_brace_with_optional_padding(input)?;
    if newline(input).is_none() {
        input.seek(start);
        return None;
    }
    Some(())
}

fn at_close_brace(input: &Cursor<'_>) -> bool {
    input.starts_with(" }") || input.starts_with("}")
}

/// Captures any whitespace that trails a node and classifies it.
fn trailing_space(input: &mut Cursor<'_>) -> TrailingSpace {
    TrailingSpace::from_str(optional_whitespace(input)).unwrap_or_default()
}

type NodeParser = fn(&mut Cursor<'_>) -> Result<Option<Node>, ParseError>;

/// Ordered alternatives for a node. The order is the disambiguation policy:
/// the first parser whose prefix matches wins, so more specific prefixes
/// come before the constructs they would otherwise be mistaken for.
const NODE_PARSERS: &[NodeParser] = &[
    comment::doc_type,
    comment::html_comment,
    comment::go_comment,
    element::raw_style_element,
    script::script_element,
    element::element_component,
    element::element,
    control::if_expression,
    control::for_expression,
    control::switch_expression,
    control::fallthrough_expression,
    expression::call_template_expression,
    expression::templ_element_expression,
    expression::children_expression,
    expression::go_code,
    expression::string_expression,
    text::whitespace_node,
    text::text_node,
];

/// Parses nodes until `until` matches, leaving the terminator unconsumed.
///
/// The terminator is peeked between nodes. Running out of parseable input
/// before it matches is fatal, because every caller has already committed to
/// a construct that must be closed; the error carries `until_name` so the
/// caller can sharpen it.
fn parse_nodes_until(
    input: &mut Cursor<'_>,
    until: impl Fn(&Cursor<'_>) -> bool,
    until_name: &str,
) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();
    'outer: loop {
        if until(input) {
            return Ok(nodes);
        }
        // A close tag for a void element closes nothing; drop it.
        if element::void_element_closer(input) {
            continue;
        }
        for parse in NODE_PARSERS {
            if let Some(node) = parse(input)? {
                nodes.push(node);
                continue 'outer;
            }
        }
        return Err(ParseError::UntilNotFound {
            name: until_name.to_string(),
            position: input.position(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_block_requires_newline() {
        let mut c = Cursor::new(" {\n\t<b></b>");
        assert_eq!(open_block(&mut c), Some(()));
        assert_eq!(c.rest(), "\t<b></b>");

        let mut c = Cursor::new(" { x }");
        assert_eq!(open_block(&mut c), None);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_parse_go_captures_range() {
        let mut c = Cursor::new("p.Name }");
        let e = parse_go("string expression", &mut c, crate::goexpr::expression).unwrap();
        assert_eq!(e.value, "p.Name");
        assert_eq!(e.range.from.index, 0);
        assert_eq!(e.range.to.index, 6);
        assert_eq!(c.rest(), " }");
    }

    #[test]
    fn test_parse_go_header_skips_keyword() {
        let mut c = Cursor::new("if p.Test {\n");
        let e = parse_go_header("if", &mut c, crate::goexpr::if_header).unwrap();
        assert_eq!(e.value, "p.Test");
        assert_eq!(e.range.from.index, 3);
        assert_eq!(c.rest(), " {\n");
    }

    #[test]
    fn test_nodes_until_reports_missing_terminator() {
        let mut c = Cursor::new("hello\n");
        let err = parse_nodes_until(&mut c, |c| c.starts_with("</div>"), "<div>: close tag")
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::UntilNotFound {
                name: "<div>: close tag".to_string(),
                position: c.position(),
            }
        );
    }
}
