//! The `templ Name(params) { ... }` declaration.

use source_map::Range;

use crate::ast::{Expression, HtmlTemplate};
use crate::combinator::{literal, must, newline, optional_whitespace};
use crate::error::ParseError;
use crate::goexpr;
use crate::input::Cursor;

use super::{
    at_close_brace, close_brace_with_optional_padding, open_brace_with_optional_padding,
    parse_nodes_until,
};

pub(super) fn html_template(input: &mut Cursor<'_>) -> Result<Option<HtmlTemplate>, ParseError> {
    let start = input.position();
    if literal(input, "templ ").is_none() {
        return Ok(None);
    }
    let sig = goexpr::func_signature(input.rest()).map_err(|e| {
        ParseError::syntax(format!("invalid template declaration: {e}"), input.position())
    })?;
    let from = input.position();
    let value = input.take_bytes(sig.end);
    let expression = Expression::new(value, Range::new(from, input.position()));
    if open_brace_with_optional_padding(input).is_none() {
        return Err(ParseError::syntax(
            "templ: malformed templ expression, expected `templ functionName() {`",
            start,
        ));
    }
    // The newline is optional so empty one-line templates parse.
    let _ = newline(input);
    let children = parse_nodes_until(input, at_close_brace, "template closing brace")?;
    optional_whitespace(input);
    must(
        close_brace_with_optional_padding(input),
        "template: missing closing brace",
        input,
    )?;
    Ok(Some(HtmlTemplate {
        range: Range::new(start, input.position()),
        expression,
        children,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Node;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> HtmlTemplate {
        let mut c = Cursor::new(src);
        html_template(&mut c).unwrap().expect("expected a template")
    }

    #[test]
    fn test_template_signature_captured() {
        let t = parse("templ Hello(p Person) {\n\t<div>hi</div>\n}");
        assert_eq!(t.expression.value, "Hello(p Person)");
        assert_eq!(t.expression.range.from.index, "templ ".len());
        assert!(t
            .children
            .iter()
            .any(|n| matches!(n, Node::Element(e) if e.name == "div")));
    }

    #[test]
    fn test_template_with_receiver() {
        let t = parse("templ (x []string) Test() {\n}");
        assert_eq!(t.expression.value, "(x []string) Test()");
    }

    #[test]
    fn test_empty_template() {
        let t = parse("templ Nothing() {}");
        assert!(t.children.is_empty());
    }

    #[test]
    fn test_template_range_spans_declaration() {
        let src = "templ Hello() {\n}";
        let t = parse(src);
        assert_eq!(t.range.from.index, 0);
        assert_eq!(t.range.to.index, src.len());
    }

    #[test]
    fn test_malformed_declaration_is_fatal() {
        let mut c = Cursor::new("templ Hello() \n");
        let err = html_template(&mut c).unwrap_err();
        assert!(err.to_string().contains("malformed templ expression"));
    }

    #[test]
    fn test_bad_signature_is_fatal() {
        let mut c = Cursor::new("templ 123() {\n}");
        let err = html_template(&mut c).unwrap_err();
        assert!(err.to_string().contains("invalid template declaration"));
    }
}
