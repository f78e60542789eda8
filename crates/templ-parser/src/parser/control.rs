//! Control flow nodes: `if`/`else if`/`else`, `for`, `switch`, and
//! `fallthrough`.

use source_map::Range;

use crate::ast::{
    CaseExpression, ElseIfExpression, Expression, Fallthrough, ForExpression, IfExpression,
    Node, SwitchExpression,
};
use crate::combinator::{horizontal_whitespace, literal, must, newline, optional_whitespace};
use crate::error::ParseError;
use crate::goexpr;
use crate::input::Cursor;

use super::{
    at_close_brace, close_brace_with_optional_padding, open_block, parse_go_header,
    parse_nodes_until, UNTERMINATED_MISSING_CURLY, UNTERMINATED_MISSING_END,
};

pub(super) fn if_expression(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    if !input.starts_with("if ") {
        return Ok(None);
    }
    let start = input.position();
    let expression = parse_go_header("if", input, goexpr::if_header)?;
    if open_block(input).is_none() {
        return Err(ParseError::syntax(
            format!("if: {UNTERMINATED_MISSING_CURLY}"),
            start,
        ));
    }
    let then = parse_nodes_until(input, at_if_terminator, "else expression or closing brace")?;
    let mut else_ifs = Vec::new();
    while let Some(else_if) = else_if_expression(input)? {
        else_ifs.push(else_if);
    }
    let else_ = else_block(input)?.unwrap_or_default();
    must(
        close_brace_with_optional_padding(input),
        "if: expected closing brace",
        input,
    )?;
    Ok(Some(Node::If(IfExpression {
        expression,
        then,
        else_ifs,
        else_,
    })))
}

fn at_if_terminator(input: &Cursor<'_>) -> bool {
    at_else_prefix(input) || at_close_brace(input)
}

/// `}` followed by `else`, possibly across whitespace. Peeked on a clone so
/// the branch parsers can consume it themselves.
fn at_else_prefix(input: &Cursor<'_>) -> bool {
    let mut probe = input.clone();
    optional_whitespace(&mut probe);
    if literal(&mut probe, "}").is_none() {
        return false;
    }
    optional_whitespace(&mut probe);
    probe.starts_with("else")
}

fn else_if_expression(input: &mut Cursor<'_>) -> Result<Option<ElseIfExpression>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    if literal(input, "}").is_none() {
        input.seek(start);
        return Ok(None);
    }
    optional_whitespace(input);
    if literal(input, "else ").is_none() || !input.starts_with("if ") {
        input.seek(start);
        return Ok(None);
    }
    let expression = parse_go_header("else if", input, goexpr::if_header)?;
    if open_block(input).is_none() {
        return Err(ParseError::syntax(
            format!("else if: {UNTERMINATED_MISSING_CURLY}"),
            start,
        ));
    }
    let then = parse_nodes_until(input, at_if_terminator, "else expression or closing brace")?;
    Ok(Some(ElseIfExpression { expression, then }))
}

fn else_block(input: &mut Cursor<'_>) -> Result<Option<Vec<Node>>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    if literal(input, "}").is_none() {
        input.seek(start);
        return Ok(None);
    }
    optional_whitespace(input);
    if literal(input, "else").is_none() {
        input.seek(start);
        return Ok(None);
    }
    optional_whitespace(input);
    if literal(input, "{").is_none() {
        input.seek(start);
        return Ok(None);
    }
    optional_whitespace(input);
    let nodes = parse_nodes_until(input, at_close_brace, "else expression closing brace")?;
    Ok(Some(nodes))
}

pub(super) fn for_expression(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    if !input.starts_with("for ") {
        return Ok(None);
    }
    let expression = parse_go_header("for", input, goexpr::for_header)?;
    must(open_block(input), "for: missing opening brace", input)?;
    let children = parse_nodes_until(input, at_close_brace, "for expression closing brace")?;
    must(
        close_brace_with_optional_padding(input),
        format!("for: {UNTERMINATED_MISSING_END}"),
        input,
    )?;
    Ok(Some(Node::For(ForExpression {
        expression,
        children,
    })))
}

pub(super) fn switch_expression(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    if !input.starts_with("switch ") {
        return Ok(None);
    }
    let start = input.position();
    let expression = parse_go_header("switch", input, goexpr::switch_header)?;
    if open_block(input).is_none() {
        return Err(ParseError::syntax(
            format!("switch: {UNTERMINATED_MISSING_CURLY}"),
            start,
        ));
    }
    let mut cases = Vec::new();
    while let Some(case) = case_expression(input)? {
        cases.push(case);
    }
    optional_whitespace(input);
    must(
        close_brace_with_optional_padding(input),
        format!("switch: {UNTERMINATED_MISSING_END}"),
        input,
    )?;
    Ok(Some(Node::Switch(SwitchExpression { expression, cases })))
}

fn case_expression(input: &mut Cursor<'_>) -> Result<Option<CaseExpression>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    if !input.starts_with("case ") && !input.starts_with("default") {
        input.seek(start);
        return Ok(None);
    }
    let from = input.position();
    let end = goexpr::case_clause(input.rest())
        .map_err(|e| ParseError::syntax(format!("case: invalid go expression: {e}"), from))?;
    let value = input.take_bytes(end);
    let expression = Expression::new(value, Range::new(from, input.position()));
    // Spaces and the line break after the colon belong to the clause head,
    // not to its children.
    horizontal_whitespace(input);
    let _ = newline(input);
    let children =
        parse_nodes_until(input, at_case_terminator, "closing brace or case expression")?;
    optional_whitespace(input);
    Ok(Some(CaseExpression {
        expression,
        children,
    }))
}

fn at_case_terminator(input: &Cursor<'_>) -> bool {
    if at_close_brace(input) {
        return true;
    }
    let mut probe = input.clone();
    optional_whitespace(&mut probe);
    probe.starts_with("case ") || probe.starts_with("default")
}

/// `fallthrough` on its own line inside a switch case.
pub(super) fn fallthrough_expression(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    let start = input.position();
    if literal(input, "fallthrough").is_none() {
        return Ok(None);
    }
    horizontal_whitespace(input);
    if newline(input).is_none() {
        return Err(ParseError::syntax(
            "expected newline after fallthrough",
            input.position(),
        ));
    }
    Ok(Some(Node::Fallthrough(Fallthrough {
        range: Range::new(start, input.position()),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_if(src: &str) -> IfExpression {
        let mut c = Cursor::new(src);
        match if_expression(&mut c).unwrap() {
            Some(Node::If(n)) => n,
            other => panic!("expected if expression, got {other:?}"),
        }
    }

    #[test]
    fn test_if() {
        let n = parse_if("if p.Test {\n\tyes\n}");
        assert_eq!(n.expression.value, "p.Test");
        assert!(n.else_ifs.is_empty());
        assert!(n.else_.is_empty());
        assert!(n
            .then
            .iter()
            .any(|c| matches!(c, Node::Text(t) if t.value == "yes")));
    }

    #[test]
    fn test_if_else() {
        let n = parse_if("if p.Test {\n\tyes\n} else {\n\tno\n}");
        assert_eq!(n.expression.value, "p.Test");
        assert!(n
            .else_
            .iter()
            .any(|c| matches!(c, Node::Text(t) if t.value == "no")));
    }

    #[test]
    fn test_if_else_if_chain() {
        let n = parse_if("if a {\n\t1\n} else if b {\n\t2\n} else if c {\n\t3\n} else {\n\t4\n}");
        assert_eq!(n.else_ifs.len(), 2);
        assert_eq!(n.else_ifs[0].expression.value, "b");
        assert_eq!(n.else_ifs[1].expression.value, "c");
        assert!(!n.else_.is_empty());
    }

    #[test]
    fn test_nested_if() {
        let n = parse_if("if a {\n\tif b {\n\t\tinner\n\t}\n}");
        assert!(n
            .then
            .iter()
            .any(|c| matches!(c, Node::If(inner) if inner.expression.value == "b")));
    }

    #[test]
    fn test_if_with_init_statement() {
        let n = parse_if("if x := f(); x > 3 {\n\tbig\n}");
        assert_eq!(n.expression.value, "x := f(); x > 3");
    }

    #[test]
    fn test_if_without_block_newline_is_fatal() {
        let mut c = Cursor::new("if p.Test { yes }");
        let err = if_expression(&mut c).unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_if_prefix_required() {
        let mut c = Cursor::new("iffy business");
        assert!(if_expression(&mut c).unwrap().is_none());
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_for() {
        let mut c = Cursor::new("for _, item := range items {\n\t{ item }\n}");
        let Some(Node::For(n)) = for_expression(&mut c).unwrap() else {
            panic!("expected for expression");
        };
        assert_eq!(n.expression.value, "_, item := range items");
        assert!(n
            .children
            .iter()
            .any(|c| matches!(c, Node::StringExpression(s) if s.expression.value == "item")));
    }

    #[test]
    fn test_switch_with_cases_and_default() {
        let src = "switch p.Type {\n\tcase \"a\":\n\t\tA\n\tcase \"b\":\n\t\tB\n\tdefault:\n\t\tD\n}";
        let mut c = Cursor::new(src);
        let Some(Node::Switch(n)) = switch_expression(&mut c).unwrap() else {
            panic!("expected switch expression");
        };
        assert_eq!(n.expression.value, "p.Type");
        assert_eq!(n.cases.len(), 3);
        assert_eq!(n.cases[0].expression.value, "case \"a\":");
        assert_eq!(n.cases[2].expression.value, "default:");
        assert!(c.is_eof());
    }

    #[test]
    fn test_switch_empty_body() {
        let mut c = Cursor::new("switch p.Type {\n}");
        let Some(Node::Switch(n)) = switch_expression(&mut c).unwrap() else {
            panic!("expected switch expression");
        };
        assert!(n.cases.is_empty());
    }

    #[test]
    fn test_case_with_fallthrough() {
        let src = "switch x {\n\tcase 1:\n\t\tone\n\t\tfallthrough\n\tdefault:\n\t\trest\n}";
        let mut c = Cursor::new(src);
        let Some(Node::Switch(n)) = switch_expression(&mut c).unwrap() else {
            panic!("expected switch expression");
        };
        assert!(n.cases[0]
            .children
            .iter()
            .any(|c| matches!(c, Node::Fallthrough(_))));
    }

    #[test]
    fn test_fallthrough_requires_newline() {
        let mut c = Cursor::new("fallthrough}");
        assert!(fallthrough_expression(&mut c).is_err());
    }
}
