//! Expression nodes: `{ expr }`, `{{ code }}`, `{! call }`, `@component`,
//! and `{ children... }`.

use crate::ast::{
    CallTemplateExpression, ChildrenExpression, GoCode, Node, StringExpression,
    TemplElementExpression,
};
use crate::combinator::{literal, must, newline, optional_whitespace};
use crate::error::ParseError;
use crate::goexpr;
use crate::input::Cursor;

use super::{
    at_close_brace, close_brace_with_optional_padding, dbl_close_brace_with_optional_padding,
    parse_go, parse_nodes_until, trailing_space,
};

/// `{ expr }`: renders the expression's value as escaped text.
pub(super) fn string_expression(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    Ok(string_expression_inner(input)?.map(Node::StringExpression))
}

/// Shared with the CSS property parser, which embeds the same construct as
/// a property value.
pub(super) fn string_expression_inner(
    input: &mut Cursor<'_>,
) -> Result<Option<StringExpression>, ParseError> {
    if literal(input, "{ ").or_else(|| literal(input, "{")).is_none() {
        return Ok(None);
    }
    let expression = parse_go("string expression", input, goexpr::expression)?;
    must(
        close_brace_with_optional_padding(input),
        "string expression: missing close brace",
        input,
    )?;
    let trailing = trailing_space(input);
    Ok(Some(StringExpression {
        expression,
        trailing_space: trailing,
    }))
}

/// `{{ code }}`: runs Go without rendering output.
pub(super) fn go_code(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    Ok(go_code_inner(input)?.map(Node::GoCode))
}

/// Shared with the script element parser, which embeds `{{ }}` blocks in
/// script bodies.
pub(super) fn go_code_inner(input: &mut Cursor<'_>) -> Result<Option<GoCode>, ParseError> {
    if literal(input, "{{ ").or_else(|| literal(input, "{{")).is_none() {
        return Ok(None);
    }
    let line = input.position().line;
    let expression = parse_go("go code", input, goexpr::expression)?;
    let multiline = input.position().line != line;
    optional_whitespace(input);
    must(
        dbl_close_brace_with_optional_padding(input),
        "go code: missing close braces",
        input,
    )?;
    let trailing = trailing_space(input);
    Ok(Some(GoCode {
        expression,
        trailing_space: trailing,
        multiline,
    }))
}

/// `{! expr }`: the deprecated call syntax, rewritten to `@expr` on output.
pub(super) fn call_template_expression(
    input: &mut Cursor<'_>,
) -> Result<Option<Node>, ParseError> {
    if literal(input, "{! ").or_else(|| literal(input, "{!")).is_none() {
        return Ok(None);
    }
    let expression = parse_go("call template expression", input, goexpr::expression)?;
    must(
        close_brace_with_optional_padding(input),
        "call template expression: missing closing brace",
        input,
    )?;
    Ok(Some(Node::CallTemplate(CallTemplateExpression {
        expression,
    })))
}

/// `@Component(args)`, with an optional block of children.
pub(super) fn templ_element_expression(
    input: &mut Cursor<'_>,
) -> Result<Option<Node>, ParseError> {
    if literal(input, "@").is_none() {
        return Ok(None);
    }
    let expression = parse_go("templ element", input, goexpr::templ_expression)?;
    let mut children = Vec::new();
    if literal(input, " {").is_some() {
        let _ = newline(input);
        children = parse_nodes_until(input, at_close_brace, "templ element closing brace")?;
        must(
            close_brace_with_optional_padding(input),
            format!("@{}: missing end (expected '}}')", expression.value),
            input,
        )?;
    }
    Ok(Some(Node::TemplElement(TemplElementExpression {
        expression,
        children,
    })))
}

/// `{ children... }`: renders the block passed by the caller.
pub(super) fn children_expression(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    let start = input.position();
    if literal(input, "{").is_none() {
        return Ok(None);
    }
    optional_whitespace(input);
    if literal(input, "children...").is_none() {
        input.seek(start);
        return Ok(None);
    }
    optional_whitespace(input);
    must(
        literal(input, "}"),
        "children expression: missing closing brace",
        input,
    )?;
    Ok(Some(Node::ChildrenExpression(ChildrenExpression)))
}
