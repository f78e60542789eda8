//! `css Name() { ... }` class templates.

use smol_str::SmolStr;
use source_map::Range;

use crate::ast::{CssProperty, CssTemplate, Expression};
use crate::combinator::{literal, must, newline, optional_whitespace, until_match};
use crate::error::ParseError;
use crate::goexpr;
use crate::input::Cursor;

use super::element::name_parser;
use super::expression::string_expression_inner;
use super::{close_brace_with_optional_padding, open_block};

const CSS_PROPERTY_NAME_FIRST: &str = "abcdefghijklmnopqrstuvwxyz-";
const CSS_PROPERTY_NAME_SUBSEQUENT: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-";

pub(super) fn css_template(input: &mut Cursor<'_>) -> Result<Option<CssTemplate>, ParseError> {
    let start = input.position();
    if literal(input, "css ").is_none() {
        return Ok(None);
    }
    let sig = goexpr::func_signature(input.rest()).map_err(|e| {
        ParseError::syntax(format!("invalid css declaration: {e}"), input.position())
    })?;
    let name = SmolStr::new(&sig.name);
    let from = input.position();
    let value = input.take_bytes(sig.end);
    let expression = Expression::new(value, Range::new(from, input.position()));
    if open_block(input).is_none() {
        return Err(ParseError::syntax(
            "css expression: parameters missing open bracket",
            start,
        ));
    }
    let mut properties = Vec::new();
    loop {
        if let Some(p) = expression_css_property(input)? {
            properties.push(p);
            continue;
        }
        if let Some(p) = constant_css_property(input)? {
            properties.push(p);
            continue;
        }
        optional_whitespace(input);
        must(
            close_brace_with_optional_padding(input),
            "css property expression: missing closing brace",
            input,
        )?;
        break;
    }
    Ok(Some(CssTemplate {
        range: Range::new(start, input.position()),
        name,
        expression,
        properties,
    }))
}

fn css_property_name(input: &mut Cursor<'_>) -> Result<Option<SmolStr>, ParseError> {
    name_parser(
        input,
        CSS_PROPERTY_NAME_FIRST,
        CSS_PROPERTY_NAME_SUBSEQUENT,
        "css property",
    )
}

/// `background-color: { constants.BackgroundColor };`
fn expression_css_property(input: &mut Cursor<'_>) -> Result<Option<CssProperty>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    let Some(name) = css_property_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    optional_whitespace(input);
    if literal(input, ":").is_none() {
        input.seek(start);
        return Ok(None);
    }
    optional_whitespace(input);
    let Some(value) = string_expression_inner(input)? else {
        input.seek(start);
        return Ok(None);
    };
    must(literal(input, ";"), "missing expected semicolon (;)", input)?;
    must(newline(input), "missing expected linebreak", input)?;
    Ok(Some(CssProperty::Expression { name, value }))
}

/// `color: #ffffff;`
fn constant_css_property(input: &mut Cursor<'_>) -> Result<Option<CssProperty>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    let Some(name) = css_property_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    optional_whitespace(input);
    if literal(input, ":").is_none() {
        input.seek(start);
        return Ok(None);
    }
    optional_whitespace(input);
    let Some(value) = until_match(input, at_semicolon_newline) else {
        return Err(ParseError::syntax(
            r"missing expected semicolon and linebreak (;\n)",
            input.position(),
        ));
    };
    let value = value.to_string();
    optional_whitespace(input);
    literal(input, ";");
    let _ = newline(input);
    Ok(Some(CssProperty::Constant { name, value }))
}

fn at_semicolon_newline(input: &Cursor<'_>) -> bool {
    let mut probe = input.clone();
    optional_whitespace(&mut probe);
    literal(&mut probe, ";").is_some() && newline(&mut probe).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> CssTemplate {
        let mut c = Cursor::new(src);
        css_template(&mut c).unwrap().expect("expected a css template")
    }

    #[test]
    fn test_css_template() {
        let t = parse("css Style() {\n\tcolor: #ffffff;\n\tbackground-color: { c.V };\n}");
        assert_eq!(t.name, "Style");
        assert_eq!(t.expression.value, "Style()");
        assert_eq!(t.properties.len(), 2);
        assert_eq!(
            t.properties[0],
            CssProperty::Constant {
                name: "color".into(),
                value: "#ffffff".to_string(),
            }
        );
        let CssProperty::Expression { name, value } = &t.properties[1] else {
            panic!("expected expression property");
        };
        assert_eq!(name, "background-color");
        assert_eq!(value.expression.value, "c.V");
    }

    #[test]
    fn test_css_template_with_parameters() {
        let t = parse("css Width(width int) {\n\twidth: { fmt.Sprintf(\"%dpx\", width) };\n}");
        assert_eq!(t.name, "Width");
        assert_eq!(t.expression.value, "Width(width int)");
        assert_eq!(t.properties.len(), 1);
    }

    #[test]
    fn test_css_empty() {
        let t = parse("css Empty() {\n}");
        assert!(t.properties.is_empty());
    }

    #[test]
    fn test_css_missing_semicolon_is_fatal() {
        let mut c = Cursor::new("css Style() {\n\tcolor: #ffffff\n}");
        assert!(css_template(&mut c).is_err());
    }

    #[test]
    fn test_css_missing_block_is_fatal() {
        let mut c = Cursor::new("css Style()\n");
        let err = css_template(&mut c).unwrap_err();
        assert!(err.to_string().contains("css expression"));
    }
}
