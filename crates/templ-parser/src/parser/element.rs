//! HTML elements, their attributes, component invocations, and the raw
//! `<style>` element.

use smol_str::SmolStr;
use source_map::{Position, Range};

use crate::ast::{is_void_element, Attribute, Element, ElementComponent, Node, RawElement, TrailingSpace};
use crate::combinator::{literal, literal_insensitive, must, optional_whitespace, rune_in, until};
use crate::error::ParseError;
use crate::goexpr;
use crate::input::Cursor;

use super::{
    close_brace_with_optional_padding, open_brace_with_optional_padding, parse_go,
    parse_go_header, parse_nodes_until, trailing_space,
};

const ELEMENT_NAME_FIRST: &str = "abcdefghijklmnopqrstuvwxyz";
const ELEMENT_NAME_SUBSEQUENT: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-:";

const ATTRIBUTE_NAME_FIRST: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ:_@";
const ATTRIBUTE_NAME_SUBSEQUENT: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ:_@-.0123456789*";

/// Close tags for void elements. HTML produced by other tools sometimes
/// carries them; they close nothing and are dropped on parse.
const VOID_ELEMENT_CLOSE_TAGS: &[&str] = &[
    "</area>", "</base>", "</br>", "</col>", "</command>", "</embed>", "</hr>", "</img>",
    "</input>", "</keygen>", "</link>", "</meta>", "</param>", "</source>", "</track>",
    "</wbr>",
];

/// A name made of one character from `first` and any number from
/// `subsequent`, capped at 128 characters.
pub(super) fn name_parser(
    input: &mut Cursor<'_>,
    first: &str,
    subsequent: &str,
    kind: &str,
) -> Result<Option<SmolStr>, ParseError> {
    let start = input.index();
    if rune_in(input, first).is_none() {
        return Ok(None);
    }
    input.take_while(|c| subsequent.contains(c));
    let name = &input.source()[start..input.index()];
    if name.len() >= 128 {
        return Err(ParseError::syntax(
            format!("{kind} names must be < 128 characters long"),
            input.position(),
        ));
    }
    Ok(Some(SmolStr::new(name)))
}

pub(super) fn element_name(input: &mut Cursor<'_>) -> Result<Option<SmolStr>, ParseError> {
    name_parser(input, ELEMENT_NAME_FIRST, ELEMENT_NAME_SUBSEQUENT, "element")
}

fn attribute_name(input: &mut Cursor<'_>) -> Result<Option<SmolStr>, ParseError> {
    name_parser(
        input,
        ATTRIBUTE_NAME_FIRST,
        ATTRIBUTE_NAME_SUBSEQUENT,
        "attribute",
    )
}

/// A component name: dot-separated Go identifiers. A bare name must start
/// uppercase so it cannot be confused with an HTML element.
fn component_name(input: &mut Cursor<'_>) -> Result<Option<SmolStr>, ParseError> {
    let start = input.position();
    let name = input.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if name.is_empty() {
        return Ok(None);
    }
    if name.len() >= 128 {
        return Err(ParseError::syntax(
            "component names must be < 128 characters long",
            input.position(),
        ));
    }
    let mut parts = name.split('.');
    let valid = match (parts.clone().count(), name.chars().next()) {
        (1, Some(first)) if !first.is_ascii_uppercase() => false,
        _ => parts.all(is_go_identifier),
    };
    if !valid {
        input.seek(start);
        return Ok(None);
    }
    Ok(Some(SmolStr::new(name)))
}

fn is_go_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Decodes the HTML entities that can appear in constant attribute values.
/// Unknown entities are left verbatim.
fn unescape_html(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];
        let Some(end) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => {
                let code = if let Some(hex) = entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
            }
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

struct AttributeValue {
    value: String,
    single_quote: bool,
}

fn attribute_value(input: &mut Cursor<'_>) -> Option<AttributeValue> {
    let start = input.position();
    if literal(input, "=\"").is_some() {
        if let Some(v) = until(input, "\"") {
            let value = v.to_string();
            literal(input, "\"");
            return Some(AttributeValue {
                value,
                single_quote: false,
            });
        }
        input.seek(start);
    }
    if literal(input, "='").is_some() {
        if let Some(v) = until(input, "'") {
            let value = v.to_string();
            literal(input, "'");
            return Some(AttributeValue {
                value,
                single_quote: true,
            });
        }
        input.seek(start);
    }
    // Unquoted: runs to whitespace or a delimiter, which stays unconsumed.
    if literal(input, "=").is_some() {
        let v = input.take_while(|c| !" \t\n\r\"'`=<>/".contains(c));
        return Some(AttributeValue {
            value: v.to_string(),
            single_quote: false,
        });
    }
    None
}

fn constant_attribute(input: &mut Cursor<'_>) -> Result<Option<Attribute>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    let name_start = input.position();
    let Some(name) = attribute_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    let name_range = Range::new(name_start, input.position());
    let Some(v) = attribute_value(input) else {
        input.seek(start);
        return Ok(None);
    };
    let value = unescape_html(&v.value);
    // Keep the single quotes only when they matter: when the value contains
    // a double quote that they protect.
    let single_quote = v.single_quote && value.contains('"');
    Ok(Some(Attribute::Constant {
        name,
        value,
        single_quote,
        name_range,
    }))
}

fn bool_constant_attribute(input: &mut Cursor<'_>) -> Result<Option<Attribute>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    let name_start = input.position();
    let Some(name) = attribute_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    let name_range = Range::new(name_start, input.position());
    let Some(next) = input.peek() else {
        return Err(ParseError::syntax(
            "unexpected EOF after attribute name",
            input.position(),
        ));
    };
    if next == '=' || next == '?' {
        // One of the value-carrying attribute forms.
        input.seek(start);
        return Ok(None);
    }
    if !matches!(next, ' ' | '\t' | '\r' | '\n' | '/' | '>') {
        return Err(ParseError::syntax(
            format!(
                "expected attribute name to end with space, newline, '/>' or '>', but got '{next}'"
            ),
            input.position(),
        ));
    }
    Ok(Some(Attribute::BoolConstant { name, name_range }))
}

fn bool_expression_attribute(input: &mut Cursor<'_>) -> Result<Option<Attribute>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    let name_start = input.position();
    let Some(name) = attribute_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    let name_range = Range::new(name_start, input.position());
    if literal(input, "?={ ").or_else(|| literal(input, "?={")).is_none() {
        input.seek(start);
        return Ok(None);
    }
    let expression = parse_go("boolean attribute", input, goexpr::expression)?;
    must(
        close_brace_with_optional_padding(input),
        "boolean expression: missing closing brace",
        input,
    )?;
    Ok(Some(Attribute::BoolExpression {
        name,
        expression,
        name_range,
    }))
}

fn expression_attribute(input: &mut Cursor<'_>) -> Result<Option<Attribute>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    let name_start = input.position();
    let Some(name) = attribute_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    let name_range = Range::new(name_start, input.position());
    if literal(input, "={ ").or_else(|| literal(input, "={")).is_none() {
        input.seek(start);
        return Ok(None);
    }
    // Attribute expressions allow a bare argument list, e.g.
    // `data={ id, name }`, so the scan is wider than a single expression.
    let expression = parse_go("attribute expression", input, goexpr::slice_args)?;
    optional_whitespace(input);
    must(
        literal(input, "}"),
        "string expression attribute: missing closing brace",
        input,
    )?;
    Ok(Some(Attribute::Expression {
        name,
        expression,
        name_range,
    }))
}

fn spread_attributes(input: &mut Cursor<'_>) -> Result<Option<Attribute>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    if open_brace_with_optional_padding(input).is_none() {
        input.seek(start);
        return Ok(None);
    }
    optional_whitespace(input);
    let mut expression = parse_go("spread attributes", input, goexpr::expression)?;
    if !expression.value.ends_with("...") {
        input.seek(start);
        return Ok(None);
    }
    // The `...` is syntax, not part of the expression.
    let len = expression.value.len() - 3;
    expression.value.truncate(len);
    expression.range.to.index -= 3;
    expression.range.to.col -= 3;
    must(
        close_brace_with_optional_padding(input),
        "attribute spread expression: missing closing brace",
        input,
    )?;
    Ok(Some(Attribute::Spread { expression }))
}

fn conditional_attribute(input: &mut Cursor<'_>) -> Result<Option<Attribute>, ParseError> {
    let start = input.position();
    optional_whitespace(input);
    if !input.starts_with("if ") {
        input.seek(start);
        return Ok(None);
    }
    let expression = parse_go_header("attribute if", input, goexpr::if_header)?;
    if open_brace_with_optional_padding(input).is_none() {
        return Err(ParseError::syntax(
            "attribute if: unterminated (missing closing '{')",
            start,
        ));
    }
    optional_whitespace(input);
    let then = attributes(input)?;
    if then.is_empty() {
        return Err(ParseError::syntax(
            "attribute if: invalid content or no attributes were found in the if block",
            input.position(),
        ));
    }
    let mut else_ = Vec::new();
    if let Some(attrs) = attribute_else_block(input)? {
        if attrs.is_empty() {
            return Err(ParseError::syntax(
                "attribute if: invalid content or no attributes were found in the else block",
                input.position(),
            ));
        }
        else_ = attrs;
    }
    optional_whitespace(input);
    must(
        close_brace_with_optional_padding(input),
        "attribute if: missing end (expected '}')",
        input,
    )?;
    Ok(Some(Attribute::Conditional {
        expression,
        then,
        else_,
    }))
}

fn attribute_else_block(input: &mut Cursor<'_>) -> Result<Option<Vec<Attribute>>, ParseError> {
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
    Ok(Some(attributes(input)?))
}

fn attribute(input: &mut Cursor<'_>) -> Result<Option<Attribute>, ParseError> {
    if let Some(a) = bool_expression_attribute(input)? {
        return Ok(Some(a));
    }
    if let Some(a) = expression_attribute(input)? {
        return Ok(Some(a));
    }
    if let Some(a) = conditional_attribute(input)? {
        return Ok(Some(a));
    }
    if let Some(a) = bool_constant_attribute(input)? {
        return Ok(Some(a));
    }
    if let Some(a) = spread_attributes(input)? {
        return Ok(Some(a));
    }
    constant_attribute(input)
}

pub(super) fn attributes(input: &mut Cursor<'_>) -> Result<Vec<Attribute>, ParseError> {
    let mut attrs = Vec::new();
    while let Some(a) = attribute(input)? {
        attrs.push(a);
    }
    Ok(attrs)
}

/// Consumes a close tag for a void element, which closes nothing.
pub(super) fn void_element_closer(input: &mut Cursor<'_>) -> bool {
    for tag in VOID_ELEMENT_CLOSE_TAGS {
        if literal_insensitive(input, tag).is_some() {
            return true;
        }
    }
    false
}

struct ElementOpenTag {
    name: SmolStr,
    attributes: Vec<Attribute>,
    indent_attrs: bool,
    name_range: Range,
    self_closing: bool,
}

fn element_open_tag(input: &mut Cursor<'_>) -> Result<Option<ElementOpenTag>, ParseError> {
    let start = input.position();
    if literal(input, "<").is_none() {
        return Ok(None);
    }
    let line = input.position().line;
    let name_start = input.position();
    let Some(name) = element_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    let name_range = Range::new(name_start, input.position());
    let attributes = attributes(input)?;
    let indent_attrs = input.position().line != line;
    optional_whitespace(input);
    if literal(input, "/>").is_some() {
        return Ok(Some(ElementOpenTag {
            name,
            attributes,
            indent_attrs,
            name_range,
            self_closing: true,
        }));
    }
    if literal(input, ">").is_none() {
        return Err(ParseError::syntax(
            format!("<{name}>: malformed open element"),
            input.position(),
        ));
    }
    Ok(Some(ElementOpenTag {
        name,
        attributes,
        indent_attrs,
        name_range,
        self_closing: false,
    }))
}

/// When child parsing stops at a close tag for some other element, name both
/// tags instead of reporting the terminator as missing.
fn mismatched_close_tag(name: &str, input: &Cursor<'_>) -> Option<ParseError> {
    let mut probe = input.clone();
    let at = probe.position();
    literal(&mut probe, "</")?;
    let found = element_name(&mut probe).ok().flatten()?;
    Some(ParseError::syntax(
        format!("<{name}>: expected end tag </{name}>, got </{found}>"),
        at,
    ))
}

pub(super) fn parse_element_children(
    input: &mut Cursor<'_>,
    name: &str,
) -> Result<Vec<Node>, ParseError> {
    let closer = format!("</{name}>");
    match parse_nodes_until(
        input,
        |c| c.starts_with(closer.as_str()),
        &format!("<{name}>: close tag"),
    ) {
        Ok(nodes) => Ok(nodes),
        Err(ParseError::UntilNotFound {
            name: until_name,
            position,
        }) => {
            if let Some(err) = mismatched_close_tag(name, input) {
                return Err(err);
            }
            Err(ParseError::syntax(
                format!("{until_name} not found"),
                position,
            ))
        }
        Err(err) => Err(err),
    }
}

pub(super) fn element(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    let start = input.position();
    let Some(open) = element_open_tag(input)? else {
        return Ok(None);
    };
    if open.name == "script" {
        // Script contents interleave raw text with Go expressions and are
        // handled by their own parser.
        input.seek(start);
        return Ok(None);
    }
    let mut el = Element {
        name: open.name,
        attributes: open.attributes,
        indent_attrs: open.indent_attrs,
        children: Vec::new(),
        indent_children: false,
        trailing_space: TrailingSpace::None,
        name_range: open.name_range,
    };
    if open.self_closing || is_void_element(&el.name) {
        return finish_element(start, el, input).map(Some);
    }
    let line = input.position().line;
    el.children = parse_element_children(input, &el.name)?;
    el.indent_children = input.position().line != line;
    must(
        literal(input, &format!("</{}>", el.name)),
        format!(
            "<{}>: expected end tag not present or invalid tag contents",
            el.name
        ),
        input,
    )?;
    finish_element(start, el, input).map(Some)
}

fn finish_element(
    start: Position,
    mut el: Element,
    input: &mut Cursor<'_>,
) -> Result<Node, ParseError> {
    // A redundant close tag after a void element is dropped.
    void_element_closer(input);
    el.trailing_space = trailing_space(input);
    let msgs = el.validate();
    if !msgs.is_empty() {
        return Err(ParseError::syntax(
            format!("<{}>: {}", el.name, msgs.join(", ")),
            start,
        ));
    }
    Ok(Node::Element(el))
}

pub(super) fn element_component(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    let start = input.position();
    if !input.starts_with("<") || input.starts_with("<!") || input.starts_with("</") {
        return Ok(None);
    }
    literal(input, "<");
    let line = input.position().line;
    let name_start = input.position();
    let Some(name) = component_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    let name_range = Range::new(name_start, input.position());
    let attributes = attributes(input)?;
    let indent_attrs = input.position().line != line;
    optional_whitespace(input);
    let self_closing = literal(input, "/>").is_some();
    if !self_closing && literal(input, ">").is_none() {
        return Err(ParseError::syntax(
            format!("<{name}>: malformed open component"),
            input.position(),
        ));
    }
    let mut component = ElementComponent {
        name,
        name_range,
        attributes,
        indent_attrs,
        self_closing,
        children: Vec::new(),
        indent_children: false,
        trailing_space: TrailingSpace::None,
        range: Range::default(),
    };
    if self_closing {
        component.trailing_space = trailing_space(input);
        component.range = Range::new(start, input.position());
        return Ok(Some(Node::ElementComponent(component)));
    }
    let line = input.position().line;
    component.children = parse_element_children(input, &component.name)?;
    component.indent_children = input.position().line != line;
    must(
        literal(input, &format!("</{}>", component.name)),
        format!(
            "<{}>: expected end tag not present or invalid tag contents",
            component.name
        ),
        input,
    )?;
    component.trailing_space = trailing_space(input);
    component.range = Range::new(start, input.position());
    Ok(Some(Node::ElementComponent(component)))
}

/// `<style>`: the contents are CSS, not template syntax, and are captured
/// verbatim.
pub(super) fn raw_style_element(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    let start = input.position();
    if literal(input, "<").is_none() {
        return Ok(None);
    }
    let Some(name) = element_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    if name != "style" {
        input.seek(start);
        return Ok(None);
    }
    let attributes = attributes(input)?;
    optional_whitespace(input);
    if literal(input, ">").is_none() {
        input.seek(start);
        return Ok(None);
    }
    let Some(contents) = until(input, "</style>") else {
        return Err(ParseError::syntax(
            "<style>: expected end tag not present",
            input.position(),
        ));
    };
    let contents = contents.to_string();
    literal(input, "</style>");
    Ok(Some(Node::RawElement(RawElement {
        name,
        attributes,
        contents,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use pretty_assertions::assert_eq;

    fn parse_attrs(src: &str) -> Vec<Attribute> {
        let mut c = Cursor::new(src);
        attributes(&mut c).unwrap()
    }

    #[test]
    fn test_constant_attribute() {
        let attrs = parse_attrs(r#" href="test">"#);
        assert_eq!(attrs.len(), 1);
        let Attribute::Constant {
            name,
            value,
            single_quote,
            ..
        } = &attrs[0]
        else {
            panic!("expected constant attribute");
        };
        assert_eq!(name, "href");
        assert_eq!(value, "test");
        assert!(!single_quote);
    }

    #[test]
    fn test_constant_attribute_unescapes_entities() {
        let attrs = parse_attrs(r#" title="a &amp; b &lt;c&gt;">"#);
        let Attribute::Constant { value, .. } = &attrs[0] else {
            panic!("expected constant attribute");
        };
        assert_eq!(value, "a & b <c>");
    }

    #[test]
    fn test_single_quotes_kept_only_when_needed() {
        let attrs = parse_attrs(r#" a='plain' b='has "quotes"'>"#);
        let Attribute::Constant { single_quote, .. } = &attrs[0] else {
            panic!("expected constant attribute");
        };
        assert!(!single_quote);
        let Attribute::Constant {
            single_quote,
            value,
            ..
        } = &attrs[1]
        else {
            panic!("expected constant attribute");
        };
        assert!(single_quote);
        assert_eq!(value, r#"has "quotes""#);
    }

    #[test]
    fn test_unquoted_attribute_value() {
        let attrs = parse_attrs(" width=100>");
        let Attribute::Constant { name, value, .. } = &attrs[0] else {
            panic!("expected constant attribute");
        };
        assert_eq!(name, "width");
        assert_eq!(value, "100");
    }

    #[test]
    fn test_bool_constant_attribute() {
        let attrs = parse_attrs(" noshade>");
        assert!(matches!(
            &attrs[0],
            Attribute::BoolConstant { name, .. } if name == "noshade"
        ));
    }

    #[test]
    fn test_bool_expression_attribute() {
        let attrs = parse_attrs(" selected?={ isSelected(i) }>");
        let Attribute::BoolExpression {
            name, expression, ..
        } = &attrs[0]
        else {
            panic!("expected boolean expression attribute");
        };
        assert_eq!(name, "selected");
        assert_eq!(expression.value, "isSelected(i)");
    }

    #[test]
    fn test_expression_attribute() {
        let attrs = parse_attrs(" href={ p.URL }>");
        let Attribute::Expression {
            name, expression, ..
        } = &attrs[0]
        else {
            panic!("expected expression attribute");
        };
        assert_eq!(name, "href");
        assert_eq!(expression.value, "p.URL");
    }

    #[test]
    fn test_spread_attributes() {
        let attrs = parse_attrs(" { attrs... }>");
        let Attribute::Spread { expression } = &attrs[0] else {
            panic!("expected spread attribute");
        };
        assert_eq!(expression.value, "attrs");
        assert_eq!(expression.range.len(), "attrs".len());
    }

    #[test]
    fn test_conditional_attribute() {
        let attrs = parse_attrs(" if active {\n\tclass=\"on\"\n} else {\n\tclass=\"off\"\n}>");
        let Attribute::Conditional {
            expression,
            then,
            else_,
        } = &attrs[0]
        else {
            panic!("expected conditional attribute");
        };
        assert_eq!(expression.value, "active");
        assert_eq!(then.len(), 1);
        assert_eq!(else_.len(), 1);
    }

    #[test]
    fn test_attribute_ordering_is_stable() {
        let attrs = parse_attrs(r#" id="x" disabled data-count={ count } hidden?={ h }>"#);
        assert_eq!(
            attrs.iter().map(|a| a.name()).collect::<Vec<_>>(),
            vec![Some("id"), Some("disabled"), Some("data-count"), Some("hidden")]
        );
    }

    #[test]
    fn test_element_self_closing() {
        let mut c = Cursor::new(r#"<a href="test"/>"#);
        let Some(Node::Element(el)) = element(&mut c).unwrap() else {
            panic!("expected element");
        };
        assert_eq!(el.name, "a");
        assert!(el.children.is_empty());
        assert!(c.is_eof());
    }

    #[test]
    fn test_element_with_children() {
        let mut c = Cursor::new("<div><span>hi</span></div>");
        let Some(Node::Element(el)) = element(&mut c).unwrap() else {
            panic!("expected element");
        };
        assert_eq!(el.name, "div");
        assert!(matches!(
            &el.children[0],
            Node::Element(inner) if inner.name == "span"
        ));
    }

    #[test]
    fn test_void_element_ignores_close_tag() {
        let mut c = Cursor::new("<br></br>rest");
        let Some(Node::Element(el)) = element(&mut c).unwrap() else {
            panic!("expected element");
        };
        assert_eq!(el.name, "br");
        assert_eq!(c.rest(), "rest");
    }

    #[test]
    fn test_mismatched_close_tag_names_both() {
        let mut c = Cursor::new("<a></b>");
        let err = element(&mut c).unwrap_err();
        assert!(err
            .to_string()
            .contains("<a>: expected end tag </a>, got </b>"));
    }

    #[test]
    fn test_element_name_position_is_tracked() {
        let mut c = Cursor::new("<div></div>");
        let Some(Node::Element(el)) = element(&mut c).unwrap() else {
            panic!("expected element");
        };
        assert_eq!(el.name_range.from.index, 1);
        assert_eq!(el.name_range.to.index, 4);
    }

    #[test]
    fn test_raw_style_element() {
        let mut c = Cursor::new("<style>.x { color: red; }</style>");
        let Some(Node::RawElement(el)) = raw_style_element(&mut c).unwrap() else {
            panic!("expected raw element");
        };
        assert_eq!(el.contents, ".x { color: red; }");
    }

    #[test]
    fn test_component_self_closing() {
        let mut c = Cursor::new(r#"<Button label="Save"/>"#);
        let Some(Node::ElementComponent(n)) = element_component(&mut c).unwrap() else {
            panic!("expected component");
        };
        assert_eq!(n.name, "Button");
        assert!(n.self_closing);
        assert_eq!(n.range.to.index, c.index());
    }

    #[test]
    fn test_component_qualified_name_with_children() {
        let mut c = Cursor::new("<layout.Page>body</layout.Page>");
        let Some(Node::ElementComponent(n)) = element_component(&mut c).unwrap() else {
            panic!("expected component");
        };
        assert_eq!(n.name, "layout.Page");
        assert!(!n.self_closing);
        assert!(matches!(&n.children[0], Node::Text(t) if t.value == "body"));
    }

    #[test]
    fn test_lowercase_bare_name_is_not_a_component() {
        let mut c = Cursor::new("<div></div>");
        assert!(element_component(&mut c).unwrap().is_none());
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_spread_range_excludes_dots() {
        let mut c = Cursor::new("{ attrs... }>");
        let Some(Attribute::Spread { expression }) = attribute(&mut c).unwrap() else {
            panic!("expected spread attribute");
        };
        assert_eq!(
            expression,
            Expression::new(
                "attrs",
                Range::new(Position::new(2, 0, 2), Position::new(7, 0, 7)),
            )
        );
    }
}
