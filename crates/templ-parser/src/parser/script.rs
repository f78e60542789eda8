//! The `<script>` element, whose body interleaves raw script text with
//! embedded `{{ expr }}` Go expressions.

use crate::ast::{Attribute, Node, ScriptContents, ScriptElement};
use crate::combinator::{literal, optional_whitespace, until};
use crate::error::ParseError;
use crate::input::Cursor;

use super::element::{attributes, element_name};
use super::expression::go_code_inner;

/// `type` attribute values for which the body is treated as JavaScript.
/// A missing `type` attribute counts as JavaScript too.
const JAVASCRIPT_TYPE_VALUES: &[&str] = &["", "text/javascript", "javascript", "module"];

fn has_javascript_type(attrs: &[Attribute]) -> bool {
    for attr in attrs {
        let Attribute::Constant { name, value, .. } = attr else {
            continue;
        };
        if !name.eq_ignore_ascii_case("type") {
            continue;
        }
        return JAVASCRIPT_TYPE_VALUES
            .iter()
            .any(|v| value.eq_ignore_ascii_case(v));
    }
    true
}

pub(super) fn script_element(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    let start = input.position();
    if literal(input, "<").is_none() {
        return Ok(None);
    }
    let Some(name) = element_name(input)? else {
        input.seek(start);
        return Ok(None);
    };
    if name != "script" {
        input.seek(start);
        return Ok(None);
    }
    let attributes = attributes(input)?;
    optional_whitespace(input);
    if literal(input, ">").is_none() {
        input.seek(start);
        return Ok(None);
    }

    let mut el = ScriptElement {
        attributes,
        contents: Vec::new(),
    };

    // Non-JavaScript bodies (JSON, templates for other frameworks) are kept
    // as a single raw segment with no expression handling.
    if !has_javascript_type(&el.attributes) {
        let Some(contents) = until(input, "</script>") else {
            return Err(ParseError::syntax(
                "<script>: expected end tag not present",
                input.position(),
            ));
        };
        if !contents.is_empty() {
            el.contents.push(ScriptContents::Raw(contents.to_string()));
        }
        literal(input, "</script>");
        return Ok(Some(Node::ScriptElement(el)));
    }

    let mut segment = String::new();
    let mut quote: Option<char> = None;
    loop {
        // Inside a string literal, an end tag or comment opener is just
        // characters; `{{` always starts an expression.
        if quote.is_none() {
            if literal(input, "</script>").is_some() {
                flush(&mut el, &mut segment);
                break;
            }
            if input.starts_with("</") {
                // Some other end tag; the surrounding element parser will
                // report the mismatch.
                flush(&mut el, &mut segment);
                break;
            }
            if let Some(comment) = script_comment(input) {
                flush(&mut el, &mut segment);
                el.contents.push(ScriptContents::Raw(comment));
                continue;
            }
        }
        if input.starts_with("{{") {
            flush(&mut el, &mut segment);
            if let Some(code) = go_code_inner(input)? {
                el.contents.push(ScriptContents::Go {
                    code,
                    inside_string_literal: quote.is_some(),
                });
            }
            continue;
        }
        // An escape passes through without affecting quote state.
        if input.peek() == Some('\\') {
            segment.push('\\');
            input.take();
            if let Some(c) = input.take() {
                segment.push(c);
            }
            continue;
        }
        let Some(c) = input.take() else {
            return Err(ParseError::syntax(
                "script: unclosed <script> element",
                input.position(),
            ));
        };
        if matches!(c, '"' | '\'' | '`') {
            match quote {
                None => quote = Some(c),
                Some(q) if q == c => quote = None,
                Some(_) => {}
            }
        }
        segment.push(c);
    }
    Ok(Some(Node::ScriptElement(el)))
}

fn flush(el: &mut ScriptElement, segment: &mut String) {
    if !segment.is_empty() {
        el.contents.push(ScriptContents::Raw(std::mem::take(segment)));
    }
}

/// A `//` or `/* */` comment, kept as raw text. Expression braces inside a
/// comment are not expanded.
fn script_comment(input: &mut Cursor<'_>) -> Option<String> {
    if literal(input, "//").is_some() {
        let mut comment = String::from("//");
        match until(input, "\n") {
            Some(text) => {
                comment.push_str(text);
                comment.push('\n');
                literal(input, "\n");
            }
            None => {
                let len = input.rest().len();
                comment.push_str(input.take_bytes(len));
            }
        }
        return Some(comment);
    }
    if literal(input, "/*").is_some() {
        let mut comment = String::from("/*");
        match until(input, "*/") {
            Some(text) => {
                comment.push_str(text);
                comment.push_str("*/");
                literal(input, "*/");
            }
            None => {
                let len = input.rest().len();
                comment.push_str(input.take_bytes(len));
            }
        }
        return Some(comment);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> ScriptElement {
        let mut c = Cursor::new(src);
        match script_element(&mut c).unwrap() {
            Some(Node::ScriptElement(el)) => el,
            other => panic!("expected script element, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_script() {
        let el = parse("<script>console.log('hi');</script>");
        assert_eq!(
            el.contents,
            vec![ScriptContents::Raw("console.log('hi');".to_string())]
        );
    }

    #[test]
    fn test_embedded_go_expression() {
        let el = parse("<script>const name = {{ p.Name }};</script>");
        assert_eq!(el.contents.len(), 3);
        let ScriptContents::Go {
            code,
            inside_string_literal,
        } = &el.contents[1]
        else {
            panic!("expected go segment");
        };
        assert_eq!(code.expression.value, "p.Name");
        assert!(!inside_string_literal);
    }

    #[test]
    fn test_expression_inside_string_literal() {
        let el = parse(r#"<script>const s = "{{ p.Name }}";</script>"#);
        let ScriptContents::Go {
            inside_string_literal,
            ..
        } = &el.contents[1]
        else {
            panic!("expected go segment");
        };
        assert!(inside_string_literal);
    }

    #[test]
    fn test_end_tag_inside_string_is_content() {
        let el = parse(r#"<script>const s = "</script>";</script>"#);
        assert_eq!(
            el.contents,
            vec![ScriptContents::Raw(
                r#"const s = "</script>";"#.to_string()
            )]
        );
    }

    #[test]
    fn test_comment_keeps_braces_raw() {
        let el = parse("<script>// not an expr {{ x }}\ndone();</script>");
        assert_eq!(el.contents.len(), 2);
        assert_eq!(
            el.contents[0],
            ScriptContents::Raw("// not an expr {{ x }}\n".to_string())
        );
    }

    #[test]
    fn test_non_javascript_type_is_raw() {
        let el = parse(r#"<script type="application/json">{"a": {{ not go }} }</script>"#);
        assert_eq!(el.contents.len(), 1);
        assert!(matches!(&el.contents[0], ScriptContents::Raw(v) if v.contains("{{ not go }}")));
    }

    #[test]
    fn test_unclosed_script_is_fatal() {
        let mut c = Cursor::new("<script>var x = 1;");
        assert!(script_element(&mut c).is_err());
    }

    #[test]
    fn test_non_script_element_is_no_match() {
        let mut c = Cursor::new("<div></div>");
        assert!(script_element(&mut c).unwrap().is_none());
        assert_eq!(c.index(), 0);
    }
}
