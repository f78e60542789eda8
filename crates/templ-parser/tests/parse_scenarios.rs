//! End-to-end parse scenarios that cut across parser modules.

use pretty_assertions::assert_eq;
use source_map::LineIndex;
use templ_parser::ast::{Attribute, Node, TemplateFileNode};
use templ_parser::{parse_string, ParseError};

fn template_children(src: &str) -> Vec<Node> {
    let tf = parse_string(src).expect("parse failed");
    let Some(TemplateFileNode::Html(t)) = tf.nodes.into_iter().next() else {
        panic!("expected a template declaration");
    };
    t.children
}

fn non_whitespace(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .filter(|n| !matches!(n, Node::Whitespace(_)))
        .collect()
}

#[test]
fn test_nested_if_reaches_inner_expression() {
    let children = non_whitespace(template_children(
        "package main\n\ntempl A(p Person) {\n\tif p.A {\n\t\tif p.B {\n\t\t\t<div>{ \"B\" }</div>\n\t\t}\n\t}\n}\n",
    ));
    let [Node::If(outer)] = children.as_slice() else {
        panic!("expected a single if node");
    };
    assert_eq!(outer.expression.value, "p.A");
    let then = non_whitespace(outer.then.clone());
    let [Node::If(inner)] = then.as_slice() else {
        panic!("expected a nested if node");
    };
    assert_eq!(inner.expression.value, "p.B");
    let inner_then = non_whitespace(inner.then.clone());
    let [Node::Element(div)] = inner_then.as_slice() else {
        panic!("expected a div inside the inner if");
    };
    let div_children = non_whitespace(div.children.clone());
    let [Node::StringExpression(se)] = div_children.as_slice() else {
        panic!("expected a string expression in the div");
    };
    assert_eq!(se.expression.value, "\"B\"");
}

#[test]
fn test_self_closing_element_with_one_constant_attribute() {
    let children = non_whitespace(template_children(
        "package main\n\ntempl A() {\n\t<a href=\"test\"/>\n}\n",
    ));
    let [Node::Element(a)] = children.as_slice() else {
        panic!("expected a single element");
    };
    assert_eq!(a.name, "a");
    assert!(a.children.is_empty());
    assert_eq!(a.attributes.len(), 1);
    let Attribute::Constant { name, value, .. } = &a.attributes[0] else {
        panic!("expected a constant attribute");
    };
    assert_eq!(name.as_str(), "href");
    assert_eq!(value, "test");
}

#[test]
fn test_multibyte_text_after_bang_is_an_error_not_a_panic() {
    // `<!` followed by multibyte text is neither a doctype nor a comment;
    // the fixed-length doctype prefix check must not split a rune, and the
    // driver reports the unparseable run as a positioned error.
    let err = parse_string("package main\n\ntempl A() {\n\t<!€€€€\n}\n").unwrap_err();
    assert!(err.position().is_some(), "got: {err}");
}

#[test]
fn test_multibyte_close_tag_is_an_error_not_a_panic() {
    let err = parse_string("package main\n\ntempl A() {\n\t<div></b€€€></div>\n}\n").unwrap_err();
    let ParseError::Syntax { message, .. } = err else {
        panic!("expected a syntax error");
    };
    assert!(message.contains("</div>"), "message was: {message}");
}

#[test]
fn test_mismatched_close_tag_names_both_tags() {
    let err = parse_string("package main\n\ntempl A() {\n\t<a></b>\n}\n").unwrap_err();
    let ParseError::Syntax { message, position } = err else {
        panic!("expected a syntax error");
    };
    assert!(message.contains("</a>"), "message was: {message}");
    assert!(message.contains("</b>"), "message was: {message}");
    assert!(position.index > 0);
}

#[test]
fn test_function_literal_brace_belongs_to_expression() {
    let children = non_whitespace(template_children(
        "package main\n\ntempl A() {\n\tif findOut(func() bool { return true }) {\n\t\t<div>yes</div>\n\t}\n}\n",
    ));
    let [Node::If(cond)] = children.as_slice() else {
        panic!("expected an if node");
    };
    assert_eq!(cond.expression.value, "findOut(func() bool { return true })");
}

#[test]
fn test_braces_inside_literals_do_not_close_expression() {
    let children = non_whitespace(template_children(
        "package main\n\ntempl A() {\n\t{ f(\"}\", '}', '\\'') }\n}\n",
    ));
    let [Node::StringExpression(se)] = children.as_slice() else {
        panic!("expected a string expression");
    };
    assert_eq!(se.expression.value, "f(\"}\", '}', '\\'')");
}

#[test]
fn test_multibyte_text_advances_columns_by_byte_width() {
    let src = "package main\n\ntempl A(name string) {\n\t<div>世界{ name }</div>\n}\n";
    let children = non_whitespace(template_children(src));
    let [Node::Element(div)] = children.as_slice() else {
        panic!("expected an element");
    };
    let Some(Node::StringExpression(se)) = div
        .children
        .iter()
        .find(|n| matches!(n, Node::StringExpression(_)))
    else {
        panic!("expected a string expression child");
    };
    // The cursor's positions agree with an independent index over the same
    // text, including the 3-byte runes before the expression.
    let index = LineIndex::new(src);
    let expected_index = src.find("name }").unwrap();
    assert_eq!(se.expression.range.from, index.position(expected_index));
}
