//! Round-trip tests: formatting a parsed file is idempotent, and reparsing
//! formatted output yields the same tree.

use pretty_assertions::assert_eq;
use templ_parser::parse_string;

fn assert_roundtrip(src: &str) {
    let first = parse_string(src).expect("initial parse failed");
    let mut once = String::new();
    first.write(&mut once);

    let second = parse_string(&once).expect("formatted output failed to reparse");
    let mut twice = String::new();
    second.write(&mut twice);

    assert_eq!(once, twice, "formatting is not idempotent for:\n{src}");
}

#[test]
fn test_elements_and_attributes() {
    assert_roundtrip(concat!(
        "package main\n",
        "\n",
        "templ Page(p Person, enabled bool) {\n",
        "\t<div id=\"main\" class={ css1(), css2() }>\n",
        "\t\t<a href=\"test\" data-x?={ enabled }>link</a>\n",
        "\t\t<input type=\"text\" { attrs... } disabled/>\n",
        "\t\t<br/>\n",
        "\t</div>\n",
        "}\n",
    ));
}

#[test]
fn test_nested_control_flow() {
    assert_roundtrip(concat!(
        "package main\n",
        "\n",
        "templ Flow(p Person) {\n",
        "\tif p.A {\n",
        "\t\tif p.B {\n",
        "\t\t\t<div>{ \"B\" }</div>\n",
        "\t\t}\n",
        "\t} else if p.C {\n",
        "\t\t<span>C</span>\n",
        "\t} else {\n",
        "\t\t<span>none</span>\n",
        "\t}\n",
        "\tfor _, item := range p.Items {\n",
        "\t\t<li>{ item }</li>\n",
        "\t}\n",
        "\tswitch p.Kind {\n",
        "\t\tcase 1:\n",
        "\t\t\t<b>one</b>\n",
        "\t\t\tfallthrough\n",
        "\t\tdefault:\n",
        "\t\t\t<b>other</b>\n",
        "\t}\n",
        "}\n",
    ));
}

#[test]
fn test_component_invocations() {
    assert_roundtrip(concat!(
        "package main\n",
        "\n",
        "templ Layout(title string) {\n",
        "\t@Header(title)\n",
        "\t@layout.Wide() {\n",
        "\t\t<Button label=\"Save\" count={ 1 }/>\n",
        "\t\t{ children... }\n",
        "\t}\n",
        "}\n",
    ));
}

#[test]
fn test_css_and_script_templates() {
    assert_roundtrip(concat!(
        "package main\n",
        "\n",
        "css primary() {\n",
        "\tbackground-color: #ffffff;\n",
        "\tcolor: { constants.Red };\n",
        "}\n",
        "\n",
        "script announce(msg string) {\n",
        "\talert(msg);\n",
        "}\n",
    ));
}

#[test]
fn test_comments_doctype_and_go_code() {
    assert_roundtrip(concat!(
        "// Package docs.\n",
        "package main\n",
        "\n",
        "import \"fmt\"\n",
        "\n",
        "templ Doc(name string) {\n",
        "\t<!DOCTYPE html>\n",
        "\t<!-- a comment -->\n",
        "\t// a go comment\n",
        "\t{{ greeting := fmt.Sprintf(\"hi %s\", name) }}\n",
        "\t<p>{ greeting }</p>\n",
        "}\n",
    ));
}

#[test]
fn test_script_and_raw_elements() {
    assert_roundtrip(concat!(
        "package main\n",
        "\n",
        "templ WithScript(data string) {\n",
        "\t<script type=\"text/javascript\">\n",
        "\t\tconst x = \"</div>\";\n",
        "\t</script>\n",
        "\t<style>\n",
        "\t\t.a { color: red; }\n",
        "\t</style>\n",
        "}\n",
    ));
}

#[test]
fn test_legacy_call_syntax_migrates_then_stabilizes() {
    // The first write rewrites `{! foo }` to `@foo`; after that the output
    // is a fixed point.
    let src = "package main\n\ntempl A() {\n\t{! Other() }\n}\n";
    let first = parse_string(src).unwrap();
    let mut once = String::new();
    first.write(&mut once);
    assert!(once.contains("@Other()"));
    assert!(!once.contains("{!"));

    assert_roundtrip(&once);
}
