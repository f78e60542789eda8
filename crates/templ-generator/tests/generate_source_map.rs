//! Cross-crate checks that generated Go maps back to template positions.

use pretty_assertions::assert_eq;
use source_map::LineIndex;
use templ_generator::{generate, TemplSignatureResolver};
use templ_parser::parse_string;

#[test]
fn test_every_mapped_expression_is_bidirectional() {
    let src = concat!(
        "package main\n",
        "\n",
        "templ Page(p Person) {\n",
        "\tif p.Visible {\n",
        "\t\t<div id={ p.ID }>{ p.Name }</div>\n",
        "\t}\n",
        "\tfor _, item := range p.Items {\n",
        "\t\t<li>{ item }</li>\n",
        "\t}\n",
        "}\n",
    );
    let tf = parse_string(src).unwrap();
    let resolver = TemplSignatureResolver::from_file(&tf);
    let generated = generate(&tf, &resolver).unwrap();

    // Each copied expression starts somewhere in the template; the map must
    // take its start to the generated output and back exactly.
    let index = LineIndex::new(src);
    for fragment in ["p.Visible", "p.ID", "p.Name", "item"] {
        let start = index.position(src.find(fragment).unwrap());

        let target = generated
            .source_map
            .target_position_from_source(start.line, start.col)
            .unwrap_or_else(|| panic!("{fragment} has no target mapping"));
        let back = generated
            .source_map
            .source_position_from_target(target.line, target.col)
            .unwrap_or_else(|| panic!("{fragment} has no source mapping back"));
        assert_eq!((back.line, back.col), (start.line, start.col), "fragment {fragment}");

        // The mapped target really is where the fragment landed in the Go.
        let landed = &generated.code[target.index..target.index + fragment.len()];
        assert_eq!(landed, fragment);
    }
}

#[test]
fn test_generated_go_references_each_template_construct() {
    let src = concat!(
        "package main\n",
        "\n",
        "templ Item(label string) {\n",
        "\t<span>{ label }</span>\n",
        "}\n",
        "\n",
        "templ List(labels []string) {\n",
        "\tfor _, l := range labels {\n",
        "\t\t<Item label={ l }/>\n",
        "\t}\n",
        "}\n",
    );
    let tf = parse_string(src).unwrap();
    let resolver = TemplSignatureResolver::from_file(&tf);
    let generated = generate(&tf, &resolver).unwrap();

    assert!(generated.code.starts_with("// Code generated by templ-gen"));
    assert!(generated.code.contains("func Item(label string) templ.Component {"));
    assert!(generated.code.contains("func List(labels []string) templ.Component {"));
    assert!(generated.code.contains("for _, l := range labels {"));
    // The component call passes the attribute expression positionally.
    assert!(generated.code.contains("Item(var_"));
}
