//! The template file parser: header comments, the package clause, and the
//! top-level items.

use std::path::Path;

use source_map::Range;

use crate::ast::{
    Expression, Package, TemplateFile, TemplateFileGoExpression, TemplateFileNode,
};
use crate::combinator::{literal, must, optional_whitespace, until};
use crate::error::ParseError;
use crate::input::Cursor;

use super::{css, scripttemplate, template};

/// Parses a whole template file. `default_package` is used when the file has
/// no package clause.
pub(crate) fn template_file(src: &str, default_package: &str) -> Result<TemplateFile, ParseError> {
    let mut input = Cursor::new(src);

    // Files in the pre-v2 format need migration, not parsing.
    if input.starts_with("{% package") {
        return Err(ParseError::LegacyFormat);
    }

    let mut tf = TemplateFile::default();

    // Comments and whitespace above the package clause belong to the header.
    // When no package clause follows them they are ordinary content instead,
    // so the header is only committed once the clause is found.
    let header_start = input.position();
    skip_header(&mut input);
    match package_clause(&mut input)? {
        Some(pkg) => {
            let header = &src[header_start.index..pkg.expression.range.from.index];
            if !header.is_empty() {
                tf.header.push(TemplateFileGoExpression {
                    expression: Expression::new(
                        header,
                        Range::new(header_start, pkg.expression.range.from),
                    ),
                });
            }
            tf.package = pkg;
        }
        None => {
            input.seek(header_start);
            tf.package = Package {
                expression: Expression::new(
                    format!("package {default_package}"),
                    Range::default(),
                ),
            };
        }
    }

    optional_whitespace(&mut input);

    loop {
        if let Some(t) = template::html_template(&mut input)? {
            tf.nodes.push(TemplateFileNode::Html(t));
            optional_whitespace(&mut input);
            continue;
        }
        if let Some(c) = css::css_template(&mut input)? {
            tf.nodes.push(TemplateFileNode::Css(c));
            optional_whitespace(&mut input);
            continue;
        }
        if let Some(s) = scripttemplate::script_template(&mut input)? {
            tf.nodes.push(TemplateFileNode::Script(s));
            optional_whitespace(&mut input);
            continue;
        }
        if input.is_eof() {
            break;
        }
        // Anything else is Go code: types, functions, imports. Lines
        // accumulate until one starts a template declaration.
        go_code_run(&mut input, &mut tf);
    }
    Ok(tf)
}

fn package_clause(input: &mut Cursor<'_>) -> Result<Option<Package>, ParseError> {
    let start = input.position();
    if literal(input, "package ").is_none() {
        return Ok(None);
    }
    let name = must(until(input, "\n"), "package literal not terminated", input)?;
    if name.trim().is_empty() {
        return Err(ParseError::syntax("package literal not terminated", start));
    }
    let value = format!("package {name}");
    Ok(Some(Package {
        expression: Expression::new(value, Range::new(start, input.position())),
    }))
}

/// Advances over comments and whitespace that may precede the package
/// clause.
fn skip_header(input: &mut Cursor<'_>) {
    loop {
        if !optional_whitespace(input).is_empty() {
            continue;
        }
        if input.starts_with("//") {
            read_line(input);
            continue;
        }
        if input.starts_with("/*") {
            input.take_bytes(2);
            if until(input, "*/").is_some() {
                literal(input, "*/");
            } else {
                let len = input.rest().len();
                input.take_bytes(len);
            }
            continue;
        }
        return;
    }
}

/// Accumulates Go code lines into one node, stopping before a line that
/// starts a template declaration (or at EOF).
fn go_code_run(input: &mut Cursor<'_>, tf: &mut TemplateFile) {
    let from = input.position();
    let mut end = input.position();
    loop {
        let line_start = input.position();
        let line = read_line(input);
        let declares_template = (line.starts_with("templ ")
            || line.starts_with("css ")
            || line.starts_with("script "))
            && line.contains('(');
        if declares_template {
            input.seek(line_start);
            break;
        }
        end = input.position();
        if input.is_eof() {
            break;
        }
    }
    let code = input.source()[from.index..end.index].trim();
    if !code.is_empty() {
        tf.nodes.push(TemplateFileNode::Go(TemplateFileGoExpression {
            expression: Expression::new(code, Range::new(from, end)),
        }));
    }
}

fn read_line<'a>(input: &mut Cursor<'a>) -> &'a str {
    let line = match until(input, "\n") {
        Some(line) => line,
        None => {
            let len = input.rest().len();
            input.take_bytes(len)
        }
    };
    literal(input, "\n");
    line
}

/// The package to use when a file has no package clause: the name of the
/// directory the file sits in, when that is a valid Go identifier, else
/// `main`.
pub(crate) fn default_package_name(path: &str) -> String {
    let dir = Path::new(path)
        .parent()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .unwrap_or("");
    if is_go_identifier(dir) {
        dir.to_string()
    } else {
        "main".to_string()
    }
}

fn is_go_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_with_package_and_template() {
        let src = "package main\n\ntempl Hello() {\n\t<div>hi</div>\n}\n";
        let tf = template_file(src, "main").unwrap();
        assert_eq!(tf.package.expression.value, "package main");
        assert_eq!(tf.nodes.len(), 1);
        assert!(matches!(&tf.nodes[0], TemplateFileNode::Html(t) if t.expression.value == "Hello()"));
    }

    #[test]
    fn test_header_comment_kept_before_package() {
        let src = "// Code header.\n\npackage site\n\ntempl A() {\n}\n";
        let tf = template_file(src, "main").unwrap();
        assert_eq!(tf.header.len(), 1);
        assert_eq!(tf.header[0].expression.value, "// Code header.\n\n");
        assert_eq!(tf.package.expression.value, "package site");
    }

    #[test]
    fn test_missing_package_uses_default() {
        let src = "templ A() {\n}\n";
        let tf = template_file(src, "site").unwrap();
        assert_eq!(tf.package.expression.value, "package site");
        assert_eq!(tf.nodes.len(), 1);
    }

    #[test]
    fn test_go_code_between_templates() {
        let src = "package main\n\nimport \"fmt\"\n\ntype P struct {\n\tName string\n}\n\ntempl Hi(p P) {\n\t{ p.Name }\n}\n";
        let tf = template_file(src, "main").unwrap();
        assert_eq!(tf.nodes.len(), 2);
        let TemplateFileNode::Go(g) = &tf.nodes[0] else {
            panic!("expected go code node");
        };
        assert_eq!(
            g.expression.value,
            "import \"fmt\"\n\ntype P struct {\n\tName string\n}"
        );
    }

    #[test]
    fn test_mixed_template_kinds() {
        let src = "package main\n\ntempl A() {\n}\n\ncss B() {\n\tcolor: red;\n}\n\nscript C() {\n\tgo();\n}\n";
        let tf = template_file(src, "main").unwrap();
        assert_eq!(tf.nodes.len(), 3);
        assert!(matches!(&tf.nodes[0], TemplateFileNode::Html(_)));
        assert!(matches!(&tf.nodes[1], TemplateFileNode::Css(_)));
        assert!(matches!(&tf.nodes[2], TemplateFileNode::Script(_)));
    }

    #[test]
    fn test_legacy_format_is_rejected() {
        let err = template_file("{% package main %}\n", "main").unwrap_err();
        assert_eq!(err, ParseError::LegacyFormat);
    }

    #[test]
    fn test_unterminated_package_is_fatal() {
        assert!(template_file("package ", "main").is_err());
    }

    #[test]
    fn test_default_package_name() {
        assert_eq!(default_package_name("site/home.templ"), "site");
        assert_eq!(default_package_name("my-pages/home.templ"), "main");
        assert_eq!(default_package_name("home.templ"), "main");
    }
}
