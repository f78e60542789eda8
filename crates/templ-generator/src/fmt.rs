//! Reformatting of embedded sub-language fragments.
//!
//! Canonical template formatting is the AST's own `write`; what it cannot do
//! is reformat the Go and script fragments inside the tree, because that
//! needs a real formatter for the embedded language. [`EmbeddedFormatter`]
//! is the seam for plugging one in; [`format_embedded`] applies it to every
//! fragment in a parsed file before the file is written back out.

use templ_parser::ast::{
    Attribute, CallTemplateExpression, ForExpression, GoCode, IfExpression, ScriptTemplate,
    StringExpression, SwitchExpression, TemplElementExpression, TemplateFile,
};
use templ_parser::visitor::{self, VisitMut};

/// Reformats fragments of an embedded language. `lang` names the language
/// (`"go"` or `"js"`); `None` means the formatter has nothing to change and
/// the fragment is kept verbatim.
pub trait EmbeddedFormatter {
    fn format(&self, lang: &str, src: &str) -> Option<String>;
}

/// The formatter used when no external tool is available: everything is
/// kept as written.
#[derive(Debug, Default)]
pub struct NullFormatter;

impl EmbeddedFormatter for NullFormatter {
    fn format(&self, _lang: &str, _src: &str) -> Option<String> {
        None
    }
}

/// Runs the formatter over every embedded fragment in the file, in place.
pub fn format_embedded(tf: &mut TemplateFile, formatter: &dyn EmbeddedFormatter) {
    let mut pass = FormatPass { formatter };
    pass.visit_template_file_mut(tf);
}

struct FormatPass<'a> {
    formatter: &'a dyn EmbeddedFormatter,
}

impl FormatPass<'_> {
    fn reformat(&self, lang: &str, value: &mut String) {
        if let Some(updated) = self.formatter.format(lang, value) {
            *value = updated;
        }
    }
}

impl VisitMut for FormatPass<'_> {
    fn visit_string_expression_mut(&mut self, n: &mut StringExpression) {
        self.reformat("go", &mut n.expression.value);
    }

    fn visit_go_code_mut(&mut self, n: &mut GoCode) {
        self.reformat("go", &mut n.expression.value);
    }

    fn visit_if_mut(&mut self, n: &mut IfExpression) {
        self.reformat("go", &mut n.expression.value);
        for else_if in &mut n.else_ifs {
            self.reformat("go", &mut else_if.expression.value);
        }
        visitor::walk_if_mut(self, n);
    }

    fn visit_for_mut(&mut self, n: &mut ForExpression) {
        self.reformat("go", &mut n.expression.value);
        visitor::walk_for_mut(self, n);
    }

    fn visit_switch_mut(&mut self, n: &mut SwitchExpression) {
        self.reformat("go", &mut n.expression.value);
        visitor::walk_switch_mut(self, n);
    }

    fn visit_call_template_mut(&mut self, n: &mut CallTemplateExpression) {
        self.reformat("go", &mut n.expression.value);
    }

    fn visit_templ_element_mut(&mut self, n: &mut TemplElementExpression) {
        self.reformat("go", &mut n.expression.value);
        visitor::walk_templ_element_mut(self, n);
    }

    fn visit_attribute_mut(&mut self, n: &mut Attribute) {
        match n {
            Attribute::BoolExpression { expression, .. }
            | Attribute::Expression { expression, .. }
            | Attribute::Spread { expression }
            | Attribute::Conditional { expression, .. } => {
                self.reformat("go", &mut expression.value);
            }
            Attribute::BoolConstant { .. } | Attribute::Constant { .. } => {}
        }
        visitor::walk_attribute_mut(self, n);
    }

    fn visit_script_template_mut(&mut self, n: &mut ScriptTemplate) {
        self.reformat("js", &mut n.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Collapses runs of spaces, standing in for a real formatter.
    struct SpaceSquasher;

    impl EmbeddedFormatter for SpaceSquasher {
        fn format(&self, lang: &str, src: &str) -> Option<String> {
            if lang != "go" {
                return None;
            }
            let squashed = src.split_whitespace().collect::<Vec<_>>().join(" ");
            (squashed != src).then_some(squashed)
        }
    }

    #[test]
    fn test_formatter_rewrites_embedded_go() {
        let mut tf = templ_parser::parse_string(
            "package main\n\ntempl A(p Person) {\n\tif p.A  ==  1 {\n\t\t{ p.Name }\n\t}\n}\n",
        )
        .unwrap();
        format_embedded(&mut tf, &SpaceSquasher);
        let mut buf = String::new();
        tf.write(&mut buf);
        assert!(buf.contains("if p.A == 1 {"));
    }

    #[test]
    fn test_null_formatter_changes_nothing() {
        let src = "package main\n\ntempl A(p Person) {\n\t{ p.Name }\n}\n";
        let mut tf = templ_parser::parse_string(src).unwrap();
        let before = tf.clone();
        format_embedded(&mut tf, &NullFormatter);
        assert_eq!(tf, before);
    }
}
