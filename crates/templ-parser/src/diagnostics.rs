//! Non-fatal checks run over a parsed file.

use source_map::Range;

use crate::ast::{CallTemplateExpression, Element, TemplateFile};
use crate::visitor::{self, Visit};

/// A finding that does not stop parsing or generation, attached to the
/// source range it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub message: String,
    pub range: Range,
}

/// Runs all diagnosers over the file and returns the findings in source
/// order.
pub fn diagnose(tf: &TemplateFile) -> Vec<Diagnostic> {
    let mut d = Diagnoser::default();
    d.visit_template_file(tf);
    d.diagnostics
}

#[derive(Default)]
struct Diagnoser {
    diagnostics: Vec<Diagnostic>,
}

impl Visit for Diagnoser {
    fn visit_call_template(&mut self, n: &CallTemplateExpression) {
        self.diagnostics.push(Diagnostic {
            message:
                "`{! foo }` syntax is deprecated. Use `@foo` syntax instead. Run the formatter to migrate."
                    .to_string(),
            range: n.expression.range,
        });
    }

    fn visit_element(&mut self, n: &Element) {
        if n.is_void() && !n.children.is_empty() {
            self.diagnostics.push(Diagnostic {
                message: format!("void element <{}> should not have child content", n.name),
                range: n.name_range,
            });
        }
        visitor::walk_element(self, n);
    }
}
