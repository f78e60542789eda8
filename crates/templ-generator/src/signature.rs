//! Component signatures and their resolution.
//!
//! Component invocations written as markup (`<Button label="Save"/>`) pass
//! attributes by name, but the generated Go calls the component function
//! with positional arguments. Resolution turns a component name into the
//! ordered parameter list the call must follow.

use rustc_hash::FxHashMap;
use templ_parser::ast::{TemplateFile, TemplateFileNode};

/// One parameter of a component function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

impl Parameter {
    /// Whether this parameter is a rest bag that collects the attributes no
    /// other parameter claimed.
    pub fn is_rest(&self) -> bool {
        self.type_name == "templ.Attributer"
    }
}

/// The resolved parameter list for a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

impl ComponentSignature {
    /// Splits the parameters into the required ones and the optional
    /// trailing rest bag.
    pub fn split_rest(&self) -> (&[Parameter], Option<&Parameter>) {
        match self.parameters.split_last() {
            Some((last, rest)) if last.is_rest() => (rest, Some(last)),
            _ => (&self.parameters, None),
        }
    }
}

/// Maps a component name to its signature. Implementations may look at the
/// current file only, or reach into other packages; the generator does not
/// care which.
pub trait SignatureResolver {
    fn resolve(&self, name: &str) -> Option<ComponentSignature>;
}

/// A resolver that knows nothing. Generation fails on the first component
/// invocation, which is the right behavior for callers that have no type
/// information at all.
#[derive(Debug, Default)]
pub struct NullResolver;

impl SignatureResolver for NullResolver {
    fn resolve(&self, _name: &str) -> Option<ComponentSignature> {
        None
    }
}

/// Resolves components against the template declarations of a single file.
#[derive(Debug, Default)]
pub struct TemplSignatureResolver {
    signatures: FxHashMap<String, ComponentSignature>,
}

impl TemplSignatureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts a signature from every `templ` declaration in the file.
    pub fn from_file(tf: &TemplateFile) -> Self {
        let mut resolver = Self::new();
        for node in &tf.nodes {
            if let TemplateFileNode::Html(t) = node {
                if let Some(sig) = parse_signature(&t.expression.value) {
                    resolver.add(sig);
                }
            }
        }
        resolver
    }

    pub fn add(&mut self, sig: ComponentSignature) {
        self.signatures.insert(sig.name.clone(), sig);
    }
}

impl SignatureResolver for TemplSignatureResolver {
    fn resolve(&self, name: &str) -> Option<ComponentSignature> {
        self.signatures.get(name).cloned()
    }
}

/// Parses `Name(a string, b int)` style declarations, including an optional
/// method receiver. Parameters declared as `a, b string` share the trailing
/// type.
pub(crate) fn parse_signature(expr: &str) -> Option<ComponentSignature> {
    let mut s = expr.trim();
    if s.starts_with('(') {
        let end = matching_paren(s)?;
        s = s[end + 1..].trim_start();
    }
    let open = s.find('(')?;
    let close = s.rfind(')')?;
    if close < open {
        return None;
    }
    let name = s[..open].trim();
    if name.is_empty() {
        return None;
    }

    let mut parameters = Vec::new();
    let mut untyped: Vec<String> = Vec::new();
    for group in split_top_level_commas(&s[open + 1..close]) {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }
        match group.split_once(char::is_whitespace) {
            Some((pname, ptype)) => {
                let ptype = ptype.trim().to_string();
                for earlier in untyped.drain(..) {
                    parameters.push(Parameter {
                        name: earlier,
                        type_name: ptype.clone(),
                    });
                }
                parameters.push(Parameter {
                    name: pname.to_string(),
                    type_name: ptype,
                });
            }
            None => untyped.push(group.to_string()),
        }
    }

    Some(ComponentSignature {
        name: name.to_string(),
        parameters,
    })
}

fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level_commas(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn param(name: &str, type_name: &str) -> Parameter {
        Parameter {
            name: name.to_string(),
            type_name: type_name.to_string(),
        }
    }

    #[test]
    fn test_parse_signature() {
        let sig = parse_signature("Button(label string, count int)").unwrap();
        assert_eq!(sig.name, "Button");
        assert_eq!(
            sig.parameters,
            vec![param("label", "string"), param("count", "int")]
        );
    }

    #[test]
    fn test_parse_signature_grouped_parameters() {
        let sig = parse_signature("Pair(a, b string)").unwrap();
        assert_eq!(sig.parameters, vec![param("a", "string"), param("b", "string")]);
    }

    #[test]
    fn test_parse_signature_with_receiver() {
        let sig = parse_signature("(v views) Page(title string)").unwrap();
        assert_eq!(sig.name, "Page");
        assert_eq!(sig.parameters, vec![param("title", "string")]);
    }

    #[test]
    fn test_parse_signature_generic_types() {
        let sig = parse_signature("List(items map[string]int, f func(a, b int) bool)").unwrap();
        assert_eq!(
            sig.parameters,
            vec![
                param("items", "map[string]int"),
                param("f", "func(a, b int) bool"),
            ]
        );
    }

    #[test]
    fn test_split_rest() {
        let sig = parse_signature("Input(name string, attrs templ.Attributer)").unwrap();
        let (required, rest) = sig.split_rest();
        assert_eq!(required, &[param("name", "string")]);
        assert_eq!(rest, Some(&param("attrs", "templ.Attributer")));
    }

    #[test]
    fn test_resolver_from_file() {
        let tf = templ_parser::parse_string(
            "package main\n\ntempl Button(label string) {\n\t<button>{ label }</button>\n}\n",
        )
        .unwrap();
        let resolver = TemplSignatureResolver::from_file(&tf);
        let sig = resolver.resolve("Button").unwrap();
        assert_eq!(sig.parameters, vec![param("label", "string")]);
        assert_eq!(resolver.resolve("Missing"), None);
    }
}
