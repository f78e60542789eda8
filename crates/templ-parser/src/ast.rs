//! The template AST.
//!
//! Every node knows how to write itself back out as canonical template
//! source. Writing is idempotent: formatting already-canonical text
//! reproduces it byte for byte, which is what the formatter relies on.

use std::fmt::Write;

use smol_str::SmolStr;
use source_map::Range;

/// A verbatim slice of Go code plus its location in the template source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expression {
    pub value: String,
    pub range: Range,
}

impl Expression {
    pub fn new(value: impl Into<String>, range: Range) -> Self {
        Self {
            value: value.into(),
            range,
        }
    }
}

/// The whitespace that trailed an element, text run, or expression in the
/// source. Canonical writing collapses it to at most one space or newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrailingSpace {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl TrailingSpace {
    /// Classifies a run of captured whitespace. Any line feed wins over
    /// horizontal space.
    pub fn from_str(s: &str) -> Option<Self> {
        let mut has_horizontal = false;
        for c in s.chars() {
            if c == '\n' {
                return Some(Self::Vertical);
            }
            if c.is_whitespace() {
                has_horizontal = true;
                continue;
            }
            return None;
        }
        if has_horizontal {
            Some(Self::Horizontal)
        } else {
            Some(Self::None)
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Horizontal => " ",
            Self::Vertical => "\n",
        }
    }
}

/// Void elements never have children and self-close.
/// https://www.w3.org/TR/2011/WD-html-markup-20110113/syntax.html#void-element
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements formatted as blocks: a line break always precedes them.
/// Some entries are not strictly block elements but are treated as such for
/// layout purposes.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "canvas",
    "dd", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hr",
    "html", "li", "link", "main", "meta", "nav", "noscript", "ol", "p",
    "pre", "script", "section", "style", "table", "td", "template", "tfoot",
    "th", "title", "tr", "turbo-stream", "ul", "video",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

pub fn is_block_element(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

fn write_indent(buf: &mut String, level: usize, parts: &[&str]) {
    for _ in 0..level {
        buf.push('\t');
    }
    for p in parts {
        buf.push_str(p);
    }
}

fn is_all_whitespace(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

/// A node within a template body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    Text(Text),
    Element(Element),
    ElementComponent(ElementComponent),
    ScriptElement(ScriptElement),
    RawElement(RawElement),
    HtmlComment(HtmlComment),
    GoComment(GoComment),
    DocType(DocType),
    Whitespace(Whitespace),
    StringExpression(StringExpression),
    GoCode(GoCode),
    If(IfExpression),
    Switch(SwitchExpression),
    For(ForExpression),
    CallTemplate(CallTemplateExpression),
    TemplElement(TemplElementExpression),
    ChildrenExpression(ChildrenExpression),
    Fallthrough(Fallthrough),
}

impl Node {
    pub fn write(&self, buf: &mut String, indent: usize) {
        match self {
            Self::Text(n) => n.write(buf, indent),
            Self::Element(n) => n.write(buf, indent),
            Self::ElementComponent(n) => n.write(buf, indent),
            Self::ScriptElement(n) => n.write(buf, indent),
            Self::RawElement(n) => n.write(buf, indent),
            Self::HtmlComment(n) => n.write(buf, indent),
            Self::GoComment(n) => n.write(buf, indent),
            Self::DocType(n) => n.write(buf, indent),
            Self::Whitespace(n) => n.write(buf, indent),
            Self::StringExpression(n) => n.write(buf, indent),
            Self::GoCode(n) => n.write(buf, indent),
            Self::If(n) => n.write(buf, indent),
            Self::Switch(n) => n.write(buf, indent),
            Self::For(n) => n.write(buf, indent),
            Self::CallTemplate(n) => n.write(buf, indent),
            Self::TemplElement(n) => n.write(buf, indent),
            Self::ChildrenExpression(n) => n.write(buf, indent),
            Self::Fallthrough(n) => n.write(buf, indent),
        }
    }

    /// The whitespace that followed the node in the source, for nodes that
    /// record it.
    fn trailing(&self) -> Option<TrailingSpace> {
        match self {
            Self::Text(n) => Some(n.trailing_space),
            Self::Element(n) => Some(n.trailing_space),
            Self::ElementComponent(n) => Some(n.trailing_space),
            Self::StringExpression(n) => Some(n.trailing_space),
            Self::GoCode(n) => Some(n.trailing_space),
            _ => None,
        }
    }

    fn is_block(&self) -> bool {
        match self {
            Self::If(_) | Self::Switch(_) | Self::For(_) => true,
            Self::Element(e) => is_block_element(&e.name) || e.indent_children,
            _ => false,
        }
    }

    fn always_break_after(&self) -> bool {
        match self {
            Self::Element(e) => e.name.eq_ignore_ascii_case("br") || e.name.eq_ignore_ascii_case("hr"),
            _ => false,
        }
    }
}

pub(crate) fn write_nodes_indented(buf: &mut String, level: usize, nodes: &[Node]) {
    write_nodes(buf, level, nodes, true)
}

pub(crate) fn write_nodes_inline(buf: &mut String, nodes: &[Node]) {
    write_nodes(buf, 0, nodes, false)
}

fn write_nodes(buf: &mut String, start_level: usize, nodes: &[Node], indent: bool) {
    let mut level = start_level;
    for (i, n) in nodes.iter().enumerate() {
        if matches!(n, Node::Whitespace(_)) {
            continue;
        }
        n.write(buf, level);

        let mut trailing = n.trailing().unwrap_or(TrailingSpace::Vertical);
        let next_is_block = nodes.get(i + 1).is_some_and(Node::is_block);
        if indent && (next_is_block || i == nodes.len() - 1 || n.always_break_after()) {
            trailing = TrailingSpace::Vertical;
        }
        level = match trailing {
            TrailingSpace::None | TrailingSpace::Horizontal => 0,
            TrailingSpace::Vertical => start_level,
        };
        buf.push_str(trailing.as_str());
    }
}

/// A run of literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Text {
    pub range: Range,
    /// The raw HTML-encoded value.
    pub value: String,
    pub trailing_space: TrailingSpace,
}

impl Text {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &[&self.value]);
    }
}

/// `<a .../>` or `<div ...>...</div>`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub name: SmolStr,
    pub attributes: Vec<Attribute>,
    pub indent_attrs: bool,
    pub children: Vec<Node>,
    pub indent_children: bool,
    pub trailing_space: TrailingSpace,
    pub name_range: Range,
}

impl Element {
    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    fn has_non_whitespace_children(&self) -> bool {
        self.children
            .iter()
            .any(|c| !matches!(c, Node::Whitespace(_)))
    }

    /// Checks constraints that hold per element kind. Violations are
    /// reported as messages rather than panics so the caller can decide
    /// whether they are fatal.
    pub fn validate(&self) -> Vec<String> {
        let mut msgs = Vec::new();
        if self.name.eq_ignore_ascii_case("style")
            && self
                .children
                .iter()
                .any(|c| !matches!(c, Node::Text(_) | Node::Whitespace(_)))
        {
            msgs.push("invalid node contents: style elements must only contain text".to_string());
        }
        msgs
    }

    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["<", &self.name]);
        for a in &self.attributes {
            // Only conditional attributes get indented.
            let attr_indent = if self.indent_attrs {
                buf.push('\n');
                indent + 1
            } else {
                buf.push(' ');
                0
            };
            a.write(buf, attr_indent);
        }
        let close_angle_indent = if self.indent_attrs {
            buf.push('\n');
            indent
        } else {
            0
        };
        if self.has_non_whitespace_children() {
            if self.indent_children {
                write_indent(buf, close_angle_indent, &[">\n"]);
                write_nodes_indented(buf, indent + 1, &self.children);
                write_indent(buf, indent, &["</", &self.name, ">"]);
            } else {
                write_indent(buf, close_angle_indent, &[">"]);
                write_nodes_inline(buf, &self.children);
                buf.push_str("</");
                buf.push_str(&self.name);
                buf.push('>');
            }
            return;
        }
        if self.is_void() {
            write_indent(buf, close_angle_indent, &["/>"]);
            return;
        }
        write_indent(buf, close_angle_indent, &["></", &self.name, ">"]);
    }
}

/// A component invoked with element syntax: `<Button label="Save"/>` or
/// `<layout.Page>...</layout.Page>`. The name is uppercase or qualified,
/// which is how it is told apart from an HTML element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementComponent {
    pub name: SmolStr,
    pub name_range: Range,
    pub attributes: Vec<Attribute>,
    pub indent_attrs: bool,
    pub self_closing: bool,
    pub children: Vec<Node>,
    pub indent_children: bool,
    pub trailing_space: TrailingSpace,
    pub range: Range,
}

impl ElementComponent {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["<", &self.name]);
        for a in &self.attributes {
            let attr_indent = if self.indent_attrs {
                buf.push('\n');
                indent + 1
            } else {
                buf.push(' ');
                0
            };
            a.write(buf, attr_indent);
        }
        let close_angle_indent = if self.indent_attrs {
            buf.push('\n');
            indent
        } else {
            0
        };
        if self.self_closing {
            write_indent(buf, close_angle_indent, &["/>"]);
            return;
        }
        if self.indent_children {
            write_indent(buf, close_angle_indent, &[">\n"]);
            write_nodes_indented(buf, indent + 1, &self.children);
            write_indent(buf, indent, &["</", &self.name, ">"]);
        } else {
            write_indent(buf, close_angle_indent, &[">"]);
            write_nodes_inline(buf, &self.children);
            buf.push_str("</");
            buf.push_str(&self.name);
            buf.push('>');
        }
    }
}

/// One segment of a script element's body: either raw script text or an
/// embedded `{{ expr }}` Go expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScriptContents {
    Raw(String),
    Go {
        code: GoCode,
        /// Whether the expression sits inside a script string literal, which
        /// changes how generation escapes the rendered value.
        inside_string_literal: bool,
    },
}

/// `<script>`, with its contents decomposed into raw segments and embedded
/// Go expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptElement {
    pub attributes: Vec<Attribute>,
    pub contents: Vec<ScriptContents>,
}

impl ScriptElement {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["<script"]);
        for a in &self.attributes {
            buf.push(' ');
            a.write(buf, 0);
        }
        buf.push('>');
        for c in &self.contents {
            match c {
                ScriptContents::Raw(value) => buf.push_str(value),
                ScriptContents::Go { code, .. } => {
                    let value = if is_all_whitespace(&code.expression.value) {
                        ""
                    } else {
                        &code.expression.value
                    };
                    let _ = write!(buf, "{{{{ {value} }}}}");
                    buf.push_str(code.trailing_space.as_str());
                }
            }
        }
        buf.push_str("</script>");
    }
}

/// An element whose contents are not parsed as template syntax, e.g.
/// `<style>`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawElement {
    pub name: SmolStr,
    pub attributes: Vec<Attribute>,
    pub contents: String,
}

impl RawElement {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["<", &self.name]);
        for a in &self.attributes {
            buf.push(' ');
            a.write(buf, 0);
        }
        buf.push('>');
        buf.push_str(&self.contents);
        buf.push_str("</");
        buf.push_str(&self.name);
        buf.push('>');
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    /// `<hr noshade/>`
    BoolConstant { name: SmolStr, name_range: Range },
    /// `href="..."` or `href='...'`
    Constant {
        name: SmolStr,
        value: String,
        single_quote: bool,
        name_range: Range,
    },
    /// `selected?={ isSelected }`
    BoolExpression {
        name: SmolStr,
        expression: Expression,
        name_range: Range,
    },
    /// `href={ url }`
    Expression {
        name: SmolStr,
        expression: Expression,
        name_range: Range,
    },
    /// `{ attrs... }`
    Spread { expression: Expression },
    /// An `if`/`else` block over attribute lists.
    Conditional {
        expression: Expression,
        then: Vec<Attribute>,
        else_: Vec<Attribute>,
    },
}

impl Attribute {
    /// The attribute name, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::BoolConstant { name, .. }
            | Self::Constant { name, .. }
            | Self::BoolExpression { name, .. }
            | Self::Expression { name, .. } => Some(name.as_str()),
            Self::Spread { .. } | Self::Conditional { .. } => None,
        }
    }

    pub fn write(&self, buf: &mut String, indent: usize) {
        match self {
            Self::BoolConstant { name, .. } => write_indent(buf, indent, &[name]),
            Self::Constant {
                name,
                value,
                single_quote,
                ..
            } => {
                let quote = if *single_quote { "'" } else { "\"" };
                write_indent(buf, indent, &[name, "=", quote, value, quote]);
            }
            Self::BoolExpression {
                name, expression, ..
            } => {
                write_indent(buf, indent, &[name, "?={ ", &expression.value, " }"]);
            }
            Self::Expression {
                name, expression, ..
            } => {
                let trimmed = expression.value.trim();
                if !trimmed.contains('\n') {
                    write_indent(buf, indent, &[name, "={ ", trimmed, " }"]);
                } else {
                    write_indent(buf, indent, &[name, "={\n"]);
                    for line in trimmed.split('\n') {
                        write_indent(buf, indent, &[line, "\n"]);
                    }
                    write_indent(buf, indent, &["}"]);
                }
            }
            Self::Spread { expression } => {
                write_indent(buf, indent, &["{ ", &expression.value, "... }"]);
            }
            Self::Conditional {
                expression,
                then,
                else_,
            } => {
                write_indent(buf, indent, &["if ", &expression.value, " {\n"]);
                for attr in then {
                    attr.write(buf, indent + 1);
                    buf.push('\n');
                }
                write_indent(buf, indent, &["}"]);
                if !else_.is_empty() {
                    buf.push_str(" else {\n");
                    for attr in else_ {
                        attr.write(buf, indent + 1);
                        buf.push('\n');
                    }
                    write_indent(buf, indent, &["}"]);
                }
            }
        }
    }
}

/// `<!-- ... -->`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HtmlComment {
    pub contents: String,
}

impl HtmlComment {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["<!--", &self.contents, "-->"]);
    }
}

/// `// ...` or `/* ... */` within template markup. Not rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoComment {
    pub contents: String,
    pub multiline: bool,
}

impl GoComment {
    pub fn write(&self, buf: &mut String, indent: usize) {
        if self.multiline {
            write_indent(buf, indent, &["/*", &self.contents, "*/"]);
        } else {
            write_indent(buf, indent, &["//", &self.contents]);
        }
    }
}

/// `<!DOCTYPE html>`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocType {
    pub value: String,
}

impl DocType {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["<!DOCTYPE ", &self.value, ">"]);
    }
}

/// A run of insignificant whitespace between nodes.
///
/// Canonical writing collapses it: a run containing a line break becomes a
/// single space, anything else is dropped, matching how HTML lays out
/// inter-element whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Whitespace {
    pub value: String,
}

impl Whitespace {
    pub fn write(&self, buf: &mut String, _indent: usize) {
        if !self.value.is_empty() && self.value.contains('\n') {
            buf.push(' ');
        }
    }
}

/// `{ expr }` rendering an escaped string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringExpression {
    pub expression: Expression,
    pub trailing_space: TrailingSpace,
}

impl StringExpression {
    pub fn write(&self, buf: &mut String, indent: usize) {
        let value = if is_all_whitespace(&self.expression.value) {
            ""
        } else {
            self.expression.value.as_str()
        };
        write_indent(buf, indent, &["{ ", value, " }"]);
    }
}

/// `{{ code }}` running arbitrary Go without rendering output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoCode {
    pub expression: Expression,
    pub trailing_space: TrailingSpace,
    pub multiline: bool,
}

impl GoCode {
    pub fn write(&self, buf: &mut String, indent: usize) {
        let value = if is_all_whitespace(&self.expression.value) {
            ""
        } else {
            self.expression.value.as_str()
        };
        if !self.multiline {
            write_indent(buf, indent, &["{{ ", value, " }}"]);
        } else {
            write_indent(buf, indent, &["{{", value, "\n"]);
            write_indent(buf, indent, &["}}"]);
        }
    }
}

/// `if cond { ... } else if other { ... } else { ... }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IfExpression {
    pub expression: Expression,
    pub then: Vec<Node>,
    pub else_ifs: Vec<ElseIfExpression>,
    pub else_: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElseIfExpression {
    pub expression: Expression,
    pub then: Vec<Node>,
}

impl IfExpression {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["if ", &self.expression.value, " {\n"]);
        write_nodes_indented(buf, indent + 1, &self.then);
        for else_if in &self.else_ifs {
            write_indent(buf, indent, &["} else if ", &else_if.expression.value, " {\n"]);
            write_nodes_indented(buf, indent + 1, &else_if.then);
        }
        if !self.else_.is_empty() {
            write_indent(buf, indent, &["} else {\n"]);
            write_nodes_indented(buf, indent + 1, &self.else_);
        }
        write_indent(buf, indent, &["}"]);
    }
}

/// `switch expr { case ...: }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchExpression {
    pub expression: Expression,
    pub cases: Vec<CaseExpression>,
}

/// `case "value":` or `default:`, with the clause head kept verbatim
/// including the colon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseExpression {
    pub expression: Expression,
    pub children: Vec<Node>,
}

impl SwitchExpression {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["switch ", &self.expression.value, " {\n"]);
        for c in &self.cases {
            write_indent(buf, indent + 1, &[&c.expression.value, "\n"]);
            write_nodes_indented(buf, indent + 2, &c.children);
        }
        write_indent(buf, indent, &["}"]);
    }
}

/// `for clause { ... }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForExpression {
    pub expression: Expression,
    pub children: Vec<Node>,
}

impl ForExpression {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["for ", &self.expression.value, " {\n"]);
        write_nodes_indented(buf, indent + 1, &self.children);
        write_indent(buf, indent, &["}"]);
    }
}

/// `{! Other(p.First) }` legacy call syntax. Canonical writing rewrites it
/// to the `@` form.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallTemplateExpression {
    pub expression: Expression,
}

impl CallTemplateExpression {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["@", &self.expression.value]);
    }
}

/// `@Other(p.First, p.Last)`, optionally with a block of children.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplElementExpression {
    pub expression: Expression,
    pub children: Vec<Node>,
}

impl TemplElementExpression {
    pub fn write(&self, buf: &mut String, indent: usize) {
        for (i, line) in self.expression.value.split('\n').enumerate() {
            if i == 0 {
                write_indent(buf, indent, &["@", line]);
            } else {
                buf.push('\n');
                write_indent(buf, indent, &[line]);
            }
        }
        if self.children.is_empty() {
            return;
        }
        buf.push_str(" {\n");
        write_nodes_indented(buf, indent + 1, &self.children);
        write_indent(buf, indent, &["}"]);
    }
}

/// `{ children... }` rendering the children passed to the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChildrenExpression;

impl ChildrenExpression {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["{ children... }"]);
    }
}

/// `fallthrough` within a switch case.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fallthrough {
    pub range: Range,
}

impl Fallthrough {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["fallthrough"]);
    }
}

/// The `package` clause.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    pub expression: Expression,
}

/// Raw Go code between templates: imports, types, functions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateFileGoExpression {
    pub expression: Expression,
}

impl TemplateFileGoExpression {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &[&self.expression.value]);
    }
}

/// `templ Name(params) { ... }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HtmlTemplate {
    pub range: Range,
    /// The name and parameter list, e.g. `Name(p Person)`.
    pub expression: Expression,
    pub children: Vec<Node>,
}

impl HtmlTemplate {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["templ ", &self.expression.value, " {\n"]);
        write_nodes_indented(buf, indent + 1, &self.children);
        write_indent(buf, indent, &["}"]);
    }
}

/// A CSS class template property: constant or expression-valued.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CssProperty {
    /// `color: #ffffff;`
    Constant { name: SmolStr, value: String },
    /// `background-color: { constants.BackgroundColor };`
    Expression {
        name: SmolStr,
        value: StringExpression,
    },
}

impl CssProperty {
    pub fn name(&self) -> &str {
        match self {
            Self::Constant { name, .. } | Self::Expression { name, .. } => name.as_str(),
        }
    }

    pub fn write(&self, buf: &mut String, indent: usize) {
        match self {
            Self::Constant { name, value } => {
                write_indent(buf, indent, &[name, ": ", value, ";\n"]);
            }
            Self::Expression { name, value } => {
                write_indent(buf, indent, &[name, ": "]);
                value.write(buf, 0);
                buf.push_str(";\n");
            }
        }
    }
}

/// `css Name() { ... }` defining a CSS class with dynamic values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CssTemplate {
    pub range: Range,
    pub name: SmolStr,
    /// The name and parameter list.
    pub expression: Expression,
    pub properties: Vec<CssProperty>,
}

impl CssTemplate {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(buf, indent, &["css ", &self.expression.value, " {\n"]);
        for p in &self.properties {
            p.write(buf, indent + 1);
        }
        write_indent(buf, indent, &["}"]);
    }
}

/// `script Name(params) { ... }` defining a client-side script function.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptTemplate {
    pub range: Range,
    pub name: Expression,
    pub parameters: Expression,
    /// The raw script body.
    pub value: String,
}

impl ScriptTemplate {
    pub fn write(&self, buf: &mut String, indent: usize) {
        write_indent(
            buf,
            indent,
            &["script ", &self.name.value, "(", &self.parameters.value, ") {\n"],
        );
        buf.push_str(&self.value);
        write_indent(buf, indent, &["}"]);
    }
}

/// A top-level item in a template file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplateFileNode {
    Go(TemplateFileGoExpression),
    Html(HtmlTemplate),
    Css(CssTemplate),
    Script(ScriptTemplate),
}

impl TemplateFileNode {
    pub fn write(&self, buf: &mut String, indent: usize) {
        match self {
            Self::Go(n) => n.write(buf, indent),
            Self::Html(n) => n.write(buf, indent),
            Self::Css(n) => n.write(buf, indent),
            Self::Script(n) => n.write(buf, indent),
        }
    }
}

/// The parse result for one template file.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateFile {
    /// Comments and whitespace before the package clause.
    pub header: Vec<TemplateFileGoExpression>,
    pub package: Package,
    /// Where the file was loaded from, when known. Used for display only.
    pub filepath: Option<String>,
    pub nodes: Vec<TemplateFileNode>,
}

impl TemplateFile {
    /// Writes the file back out in canonical form.
    pub fn write(&self, buf: &mut String) {
        for h in &self.header {
            h.write(buf, 0);
        }
        buf.push_str(&self.package.expression.value);
        buf.push_str("\n\n");
        for (i, n) in self.nodes.iter().enumerate() {
            n.write(buf, 0);
            buf.push_str(self.node_whitespace(i));
        }
    }

    /// A Go comment directly above a template stays attached to it; all
    /// other top-level items are separated by a blank line.
    fn node_whitespace(&self, i: usize) -> &'static str {
        if i == self.nodes.len() - 1 {
            return "\n";
        }
        if matches!(self.nodes.get(i + 1), Some(TemplateFileNode::Html(_))) {
            if let Some(TemplateFileNode::Go(g)) = self.nodes.get(i) {
                let last_line = g.expression.value.rsplit('\n').next().unwrap_or("");
                if last_line.starts_with("//") {
                    return "\n";
                }
            }
        }
        "\n\n"
    }
}
