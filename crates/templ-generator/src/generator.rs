//! The tree walk that turns a parsed template file into Go source.
//!
//! Every templ template becomes a function returning `templ.Component`; css
//! and script templates become functions returning their runtime value
//! types. Embedded Go expressions are copied into the output verbatim and
//! recorded in the source map so tooling can translate positions in either
//! direction.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};
use source_map::SourceMap;
use templ_parser::ast::{
    Attribute, CssProperty, CssTemplate, Element, ElementComponent, Expression, GoCode,
    HtmlComment, HtmlTemplate, Node, RawElement, ScriptContents, ScriptElement, ScriptTemplate,
    TemplElementExpression, TemplateFile, TemplateFileGoExpression, TemplateFileNode, Whitespace,
};

use crate::error::GenerateError;
use crate::rangewriter::RangeWriter;
use crate::signature::SignatureResolver;

/// Generated Go source plus the position map built while writing it.
#[derive(Debug)]
pub struct GeneratedFile {
    pub code: String,
    pub source_map: SourceMap,
}

/// Generates Go source for a parsed template file. Component invocations are
/// resolved through `resolver`; a component it cannot resolve is a fatal
/// error.
pub fn generate(
    tf: &TemplateFile,
    resolver: &dyn SignatureResolver,
) -> Result<GeneratedFile, GenerateError> {
    let mut g = Generator {
        w: RangeWriter::new(),
        source_map: SourceMap::new(),
        resolver,
        variable_id: 0,
        children_var: String::new(),
    };
    g.generate(tf)?;
    Ok(GeneratedFile {
        code: g.w.into_string(),
        source_map: g.source_map,
    })
}

struct Generator<'a> {
    w: RangeWriter,
    source_map: SourceMap,
    resolver: &'a dyn SignatureResolver,
    variable_id: usize,
    children_var: String,
}

impl Generator<'_> {
    fn generate(&mut self, tf: &TemplateFile) -> Result<(), GenerateError> {
        self.w.write(concat!(
            "// Code generated by templ-gen v",
            env!("CARGO_PKG_VERSION"),
            " DO NOT EDIT.\n\n"
        ));
        self.write_package(tf);
        self.write_imports(tf);
        for node in &tf.nodes {
            match node {
                TemplateFileNode::Go(n) => self.write_file_go_expression(n),
                TemplateFileNode::Html(t) => self.write_template(t)?,
                TemplateFileNode::Css(c) => self.write_css(c),
                TemplateFileNode::Script(s) => self.write_script(s),
            }
        }
        Ok(())
    }

    /// Copies an expression into the output and records the mapping.
    fn write_expr(&mut self, e: &Expression) {
        let r = self.w.write(&e.value);
        self.source_map.add(&e.value, e.range, r);
    }

    fn create_variable_name(&mut self) -> String {
        self.variable_id += 1;
        format!("var_{}", self.variable_id)
    }

    fn write_error_handler(&mut self, level: usize) {
        self.w.write_indent(level, "if err != nil {\n");
        self.w.write_indent(level + 1, "return err\n");
        self.w.write_indent(level, "}\n");
    }

    fn write_package(&mut self, tf: &TemplateFile) {
        self.write_expr(&tf.package.expression);
        self.w.write("\n\n");
        self.w.write(
            "//lint:file-ignore SA4006 This context is only used if a nested component is present.\n\n",
        );
    }

    fn write_imports(&mut self, tf: &TemplateFile) {
        let mut has_templates = false;
        let mut has_css = false;
        for n in &tf.nodes {
            match n {
                TemplateFileNode::Html(_) => has_templates = true,
                TemplateFileNode::Css(_) => has_css = true,
                _ => {}
            }
        }
        self.w.write("import \"github.com/a-h/templ\"\n");
        if has_templates {
            self.w.write("import \"context\"\n");
            self.w.write("import \"io\"\n");
            self.w.write("import \"bytes\"\n");
        }
        if has_css {
            self.w.write("import \"strings\"\n");
        }
        self.w.write("\n");
    }

    fn write_file_go_expression(&mut self, n: &TemplateFileGoExpression) {
        self.write_expr(&n.expression);
        self.w.write("\n\n");
    }

    fn write_template(&mut self, t: &HtmlTemplate) -> Result<(), GenerateError> {
        self.w.write("func ");
        self.write_expr(&t.expression);
        self.w.write(" templ.Component {\n");
        self.w.write_indent(
            1,
            "return templ.ComponentFunc(func(ctx context.Context, w io.Writer) (err error) {\n",
        );
        let level = 2;
        self.w
            .write_indent(level, "templBuffer, templIsBuffer := w.(*bytes.Buffer)\n");
        self.w.write_indent(level, "if !templIsBuffer {\n");
        self.w.write_indent(level + 1, "templBuffer = templ.GetBuffer()\n");
        self.w
            .write_indent(level + 1, "defer templ.ReleaseBuffer(templBuffer)\n");
        self.w.write_indent(level, "}\n");
        self.w.write_indent(level, "ctx = templ.InitializeContext(ctx)\n");
        self.children_var = self.create_variable_name();
        let cv = self.children_var.clone();
        self.w
            .write_indent(level, &format!("{cv} := templ.GetChildren(ctx)\n"));
        self.w.write_indent(level, &format!("if {cv} == nil {{\n"));
        self.w
            .write_indent(level + 1, &format!("{cv} = templ.NopComponent\n"));
        self.w.write_indent(level, "}\n");
        self.w.write_indent(level, "ctx = templ.ClearChildren(ctx)\n");
        self.write_nodes(level, strip_whitespace(&t.children))?;
        self.w.write_indent(level, "if !templIsBuffer {\n");
        self.w.write_indent(level + 1, "_, err = io.Copy(w, templBuffer)\n");
        self.w.write_indent(level, "}\n");
        self.w.write_indent(level, "return err\n");
        self.w.write_indent(1, "})\n");
        self.w.write("}\n\n");
        Ok(())
    }

    fn write_nodes(&mut self, level: usize, nodes: Vec<&Node>) -> Result<(), GenerateError> {
        for n in nodes {
            self.write_node(level, n)?;
        }
        Ok(())
    }

    fn write_node(&mut self, level: usize, n: &Node) -> Result<(), GenerateError> {
        match n {
            Node::Text(t) => self.write_text(level, &t.value),
            Node::Element(e) => self.write_element(level, e)?,
            Node::ElementComponent(c) => self.write_element_component(level, c)?,
            Node::ScriptElement(s) => self.write_script_element(level, s)?,
            Node::RawElement(r) => self.write_raw_element(level, r),
            Node::HtmlComment(c) => self.write_html_comment(level, c),
            // Go comments are for template authors, not output.
            Node::GoComment(_) => {}
            Node::DocType(d) => {
                self.w.write_indent(
                    level,
                    &format!("_, err = templBuffer.WriteString(`<!doctype {}>`)\n", d.value),
                );
                self.write_error_handler(level);
            }
            Node::Whitespace(ws) => self.write_whitespace(level, ws),
            Node::StringExpression(s) => self.write_string_expression(level, &s.expression),
            Node::GoCode(c) => self.write_go_code(level, c),
            Node::If(i) => {
                self.w.write_indent(level, "if ");
                self.write_expr(&i.expression);
                self.w.write(" {\n");
                self.write_nodes(level + 1, trim_whitespace(&i.then))?;
                for else_if in &i.else_ifs {
                    self.w.write_indent(level, "} else if ");
                    self.write_expr(&else_if.expression);
                    self.w.write(" {\n");
                    self.write_nodes(level + 1, trim_whitespace(&else_if.then))?;
                }
                if !i.else_.is_empty() {
                    self.w.write_indent(level, "} else {\n");
                    self.write_nodes(level + 1, trim_whitespace(&i.else_))?;
                }
                self.w.write_indent(level, "}\n");
            }
            Node::Switch(s) => {
                self.w.write_indent(level, "switch ");
                self.write_expr(&s.expression);
                self.w.write(" {\n");
                for case in &s.cases {
                    self.w.write_indent(level, "");
                    self.write_expr(&case.expression);
                    self.w.write("\n");
                    self.write_nodes(level + 1, trim_whitespace(&case.children))?;
                }
                self.w.write_indent(level, "}\n");
            }
            Node::For(f) => {
                self.w.write_indent(level, "for ");
                self.write_expr(&f.expression);
                self.w.write(" {\n");
                self.write_nodes(level + 1, trim_whitespace(&f.children))?;
                self.w.write_indent(level, "}\n");
            }
            Node::CallTemplate(c) => self.write_component_render(level, &c.expression),
            Node::TemplElement(t) => self.write_templ_element(level, t)?,
            Node::ChildrenExpression(_) => {
                let cv = self.children_var.clone();
                self.w
                    .write_indent(level, &format!("err = {cv}.Render(ctx, templBuffer)\n"));
                self.write_error_handler(level);
            }
            Node::Fallthrough(_) => {
                self.w.write_indent(level, "fallthrough\n");
            }
        }
        Ok(())
    }

    fn write_text(&mut self, level: usize, value: &str) {
        let vn = self.create_variable_name();
        self.w
            .write_indent(level, &format!("{vn} := {}\n", go_string(value)));
        self.w
            .write_indent(level, &format!("_, err = templBuffer.WriteString({vn})\n"));
        self.write_error_handler(level);
    }

    fn write_html_comment(&mut self, level: usize, n: &HtmlComment) {
        self.write_text(level, &format!("<!--{}-->", n.contents));
    }

    fn write_whitespace(&mut self, level: usize, n: &Whitespace) {
        if n.value.is_empty() {
            return;
        }
        self.w
            .write_indent(level, "_, err = templBuffer.WriteString(` `)\n");
        self.write_error_handler(level);
    }

    fn write_string_expression(&mut self, level: usize, e: &Expression) {
        let vn = self.create_variable_name();
        self.w.write_indent(level, &format!("var {vn} string = "));
        self.write_expr(e);
        self.w.write("\n");
        self.w.write_indent(
            level,
            &format!("_, err = templBuffer.WriteString(templ.EscapeString({vn}))\n"),
        );
        self.write_error_handler(level);
    }

    fn write_go_code(&mut self, level: usize, n: &GoCode) {
        self.w.write_indent(level, "");
        self.write_expr(&n.expression);
        self.w.write("\n");
    }

    fn write_component_render(&mut self, level: usize, e: &Expression) {
        self.w.write_indent(level, "err = ");
        self.write_expr(e);
        self.w.write(".Render(ctx, templBuffer)\n");
        self.write_error_handler(level);
    }

    fn write_templ_element(
        &mut self,
        level: usize,
        n: &TemplElementExpression,
    ) -> Result<(), GenerateError> {
        if n.children.is_empty() {
            self.write_component_render(level, &n.expression);
            return Ok(());
        }
        let children_name = self.create_variable_name();
        self.w.write_indent(
            level,
            &format!(
                "{children_name} := templ.ComponentFunc(func(ctx context.Context, w io.Writer) (err error) {{\n"
            ),
        );
        self.write_nodes(level + 1, trim_whitespace(&n.children))?;
        self.w.write_indent(level + 1, "return err\n");
        self.w.write_indent(level, "})\n");
        self.w.write_indent(level, "err = ");
        self.write_expr(&n.expression);
        self.w.write(&format!(
            ".Render(templ.WithChildren(ctx, {children_name}), templBuffer)\n"
        ));
        self.write_error_handler(level);
        Ok(())
    }

    fn write_element(&mut self, level: usize, n: &Element) -> Result<(), GenerateError> {
        let name = escape_html(&n.name);
        if n.is_void() {
            if n.attributes.is_empty() {
                self.w.write_indent(
                    level,
                    &format!("_, err = templBuffer.WriteString(\"<{name}>\")\n"),
                );
                self.write_error_handler(level);
                return Ok(());
            }
            self.write_open_tag(level, &name, &n.name, &n.attributes);
            return Ok(());
        }

        if n.attributes.is_empty() {
            self.w.write_indent(
                level,
                &format!("_, err = templBuffer.WriteString(\"<{name}>\")\n"),
            );
            self.write_error_handler(level);
        } else {
            self.write_open_tag(level, &name, &n.name, &n.attributes);
        }
        self.write_nodes(level, strip_non_critical_whitespace(&n.children))?;
        self.w.write_indent(
            level,
            &format!("_, err = templBuffer.WriteString(\"</{name}>\")\n"),
        );
        self.write_error_handler(level);
        Ok(())
    }

    /// Writes `<name`, the attributes, and `>`. Class expressions and script
    /// handlers cause CSS/script rendering before the tag, which is why this
    /// runs the prelude first.
    fn write_open_tag(
        &mut self,
        level: usize,
        escaped_name: &str,
        element_name: &str,
        attributes: &[Attribute],
    ) {
        let overrides = self.write_element_css(level, attributes);
        self.write_element_script(level, attributes);
        self.w.write_indent(
            level,
            &format!("_, err = templBuffer.WriteString(\"<{escaped_name}\")\n"),
        );
        self.write_error_handler(level);
        self.write_attributes(level, element_name, attributes, &overrides);
        self.w
            .write_indent(level, "_, err = templBuffer.WriteString(\">\")\n");
        self.write_error_handler(level);
    }

    /// Renders the CSS classes referenced by a `class={ ... }` attribute
    /// before the element, and rewrites the attribute to print the resolved
    /// class string instead of re-evaluating the expression.
    fn write_element_css(
        &mut self,
        level: usize,
        attributes: &[Attribute],
    ) -> FxHashMap<usize, String> {
        let mut overrides = FxHashMap::default();
        for (i, attr) in attributes.iter().enumerate() {
            if let Attribute::Expression {
                name, expression, ..
            } = attr
            {
                if name.as_str() != "class" {
                    continue;
                }
                let classes = self.create_variable_name();
                self.w
                    .write_indent(level, &format!("var {classes} templ.CSSClasses = "));
                self.write_expr(expression);
                self.w.write("\n");
                self.w.write_indent(
                    level,
                    &format!("err = templ.RenderCSSItems(ctx, templBuffer, {classes}...)\n"),
                );
                self.write_error_handler(level);
                overrides.insert(i, format!("{classes}.String()"));
            }
        }
        overrides
    }

    fn write_element_script(&mut self, level: usize, attributes: &[Attribute]) {
        let mut script_exprs = Vec::new();
        for attr in attributes {
            if let Attribute::Expression {
                name, expression, ..
            } = attr
            {
                if name.starts_with("on") {
                    script_exprs.push(expression.value.clone());
                }
            }
        }
        if script_exprs.is_empty() {
            return;
        }
        self.w.write_indent(
            level,
            &format!(
                "err = templ.RenderScriptItems(ctx, templBuffer, {})\n",
                script_exprs.join(", ")
            ),
        );
        self.write_error_handler(level);
    }

    fn write_attributes(
        &mut self,
        level: usize,
        element_name: &str,
        attributes: &[Attribute],
        overrides: &FxHashMap<usize, String>,
    ) {
        for (i, attr) in attributes.iter().enumerate() {
            self.write_attribute(level, element_name, attr, overrides.get(&i).map(String::as_str));
        }
    }

    fn write_attribute(
        &mut self,
        level: usize,
        element_name: &str,
        attr: &Attribute,
        override_expr: Option<&str>,
    ) {
        match attr {
            Attribute::BoolConstant { name, .. } => {
                self.w.write_indent(
                    level,
                    &format!("_, err = templBuffer.WriteString(\" {}\")\n", escape_html(name)),
                );
                self.write_error_handler(level);
            }
            Attribute::Constant { name, value, .. } => {
                self.w.write_indent(
                    level,
                    &format!(
                        "_, err = templBuffer.WriteString(\" {}=\\\"{}\\\"\")\n",
                        escape_html(name),
                        escape_html(value)
                    ),
                );
                self.write_error_handler(level);
            }
            Attribute::BoolExpression {
                name, expression, ..
            } => {
                self.w.write_indent(level, "if ");
                self.write_expr(expression);
                self.w.write(" {\n");
                self.w.write_indent(
                    level + 1,
                    &format!("_, err = templBuffer.WriteString(\" {}\")\n", escape_html(name)),
                );
                self.write_error_handler(level + 1);
                self.w.write_indent(level, "}\n");
            }
            Attribute::Expression {
                name, expression, ..
            } => self.write_expression_attribute(level, element_name, name, expression, override_expr),
            Attribute::Spread { expression } => {
                self.w
                    .write_indent(level, "err = templ.RenderAttributes(ctx, templBuffer, ");
                self.write_expr(expression);
                self.w.write(")\n");
                self.write_error_handler(level);
            }
            Attribute::Conditional {
                expression,
                then,
                else_,
            } => {
                self.w.write_indent(level, "if ");
                self.write_expr(expression);
                self.w.write(" {\n");
                self.write_attributes(level + 1, element_name, then, &FxHashMap::default());
                if !else_.is_empty() {
                    self.w.write_indent(level, "} else {\n");
                    self.write_attributes(level + 1, element_name, else_, &FxHashMap::default());
                }
                self.w.write_indent(level, "}\n");
            }
        }
    }

    fn write_expression_attribute(
        &mut self,
        level: usize,
        element_name: &str,
        name: &str,
        expression: &Expression,
        override_expr: Option<&str>,
    ) {
        let attr_name = escape_html(name);
        self.w.write_indent(
            level,
            &format!("_, err = templBuffer.WriteString(\" {attr_name}=\")\n"),
        );
        self.write_error_handler(level);
        self.w
            .write_indent(level, "_, err = templBuffer.WriteString(\"\\\"\")\n");
        self.write_error_handler(level);
        if element_name == "a" && name == "href" {
            // Links go through the URL sanitizer rather than plain escaping.
            let vn = self.create_variable_name();
            self.w
                .write_indent(level, &format!("var {vn} templ.SafeURL = "));
            self.write_override_or_expr(expression, override_expr);
            self.w.write("\n");
            self.w.write_indent(
                level,
                &format!("_, err = templBuffer.WriteString(templ.EscapeString(string({vn})))\n"),
            );
            self.write_error_handler(level);
        } else if name.starts_with("on") {
            // Event handlers expect a script expression, not a string.
            let vn = self.create_variable_name();
            self.w
                .write_indent(level, &format!("var {vn} templ.ComponentScript = "));
            self.write_override_or_expr(expression, override_expr);
            self.w.write("\n");
            self.w.write_indent(
                level,
                &format!("_, err = templBuffer.WriteString({vn}.Call)\n"),
            );
            self.write_error_handler(level);
        } else {
            self.w
                .write_indent(level, "_, err = templBuffer.WriteString(templ.EscapeString(");
            self.write_override_or_expr(expression, override_expr);
            self.w.write("))\n");
            self.write_error_handler(level);
        }
        self.w
            .write_indent(level, "_, err = templBuffer.WriteString(\"\\\"\")\n");
        self.write_error_handler(level);
    }

    fn write_override_or_expr(&mut self, expression: &Expression, override_expr: Option<&str>) {
        match override_expr {
            Some(s) => {
                self.w.write(s);
            }
            None => self.write_expr(expression),
        }
    }

    fn write_raw_element(&mut self, level: usize, n: &RawElement) {
        let name = escape_html(&n.name);
        if n.attributes.is_empty() {
            self.w.write_indent(
                level,
                &format!("_, err = templBuffer.WriteString(\"<{name}>\")\n"),
            );
            self.write_error_handler(level);
        } else {
            self.write_open_tag(level, &name, &n.name, &n.attributes);
        }
        self.write_text(level, &n.contents);
        self.w.write_indent(
            level,
            &format!("_, err = templBuffer.WriteString(\"</{name}>\")\n"),
        );
        self.write_error_handler(level);
    }

    fn write_script_element(
        &mut self,
        level: usize,
        n: &ScriptElement,
    ) -> Result<(), GenerateError> {
        if n.attributes.is_empty() {
            self.w
                .write_indent(level, "_, err = templBuffer.WriteString(\"<script>\")\n");
            self.write_error_handler(level);
        } else {
            self.write_open_tag(level, "script", "script", &n.attributes);
        }
        for c in &n.contents {
            match c {
                ScriptContents::Raw(s) => self.write_text(level, s),
                ScriptContents::Go {
                    code,
                    inside_string_literal,
                } => {
                    let vn = self.create_variable_name();
                    self.w.write_indent(level, &format!("var {vn} string = "));
                    self.write_expr(&code.expression);
                    self.w.write("\n");
                    if *inside_string_literal {
                        // The surrounding script quotes the value already.
                        self.w.write_indent(
                            level,
                            &format!("_, err = templBuffer.WriteString({vn})\n"),
                        );
                    } else {
                        self.w.write_indent(
                            level,
                            &format!("_, err = templBuffer.WriteString(templ.EscapeString({vn}))\n"),
                        );
                    }
                    self.write_error_handler(level);
                }
            }
        }
        self.w
            .write_indent(level, "_, err = templBuffer.WriteString(\"</script>\")\n");
        self.write_error_handler(level);
        Ok(())
    }

    fn write_element_component(
        &mut self,
        level: usize,
        n: &ElementComponent,
    ) -> Result<(), GenerateError> {
        let sig = self.resolver.resolve(&n.name).ok_or_else(|| {
            GenerateError::ComponentNotFound {
                name: n.name.to_string(),
                position: n.name_range.from,
            }
        })?;
        let (required, rest_param) = sig.split_rest();

        let mut named: FxHashMap<&str, &Attribute> = FxHashMap::default();
        let mut rest_attrs: Vec<&Attribute> = Vec::new();
        for attr in &n.attributes {
            match attr.name() {
                Some(aname) if required.iter().any(|p| p.name == aname) => {
                    named.insert(aname, attr);
                }
                _ => rest_attrs.push(attr),
            }
        }

        let mut args = Vec::with_capacity(required.len() + 1);
        for p in required {
            let attr = named.get(p.name.as_str()).copied().ok_or_else(|| {
                GenerateError::MissingAttribute {
                    component: n.name.to_string(),
                    parameter: p.name.clone(),
                    position: n.name_range.from,
                }
            })?;
            args.push(self.write_component_arg(level, attr));
        }
        if rest_param.is_some() {
            let rest_var = self.create_variable_name();
            self.w
                .write_indent(level, &format!("var {rest_var} = templ.OrderedAttributes{{}}\n"));
            for attr in rest_attrs {
                self.write_rest_attribute(level, &rest_var, attr);
            }
            args.push(rest_var);
        }

        if n.children.is_empty() {
            self.w.write_indent(level, "err = ");
            self.write_component_name(n);
            self.w.write(&format!("({})", args.join(", ")));
            self.w.write(".Render(ctx, templBuffer)\n");
            self.write_error_handler(level);
            return Ok(());
        }

        let children_name = self.create_variable_name();
        self.w.write_indent(
            level,
            &format!(
                "{children_name} := templ.ComponentFunc(func(ctx context.Context, w io.Writer) (err error) {{\n"
            ),
        );
        self.write_nodes(level + 1, trim_whitespace(&n.children))?;
        self.w.write_indent(level + 1, "return err\n");
        self.w.write_indent(level, "})\n");
        self.w.write_indent(level, "err = ");
        self.write_component_name(n);
        self.w.write(&format!("({})", args.join(", ")));
        self.w.write(&format!(
            ".Render(templ.WithChildren(ctx, {children_name}), templBuffer)\n"
        ));
        self.write_error_handler(level);
        Ok(())
    }

    fn write_component_name(&mut self, n: &ElementComponent) {
        let r = self.w.write(&n.name);
        self.source_map.add(&n.name, n.name_range, r);
    }

    /// Emits any variable the argument needs and returns the Go expression
    /// to pass for it.
    fn write_component_arg(&mut self, level: usize, attr: &Attribute) -> String {
        match attr {
            Attribute::Constant { value, .. } => go_quote(value),
            Attribute::BoolConstant { .. } => "true".to_string(),
            Attribute::Expression { expression, .. }
            | Attribute::BoolExpression { expression, .. } => {
                let vn = self.create_variable_name();
                self.w.write_indent(level, &format!("{vn} := "));
                self.write_expr(expression);
                self.w.write("\n");
                vn
            }
            // Unnamed attributes never match a parameter; they are collected
            // into the rest bag instead.
            Attribute::Spread { .. } | Attribute::Conditional { .. } => String::new(),
        }
    }

    fn write_rest_attribute(&mut self, level: usize, rest_var: &str, attr: &Attribute) {
        match attr {
            Attribute::BoolConstant { name, .. } => {
                self.write_rest_append(level, rest_var, name, "true");
            }
            Attribute::Constant { name, value, .. } => {
                let v = go_quote(value);
                self.write_rest_append(level, rest_var, name, &v);
            }
            Attribute::BoolExpression {
                name, expression, ..
            } => {
                self.w.write_indent(level, "if ");
                self.write_expr(expression);
                self.w.write(" {\n");
                self.write_rest_append(level + 1, rest_var, name, "true");
                self.w.write_indent(level, "}\n");
            }
            Attribute::Expression {
                name, expression, ..
            } => {
                let vn = self.create_variable_name();
                self.w.write_indent(level, &format!("{vn} := "));
                self.write_expr(expression);
                self.w.write("\n");
                self.write_rest_append(level, rest_var, name, &vn);
            }
            Attribute::Spread { expression } => {
                self.w
                    .write_indent(level, &format!("{rest_var} = append({rest_var}, "));
                self.write_expr(expression);
                self.w.write(".Items()...)\n");
            }
            Attribute::Conditional {
                expression,
                then,
                else_,
            } => {
                self.w.write_indent(level, "if ");
                self.write_expr(expression);
                self.w.write(" {\n");
                for a in then {
                    self.write_rest_attribute(level + 1, rest_var, a);
                }
                if !else_.is_empty() {
                    self.w.write_indent(level, "} else {\n");
                    for a in else_ {
                        self.write_rest_attribute(level + 1, rest_var, a);
                    }
                }
                self.w.write_indent(level, "}\n");
            }
        }
    }

    fn write_rest_append(&mut self, level: usize, rest_var: &str, key: &str, value: &str) {
        self.w.write_indent(
            level,
            &format!(
                "{rest_var} = append({rest_var}, templ.KeyValue[string, any]{{Key: \"{key}\", Value: {value}}})\n"
            ),
        );
    }

    fn write_css(&mut self, n: &CssTemplate) {
        self.w.write("func ");
        self.write_expr(&n.expression);
        self.w.write(" templ.CSSClass {\n");
        self.w.write_indent(1, "var templCSSBuilder strings.Builder\n");
        for p in &n.properties {
            // Property names and constant values are spliced through
            // go_string: a backtick in either would otherwise terminate the
            // raw string literal early.
            match p {
                CssProperty::Constant { name, value } => {
                    self.w.write_indent(
                        1,
                        &format!(
                            "templCSSBuilder.WriteString(string(templ.SanitizeCSS({}, {})))\n",
                            go_string(name),
                            go_string(value)
                        ),
                    );
                }
                CssProperty::Expression { name, value } => {
                    self.w.write_indent(
                        1,
                        &format!(
                            "templCSSBuilder.WriteString(string(templ.SanitizeCSS({}, ",
                            go_string(name)
                        ),
                    );
                    self.write_expr(&value.expression);
                    self.w.write(")))\n");
                }
            }
        }
        self.w.write_indent(
            1,
            &format!("templCSSID := templ.CSSID(`{}`, templCSSBuilder.String())\n", n.name),
        );
        self.w.write_indent(1, "return templ.ComponentCSSClass{\n");
        self.w.write_indent(2, "ID: templCSSID,\n");
        self.w.write_indent(
            2,
            "Class: templ.SafeCSS(`.` + templCSSID + `{` + templCSSBuilder.String() + `}`),\n",
        );
        self.w.write_indent(1, "}\n");
        self.w.write("}\n\n");
    }

    fn write_script(&mut self, t: &ScriptTemplate) {
        self.w.write("func ");
        self.write_expr(&t.name);
        self.w.write("(");
        self.write_expr(&t.parameters);
        self.w.write(") templ.ComponentScript {\n");
        self.w.write_indent(1, "return templ.ComponentScript{\n");
        let fn_name = function_name(&t.name.value, &t.value);
        let go_fn = go_string(&fn_name);
        self.w.write_indent(2, &format!("Name: {go_fn},\n"));
        let call_args = strip_types(&t.parameters.value);
        let body = format!(
            "function {fn_name}({call_args}){{{}}}",
            t.value.trim()
        );
        self.w
            .write_indent(2, &format!("Function: {},\n", go_string(&body)));
        let call = if call_args.is_empty() {
            format!("templ.SafeScript({go_fn})")
        } else {
            format!("templ.SafeScript({go_fn}, {call_args})")
        };
        self.w.write_indent(2, &format!("Call: {call},\n"));
        self.w.write_indent(1, "}\n");
        self.w.write("}\n\n");
    }
}

fn is_whitespace_node(n: &Node) -> bool {
    matches!(n, Node::Whitespace(_))
}

fn strip_whitespace(nodes: &[Node]) -> Vec<&Node> {
    nodes.iter().filter(|n| !is_whitespace_node(n)).collect()
}

fn trim_whitespace(nodes: &[Node]) -> Vec<&Node> {
    let Some(start) = nodes.iter().position(|n| !is_whitespace_node(n)) else {
        return Vec::new();
    };
    let end = nodes.iter().rposition(|n| !is_whitespace_node(n)).unwrap_or(start);
    nodes[start..=end].iter().collect()
}

/// Keeps whitespace only where it separates text from adjacent content;
/// whitespace between elements carries no rendered meaning.
fn strip_non_critical_whitespace(nodes: &[Node]) -> Vec<&Node> {
    let mut out = Vec::new();
    for (i, n) in nodes.iter().enumerate() {
        if !is_whitespace_node(n) {
            out.push(n);
            continue;
        }
        if i == 0 || i == nodes.len() - 1 {
            continue;
        }
        let prev_is_text = matches!(nodes[i - 1], Node::Text(_));
        let next_is_text = matches!(nodes[i + 1], Node::Text(_));
        if prev_is_text || next_is_text {
            out.push(n);
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A Go raw string literal, splicing in any backticks the value contains.
fn go_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('`');
    let mut sections = s.split('`').peekable();
    while let Some(sect) = sections.next() {
        out.push_str(sect);
        if sections.peek().is_some() {
            out.push_str("` + \"`\" + `");
        }
    }
    out.push('`');
    out
}

/// A Go interpreted string literal.
fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A collision-resistant name for the global function backing a script
/// template, stable across regenerations of the same body.
fn function_name(name: &str, body: &str) -> String {
    let mut h = FxHasher::default();
    body.hash(&mut h);
    format!("__templ_{name}_{:04x}", h.finish() as u16)
}

/// `a string, b int` becomes `a, b` for call sites.
fn strip_types(parameters: &str) -> String {
    parameters
        .split(',')
        .filter_map(|p| p.trim().split_whitespace().next())
        .collect::<Vec<_>>()
        .join(", ")
}
