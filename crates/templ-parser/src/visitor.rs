//! AST traversal.
//!
//! [`Visit`] walks a tree immutably; [`VisitMut`] walks it for rewriting,
//! e.g. to adjust attribute or text values between parsing and generation.
//! Each trait method defaults to the matching `walk_*` function, so an
//! implementation overrides only the nodes it cares about and calls the walk
//! function itself to descend.

use crate::ast::*;

pub trait Visit {
    fn visit_template_file(&mut self, n: &TemplateFile) {
        walk_template_file(self, n);
    }
    fn visit_package(&mut self, _n: &Package) {}
    fn visit_file_go_expression(&mut self, _n: &TemplateFileGoExpression) {}
    fn visit_template_file_node(&mut self, n: &TemplateFileNode) {
        walk_template_file_node(self, n);
    }
    fn visit_html_template(&mut self, n: &HtmlTemplate) {
        walk_html_template(self, n);
    }
    fn visit_css_template(&mut self, n: &CssTemplate) {
        walk_css_template(self, n);
    }
    fn visit_css_property(&mut self, _n: &CssProperty) {}
    fn visit_script_template(&mut self, _n: &ScriptTemplate) {}
    fn visit_node(&mut self, n: &Node) {
        walk_node(self, n);
    }
    fn visit_text(&mut self, _n: &Text) {}
    fn visit_element(&mut self, n: &Element) {
        walk_element(self, n);
    }
    fn visit_element_component(&mut self, n: &ElementComponent) {
        walk_element_component(self, n);
    }
    fn visit_script_element(&mut self, n: &ScriptElement) {
        walk_script_element(self, n);
    }
    fn visit_raw_element(&mut self, n: &RawElement) {
        walk_raw_element(self, n);
    }
    fn visit_html_comment(&mut self, _n: &HtmlComment) {}
    fn visit_go_comment(&mut self, _n: &GoComment) {}
    fn visit_doc_type(&mut self, _n: &DocType) {}
    fn visit_whitespace(&mut self, _n: &Whitespace) {}
    fn visit_string_expression(&mut self, _n: &StringExpression) {}
    fn visit_go_code(&mut self, _n: &GoCode) {}
    fn visit_if(&mut self, n: &IfExpression) {
        walk_if(self, n);
    }
    fn visit_switch(&mut self, n: &SwitchExpression) {
        walk_switch(self, n);
    }
    fn visit_for(&mut self, n: &ForExpression) {
        walk_for(self, n);
    }
    fn visit_call_template(&mut self, _n: &CallTemplateExpression) {}
    fn visit_templ_element(&mut self, n: &TemplElementExpression) {
        walk_templ_element(self, n);
    }
    fn visit_children_expression(&mut self, _n: &ChildrenExpression) {}
    fn visit_fallthrough(&mut self, _n: &Fallthrough) {}
    fn visit_attribute(&mut self, n: &Attribute) {
        walk_attribute(self, n);
    }
}

pub fn walk_template_file<V: Visit + ?Sized>(v: &mut V, n: &TemplateFile) {
    for h in &n.header {
        v.visit_file_go_expression(h);
    }
    v.visit_package(&n.package);
    for node in &n.nodes {
        v.visit_template_file_node(node);
    }
}

pub fn walk_template_file_node<V: Visit + ?Sized>(v: &mut V, n: &TemplateFileNode) {
    match n {
        TemplateFileNode::Go(g) => v.visit_file_go_expression(g),
        TemplateFileNode::Html(t) => v.visit_html_template(t),
        TemplateFileNode::Css(c) => v.visit_css_template(c),
        TemplateFileNode::Script(s) => v.visit_script_template(s),
    }
}

pub fn walk_html_template<V: Visit + ?Sized>(v: &mut V, n: &HtmlTemplate) {
    for child in &n.children {
        v.visit_node(child);
    }
}

pub fn walk_css_template<V: Visit + ?Sized>(v: &mut V, n: &CssTemplate) {
    for p in &n.properties {
        v.visit_css_property(p);
    }
}

pub fn walk_node<V: Visit + ?Sized>(v: &mut V, n: &Node) {
    match n {
        Node::Text(x) => v.visit_text(x),
        Node::Element(x) => v.visit_element(x),
        Node::ElementComponent(x) => v.visit_element_component(x),
        Node::ScriptElement(x) => v.visit_script_element(x),
        Node::RawElement(x) => v.visit_raw_element(x),
        Node::HtmlComment(x) => v.visit_html_comment(x),
        Node::GoComment(x) => v.visit_go_comment(x),
        Node::DocType(x) => v.visit_doc_type(x),
        Node::Whitespace(x) => v.visit_whitespace(x),
        Node::StringExpression(x) => v.visit_string_expression(x),
        Node::GoCode(x) => v.visit_go_code(x),
        Node::If(x) => v.visit_if(x),
        Node::Switch(x) => v.visit_switch(x),
        Node::For(x) => v.visit_for(x),
        Node::CallTemplate(x) => v.visit_call_template(x),
        Node::TemplElement(x) => v.visit_templ_element(x),
        Node::ChildrenExpression(x) => v.visit_children_expression(x),
        Node::Fallthrough(x) => v.visit_fallthrough(x),
    }
}

pub fn walk_element<V: Visit + ?Sized>(v: &mut V, n: &Element) {
    for a in &n.attributes {
        v.visit_attribute(a);
    }
    for child in &n.children {
        v.visit_node(child);
    }
}

pub fn walk_element_component<V: Visit + ?Sized>(v: &mut V, n: &ElementComponent) {
    for a in &n.attributes {
        v.visit_attribute(a);
    }
    for child in &n.children {
        v.visit_node(child);
    }
}

pub fn walk_script_element<V: Visit + ?Sized>(v: &mut V, n: &ScriptElement) {
    for a in &n.attributes {
        v.visit_attribute(a);
    }
    for c in &n.contents {
        if let ScriptContents::Go { code, .. } = c {
            v.visit_go_code(code);
        }
    }
}

pub fn walk_raw_element<V: Visit + ?Sized>(v: &mut V, n: &RawElement) {
    for a in &n.attributes {
        v.visit_attribute(a);
    }
}

pub fn walk_if<V: Visit + ?Sized>(v: &mut V, n: &IfExpression) {
    for child in &n.then {
        v.visit_node(child);
    }
    for else_if in &n.else_ifs {
        for child in &else_if.then {
            v.visit_node(child);
        }
    }
    for child in &n.else_ {
        v.visit_node(child);
    }
}

pub fn walk_switch<V: Visit + ?Sized>(v: &mut V, n: &SwitchExpression) {
    for case in &n.cases {
        for child in &case.children {
            v.visit_node(child);
        }
    }
}

pub fn walk_for<V: Visit + ?Sized>(v: &mut V, n: &ForExpression) {
    for child in &n.children {
        v.visit_node(child);
    }
}

pub fn walk_templ_element<V: Visit + ?Sized>(v: &mut V, n: &TemplElementExpression) {
    for child in &n.children {
        v.visit_node(child);
    }
}

pub fn walk_attribute<V: Visit + ?Sized>(v: &mut V, n: &Attribute) {
    if let Attribute::Conditional { then, else_, .. } = n {
        for a in then {
            v.visit_attribute(a);
        }
        for a in else_ {
            v.visit_attribute(a);
        }
    }
}

pub trait VisitMut {
    fn visit_template_file_mut(&mut self, n: &mut TemplateFile) {
        walk_template_file_mut(self, n);
    }
    fn visit_package_mut(&mut self, _n: &mut Package) {}
    fn visit_file_go_expression_mut(&mut self, _n: &mut TemplateFileGoExpression) {}
    fn visit_template_file_node_mut(&mut self, n: &mut TemplateFileNode) {
        walk_template_file_node_mut(self, n);
    }
    fn visit_html_template_mut(&mut self, n: &mut HtmlTemplate) {
        walk_html_template_mut(self, n);
    }
    fn visit_css_template_mut(&mut self, n: &mut CssTemplate) {
        walk_css_template_mut(self, n);
    }
    fn visit_css_property_mut(&mut self, _n: &mut CssProperty) {}
    fn visit_script_template_mut(&mut self, _n: &mut ScriptTemplate) {}
    fn visit_node_mut(&mut self, n: &mut Node) {
        walk_node_mut(self, n);
    }
    fn visit_text_mut(&mut self, _n: &mut Text) {}
    fn visit_element_mut(&mut self, n: &mut Element) {
        walk_element_mut(self, n);
    }
    fn visit_element_component_mut(&mut self, n: &mut ElementComponent) {
        walk_element_component_mut(self, n);
    }
    fn visit_script_element_mut(&mut self, n: &mut ScriptElement) {
        walk_script_element_mut(self, n);
    }
    fn visit_raw_element_mut(&mut self, n: &mut RawElement) {
        walk_raw_element_mut(self, n);
    }
    fn visit_html_comment_mut(&mut self, _n: &mut HtmlComment) {}
    fn visit_go_comment_mut(&mut self, _n: &mut GoComment) {}
    fn visit_doc_type_mut(&mut self, _n: &mut DocType) {}
    fn visit_whitespace_mut(&mut self, _n: &mut Whitespace) {}
    fn visit_string_expression_mut(&mut self, _n: &mut StringExpression) {}
    fn visit_go_code_mut(&mut self, _n: &mut GoCode) {}
    fn visit_if_mut(&mut self, n: &mut IfExpression) {
        walk_if_mut(self, n);
    }
    fn visit_switch_mut(&mut self, n: &mut SwitchExpression) {
        walk_switch_mut(self, n);
    }
    fn visit_for_mut(&mut self, n: &mut ForExpression) {
        walk_for_mut(self, n);
    }
    fn visit_call_template_mut(&mut self, _n: &mut CallTemplateExpression) {}
    fn visit_templ_element_mut(&mut self, n: &mut TemplElementExpression) {
        walk_templ_element_mut(self, n);
    }
    fn visit_children_expression_mut(&mut self, _n: &mut ChildrenExpression) {}
    fn visit_fallthrough_mut(&mut self, _n: &mut Fallthrough) {}
    fn visit_attribute_mut(&mut self, n: &mut Attribute) {
        walk_attribute_mut(self, n);
    }
}

pub fn walk_template_file_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut TemplateFile) {
    for h in &mut n.header {
        v.visit_file_go_expression_mut(h);
    }
    v.visit_package_mut(&mut n.package);
    for node in &mut n.nodes {
        v.visit_template_file_node_mut(node);
    }
}

pub fn walk_template_file_node_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut TemplateFileNode) {
    match n {
        TemplateFileNode::Go(g) => v.visit_file_go_expression_mut(g),
        TemplateFileNode::Html(t) => v.visit_html_template_mut(t),
        TemplateFileNode::Css(c) => v.visit_css_template_mut(c),
        TemplateFileNode::Script(s) => v.visit_script_template_mut(s),
    }
}

pub fn walk_html_template_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut HtmlTemplate) {
    for child in &mut n.children {
        v.visit_node_mut(child);
    }
}

pub fn walk_css_template_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut CssTemplate) {
    for p in &mut n.properties {
        v.visit_css_property_mut(p);
    }
}

pub fn walk_node_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut Node) {
    match n {
        Node::Text(x) => v.visit_text_mut(x),
        Node::Element(x) => v.visit_element_mut(x),
        Node::ElementComponent(x) => v.visit_element_component_mut(x),
        Node::ScriptElement(x) => v.visit_script_element_mut(x),
        Node::RawElement(x) => v.visit_raw_element_mut(x),
        Node::HtmlComment(x) => v.visit_html_comment_mut(x),
        Node::GoComment(x) => v.visit_go_comment_mut(x),
        Node::DocType(x) => v.visit_doc_type_mut(x),
        Node::Whitespace(x) => v.visit_whitespace_mut(x),
        Node::StringExpression(x) => v.visit_string_expression_mut(x),
        Node::GoCode(x) => v.visit_go_code_mut(x),
        Node::If(x) => v.visit_if_mut(x),
        Node::Switch(x) => v.visit_switch_mut(x),
        Node::For(x) => v.visit_for_mut(x),
        Node::CallTemplate(x) => v.visit_call_template_mut(x),
        Node::TemplElement(x) => v.visit_templ_element_mut(x),
        Node::ChildrenExpression(x) => v.visit_children_expression_mut(x),
        Node::Fallthrough(x) => v.visit_fallthrough_mut(x),
    }
}

pub fn walk_element_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut Element) {
    for a in &mut n.attributes {
        v.visit_attribute_mut(a);
    }
    for child in &mut n.children {
        v.visit_node_mut(child);
    }
}

pub fn walk_element_component_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut ElementComponent) {
    for a in &mut n.attributes {
        v.visit_attribute_mut(a);
    }
    for child in &mut n.children {
        v.visit_node_mut(child);
    }
}

pub fn walk_script_element_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut ScriptElement) {
    for a in &mut n.attributes {
        v.visit_attribute_mut(a);
    }
    for c in &mut n.contents {
        if let ScriptContents::Go { code, .. } = c {
            v.visit_go_code_mut(code);
        }
    }
}

pub fn walk_raw_element_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut RawElement) {
    for a in &mut n.attributes {
        v.visit_attribute_mut(a);
    }
}

pub fn walk_if_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut IfExpression) {
    for child in &mut n.then {
        v.visit_node_mut(child);
    }
    for else_if in &mut n.else_ifs {
        for child in &mut else_if.then {
            v.visit_node_mut(child);
        }
    }
    for child in &mut n.else_ {
        v.visit_node_mut(child);
    }
}

pub fn walk_switch_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut SwitchExpression) {
    for case in &mut n.cases {
        for child in &mut case.children {
            v.visit_node_mut(child);
        }
    }
}

pub fn walk_for_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut ForExpression) {
    for child in &mut n.children {
        v.visit_node_mut(child);
    }
}

pub fn walk_templ_element_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut TemplElementExpression) {
    for child in &mut n.children {
        v.visit_node_mut(child);
    }
}

pub fn walk_attribute_mut<V: VisitMut + ?Sized>(v: &mut V, n: &mut Attribute) {
    if let Attribute::Conditional { then, else_, .. } = n {
        for a in then {
            v.visit_attribute_mut(a);
        }
        for a in else_ {
            v.visit_attribute_mut(a);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use source_map::Range;

    #[derive(Default)]
    struct TextCollector {
        values: Vec<String>,
    }

    impl Visit for TextCollector {
        fn visit_text(&mut self, n: &Text) {
            self.values.push(n.value.clone());
        }
    }

    struct Upcaser;

    impl VisitMut for Upcaser {
        fn visit_text_mut(&mut self, n: &mut Text) {
            n.value = n.value.to_uppercase();
        }
    }

    fn sample_if() -> Node {
        Node::If(IfExpression {
            expression: Expression::new("p.A", Range::default()),
            then: vec![Node::Element(Element {
                name: "div".into(),
                attributes: vec![],
                indent_attrs: false,
                children: vec![Node::Text(Text {
                    range: Range::default(),
                    value: "inner".to_string(),
                    trailing_space: TrailingSpace::None,
                })],
                indent_children: false,
                trailing_space: TrailingSpace::None,
                name_range: Range::default(),
            })],
            else_ifs: vec![],
            else_: vec![Node::Text(Text {
                range: Range::default(),
                value: "other".to_string(),
                trailing_space: TrailingSpace::None,
            })],
        })
    }

    #[test]
    fn test_visit_descends_into_nested_nodes() {
        let node = sample_if();
        let mut collector = TextCollector::default();
        collector.visit_node(&node);
        assert_eq!(collector.values, vec!["inner", "other"]);
    }

    #[test]
    fn test_visit_mut_rewrites_in_place() {
        let mut node = sample_if();
        Upcaser.visit_node_mut(&mut node);
        let mut collector = TextCollector::default();
        collector.visit_node(&node);
        assert_eq!(collector.values, vec!["INNER", "OTHER"]);
    }
}
