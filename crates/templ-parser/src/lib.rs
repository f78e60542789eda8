//! Parser for templ template files.
//!
//! A template file interleaves HTML-like markup with fragments of Go:
//! control-flow headers, attribute expressions, component invocations. This
//! crate parses such files into an AST ([`ast::TemplateFile`]) that records
//! source positions for every embedded Go fragment, writes the AST back out
//! in canonical form for formatting, and reports non-fatal findings through
//! [`diagnose`].
//!
//! ```
//! let src = "package main\n\ntempl Hello(name string) {\n\t<div>{ name }</div>\n}\n";
//! let tf = templ_parser::parse_string(src).unwrap();
//! assert_eq!(tf.package.expression.value, "package main");
//! assert_eq!(tf.nodes.len(), 1);
//! ```

pub mod ast;
mod combinator;
mod diagnostics;
mod error;
pub mod goexpr;
mod input;
mod parser;
pub mod visitor;

pub use diagnostics::{diagnose, Diagnostic};
pub use error::ParseError;

use ast::TemplateFile;

/// Parses template source with no associated file path. A missing package
/// clause defaults to `package main`.
pub fn parse_string(src: &str) -> Result<TemplateFile, ParseError> {
    parser::template_file(src, "main")
}

/// Parses template source loaded from `path`. The path is recorded on the
/// result and names the default package when the file has no package clause.
pub fn parse_source(src: &str, path: &str) -> Result<TemplateFile, ParseError> {
    let pkg = parser::default_package_name(path);
    let mut tf = parser::template_file(src, &pkg)?;
    tf.filepath = Some(path.to_string());
    Ok(tf)
}
