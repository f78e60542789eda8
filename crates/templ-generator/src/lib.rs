//! Go code generation for parsed templ template files.
//!
//! [`generate`] turns a [`templ_parser::ast::TemplateFile`] into the Go
//! source that renders it, together with a [`source_map::SourceMap`] linking
//! every copied expression back to the template. Component invocations are
//! resolved through a [`SignatureResolver`], and embedded Go and script
//! fragments can be reformatted in place with [`fmt::format_embedded`]
//! before a file is written back out.

mod error;
pub mod fmt;
mod generator;
mod rangewriter;
mod signature;

pub use error::GenerateError;
pub use fmt::{format_embedded, EmbeddedFormatter, NullFormatter};
pub use generator::{generate, GeneratedFile};
pub use rangewriter::RangeWriter;
pub use signature::{
    ComponentSignature, NullResolver, Parameter, SignatureResolver, TemplSignatureResolver,
};
