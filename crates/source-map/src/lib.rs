//! Source position tracking and mapping for templ-gen.
//!
//! This crate provides utilities for tracking source positions through code
//! generation, enabling accurate error reporting and editor tooling that maps
//! generated Go positions back to original templ source files.

mod line_index;
mod position;
mod sourcemap;

pub use line_index::LineIndex;
pub use position::{Position, Range};
pub use sourcemap::SourceMap;
