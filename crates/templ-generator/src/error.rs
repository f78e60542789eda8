use source_map::Position;
use thiserror::Error;

/// A fatal generation failure. Parse errors are surfaced earlier; these are
/// the failures only generation can detect, and they carry the template
/// position they concern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("component {name}: signature not found at {position}")]
    ComponentNotFound { name: String, position: Position },
    #[error("component {component}: missing required attribute {parameter} at {position}")]
    MissingAttribute {
        component: String,
        parameter: String,
        position: Position,
    },
}
