//! Parse error types.

use source_map::Position;
use thiserror::Error;

/// A fatal parse failure.
///
/// Parsers distinguish between a soft no-match, which lets the caller try an
/// alternative construct, and a fatal error, which means the input committed
/// to a construct and then violated its grammar. Only the latter is
/// represented here; soft no-matches are `Ok(None)` at the parser level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input violated the grammar at a known position.
    #[error("{message} at {position}")]
    Syntax {
        message: String,
        position: Position,
    },

    /// A node list ran out of parseable input before its terminator was
    /// seen. Callers that know more about the terminator, such as the
    /// element parser probing for a mismatched close tag, can intercept this
    /// and report something sharper.
    #[error("{name} not found at {position}")]
    UntilNotFound { name: String, position: Position },

    /// The file uses the pre-v2 `{% package %}` syntax and needs migration
    /// before it can be parsed.
    #[error("legacy file format: run templ migrate")]
    LegacyFormat,
}

impl ParseError {
    /// Creates a syntax error at a position.
    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Returns the position of the error, if it has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Syntax { position, .. } | Self::UntilNotFound { position, .. } => {
                Some(*position)
            }
            Self::LegacyFormat => None,
        }
    }
}
