//! Error types for the geometry engine and path-data parser.

use thiserror::Error;

/// Semantic misuse of a builder (negative sizes, non-finite coordinates, ...).
///
/// Degenerate but legal inputs (zero-length segments, zero thickness, anchor at
/// the bubble center) never produce this; they resolve to degenerate geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("invalid geometry in {what}: {reason}")]
    InvalidGeometry { what: String, reason: String },
}

impl GeometryError {
    pub fn invalid(what: impl Into<String>, reason: impl Into<String>) -> Self {
        GeometryError::InvalidGeometry {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// Same reason, reported against `what` instead.
    pub fn within(self, what: impl Into<String>) -> Self {
        match self {
            GeometryError::InvalidGeometry { reason, .. } => GeometryError::invalid(what, reason),
        }
    }
}

/// Failure while reading SVG path data back into a [`crate::Path`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    #[error("unknown path command {0:?} at byte {1}")]
    UnknownCommand(char, usize),
    #[error("bad number {0:?}")]
    BadNumber(String),
    #[error("command {0} is missing operands")]
    MissingOperand(char),
    #[error("command {0} has no current point")]
    NoCurrentPoint(char),
}
