//! Error types for parsing and geometry.
//!
//! Every failure maps onto one of three kinds: a malformed number, a broken
//! internal invariant, or an external cancellation.

use thiserror::Error;

/// Coarse classification of a [`GcodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Numeric,
    InvalidState,
    Cancelled,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    #[error("line {line}: invalid number in '{token}'")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: '{token}' produces a non-finite coordinate")]
    NonFinite { line: usize, token: String },

    #[error("line {line}: {directive} directive has no numeric parameter")]
    MissingValue { line: usize, directive: String },

    #[error("rotation axis has zero length")]
    ZeroAxis,

    #[error("invalid parser state: {0}")]
    InvalidState(String),

    #[error("parsing cancelled")]
    Cancelled,
}

impl GcodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GcodeError::InvalidNumber { .. }
            | GcodeError::NonFinite { .. }
            | GcodeError::MissingValue { .. }
            | GcodeError::ZeroAxis => ErrorKind::Numeric,
            GcodeError::InvalidState(_) => ErrorKind::InvalidState,
            GcodeError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Input line the error refers to, when there is one
    pub fn line(&self) -> Option<usize> {
        match self {
            GcodeError::InvalidNumber { line, .. }
            | GcodeError::NonFinite { line, .. }
            | GcodeError::MissingValue { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GcodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let err = GcodeError::InvalidNumber {
            line: 3,
            token: "X1.2.3".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Numeric);
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.to_string(), "line 3: invalid number in 'X1.2.3'");

        assert_eq!(GcodeError::ZeroAxis.kind(), ErrorKind::Numeric);
        assert_eq!(GcodeError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            GcodeError::InvalidState("x".into()).kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(GcodeError::Cancelled.line(), None);
    }
}
