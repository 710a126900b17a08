//! Wire codec error types

use thiserror::Error;

/// Wire codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Value outside the bounds of its integer kind
    #[error("{value} is not in the range [{min}, {max}]")]
    Range {
        /// The rejected value
        value: i128,
        /// Smallest representable value for the kind
        min: i128,
        /// Largest representable value for the kind
        max: i128,
    },

    /// Buffer length does not match the fixed width of the target
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    Length {
        /// Required byte count
        expected: usize,
        /// Supplied byte count
        actual: usize,
    },

    /// Wrong number of, or missing, field values at record construction
    #[error("invalid record arguments: {0}")]
    Argument(String),

    /// Field name absent from the schema
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Field name declared twice in one schema
    #[error("duplicate field: {0}")]
    DuplicateField(String),
}

/// Result type for wire operations
pub type WireResult<T> = Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_range_display() {
        let err = WireError::Range {
            value: 300,
            min: 0,
            max: 255,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("300"));
        assert!(msg.contains("[0, 255]"));
    }

    #[test]
    fn test_error_length_display() {
        let err = WireError::Length {
            expected: 3,
            actual: 2,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("got 2"));
    }

    #[test]
    fn test_error_unknown_field_display() {
        let err = WireError::UnknownField("nonce".into());
        assert!(format!("{}", err).contains("nonce"));
    }
}
