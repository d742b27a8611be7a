//! Format error types.

use thiserror::Error;

/// Changelog document errors.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The document cannot be read as the declared format at all.
    #[error("malformed {format} changelog: {reason}")]
    Malformed {
        /// The declared format.
        format: &'static str,
        /// Why the document was rejected.
        reason: String,
    },

    /// Unknown format name.
    #[error("unknown changelog format \"{0}\" (expected markdown or html)")]
    UnknownFormat(String),
}

/// Result type for format operations.
pub type FormatResult<T> = Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = FormatError::Malformed {
            format: "HTML",
            reason: "no tags found".to_string(),
        };
        assert_eq!(err.to_string(), "malformed HTML changelog: no tags found");
    }

    #[test]
    fn test_unknown_format_display() {
        let err = FormatError::UnknownFormat("rst".to_string());
        assert_eq!(
            err.to_string(),
            "unknown changelog format \"rst\" (expected markdown or html)"
        );
    }
}
