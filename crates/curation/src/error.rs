//! Error types produced by the curation crate.

use thiserror::Error;

/// Errors raised while loading or applying curation rules.
///
/// Rules that cannot express a predicate (no path and no purl) are not an
/// error: they are kept and simply match nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurationError {
    /// A required input (result set or rule set) was absent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A BOM or result document did not fit the expected JSON shape.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl From<serde_json::Error> for CurationError {
    fn from(err: serde_json::Error) -> Self {
        CurationError::MalformedDocument(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = CurationError::InvalidInput("rules are required".into());
        assert_eq!(err.to_string(), "invalid input: rules are required");

        let err = CurationError::MalformedDocument("expected object".into());
        assert!(err.to_string().starts_with("malformed document"));
    }

    #[test]
    fn serde_errors_become_malformed_document() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CurationError = json_err.into();
        assert!(matches!(err, CurationError::MalformedDocument(_)));
    }
}
