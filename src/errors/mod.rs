/// Unified error handling module
use thiserror::Error;

/// Failure to turn a launch payload into typed records.
///
/// Paths use the payload's own key names, e.g. `links.flickr.original[1]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Missing field: {path}")]
    MissingField { path: String },

    #[error("Type mismatch at {}: expected {expected}, found {found}", shown(.path))]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unrecognized enumeration value {value:?} at {path}")]
    UnrecognizedEnumeration { path: String, value: String },

    #[error("Malformed URL {value:?} at {path}: {reason}")]
    MalformedUrl {
        path: String,
        value: String,
        reason: String,
    },

    #[error("Invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
}

impl DecodeError {
    /// Path of the offending value, if the error is tied to one
    pub fn path(&self) -> Option<&str> {
        match self {
            DecodeError::MissingField { path }
            | DecodeError::TypeMismatch { path, .. }
            | DecodeError::UnrecognizedEnumeration { path, .. }
            | DecodeError::MalformedUrl { path, .. } => Some(path),
            DecodeError::Syntax { .. } => None,
        }
    }

    /// Prefix the path with an outer segment, e.g. a list index
    pub(crate) fn within(self, prefix: &str) -> Self {
        let join = |path: String| {
            if path.is_empty() {
                prefix.to_string()
            } else if path.starts_with('[') {
                format!("{prefix}{path}")
            } else {
                format!("{prefix}.{path}")
            }
        };

        match self {
            DecodeError::MissingField { path } => DecodeError::MissingField { path: join(path) },
            DecodeError::TypeMismatch {
                path,
                expected,
                found,
            } => DecodeError::TypeMismatch {
                path: join(path),
                expected,
                found,
            },
            DecodeError::UnrecognizedEnumeration { path, value } => {
                DecodeError::UnrecognizedEnumeration {
                    path: join(path),
                    value,
                }
            }
            DecodeError::MalformedUrl {
                path,
                value,
                reason,
            } => DecodeError::MalformedUrl {
                path: join(path),
                value,
                reason,
            },
            syntax @ DecodeError::Syntax { .. } => syntax,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Syntax {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

fn shown(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Type alias for decode results
pub type DecodeResult<T> = Result<T, DecodeError>;
