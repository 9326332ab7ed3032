//! Errors raised when the rule list itself is malformed

use crate::logging::codes;
use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

/// Programming errors in a rule list; never produced for user input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Rule pattern could not be parsed
    #[error("Invalid rule pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Rule names a field the draft does not have
    #[error("Rule '{pattern}' references unknown field '{segment}' at '{path}'")]
    UnknownField {
        pattern: String,
        path: String,
        segment: String,
    },

    /// A `*` segment was applied to something other than a sequence
    #[error("Rule '{pattern}' expands '{path}', which is not a sequence")]
    NotASequence { pattern: String, path: String },

    /// A check was applied to a value of the wrong kind
    #[error("Check '{check}' cannot be applied to {found} at '{path}'")]
    WrongKind {
        path: String,
        check: &'static str,
        found: &'static str,
    },
}

impl SchemaError {
    pub fn invalid_pattern(pattern: &str, message: &str) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            message: message.to_string(),
        }
    }

    pub fn unknown_field(pattern: &str, path: &str, segment: &str) -> Self {
        Self::UnknownField {
            pattern: pattern.to_string(),
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    pub fn not_a_sequence(pattern: &str, path: &str) -> Self {
        Self::NotASequence {
            pattern: pattern.to_string(),
            path: path.to_string(),
        }
    }

    pub fn wrong_kind(path: &str, check: &'static str, found: &'static str) -> Self {
        Self::WrongKind {
            path: path.to_string(),
            check,
            found,
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        codes::validation::SCHEMA_MALFORMED
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "InvalidPattern",
            Self::UnknownField { .. } => "UnknownField",
            Self::NotASequence { .. } => "NotASequence",
            Self::WrongKind { .. } => "WrongKind",
        }
    }

    pub fn severity(&self) -> &'static str {
        "Critical"
    }
}
