//! Parsing of enum string tags.

use thiserror::Error;

/// Returned when a status or priority tag is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind}: '{value}'. Expected one of: {expected}")]
pub struct ParseTagError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseTagError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}
