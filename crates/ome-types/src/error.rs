use thiserror::Error;

/// Errors produced when constructing or coercing typed values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    #[error("invalid {domain} value: {value:?}")]
    InvalidEnumValue { domain: &'static str, value: String },

    #[error("value {value} violates constraint: {constraint}")]
    ConstraintViolation {
        constraint: &'static str,
        value: String,
    },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}
