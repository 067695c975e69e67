use ome_schema::{EntityKind, Variant};
use ome_types::TypeError;

/// Errors from metadata store operations.
///
/// Every variant is raised synchronously by a write (or by a tool reading
/// the store); reads never fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The value is not a member of the property's closed enumeration.
    #[error("invalid {domain} value: {value:?}")]
    InvalidEnumValue { domain: &'static str, value: String },

    /// A constrained numeric property received an out-of-domain value.
    #[error("{property}: {value} violates {constraint}")]
    ConstraintViolation {
        property: String,
        constraint: &'static str,
        value: String,
    },

    /// The value is of the wrong semantic kind for the property.
    #[error("{property}: expected {expected}, found {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: String,
    },

    /// The instance is already a different variant of its family.
    #[error("{entity} is a {existing}, cannot write it as a {requested}")]
    VariantConflict {
        entity: EntityKind,
        existing: Variant,
        requested: Variant,
    },

    /// The schema declares no such property.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// Wrong number of indices for the addressed property.
    #[error("{entity} needs {expected} indices, got {found}")]
    PathArity {
        entity: EntityKind,
        expected: usize,
        found: usize,
    },

    /// An index is too large to materialise.
    #[error("{property}: index {index} is not below the limit of {limit}")]
    IndexOutOfRange {
        property: String,
        index: usize,
        limit: usize,
    },

    /// A required property is unset.
    #[error("{field} is not set at {path:?}")]
    MissingField { field: String, path: Vec<usize> },

    /// Serialization or deserialization of a root failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Attach the property name to a value-layer error.
    pub fn from_type_error(property: String, err: TypeError) -> Self {
        match err {
            TypeError::InvalidEnumValue { domain, value } => {
                StoreError::InvalidEnumValue { domain, value }
            }
            TypeError::ConstraintViolation { constraint, value } => {
                StoreError::ConstraintViolation {
                    property,
                    constraint,
                    value,
                }
            }
            TypeError::TypeMismatch { expected, found } => StoreError::TypeMismatch {
                property,
                expected,
                found,
            },
            TypeError::InvalidTimestamp(value) => StoreError::ConstraintViolation {
                property,
                constraint: "RFC 3339 timestamp",
                value,
            },
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
