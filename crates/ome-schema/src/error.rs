use crate::entity::EntityKind;

/// Errors from schema resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// No entity kind with this name.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// The entity (or variant) declares no property with this name.
    #[error("{entity} has no property {property}")]
    UnknownProperty {
        entity: EntityKind,
        property: String,
    },

    /// A flattened accessor name matched nothing in the table.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The variant does not belong to the entity's family.
    #[error("variant {variant} does not apply to {entity}")]
    ForeignVariant {
        entity: EntityKind,
        variant: &'static str,
    },
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
