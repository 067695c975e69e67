//! Write-time validation, driven entirely by the schema table.
//!
//! A write is checked in full before anything in the tree is touched, so a
//! rejected `set` leaves values, counts and discriminants exactly as they
//! were.

use ome_schema::{Field, PropertyDef, Variant};
use ome_types::Value;

use crate::error::{StoreError, StoreResult};
use crate::root::{MetadataRoot, INDEX_LIMIT};

/// A write that passed every check and is ready to apply.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedWrite<'p> {
    pub def: &'static PropertyDef,
    /// Indices of the owning instance.
    pub entity_path: &'p [usize],
    /// Slot within a repeated property.
    pub slot: Option<usize>,
    /// Discriminant the instance takes, if the field is variant-qualified.
    pub variant: Option<Variant>,
    /// The value in its property's canonical representation.
    pub value: Value,
}

/// Resolve `field` against the schema and split `path` into the instance
/// path and the repeated-property slot.
pub fn resolve(field: Field, path: &[usize]) -> StoreResult<(&'static PropertyDef, &[usize], Option<usize>)> {
    let def = field
        .def()
        .map_err(|_| StoreError::UnknownProperty(field.flat_name()))?;
    let expected = def.arity();
    if path.len() != expected {
        return Err(StoreError::PathArity {
            entity: field.entity,
            expected,
            found: path.len(),
        });
    }
    let depth = field.entity.depth();
    let slot = def.is_repeated().then(|| path[depth]);
    Ok((def, &path[..depth], slot))
}

/// The checks that depend only on the schema: property lookup, path arity,
/// index bounds and value coercion. Returns the value in canonical form.
pub fn check_write(field: Field, path: &[usize], value: Value) -> StoreResult<Value> {
    let (def, _, _) = resolve(field, path)?;
    if let Some(&index) = path.iter().find(|&&i| i >= INDEX_LIMIT) {
        return Err(StoreError::IndexOutOfRange {
            property: field.flat_name(),
            index,
            limit: INDEX_LIMIT,
        });
    }
    value
        .coerce(def.kind)
        .map_err(|e| StoreError::from_type_error(field.flat_name(), e))
}

/// Check a write against the current tree.
pub fn validate_write<'p>(
    root: &MetadataRoot,
    field: Field,
    path: &'p [usize],
    value: Value,
) -> StoreResult<ValidatedWrite<'p>> {
    let value = check_write(field, path, value)?;
    let (def, entity_path, slot) = resolve(field, path)?;

    if let Some(requested) = field.variant {
        let existing = root
            .node(field.entity, entity_path)
            .and_then(|node| node.variant);
        if let Some(existing) = existing {
            if existing != requested {
                return Err(StoreError::VariantConflict {
                    entity: field.entity,
                    existing,
                    requested,
                });
            }
        }
    }

    Ok(ValidatedWrite {
        def,
        entity_path,
        slot,
        variant: field.variant,
        value,
    })
}
