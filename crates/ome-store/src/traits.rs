use std::sync::Arc;

use ome_schema::{EntityKind, Field, Variant};
use ome_types::Value;

use crate::error::StoreResult;
use crate::root::MetadataRoot;

/// Read side of a metadata store.
///
/// All implementations must satisfy these invariants:
/// - Reads never fail. An index beyond the current count, a parent that was
///   never populated, or a property that was never written all read as
///   `None` (or a count of 0), never as a default domain value.
/// - `count(kind, parent)` is `max(index) + 1` over every write that targeted
///   an instance of `kind` under `parent`.
/// - A variant-qualified read on an instance of a different variant reads
///   as `None`.
pub trait MetadataRetrieve: Send + Sync {
    /// Number of `entity` instances under the parent addressed by `path`
    /// (one index per repeated ancestor level).
    fn count(&self, entity: EntityKind, path: &[usize]) -> usize;

    /// Value of `field` on the instance at `path`. Repeated properties take
    /// one extra trailing index for the slot.
    fn get(&self, field: Field, path: &[usize]) -> Option<Value>;

    /// Number of slots of a repeated property on the instance at `path`.
    fn ref_count(&self, field: Field, path: &[usize]) -> usize;

    /// Discriminant of a polymorphic instance (shape or light source kind).
    fn variant(&self, entity: EntityKind, path: &[usize]) -> Option<Variant>;

    /// A copy of the whole backing graph.
    fn root(&self) -> MetadataRoot;
}

/// Write side of a metadata store.
///
/// Writes auto-extend every container along the path. A write that fails
/// validation leaves the store exactly as it was.
pub trait MetadataStore: Send + Sync {
    /// Discard everything and start from an empty root.
    fn create_root(&self);

    /// Replace the backing graph wholesale.
    fn set_root(&self, root: MetadataRoot);

    /// Store `value` as `field` on the instance at `path`.
    fn set(&self, field: Field, path: &[usize], value: Value) -> StoreResult<()>;
}

/// A store that can be both read and written.
pub trait Metadata: MetadataRetrieve + MetadataStore {}

impl<T: MetadataRetrieve + MetadataStore + ?Sized> Metadata for T {}

macro_rules! forward {
    ($($ptr:ty),+) => {$(
        impl<T: MetadataRetrieve + ?Sized> MetadataRetrieve for $ptr {
            fn count(&self, entity: EntityKind, path: &[usize]) -> usize {
                (**self).count(entity, path)
            }

            fn get(&self, field: Field, path: &[usize]) -> Option<Value> {
                (**self).get(field, path)
            }

            fn ref_count(&self, field: Field, path: &[usize]) -> usize {
                (**self).ref_count(field, path)
            }

            fn variant(&self, entity: EntityKind, path: &[usize]) -> Option<Variant> {
                (**self).variant(entity, path)
            }

            fn root(&self) -> MetadataRoot {
                (**self).root()
            }
        }

        impl<T: MetadataStore + ?Sized> MetadataStore for $ptr {
            fn create_root(&self) {
                (**self).create_root()
            }

            fn set_root(&self, root: MetadataRoot) {
                (**self).set_root(root)
            }

            fn set(&self, field: Field, path: &[usize], value: Value) -> StoreResult<()> {
                (**self).set(field, path, value)
            }
        }
    )+};
}

forward!(&T, Box<T>, Arc<T>);
