use ome_schema::{EntityKind, Field, Variant};
use ome_types::Value;

use crate::error::StoreResult;
use crate::root::MetadataRoot;
use crate::traits::{Metadata, MetadataRetrieve, MetadataStore};
use crate::validate::check_write;

/// Fans writes out to an ordered list of delegate stores.
///
/// - Writes are checked once against the schema, then go to every delegate
///   in order, stopping at the first error. Only a state-dependent failure
///   (a variant conflict in one delegate) can leave earlier delegates written.
/// - Reads return the first delegate's set value.
/// - Counts are the maximum over delegates.
/// - `root()` returns the first delegate's graph.
#[derive(Default)]
pub struct AggregateMetadata {
    delegates: Vec<Box<dyn Metadata>>,
}

impl AggregateMetadata {
    pub fn new(delegates: Vec<Box<dyn Metadata>>) -> Self {
        Self { delegates }
    }

    pub fn add_delegate(&mut self, delegate: Box<dyn Metadata>) {
        self.delegates.push(delegate);
    }

    pub fn delegates(&self) -> &[Box<dyn Metadata>] {
        &self.delegates
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl MetadataRetrieve for AggregateMetadata {
    fn count(&self, entity: EntityKind, path: &[usize]) -> usize {
        self.delegates
            .iter()
            .map(|d| d.count(entity, path))
            .max()
            .unwrap_or(0)
    }

    fn get(&self, field: Field, path: &[usize]) -> Option<Value> {
        self.delegates.iter().find_map(|d| d.get(field, path))
    }

    fn ref_count(&self, field: Field, path: &[usize]) -> usize {
        self.delegates
            .iter()
            .map(|d| d.ref_count(field, path))
            .max()
            .unwrap_or(0)
    }

    fn variant(&self, entity: EntityKind, path: &[usize]) -> Option<Variant> {
        self.delegates.iter().find_map(|d| d.variant(entity, path))
    }

    fn root(&self) -> MetadataRoot {
        self.delegates
            .first()
            .map(|d| d.root())
            .unwrap_or_default()
    }
}

impl MetadataStore for AggregateMetadata {
    fn create_root(&self) {
        for d in &self.delegates {
            d.create_root();
        }
    }

    fn set_root(&self, root: MetadataRoot) {
        for d in &self.delegates {
            d.set_root(root.clone());
        }
    }

    fn set(&self, field: Field, path: &[usize], value: Value) -> StoreResult<()> {
        check_write(field, path, value.clone())?;
        for d in &self.delegates {
            d.set(field, path, value.clone())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for AggregateMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateMetadata")
            .field("delegates", &self.delegates.len())
            .finish()
    }
}
