use ome_schema::{EntityKind, Field, Variant};
use ome_types::Value;

use crate::error::StoreResult;
use crate::root::MetadataRoot;
use crate::traits::{MetadataRetrieve, MetadataStore};

/// A store that accepts every write and remembers nothing.
///
/// Useful as a sink when a populator must be driven but its output is not
/// wanted.
#[derive(Clone, Copy, Debug, Default)]
pub struct DummyMetadata;

impl MetadataRetrieve for DummyMetadata {
    fn count(&self, _entity: EntityKind, _path: &[usize]) -> usize {
        0
    }

    fn get(&self, _field: Field, _path: &[usize]) -> Option<Value> {
        None
    }

    fn ref_count(&self, _field: Field, _path: &[usize]) -> usize {
        0
    }

    fn variant(&self, _entity: EntityKind, _path: &[usize]) -> Option<Variant> {
        None
    }

    fn root(&self) -> MetadataRoot {
        MetadataRoot::new()
    }
}

impl MetadataStore for DummyMetadata {
    fn create_root(&self) {}

    fn set_root(&self, _root: MetadataRoot) {}

    fn set(&self, _field: Field, _path: &[usize], _value: Value) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_accepts_and_forgets() {
        let d = DummyMetadata;
        let name = Field::new(EntityKind::Image, "Name");
        d.set(name, &[0], "x".into()).unwrap();
        // Even writes that a real store would reject are swallowed.
        d.set(Field::new(EntityKind::Pixels, "SizeX"), &[0], 0.into())
            .unwrap();
        assert_eq!(d.get(name, &[0]), None);
        assert_eq!(d.count(EntityKind::Image, &[]), 0);
        assert!(d.root().is_empty());
    }
}
