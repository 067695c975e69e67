use ome_schema::{properties_of, EntityKind, Field, Multiplicity, PropertyDef};
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::{MetadataRetrieve, MetadataStore};

/// Copy everything `src` holds into `dest`.
///
/// Instances are visited parents-first and in index order, so `dest` is
/// populated in the outer-to-inner sequence streaming stores rely on.
/// Trailing instances with no properties at all are not reproduced, since
/// no write addresses them.
pub fn convert_metadata(src: &dyn MetadataRetrieve, dest: &dyn MetadataStore) -> StoreResult<()> {
    let mut path = Vec::new();
    let copied = copy_instance(src, dest, EntityKind::Root, &mut path)?;
    debug!(values = copied, "converted metadata");
    Ok(())
}

fn copy_instance(
    src: &dyn MetadataRetrieve,
    dest: &dyn MetadataStore,
    kind: EntityKind,
    path: &mut Vec<usize>,
) -> StoreResult<usize> {
    let variant = src.variant(kind, path);
    let mut copied = 0;

    for def in properties_of(kind) {
        if !def.applies_to(variant) || (def.variant.is_some() && variant.is_none()) {
            continue;
        }
        let field = field_for(def, variant);
        if def.is_repeated() {
            for slot in 0..src.ref_count(field, path) {
                path.push(slot);
                let value = src.get(field, path);
                if let Some(value) = value {
                    dest.set(field, path, value)?;
                    copied += 1;
                }
                path.pop();
            }
        } else if let Some(value) = src.get(field, path) {
            dest.set(field, path, value)?;
            copied += 1;
        }
    }

    for child in kind.children() {
        match child.multiplicity() {
            Multiplicity::Repeated => {
                for index in 0..src.count(child, path) {
                    path.push(index);
                    copied += copy_instance(src, dest, child, path)?;
                    path.pop();
                }
            }
            Multiplicity::Single => {
                if src.count(child, path) > 0 {
                    copied += copy_instance(src, dest, child, path)?;
                }
            }
        }
    }
    Ok(copied)
}

/// Key for `def` on an instance of `variant`. Writes through a known variant
/// are qualified so the discriminant carries over.
fn field_for(def: &'static PropertyDef, variant: Option<ome_schema::Variant>) -> Field {
    match variant {
        Some(v) => Field::of_variant(v, def.name),
        None => Field::new(def.entity, def.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMetadataStore;
    use crate::filter::FilterMetadata;
    use ome_schema::{LightSourceKind, ShapeKind, Variant};
    use ome_types::Value;

    fn populated() -> InMemoryMetadataStore {
        let s = InMemoryMetadataStore::new();
        s.set(Field::new(EntityKind::Root, "Creator"), &[], "test".into())
            .unwrap();
        s.set(Field::new(EntityKind::Image, "Name"), &[1], "second".into())
            .unwrap();
        s.set(Field::new(EntityKind::Pixels, "SizeX"), &[1], 64.into())
            .unwrap();
        s.set(Field::new(EntityKind::Channel, "ID"), &[1, 0], "Channel:1:0".into())
            .unwrap();
        s.set(Field::new(EntityKind::Image, "AnnotationRef"), &[1, 1], "Annotation:0".into())
            .unwrap();
        let laser = Variant::LightSource(LightSourceKind::Laser);
        s.set(Field::of_variant(laser, "Wavelength"), &[0, 0], 488.0.into())
            .unwrap();
        s.set(Field::new(EntityKind::LightSource, "ID"), &[0, 0], "LightSource:0:0".into())
            .unwrap();
        let label = Variant::Shape(ShapeKind::Label);
        s.set(Field::of_variant(label, "Text"), &[0, 0], "nucleus".into())
            .unwrap();
        s
    }

    #[test]
    fn conversion_reproduces_the_graph() {
        let src = populated();
        let dest = InMemoryMetadataStore::new();
        convert_metadata(&src, &dest).unwrap();
        assert_eq!(dest.root(), src.root());
    }

    #[test]
    fn conversion_keeps_discriminants() {
        let src = populated();
        let dest = InMemoryMetadataStore::new();
        convert_metadata(&src, &dest).unwrap();
        assert_eq!(
            dest.variant(EntityKind::LightSource, &[0, 0]),
            Some(Variant::LightSource(LightSourceKind::Laser))
        );
        assert_eq!(
            dest.get(Field::new(EntityKind::LightSource, "ID"), &[0, 0]),
            Some(Value::from("LightSource:0:0"))
        );
        assert_eq!(
            dest.variant(EntityKind::Shape, &[0, 0]),
            Some(Variant::Shape(ShapeKind::Label))
        );
    }

    #[test]
    fn conversion_goes_through_wrappers() {
        let src = populated();
        src.set(Field::new(EntityKind::Image, "Description"), &[0], "a\u{2}b".into())
            .unwrap();
        let dest = FilterMetadata::new(InMemoryMetadataStore::new(), true);
        convert_metadata(&src, &dest).unwrap();
        assert_eq!(
            dest.get(Field::new(EntityKind::Image, "Description"), &[0]),
            Some(Value::from("a b"))
        );
        assert_eq!(dest.count(EntityKind::Channel, &[1]), 1);
    }
}
