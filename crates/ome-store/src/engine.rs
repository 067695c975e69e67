//! The generic count/get/set engine over a [`MetadataRoot`].
//!
//! Every typed accessor is a thin call into one of these methods with a
//! [`Field`] key from the schema table.

use ome_schema::{EntityKind, Field, Variant};
use ome_types::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::filter::sanitize;
use crate::root::{extend, MetadataRoot};
use crate::validate::{resolve, validate_write, ValidatedWrite};

impl MetadataRoot {
    /// Read one property value. Anything out of bounds, never written, or
    /// addressed through a variant the instance is not, reads as `None`.
    pub fn get(&self, field: Field, path: &[usize]) -> Option<Value> {
        let (def, entity_path, slot) = resolve(field, path).ok()?;
        let node = self.node(field.entity, entity_path)?;
        if let (Some(wanted), Some(actual)) = (field.variant, node.variant) {
            if wanted != actual {
                return None;
            }
        }
        match slot {
            None => node.values.get(def.name).cloned(),
            Some(slot) => node.lists.get(def.name)?.get(slot)?.clone(),
        }
    }

    /// Number of slots of a repeated property on the instance at `path`.
    pub fn ref_count(&self, field: Field, path: &[usize]) -> usize {
        let Ok(def) = field.def() else {
            return 0;
        };
        if !def.is_repeated() {
            return 0;
        }
        let Some(node) = self.node(field.entity, path) else {
            return 0;
        };
        if let (Some(wanted), Some(actual)) = (field.variant, node.variant) {
            if wanted != actual {
                return 0;
            }
        }
        node.lists.get(def.name).map_or(0, Vec::len)
    }

    /// Discriminant of a polymorphic instance, once one has been written.
    pub fn variant(&self, entity: EntityKind, path: &[usize]) -> Option<Variant> {
        self.node(entity, path)?.variant
    }

    /// Validate and store one value, extending containers as needed.
    pub fn set(
        &mut self,
        field: Field,
        path: &[usize],
        value: Value,
        config: &StoreConfig,
    ) -> StoreResult<()> {
        let value = match value {
            Value::String(s) if config.sanitize_strings => Value::String(sanitize(&s)),
            other => other,
        };
        let write = validate_write(self, field, path, value)?;
        self.apply(field.entity, write, config)
    }

    // Validation already bounded every index, so neither container lookup
    // below fails after the tree has been touched.
    fn apply(
        &mut self,
        entity: EntityKind,
        write: ValidatedWrite<'_>,
        config: &StoreConfig,
    ) -> StoreResult<()> {
        let ValidatedWrite {
            def,
            entity_path,
            slot,
            variant,
            value,
        } = write;
        let node = self.node_mut(entity, entity_path, config.warn_on_gaps)?;
        if let Some(v) = variant {
            if node.variant.is_none() {
                debug!(entity = %entity, variant = %v, "discriminant set");
                node.variant = Some(v);
            }
        }
        match slot {
            None => {
                node.values.insert(def.name.to_string(), value);
            }
            Some(slot) => {
                let list = node.lists.entry(def.name.to_string()).or_default();
                extend(list, slot, entity, config.warn_on_gaps, || None)?;
                list[slot] = Some(value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use ome_schema::ShapeKind;
    use ome_types::{PixelType, PositiveInteger};

    fn cfg() -> StoreConfig {
        StoreConfig::default()
    }

    #[test]
    fn set_then_get() {
        let mut root = MetadataRoot::new();
        let size_x = Field::new(EntityKind::Pixels, "SizeX");
        root.set(size_x, &[0], Value::Integer(512), &cfg()).unwrap();
        assert_eq!(
            root.get(size_x, &[0]),
            Some(Value::PositiveInteger(PositiveInteger::new(512).unwrap()))
        );
        assert_eq!(root.get(size_x, &[1]), None);
        assert_eq!(root.get(Field::new(EntityKind::Pixels, "SizeY"), &[0]), None);
    }

    #[test]
    fn rejected_write_leaves_tree_untouched() {
        let mut root = MetadataRoot::new();
        let ty = Field::new(EntityKind::Pixels, "Type");
        let err = root.set(ty, &[3], Value::from("uint7"), &cfg()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidEnumValue { .. }));
        assert_eq!(root.count(EntityKind::Image, &[]), 0);
        assert!(root.is_empty());

        root.set(ty, &[0], Value::from(PixelType::Uint8), &cfg()).unwrap();
        assert!(root.set(ty, &[0], Value::from("float32"), &cfg()).is_err());
        assert_eq!(root.get(ty, &[0]), Some(Value::from(PixelType::Uint8)));
    }

    #[test]
    fn repeated_slots_fill_gaps_with_unset() {
        let mut root = MetadataRoot::new();
        let refs = Field::new(EntityKind::Image, "AnnotationRef");
        root.set(refs, &[0, 2], Value::from("Annotation:2"), &cfg()).unwrap();
        assert_eq!(root.ref_count(refs, &[0]), 3);
        assert_eq!(root.get(refs, &[0, 0]), None);
        assert_eq!(root.get(refs, &[0, 2]), Some(Value::from("Annotation:2")));
        assert_eq!(root.ref_count(refs, &[1]), 0);
        assert_eq!(root.ref_count(Field::new(EntityKind::Image, "Name"), &[0]), 0);
    }

    #[test]
    fn discriminant_is_set_by_first_qualified_write() {
        let mut root = MetadataRoot::new();
        let ellipse = Variant::Shape(ShapeKind::Ellipse);
        let rect = Variant::Shape(ShapeKind::Rectangle);

        // An unqualified common write leaves the discriminant open.
        root.set(Field::new(EntityKind::Shape, "ID"), &[0, 0], Value::from("Shape:0:0"), &cfg())
            .unwrap();
        assert_eq!(root.variant(EntityKind::Shape, &[0, 0]), None);

        root.set(Field::of_variant(ellipse, "RadiusX"), &[0, 0], Value::Double(4.0), &cfg())
            .unwrap();
        assert_eq!(root.variant(EntityKind::Shape, &[0, 0]), Some(ellipse));

        let err = root
            .set(Field::of_variant(rect, "Width"), &[0, 0], Value::Double(1.0), &cfg())
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::VariantConflict {
                entity: EntityKind::Shape,
                existing: ellipse,
                requested: rect,
            }
        );
        assert_eq!(root.variant(EntityKind::Shape, &[0, 0]), Some(ellipse));
    }

    #[test]
    fn qualified_read_through_other_variant_is_unset() {
        let mut root = MetadataRoot::new();
        let ellipse = Variant::Shape(ShapeKind::Ellipse);
        let point = Variant::Shape(ShapeKind::Point);
        root.set(Field::of_variant(ellipse, "StrokeWidth"), &[0, 0], Value::Double(2.0), &cfg())
            .unwrap();
        assert_eq!(
            root.get(Field::of_variant(ellipse, "StrokeWidth"), &[0, 0]),
            Some(Value::Double(2.0))
        );
        assert_eq!(
            root.get(Field::new(EntityKind::Shape, "StrokeWidth"), &[0, 0]),
            Some(Value::Double(2.0))
        );
        assert_eq!(root.get(Field::of_variant(point, "StrokeWidth"), &[0, 0]), None);
    }

    #[test]
    fn sanitizing_config_cleans_strings() {
        let mut root = MetadataRoot::new();
        let name = Field::new(EntityKind::Image, "Name");
        root.set(name, &[0], Value::from("a\u{1}b"), &StoreConfig::sanitizing())
            .unwrap();
        assert_eq!(root.get(name, &[0]), Some(Value::from("a b")));
    }

    #[test]
    fn wrong_read_arity_is_unset() {
        let mut root = MetadataRoot::new();
        let name = Field::new(EntityKind::Image, "Name");
        root.set(name, &[0], Value::from("x"), &cfg()).unwrap();
        assert_eq!(root.get(name, &[]), None);
        assert_eq!(root.get(name, &[0, 0]), None);
    }
}
