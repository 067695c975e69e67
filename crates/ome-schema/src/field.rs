use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Serialize;

use crate::entity::EntityKind;
use crate::error::{SchemaError, SchemaResult};
use crate::property::{find_property, PropertyDef};
use crate::table::PROPERTIES;
use crate::variant::Variant;

/// Key of one property, optionally qualified by a variant.
///
/// A variant-qualified field (`Field::of_variant(Ellipse, "StrokeWidth")`)
/// addresses a common property through a specific variant: writing it fixes
/// the instance's discriminant, reading it yields nothing when the instance
/// is another variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Field {
    pub entity: EntityKind,
    pub variant: Option<Variant>,
    pub property: &'static str,
}

impl Field {
    /// Unchecked key; resolve with [`Field::def`].
    pub const fn new(entity: EntityKind, property: &'static str) -> Self {
        Self {
            entity,
            variant: None,
            property,
        }
    }

    /// Unchecked variant-qualified key.
    pub const fn of_variant(variant: Variant, property: &'static str) -> Self {
        Self {
            entity: variant.entity(),
            variant: Some(variant),
            property,
        }
    }

    /// Resolve a property by name, interning the name from the table.
    pub fn lookup(entity: EntityKind, variant: Option<Variant>, property: &str) -> SchemaResult<Self> {
        if let Some(v) = variant {
            if v.entity() != entity {
                return Err(SchemaError::ForeignVariant {
                    entity,
                    variant: v.name(),
                });
            }
        }
        let def = find_property(entity, variant, property).ok_or_else(|| {
            SchemaError::UnknownProperty {
                entity,
                property: property.to_string(),
            }
        })?;
        Ok(Self {
            entity,
            variant,
            property: def.name,
        })
    }

    /// Resolve a flattened accessor name such as `PixelsSizeX`,
    /// `EllipseRadiusX` or `ShapeStrokeWidth`.
    pub fn parse(flat: &str) -> SchemaResult<Self> {
        flat_names()
            .get(flat)
            .copied()
            .ok_or_else(|| SchemaError::UnknownField(flat.to_string()))
    }

    /// The schema row behind this key.
    pub fn def(&self) -> SchemaResult<&'static PropertyDef> {
        if let Some(v) = self.variant {
            if v.entity() != self.entity {
                return Err(SchemaError::ForeignVariant {
                    entity: self.entity,
                    variant: v.name(),
                });
            }
        }
        find_property(self.entity, self.variant, self.property).ok_or_else(|| {
            SchemaError::UnknownProperty {
                entity: self.entity,
                property: self.property.to_string(),
            }
        })
    }

    /// Flattened accessor name of this key.
    pub fn flat_name(&self) -> String {
        match self.variant {
            Some(v) => format!("{}{}", v.name(), self.property),
            None => format!("{}{}", self.entity.name(), self.property),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flat_name())
    }
}

impl FromStr for Field {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::parse(s)
    }
}

fn flat_names() -> &'static HashMap<String, Field> {
    static NAMES: OnceLock<HashMap<String, Field>> = OnceLock::new();
    NAMES.get_or_init(|| {
        let mut names = HashMap::new();
        for def in PROPERTIES {
            match (def.variant, def.entity.family()) {
                (Some(v), _) => {
                    names.insert(def.flat_name(), Field::of_variant(v, def.name));
                }
                (None, Some(family)) => {
                    names.insert(def.flat_name(), Field::new(def.entity, def.name));
                    for v in family.variants() {
                        let field = Field::of_variant(v, def.name);
                        names.insert(field.flat_name(), field);
                    }
                }
                (None, None) => {
                    names.insert(def.flat_name(), Field::new(def.entity, def.name));
                }
            }
        }
        names
    })
}

/// Every flattened name the schema answers to, sorted.
pub fn flat_field_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = flat_names().keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{LightSourceKind, ShapeKind};

    // -----------------------------------------------------------------------
    // Flattened names
    // -----------------------------------------------------------------------

    #[test]
    fn parse_plain_entity_property() {
        let f = Field::parse("PixelsSizeX").unwrap();
        assert_eq!(f, Field::new(EntityKind::Pixels, "SizeX"));
        assert_eq!(f.to_string(), "PixelsSizeX");
    }

    #[test]
    fn parse_variant_property() {
        let f = Field::parse("EllipseRadiusX").unwrap();
        assert_eq!(f.entity, EntityKind::Shape);
        assert_eq!(f.variant, Some(Variant::Shape(ShapeKind::Ellipse)));
        assert_eq!(f.property, "RadiusX");
    }

    #[test]
    fn common_family_property_has_qualified_and_plain_names() {
        let plain = Field::parse("ShapeStrokeWidth").unwrap();
        assert_eq!(plain.variant, None);
        let qualified = Field::parse("RectangleStrokeWidth").unwrap();
        assert_eq!(qualified.variant, Some(Variant::Shape(ShapeKind::Rectangle)));
        let laser_id = Field::parse("LaserID").unwrap();
        assert_eq!(
            laser_id,
            Field::of_variant(Variant::LightSource(LightSourceKind::Laser), "ID")
        );
    }

    #[test]
    fn parse_root_and_renamed_entities() {
        assert_eq!(Field::parse("UUID").unwrap(), Field::new(EntityKind::Root, "UUID"));
        assert_eq!(
            Field::parse("UUIDFileName").unwrap(),
            Field::new(EntityKind::TiffDataUuid, "FileName")
        );
        assert_eq!(
            Field::parse("ROIAnnotationRef").unwrap(),
            Field::new(EntityKind::Roi, "AnnotationRef")
        );
        assert_eq!(
            Field::parse("ChannelLightSourceSettingsAttenuation").unwrap(),
            Field::new(EntityKind::LightSourceSettings, "Attenuation")
        );
    }

    #[test]
    fn unknown_flat_name_is_rejected() {
        assert_eq!(
            Field::parse("PixelsSizeW").unwrap_err(),
            SchemaError::UnknownField("PixelsSizeW".into())
        );
    }

    #[test]
    fn flat_names_do_not_collide() {
        let plain_rows = PROPERTIES.iter().filter(|d| d.variant.is_none()).count();
        let variant_rows = PROPERTIES.iter().filter(|d| d.variant.is_some()).count();
        let family_expansions: usize = PROPERTIES
            .iter()
            .filter(|d| d.variant.is_none())
            .filter_map(|d| d.entity.family())
            .map(|f| f.variants().len())
            .sum();
        assert_eq!(
            flat_field_names().len(),
            plain_rows + variant_rows + family_expansions
        );
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    #[test]
    fn lookup_interns_property_name() {
        let name = String::from("SizeC");
        let f = Field::lookup(EntityKind::Pixels, None, &name).unwrap();
        assert_eq!(f.property, "SizeC");
    }

    #[test]
    fn lookup_rejects_foreign_variant() {
        let err = Field::lookup(
            EntityKind::Image,
            Some(Variant::Shape(ShapeKind::Point)),
            "Name",
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::ForeignVariant { .. }));
    }

    #[test]
    fn def_of_unchecked_key() {
        assert!(Field::new(EntityKind::Image, "Name").def().is_ok());
        assert!(Field::new(EntityKind::Image, "Colour").def().is_err());
        let wrong_variant = Field::of_variant(Variant::Shape(ShapeKind::Point), "RadiusX");
        assert!(wrong_variant.def().is_err());
    }

    #[test]
    fn field_serializes_as_struct() {
        let f = Field::new(EntityKind::Image, "Name");
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"Image\""));
    }
}
