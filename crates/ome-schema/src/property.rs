use std::collections::HashMap;
use std::sync::OnceLock;

use ome_types::ValueKind;

use crate::entity::EntityKind;
use crate::table::PROPERTIES;
use crate::variant::Variant;

/// Whether a property holds one value or an indexed list of values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Single,
    /// Addressed by one extra trailing index (e.g. `annotationRefIndex`).
    Repeated,
}

/// What a reference property points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefTarget {
    /// The `ID` of an instance of this kind.
    Entity(EntityKind),
    /// The `ID` of any annotation.
    Annotation,
}

/// One row of the schema table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyDef {
    pub entity: EntityKind,
    /// Set for properties only the given variant of a family carries.
    pub variant: Option<Variant>,
    pub name: &'static str,
    pub kind: ValueKind,
    pub cardinality: Cardinality,
}

impl PropertyDef {
    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }

    /// Historic flattened accessor name, e.g. `PixelsSizeX` or `LaserPump`.
    pub fn flat_name(&self) -> String {
        match self.variant {
            Some(v) => format!("{}{}", v.name(), self.name),
            None => format!("{}{}", self.entity.name(), self.name),
        }
    }

    /// Number of indices needed to address one value of this property.
    pub fn arity(&self) -> usize {
        self.entity.depth() + usize::from(self.is_repeated())
    }

    /// Whether the property applies to instances of `variant` (or to
    /// instances whose variant is not known).
    pub fn applies_to(&self, variant: Option<Variant>) -> bool {
        match (self.variant, variant) {
            (None, _) => true,
            (Some(own), Some(other)) => own == other,
            (Some(_), None) => true,
        }
    }

    /// Target of a cross-reference property, `None` for plain properties.
    ///
    /// Settings entities carry the referenced hardware's `ID` in their own
    /// `ID` property.
    pub fn reference_target(&self) -> Option<RefTarget> {
        match (self.entity, self.name) {
            (EntityKind::DetectorSettings, "ID") => {
                return Some(RefTarget::Entity(EntityKind::Detector))
            }
            (EntityKind::ObjectiveSettings, "ID") => {
                return Some(RefTarget::Entity(EntityKind::Objective))
            }
            (EntityKind::LightSourceSettings | EntityKind::MicrobeamLightSourceSettings, "ID") => {
                return Some(RefTarget::Entity(EntityKind::LightSource))
            }
            _ => {}
        }
        match self.name {
            "AnnotationRef" => Some(RefTarget::Annotation),
            "Leader" => Some(RefTarget::Entity(EntityKind::Experimenter)),
            "Pump" => Some(RefTarget::Entity(EntityKind::LightSource)),
            "ExcitationFilterRef" | "EmissionFilterRef" => {
                Some(RefTarget::Entity(EntityKind::Filter))
            }
            name => name
                .strip_suffix("Ref")
                .and_then(|target| target.parse().ok())
                .map(RefTarget::Entity),
        }
    }
}

fn by_entity() -> &'static HashMap<EntityKind, Vec<&'static PropertyDef>> {
    static INDEX: OnceLock<HashMap<EntityKind, Vec<&'static PropertyDef>>> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut map: HashMap<EntityKind, Vec<&'static PropertyDef>> = HashMap::new();
        for def in PROPERTIES {
            map.entry(def.entity).or_default().push(def);
        }
        map
    })
}

/// Every property declared on `entity`, variant-specific ones included,
/// in table order.
pub fn properties_of(entity: EntityKind) -> &'static [&'static PropertyDef] {
    by_entity()
        .get(&entity)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Find the row for `name` on `entity` that applies to `variant`.
pub fn find_property(
    entity: EntityKind,
    variant: Option<Variant>,
    name: &str,
) -> Option<&'static PropertyDef> {
    properties_of(entity).iter().copied().find(|def| {
        def.name == name
            && match variant {
                Some(_) => def.applies_to(variant),
                None => def.variant.is_none(),
            }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{LightSourceKind, ShapeKind};
    use ome_types::EnumDomain;

    #[test]
    fn pixels_properties_are_typed() {
        let size_x = find_property(EntityKind::Pixels, None, "SizeX").unwrap();
        assert_eq!(size_x.kind, ValueKind::PositiveInteger);
        assert_eq!(size_x.flat_name(), "PixelsSizeX");
        assert_eq!(size_x.arity(), 1);

        let ty = find_property(EntityKind::Pixels, None, "Type").unwrap();
        assert_eq!(ty.kind, ValueKind::Enum(EnumDomain::PixelType));
    }

    #[test]
    fn repeated_refs_take_an_extra_index() {
        let r = find_property(EntityKind::Image, None, "AnnotationRef").unwrap();
        assert!(r.is_repeated());
        assert_eq!(r.arity(), 2);
        assert_eq!(r.reference_target(), Some(RefTarget::Annotation));
    }

    #[test]
    fn variant_properties_need_their_variant() {
        let ellipse = Some(Variant::Shape(ShapeKind::Ellipse));
        let rect = Some(Variant::Shape(ShapeKind::Rectangle));
        assert!(find_property(EntityKind::Shape, ellipse, "RadiusX").is_some());
        assert!(find_property(EntityKind::Shape, rect, "RadiusX").is_none());
        assert!(find_property(EntityKind::Shape, None, "RadiusX").is_none());
        // Common properties resolve with or without a variant.
        assert!(find_property(EntityKind::Shape, rect, "StrokeWidth").is_some());
        assert!(find_property(EntityKind::Shape, None, "StrokeWidth").is_some());
    }

    #[test]
    fn laser_pump_points_at_another_light_source() {
        let laser = Some(Variant::LightSource(LightSourceKind::Laser));
        let pump = find_property(EntityKind::LightSource, laser, "Pump").unwrap();
        assert_eq!(pump.flat_name(), "LaserPump");
        assert_eq!(
            pump.reference_target(),
            Some(RefTarget::Entity(EntityKind::LightSource))
        );
    }

    #[test]
    fn reference_targets() {
        let roi_ref = find_property(EntityKind::Image, None, "ROIRef").unwrap();
        assert_eq!(roi_ref.reference_target(), Some(RefTarget::Entity(EntityKind::Roi)));
        let leader = find_property(EntityKind::ExperimenterGroup, None, "Leader").unwrap();
        assert_eq!(
            leader.reference_target(),
            Some(RefTarget::Entity(EntityKind::Experimenter))
        );
        let settings = find_property(EntityKind::DetectorSettings, None, "ID").unwrap();
        assert_eq!(
            settings.reference_target(),
            Some(RefTarget::Entity(EntityKind::Detector))
        );
        let image_id = find_property(EntityKind::Image, None, "ID").unwrap();
        assert_eq!(image_id.reference_target(), None);
        let name = find_property(EntityKind::Image, None, "Name").unwrap();
        assert_eq!(name.reference_target(), None);
    }

    #[test]
    fn every_entity_has_properties() {
        for kind in EntityKind::ALL {
            assert!(!properties_of(*kind).is_empty(), "{kind:?} has no properties");
        }
    }
}
