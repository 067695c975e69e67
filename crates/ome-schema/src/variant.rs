use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::error::SchemaError;

/// An abstract entity kind whose instances are one of several variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Shape,
    LightSource,
}

impl Family {
    /// The entity kind that stores instances of this family.
    pub const fn entity(&self) -> EntityKind {
        match self {
            Family::Shape => EntityKind::Shape,
            Family::LightSource => EntityKind::LightSource,
        }
    }

    /// Every variant of the family.
    pub fn variants(&self) -> Vec<Variant> {
        match self {
            Family::Shape => ShapeKind::ALL.iter().map(|k| Variant::Shape(*k)).collect(),
            Family::LightSource => LightSourceKind::ALL
                .iter()
                .map(|k| Variant::LightSource(*k))
                .collect(),
        }
    }
}

/// Concrete shape kinds inside an ROI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeKind {
    Ellipse,
    Rectangle,
    Point,
    Line,
    Mask,
    Polygon,
    Polyline,
    Label,
    Text,
}

impl ShapeKind {
    pub const ALL: &'static [ShapeKind] = &[
        ShapeKind::Ellipse,
        ShapeKind::Rectangle,
        ShapeKind::Point,
        ShapeKind::Line,
        ShapeKind::Mask,
        ShapeKind::Polygon,
        ShapeKind::Polyline,
        ShapeKind::Label,
        ShapeKind::Text,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Point => "Point",
            ShapeKind::Line => "Line",
            ShapeKind::Mask => "Mask",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Polyline => "Polyline",
            ShapeKind::Label => "Label",
            ShapeKind::Text => "Text",
        }
    }
}

/// Concrete light source kinds inside an instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LightSourceKind {
    Arc,
    Filament,
    Laser,
    LightEmittingDiode,
    GenericExcitationSource,
}

impl LightSourceKind {
    pub const ALL: &'static [LightSourceKind] = &[
        LightSourceKind::Arc,
        LightSourceKind::Filament,
        LightSourceKind::Laser,
        LightSourceKind::LightEmittingDiode,
        LightSourceKind::GenericExcitationSource,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LightSourceKind::Arc => "Arc",
            LightSourceKind::Filament => "Filament",
            LightSourceKind::Laser => "Laser",
            LightSourceKind::LightEmittingDiode => "LightEmittingDiode",
            LightSourceKind::GenericExcitationSource => "GenericExcitationSource",
        }
    }
}

/// Discriminant of a polymorphic entity instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    Shape(ShapeKind),
    LightSource(LightSourceKind),
}

impl Variant {
    pub const fn family(&self) -> Family {
        match self {
            Variant::Shape(_) => Family::Shape,
            Variant::LightSource(_) => Family::LightSource,
        }
    }

    /// The entity kind instances of this variant are stored under.
    pub const fn entity(&self) -> EntityKind {
        self.family().entity()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Shape(k) => k.name(),
            Variant::LightSource(k) => k.name(),
        }
    }

    /// Every variant of every family.
    pub fn all() -> impl Iterator<Item = Variant> {
        ShapeKind::ALL
            .iter()
            .map(|k| Variant::Shape(*k))
            .chain(LightSourceKind::ALL.iter().map(|k| Variant::LightSource(*k)))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::all()
            .find(|v| v.name() == s)
            .ok_or_else(|| SchemaError::UnknownEntity(s.to_string()))
    }
}
