use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::variant::Family;

/// How many instances of an entity a parent holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Multiplicity {
    /// Zero or more, addressed by an index.
    Repeated,
    /// At most one, addressed through the parent without an extra index.
    Single,
}

macro_rules! entities {
    (@parent -) => { None };
    (@parent $p:ident) => { Some(EntityKind::$p) };
    ($($kind:ident => $name:literal, $parent:tt, $mult:ident;)+) => {
        /// A named kind of metadata record.
        ///
        /// Variants are declared parents-first, so [`EntityKind::ALL`] is a
        /// valid top-down traversal order.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum EntityKind {
            $($kind),+
        }

        impl EntityKind {
            /// Every entity kind, parents before children.
            pub const ALL: &'static [EntityKind] = &[$(EntityKind::$kind),+];

            /// Name used as the prefix of flattened accessor names.
            pub fn name(&self) -> &'static str {
                match self {
                    $(EntityKind::$kind => $name),+
                }
            }

            /// The containing entity, `None` for the root.
            pub fn parent(&self) -> Option<EntityKind> {
                match self {
                    $(EntityKind::$kind => entities!(@parent $parent)),+
                }
            }

            pub fn multiplicity(&self) -> Multiplicity {
                match self {
                    $(EntityKind::$kind => Multiplicity::$mult),+
                }
            }
        }
    };
}

entities! {
    Root => "", -, Single;
    Rights => "Rights", Root, Single;
    Experimenter => "Experimenter", Root, Repeated;
    ExperimenterGroup => "ExperimenterGroup", Root, Repeated;
    Project => "Project", Root, Repeated;
    Dataset => "Dataset", Root, Repeated;
    Experiment => "Experiment", Root, Repeated;
    MicrobeamManipulation => "MicrobeamManipulation", Experiment, Repeated;
    MicrobeamLightSourceSettings => "MicrobeamManipulationLightSourceSettings", MicrobeamManipulation, Repeated;
    Instrument => "Instrument", Root, Repeated;
    Microscope => "Microscope", Instrument, Single;
    LightSource => "LightSource", Instrument, Repeated;
    Detector => "Detector", Instrument, Repeated;
    Objective => "Objective", Instrument, Repeated;
    Filter => "Filter", Instrument, Repeated;
    TransmittanceRange => "TransmittanceRange", Filter, Single;
    Dichroic => "Dichroic", Instrument, Repeated;
    FilterSet => "FilterSet", Instrument, Repeated;
    Image => "Image", Root, Repeated;
    ImagingEnvironment => "ImagingEnvironment", Image, Single;
    StageLabel => "StageLabel", Image, Single;
    ObjectiveSettings => "ObjectiveSettings", Image, Single;
    Pixels => "Pixels", Image, Single;
    Channel => "Channel", Pixels, Repeated;
    DetectorSettings => "DetectorSettings", Channel, Single;
    LightSourceSettings => "ChannelLightSourceSettings", Channel, Single;
    LightPath => "LightPath", Channel, Single;
    Plane => "Plane", Pixels, Repeated;
    TiffData => "TiffData", Pixels, Repeated;
    TiffDataUuid => "UUID", TiffData, Single;
    Roi => "ROI", Root, Repeated;
    Shape => "Shape", Roi, Repeated;
    Plate => "Plate", Root, Repeated;
    Well => "Well", Plate, Repeated;
    WellSample => "WellSample", Well, Repeated;
    PlateAcquisition => "PlateAcquisition", Plate, Repeated;
    Screen => "Screen", Root, Repeated;
    Reagent => "Reagent", Screen, Repeated;
    BooleanAnnotation => "BooleanAnnotation", Root, Repeated;
    CommentAnnotation => "CommentAnnotation", Root, Repeated;
    DoubleAnnotation => "DoubleAnnotation", Root, Repeated;
    LongAnnotation => "LongAnnotation", Root, Repeated;
    TagAnnotation => "TagAnnotation", Root, Repeated;
    TermAnnotation => "TermAnnotation", Root, Repeated;
    TimestampAnnotation => "TimestampAnnotation", Root, Repeated;
    XmlAnnotation => "XMLAnnotation", Root, Repeated;
    FileAnnotation => "FileAnnotation", Root, Repeated;
    BinaryFile => "BinaryFile", FileAnnotation, Single;
    ListAnnotation => "ListAnnotation", Root, Repeated;
}

impl EntityKind {
    /// Kinds below the root, from the outermost down to `self` inclusive.
    /// Empty for the root itself.
    pub fn chain(&self) -> Vec<EntityKind> {
        let mut chain = Vec::new();
        let mut cursor = Some(*self);
        while let Some(kind) = cursor {
            if kind == EntityKind::Root {
                break;
            }
            chain.push(kind);
            cursor = kind.parent();
        }
        chain.reverse();
        chain
    }

    /// Number of indices that address one instance of this kind.
    pub fn depth(&self) -> usize {
        self.chain()
            .iter()
            .filter(|k| k.multiplicity() == Multiplicity::Repeated)
            .count()
    }

    /// Number of indices that address the parent instance.
    pub fn parent_depth(&self) -> usize {
        match self.multiplicity() {
            Multiplicity::Repeated => self.depth() - 1,
            Multiplicity::Single => self.depth(),
        }
    }

    /// Index parameter names along the path, e.g. `["imageIndex", "channelIndex"]`.
    pub fn index_names(&self) -> Vec<String> {
        self.chain()
            .into_iter()
            .filter(|k| k.multiplicity() == Multiplicity::Repeated)
            .map(|k| k.index_name())
            .collect()
    }

    /// Polymorphic family, for abstract kinds with variants.
    pub fn family(&self) -> Option<Family> {
        match self {
            EntityKind::Shape => Some(Family::Shape),
            EntityKind::LightSource => Some(Family::LightSource),
            _ => None,
        }
    }

    /// Direct children of this kind.
    pub fn children(&self) -> impl Iterator<Item = EntityKind> + '_ {
        EntityKind::ALL
            .iter()
            .copied()
            .filter(move |k| k.parent() == Some(*self))
    }

    fn index_name(&self) -> String {
        let name = match self {
            EntityKind::Roi => "ROI",
            EntityKind::LightSourceSettings => "LightSourceSettings",
            other => other.name(),
        };
        let mut chars = name.chars();
        let mut out = String::with_capacity(name.len() + 5);
        if let Some(first) = chars.next() {
            // Acronyms keep their case, as in `ROIIndex` / `XMLAnnotationIndex`.
            if name.len() > 1 && name[1..2].chars().all(char::is_uppercase) {
                out.push(first);
            } else {
                out.extend(first.to_lowercase());
            }
        }
        out.extend(chars);
        out.push_str("Index");
        out
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Root => f.write_str("OME"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for EntityKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "OME" {
            return Ok(EntityKind::Root);
        }
        EntityKind::ALL
            .iter()
            .copied()
            .find(|k| *k != EntityKind::Root && k.name() == s)
            .ok_or_else(|| SchemaError::UnknownEntity(s.to_string()))
    }
}
