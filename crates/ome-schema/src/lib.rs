//! Schema table for the OME metadata store.
//!
//! The schema is pure data: a closed catalogue of entity kinds, the
//! containment tree they form, the polymorphic families (shapes and light
//! sources), and one [`PropertyDef`] row per property. The store's accessor
//! surface is derived from this table instead of being written out per
//! property.
//!
//! # Addressing
//!
//! An entity instance is located by one zero-based index per *repeated*
//! level on the path from the root. Singleton levels (for example `Pixels`
//! inside `Image`) add no index, so a `Channel` is addressed by
//! `(imageIndex, channelIndex)`.
//!
//! # Flattened names
//!
//! [`Field::parse`] resolves the historic flattened accessor names
//! (`PixelsSizeX`, `EllipseRadiusX`, `ImageAnnotationRef`, `UUID`) to a
//! typed [`Field`].

pub mod entity;
pub mod error;
pub mod field;
pub mod property;
pub mod table;
pub mod variant;

pub use entity::{EntityKind, Multiplicity};
pub use error::{SchemaError, SchemaResult};
pub use field::{flat_field_names, Field};
pub use property::{find_property, properties_of, Cardinality, PropertyDef, RefTarget};
pub use table::{ANNOTATIONS, PROPERTIES};
pub use variant::{Family, LightSourceKind, ShapeKind, Variant};
