//! Value types for the OME metadata store.
//!
//! Every property in the metadata schema holds a value of one semantic kind.
//! This crate defines those kinds and the checked Rust types behind them.
//!
//! # Key Types
//!
//! - [`Value`] -- Dynamically typed property value, as stored in the tree
//! - [`ValueKind`] -- Declared semantic kind of a property
//! - [`EnumDomain`] / [`EnumValue`] -- Closed enumerated value sets
//! - [`NonNegativeInteger`], [`PositiveInteger`], [`PositiveFloat`],
//!   [`PercentFraction`] -- Constrained numerics with checked constructors
//! - [`Timestamp`] -- UTC instant with RFC 3339 text form
//! - [`Color`] -- Packed RGBA colour

pub mod color;
pub mod enums;
pub mod error;
pub mod numeric;
pub mod timestamp;
pub mod value;

pub use color::Color;
pub use enums::{
    AcquisitionMode, ArcType, Binning, ContrastMethod, Correction, DetectorType, DimensionOrder,
    EnumDomain, EnumValue, ExperimentType, FilamentType, FillRule, FilterType, FontFamily,
    FontStyle, IlluminationType, Immersion, LaserMedium, LaserType, LineCap, Marker, Medium,
    MicrobeamManipulationType, MicroscopeType, NamingConvention, OmeEnum, PixelType, Pulse,
};
pub use error::TypeError;
pub use numeric::{NonNegativeInteger, PercentFraction, PositiveFloat, PositiveInteger};
pub use timestamp::Timestamp;
pub use value::{FromValue, Value, ValueKind};
