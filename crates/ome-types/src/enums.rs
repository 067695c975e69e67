use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;
use crate::value::{FromValue, Value};

/// A closed enumeration from the metadata schema.
///
/// Implementors print and parse their canonical schema symbols exactly;
/// matching is case-sensitive.
pub trait OmeEnum: Copy + FromStr<Err = TypeError> + 'static {
    /// The domain this enumeration belongs to.
    const DOMAIN: EnumDomain;

    /// Canonical schema symbol.
    fn as_str(&self) -> &'static str;
}

macro_rules! ome_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $symbol:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $symbol)]
                $variant,
            )+
        }

        impl $name {
            /// Every member, in schema order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Every canonical symbol, in schema order.
            pub const SYMBOLS: &'static [&'static str] = &[$($symbol),+];
        }

        impl OmeEnum for $name {
            const DOMAIN: EnumDomain = EnumDomain::$name;

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $symbol),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($symbol => Ok($name::$variant),)+
                    other => Err(TypeError::InvalidEnumValue {
                        domain: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for EnumValue {
            fn from(value: $name) -> Self {
                EnumValue {
                    domain: EnumDomain::$name,
                    symbol: value.as_str(),
                }
            }
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Self {
                Value::Enum(value.into())
            }
        }

        impl FromValue for $name {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Enum(e) if e.domain == EnumDomain::$name => e.symbol.parse().ok(),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! enum_domains {
    ($($name:ident),+ $(,)?) => {
        /// Identifies one of the closed enumerations.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum EnumDomain {
            $($name),+
        }

        impl EnumDomain {
            /// Every domain.
            pub const ALL: &'static [EnumDomain] = &[$(EnumDomain::$name),+];

            /// Schema name of the domain.
            pub fn name(&self) -> &'static str {
                match self {
                    $(EnumDomain::$name => stringify!($name)),+
                }
            }

            /// Canonical symbols admitted by this domain.
            pub fn symbols(&self) -> &'static [&'static str] {
                match self {
                    $(EnumDomain::$name => $name::SYMBOLS),+
                }
            }
        }
    };
}

enum_domains!(
    AcquisitionMode,
    ArcType,
    Binning,
    ContrastMethod,
    Correction,
    DetectorType,
    DimensionOrder,
    ExperimentType,
    FilamentType,
    FillRule,
    FilterType,
    FontFamily,
    FontStyle,
    IlluminationType,
    Immersion,
    LaserMedium,
    LaserType,
    LineCap,
    Marker,
    Medium,
    MicrobeamManipulationType,
    MicroscopeType,
    NamingConvention,
    PixelType,
    Pulse,
);

impl EnumDomain {
    /// Validate `symbol` against this domain, returning the interned symbol.
    pub fn parse(&self, symbol: &str) -> Result<EnumValue, TypeError> {
        self.symbols()
            .iter()
            .find(|s| **s == symbol)
            .map(|s| EnumValue {
                domain: *self,
                symbol: s,
            })
            .ok_or_else(|| TypeError::InvalidEnumValue {
                domain: self.name(),
                value: symbol.to_string(),
            })
    }
}

impl fmt::Display for EnumDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A member of some [`EnumDomain`], held by its interned symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EnumValue {
    pub domain: EnumDomain,
    pub symbol: &'static str,
}

impl EnumValue {
    /// Convert into the typed enumeration `E`, if the domains agree.
    pub fn typed<E: OmeEnum>(&self) -> Option<E> {
        if self.domain == E::DOMAIN {
            self.symbol.parse().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

#[derive(Deserialize)]
struct RawEnumValue {
    domain: EnumDomain,
    symbol: String,
}

impl TryFrom<RawEnumValue> for EnumValue {
    type Error = TypeError;

    fn try_from(raw: RawEnumValue) -> Result<Self, Self::Error> {
        raw.domain.parse(&raw.symbol)
    }
}

// The symbol is re-interned from the domain table, so any input lifetime works.
impl<'de> Deserialize<'de> for EnumValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnumValue::deserialize(deserializer)?;
        EnumValue::try_from(raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

ome_enum!(
    /// Type of an arc lamp.
    ArcType {
        Hg => "Hg",
        Xe => "Xe",
        HgXe => "HgXe",
        Other => "Other",
    }
);

ome_enum!(
    /// Storage type of a single pixel sample.
    PixelType {
        Int8 => "int8",
        Int16 => "int16",
        Int32 => "int32",
        Uint8 => "uint8",
        Uint16 => "uint16",
        Uint32 => "uint32",
        Float => "float",
        Double => "double",
        Complex => "complex",
        DoubleComplex => "double-complex",
        Bit => "bit",
    }
);

impl PixelType {
    /// Bytes occupied by one sample. `Bit` rounds up to a single byte.
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            PixelType::Int8 | PixelType::Uint8 | PixelType::Bit => 1,
            PixelType::Int16 | PixelType::Uint16 => 2,
            PixelType::Int32 | PixelType::Uint32 | PixelType::Float => 4,
            PixelType::Double | PixelType::Complex => 8,
            PixelType::DoubleComplex => 16,
        }
    }
}

ome_enum!(
    /// Rasterisation order of the five pixel dimensions.
    DimensionOrder {
        Xyzct => "XYZCT",
        Xyztc => "XYZTC",
        Xyctz => "XYCTZ",
        Xyczt => "XYCZT",
        Xytcz => "XYTCZ",
        Xytzc => "XYTZC",
    }
);

impl DimensionOrder {
    /// The three non-planar axes, fastest varying first.
    pub fn plane_axes(&self) -> [char; 3] {
        let mut axes = ['Z'; 3];
        for (slot, c) in axes.iter_mut().zip(self.as_str().chars().skip(2)) {
            *slot = c;
        }
        axes
    }
}

ome_enum!(
    /// Detector binning.
    Binning {
        OneByOne => "1x1",
        TwoByTwo => "2x2",
        FourByFour => "4x4",
        EightByEight => "8x8",
        Other => "Other",
    }
);

ome_enum!(
    /// Objective lens correction.
    Correction {
        Uv => "UV",
        PlanApo => "PlanApo",
        PlanFluor => "PlanFluor",
        SuperFluor => "SuperFluor",
        VioletCorrected => "VioletCorrected",
        Achro => "Achro",
        Achromat => "Achromat",
        Fluor => "Fluor",
        Fl => "Fl",
        Fluar => "Fluar",
        Neofluar => "Neofluar",
        Fluotar => "Fluotar",
        Apo => "Apo",
        StrainFree => "StrainFree",
        Other => "Other",
    }
);

ome_enum!(
    /// Objective immersion medium.
    Immersion {
        Oil => "Oil",
        Water => "Water",
        WaterDipping => "WaterDipping",
        Air => "Air",
        Multi => "Multi",
        Glycerol => "Glycerol",
        Other => "Other",
    }
);

ome_enum!(
    FilterType {
        Dichroic => "Dichroic",
        LongPass => "LongPass",
        ShortPass => "ShortPass",
        BandPass => "BandPass",
        MultiPass => "MultiPass",
        NeutralDensity => "NeutralDensity",
        Tuneable => "Tuneable",
        Other => "Other",
    }
);

ome_enum!(
    DetectorType {
        Ccd => "CCD",
        IntensifiedCcd => "IntensifiedCCD",
        AnalogVideo => "AnalogVideo",
        Pmt => "PMT",
        Photodiode => "Photodiode",
        Spectroscopy => "Spectroscopy",
        LifetimeImaging => "LifetimeImaging",
        CorrelationSpectroscopy => "CorrelationSpectroscopy",
        Ftir => "FTIR",
        Emccd => "EMCCD",
        Apd => "APD",
        Cmos => "CMOS",
        Ebccd => "EBCCD",
        Other => "Other",
    }
);

ome_enum!(
    LaserType {
        Excimer => "Excimer",
        Gas => "Gas",
        MetalVapor => "MetalVapor",
        SolidState => "SolidState",
        Dye => "Dye",
        Semiconductor => "Semiconductor",
        FreeElectron => "FreeElectron",
        Other => "Other",
    }
);

ome_enum!(
    /// Gain medium of a laser.
    LaserMedium {
        Cu => "Cu",
        Ag => "Ag",
        ArFl => "ArFl",
        ArCl => "ArCl",
        KrFl => "KrFl",
        XeFl => "XeFl",
        XeCl => "XeCl",
        XeBr => "XeBr",
        N => "N",
        Ar => "Ar",
        Kr => "Kr",
        Xe => "Xe",
        HeNe => "HeNe",
        HeCd => "HeCd",
        Co => "CO",
        Co2 => "CO2",
        H2o => "H2O",
        Hfl => "HFl",
        NdGlass => "NdGlass",
        NdYag => "NdYAG",
        ErGlass => "ErGlass",
        ErYag => "ErYAG",
        HoYlf => "HoYLF",
        HoYag => "HoYAG",
        Ruby => "Ruby",
        TiSapphire => "TiSapphire",
        Alexandrite => "Alexandrite",
        Rhodamine6G => "Rhodamine6G",
        CoumarinC30 => "CoumarinC30",
        GaAs => "GaAs",
        GaAlAs => "GaAlAs",
        EMinus => "EMinus",
        Other => "Other",
    }
);

ome_enum!(
    Pulse {
        Cw => "CW",
        Single => "Single",
        QSwitched => "QSwitched",
        Repetitive => "Repetitive",
        ModeLocked => "ModeLocked",
        Other => "Other",
    }
);

ome_enum!(
    AcquisitionMode {
        WideField => "WideField",
        LaserScanningConfocalMicroscopy => "LaserScanningConfocalMicroscopy",
        SpinningDiskConfocal => "SpinningDiskConfocal",
        SlitScanConfocal => "SlitScanConfocal",
        MultiPhotonMicroscopy => "MultiPhotonMicroscopy",
        StructuredIllumination => "StructuredIllumination",
        SingleMoleculeImaging => "SingleMoleculeImaging",
        TotalInternalReflection => "TotalInternalReflection",
        FluorescenceLifetime => "FluorescenceLifetime",
        SpectralImaging => "SpectralImaging",
        FluorescenceCorrelationSpectroscopy => "FluorescenceCorrelationSpectroscopy",
        NearFieldScanningOpticalMicroscopy => "NearFieldScanningOpticalMicroscopy",
        SecondHarmonicGenerationImaging => "SecondHarmonicGenerationImaging",
        Palm => "PALM",
        Storm => "STORM",
        Sted => "STED",
        Tirf => "TIRF",
        Fsm => "FSM",
        Lcm => "LCM",
        BrightField => "BrightField",
        SweptFieldConfocal => "SweptFieldConfocal",
        Spim => "SPIM",
        Other => "Other",
    }
);

ome_enum!(
    ContrastMethod {
        Brightfield => "Brightfield",
        Phase => "Phase",
        Dic => "DIC",
        HoffmanModulation => "HoffmanModulation",
        ObliqueIllumination => "ObliqueIllumination",
        PolarizedLight => "PolarizedLight",
        Darkfield => "Darkfield",
        Fluorescence => "Fluorescence",
        Other => "Other",
    }
);

ome_enum!(
    IlluminationType {
        Transmitted => "Transmitted",
        Epifluorescence => "Epifluorescence",
        Oblique => "Oblique",
        NonLinear => "NonLinear",
        Other => "Other",
    }
);

ome_enum!(
    /// How plate rows or columns are labelled.
    NamingConvention {
        Letter => "letter",
        Number => "number",
    }
);

ome_enum!(
    MicrobeamManipulationType {
        Frap => "FRAP",
        Flip => "FLIP",
        InverseFrap => "InverseFRAP",
        Photoablation => "Photoablation",
        Photoactivation => "Photoactivation",
        Uncaging => "Uncaging",
        OpticalTrapping => "OpticalTrapping",
        Other => "Other",
    }
);

ome_enum!(
    ExperimentType {
        Fp => "FP",
        Fret => "FRET",
        TimeLapse => "TimeLapse",
        FourDPlus => "FourDPlus",
        Screen => "Screen",
        Immunocytochemistry => "Immunocytochemistry",
        Immunofluorescence => "Immunofluorescence",
        Fish => "FISH",
        Electrophysiology => "Electrophysiology",
        IonImaging => "IonImaging",
        Colocalization => "Colocalization",
        PgiDocumentation => "PGIDocumentation",
        FluorescenceLifetime => "FluorescenceLifetime",
        SpectralImaging => "SpectralImaging",
        Photobleaching => "Photobleaching",
        Other => "Other",
    }
);

ome_enum!(
    FillRule {
        EvenOdd => "EvenOdd",
        NonZero => "NonZero",
    }
);

ome_enum!(
    FontFamily {
        Serif => "serif",
        SansSerif => "sans-serif",
        Cursive => "cursive",
        Fantasy => "fantasy",
        Monospace => "monospace",
    }
);

ome_enum!(
    FontStyle {
        Bold => "Bold",
        BoldItalic => "BoldItalic",
        Italic => "Italic",
        Normal => "Normal",
    }
);

ome_enum!(
    LineCap {
        Butt => "Butt",
        Line => "Line",
        Square => "Square",
    }
);

ome_enum!(
    Marker {
        Arrow => "Arrow",
    }
);

ome_enum!(
    MicroscopeType {
        Upright => "Upright",
        Inverted => "Inverted",
        Dissection => "Dissection",
        Electrophysiology => "Electrophysiology",
        Other => "Other",
    }
);

ome_enum!(
    FilamentType {
        Incandescent => "Incandescent",
        Halogen => "Halogen",
        Other => "Other",
    }
);

ome_enum!(
    /// Medium between objective and sample.
    Medium {
        Air => "Air",
        Oil => "Oil",
        Water => "Water",
        Glycerol => "Glycerol",
        Other => "Other",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_type_symbols_round_trip() {
        for pt in PixelType::ALL {
            let parsed: PixelType = pt.as_str().parse().unwrap();
            assert_eq!(parsed, *pt);
        }
        assert_eq!(PixelType::DoubleComplex.to_string(), "double-complex");
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("uint16".parse::<PixelType>().is_ok());
        let err = "UINT16".parse::<PixelType>().unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidEnumValue {
                domain: "PixelType",
                value: "UINT16".into(),
            }
        );
    }

    #[test]
    fn binning_uses_schema_symbols() {
        assert_eq!(Binning::TwoByTwo.as_str(), "2x2");
        assert_eq!("8x8".parse::<Binning>().unwrap(), Binning::EightByEight);
    }

    #[test]
    fn domain_parse_interns_symbol() {
        let v = EnumDomain::Immersion.parse("Oil").unwrap();
        assert_eq!(v.symbol, "Oil");
        assert_eq!(v.typed::<Immersion>(), Some(Immersion::Oil));
        assert!(EnumDomain::Immersion.parse("Honey").is_err());
    }

    #[test]
    fn typed_rejects_foreign_domain() {
        let v: EnumValue = ArcType::Xe.into();
        assert_eq!(v.typed::<LaserMedium>(), None);
        assert_eq!(v.typed::<ArcType>(), Some(ArcType::Xe));
    }

    #[test]
    fn every_domain_has_symbols() {
        for d in EnumDomain::ALL {
            assert!(!d.symbols().is_empty(), "{d} has no symbols");
        }
    }

    #[test]
    fn dimension_order_plane_axes() {
        assert_eq!(DimensionOrder::Xyzct.plane_axes(), ['Z', 'C', 'T']);
        assert_eq!(DimensionOrder::Xytcz.plane_axes(), ['T', 'C', 'Z']);
    }

    #[test]
    fn enum_value_serde_validates_symbol() {
        let v: EnumValue = PixelType::Uint8.into();
        let json = serde_json::to_string(&v).unwrap();
        let back: EnumValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        let bogus = r#"{"domain":"PixelType","symbol":"uint7"}"#;
        assert!(serde_json::from_str::<EnumValue>(bogus).is_err());
    }

    #[test]
    fn enum_value_deserializes_from_borrowed_input() {
        let json = String::from(r#"{"domain":"PixelType","symbol":"uint16"}"#);
        let v: EnumValue = serde_json::from_str(&json).unwrap();
        drop(json);
        assert_eq!(v.typed::<PixelType>(), Some(PixelType::Uint16));
        assert_eq!(v.symbol, "uint16");
    }

    #[test]
    fn typed_enum_serializes_as_symbol() {
        let json = serde_json::to_string(&FontFamily::SansSerif).unwrap();
        assert_eq!(json, "\"sans-serif\"");
    }
}
