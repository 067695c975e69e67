//! The property table.
//!
//! One block per entity kind (or per variant of a polymorphic family); one
//! row per property with its value kind. Rows marked `repeated` hold an
//! indexed list and take an extra trailing index.

use ome_types::{EnumDomain, ValueKind};

use crate::entity::EntityKind;
use crate::property::{Cardinality, PropertyDef};
use crate::variant::{LightSourceKind, ShapeKind, Variant};

macro_rules! kind {
    (String) => { ValueKind::String };
    (Boolean) => { ValueKind::Boolean };
    (Integer) => { ValueKind::Integer };
    (Double) => { ValueKind::Double };
    (NonNegativeInteger) => { ValueKind::NonNegativeInteger };
    (PositiveInteger) => { ValueKind::PositiveInteger };
    (PositiveFloat) => { ValueKind::PositiveFloat };
    (PercentFraction) => { ValueKind::PercentFraction };
    (Timestamp) => { ValueKind::Timestamp };
    (Color) => { ValueKind::Color };
    ($domain:ident) => { ValueKind::Enum(EnumDomain::$domain) };
}

macro_rules! card {
    () => { Cardinality::Single };
    (repeated) => { Cardinality::Repeated };
}

macro_rules! variant {
    (()) => { None };
    ((Shape $k:ident)) => { Some(Variant::Shape(ShapeKind::$k)) };
    ((LightSource $k:ident)) => { Some(Variant::LightSource(LightSourceKind::$k)) };
}

macro_rules! schema {
    ($($entity:ident $variant:tt { $($name:literal: $kind:ident $($rep:ident)?;)* })*) => {
        /// Every property of every entity kind.
        pub static PROPERTIES: &[PropertyDef] = &[
            $($(
                PropertyDef {
                    entity: EntityKind::$entity,
                    variant: variant!($variant),
                    name: $name,
                    kind: kind!($kind),
                    cardinality: card!($($rep)?),
                },
            )*)*
        ];
    };
}

schema! {
    Root () {
        "UUID": String;
        "Creator": String;
    }
    Rights () {
        "RightsHeld": String;
        "RightsHolder": String;
    }

    // -----------------------------------------------------------------------
    // People and grouping
    // -----------------------------------------------------------------------

    Experimenter () {
        "ID": String;
        "FirstName": String;
        "MiddleName": String;
        "LastName": String;
        "Email": String;
        "Institution": String;
        "UserName": String;
        "AnnotationRef": String repeated;
    }
    ExperimenterGroup () {
        "ID": String;
        "Name": String;
        "Description": String;
        "ExperimenterRef": String repeated;
        "Leader": String repeated;
        "AnnotationRef": String repeated;
    }
    Project () {
        "ID": String;
        "Name": String;
        "Description": String;
        "ExperimenterRef": String;
        "ExperimenterGroupRef": String;
        "DatasetRef": String repeated;
        "AnnotationRef": String repeated;
    }
    Dataset () {
        "ID": String;
        "Name": String;
        "Description": String;
        "ExperimenterRef": String;
        "ExperimenterGroupRef": String;
        "ImageRef": String repeated;
        "AnnotationRef": String repeated;
    }
    Experiment () {
        "ID": String;
        "Description": String;
        "Type": ExperimentType;
        "ExperimenterRef": String;
    }
    MicrobeamManipulation () {
        "ID": String;
        "Description": String;
        "Type": MicrobeamManipulationType;
        "ExperimenterRef": String;
        "ROIRef": String repeated;
    }
    MicrobeamLightSourceSettings () {
        "ID": String;
        "Attenuation": PercentFraction;
        "Wavelength": PositiveFloat;
    }

    // -----------------------------------------------------------------------
    // Instrument
    // -----------------------------------------------------------------------

    Instrument () {
        "ID": String;
        "AnnotationRef": String repeated;
    }
    Microscope () {
        "Manufacturer": String;
        "Model": String;
        "SerialNumber": String;
        "LotNumber": String;
        "Type": MicroscopeType;
    }
    LightSource () {
        "ID": String;
        "Manufacturer": String;
        "Model": String;
        "SerialNumber": String;
        "LotNumber": String;
        "Power": Double;
        "AnnotationRef": String repeated;
    }
    LightSource (LightSource Arc) {
        "Type": ArcType;
    }
    LightSource (LightSource Filament) {
        "Type": FilamentType;
    }
    LightSource (LightSource Laser) {
        "Type": LaserType;
        "LaserMedium": LaserMedium;
        "Wavelength": PositiveFloat;
        "FrequencyMultiplication": PositiveInteger;
        "Tuneable": Boolean;
        "Pulse": Pulse;
        "PockelCell": Boolean;
        "RepetitionRate": Double;
        "Pump": String;
    }
    Detector () {
        "ID": String;
        "Manufacturer": String;
        "Model": String;
        "SerialNumber": String;
        "LotNumber": String;
        "Gain": Double;
        "Voltage": Double;
        "Offset": Double;
        "Zoom": Double;
        "AmplificationGain": Double;
        "Type": DetectorType;
        "AnnotationRef": String repeated;
    }
    Objective () {
        "ID": String;
        "Manufacturer": String;
        "Model": String;
        "SerialNumber": String;
        "LotNumber": String;
        "Correction": Correction;
        "Immersion": Immersion;
        "LensNA": Double;
        "NominalMagnification": PositiveInteger;
        "CalibratedMagnification": Double;
        "WorkingDistance": Double;
        "Iris": Boolean;
        "AnnotationRef": String repeated;
    }
    Filter () {
        "ID": String;
        "Manufacturer": String;
        "Model": String;
        "SerialNumber": String;
        "LotNumber": String;
        "Type": FilterType;
        "FilterWheel": String;
        "AnnotationRef": String repeated;
    }
    TransmittanceRange () {
        "CutIn": PositiveInteger;
        "CutOut": PositiveInteger;
        "CutInTolerance": NonNegativeInteger;
        "CutOutTolerance": NonNegativeInteger;
        "Transmittance": PercentFraction;
    }
    Dichroic () {
        "ID": String;
        "Manufacturer": String;
        "Model": String;
        "SerialNumber": String;
        "LotNumber": String;
        "AnnotationRef": String repeated;
    }
    FilterSet () {
        "ID": String;
        "Manufacturer": String;
        "Model": String;
        "SerialNumber": String;
        "LotNumber": String;
        "DichroicRef": String;
        "ExcitationFilterRef": String repeated;
        "EmissionFilterRef": String repeated;
    }

    // -----------------------------------------------------------------------
    // Image
    // -----------------------------------------------------------------------

    Image () {
        "ID": String;
        "Name": String;
        "Description": String;
        "AcquisitionDate": Timestamp;
        "ExperimentRef": String;
        "ExperimenterRef": String;
        "ExperimenterGroupRef": String;
        "InstrumentRef": String;
        "AnnotationRef": String repeated;
        "ROIRef": String repeated;
        "MicrobeamManipulationRef": String repeated;
    }
    ImagingEnvironment () {
        "Temperature": Double;
        "AirPressure": Double;
        "Humidity": PercentFraction;
        "CO2Percent": PercentFraction;
    }
    StageLabel () {
        "Name": String;
        "X": Double;
        "Y": Double;
        "Z": Double;
    }
    ObjectiveSettings () {
        "ID": String;
        "CorrectionCollar": Double;
        "Medium": Medium;
        "RefractiveIndex": Double;
    }
    Pixels () {
        "ID": String;
        "DimensionOrder": DimensionOrder;
        "Type": PixelType;
        "SignificantBits": PositiveInteger;
        "Interleaved": Boolean;
        "BigEndian": Boolean;
        "SizeX": PositiveInteger;
        "SizeY": PositiveInteger;
        "SizeZ": PositiveInteger;
        "SizeC": PositiveInteger;
        "SizeT": PositiveInteger;
        "PhysicalSizeX": PositiveFloat;
        "PhysicalSizeY": PositiveFloat;
        "PhysicalSizeZ": PositiveFloat;
        "TimeIncrement": Double;
    }
    Channel () {
        "ID": String;
        "Name": String;
        "SamplesPerPixel": PositiveInteger;
        "IlluminationType": IlluminationType;
        "PinholeSize": PositiveFloat;
        "AcquisitionMode": AcquisitionMode;
        "ContrastMethod": ContrastMethod;
        "ExcitationWavelength": PositiveFloat;
        "EmissionWavelength": PositiveFloat;
        "Fluor": String;
        "NDFilter": Double;
        "PockelCellSetting": Integer;
        "Color": Color;
        "FilterSetRef": String;
        "AnnotationRef": String repeated;
    }
    DetectorSettings () {
        "ID": String;
        "Offset": Double;
        "Gain": Double;
        "Voltage": Double;
        "Zoom": Double;
        "ReadOutRate": Double;
        "Binning": Binning;
        "Integration": PositiveInteger;
    }
    LightSourceSettings () {
        "ID": String;
        "Attenuation": PercentFraction;
        "Wavelength": PositiveFloat;
    }
    LightPath () {
        "DichroicRef": String;
        "ExcitationFilterRef": String repeated;
        "EmissionFilterRef": String repeated;
        "AnnotationRef": String repeated;
    }
    Plane () {
        "TheZ": NonNegativeInteger;
        "TheC": NonNegativeInteger;
        "TheT": NonNegativeInteger;
        "DeltaT": Double;
        "ExposureTime": Double;
        "PositionX": Double;
        "PositionY": Double;
        "PositionZ": Double;
        "AnnotationRef": String repeated;
    }
    TiffData () {
        "IFD": NonNegativeInteger;
        "FirstZ": NonNegativeInteger;
        "FirstC": NonNegativeInteger;
        "FirstT": NonNegativeInteger;
        "PlaneCount": NonNegativeInteger;
    }
    TiffDataUuid () {
        "Value": String;
        "FileName": String;
    }

    // -----------------------------------------------------------------------
    // Regions of interest
    // -----------------------------------------------------------------------

    Roi () {
        "ID": String;
        "Name": String;
        "Description": String;
        "Namespace": String;
        "AnnotationRef": String repeated;
    }
    Shape () {
        "ID": String;
        "FillColor": Color;
        "FillRule": FillRule;
        "StrokeColor": Color;
        "StrokeWidth": Double;
        "StrokeDashArray": String;
        "LineCap": LineCap;
        "Text": String;
        "FontFamily": FontFamily;
        "FontSize": NonNegativeInteger;
        "FontStyle": FontStyle;
        "Locked": Boolean;
        "Visible": Boolean;
        "TheZ": NonNegativeInteger;
        "TheC": NonNegativeInteger;
        "TheT": NonNegativeInteger;
        "Transform": String;
        "AnnotationRef": String repeated;
    }
    Shape (Shape Ellipse) {
        "X": Double;
        "Y": Double;
        "RadiusX": Double;
        "RadiusY": Double;
    }
    Shape (Shape Rectangle) {
        "X": Double;
        "Y": Double;
        "Width": Double;
        "Height": Double;
    }
    Shape (Shape Point) {
        "X": Double;
        "Y": Double;
    }
    Shape (Shape Line) {
        "X1": Double;
        "Y1": Double;
        "X2": Double;
        "Y2": Double;
        "MarkerStart": Marker;
        "MarkerEnd": Marker;
    }
    Shape (Shape Mask) {
        "X": Double;
        "Y": Double;
        "Width": Double;
        "Height": Double;
    }
    Shape (Shape Polygon) {
        "Points": String;
    }
    Shape (Shape Polyline) {
        "Points": String;
        "MarkerStart": Marker;
        "MarkerEnd": Marker;
    }
    Shape (Shape Label) {
        "X": Double;
        "Y": Double;
    }
    Shape (Shape Text) {
        "X": Double;
        "Y": Double;
    }

    // -----------------------------------------------------------------------
    // High-content screening
    // -----------------------------------------------------------------------

    Plate () {
        "ID": String;
        "Name": String;
        "Description": String;
        "Status": String;
        "ExternalIdentifier": String;
        "ColumnNamingConvention": NamingConvention;
        "RowNamingConvention": NamingConvention;
        "Rows": PositiveInteger;
        "Columns": PositiveInteger;
        "FieldIndex": NonNegativeInteger;
        "WellOriginX": Double;
        "WellOriginY": Double;
        "AnnotationRef": String repeated;
    }
    Well () {
        "ID": String;
        "Column": NonNegativeInteger;
        "Row": NonNegativeInteger;
        "ExternalDescription": String;
        "ExternalIdentifier": String;
        "Type": String;
        "Color": Color;
        "ReagentRef": String;
        "AnnotationRef": String repeated;
    }
    WellSample () {
        "ID": String;
        "PositionX": Double;
        "PositionY": Double;
        "Timepoint": Timestamp;
        "Index": NonNegativeInteger;
        "ImageRef": String;
        "AnnotationRef": String repeated;
    }
    PlateAcquisition () {
        "ID": String;
        "Name": String;
        "Description": String;
        "StartTime": Timestamp;
        "EndTime": Timestamp;
        "MaximumFieldCount": PositiveInteger;
        "WellSampleRef": String repeated;
        "AnnotationRef": String repeated;
    }
    Screen () {
        "ID": String;
        "Name": String;
        "Description": String;
        "Type": String;
        "ProtocolIdentifier": String;
        "ProtocolDescription": String;
        "ReagentSetIdentifier": String;
        "ReagentSetDescription": String;
        "PlateRef": String repeated;
        "AnnotationRef": String repeated;
    }
    Reagent () {
        "ID": String;
        "Name": String;
        "Description": String;
        "ReagentIdentifier": String;
        "AnnotationRef": String repeated;
    }

    // -----------------------------------------------------------------------
    // Annotations
    // -----------------------------------------------------------------------

    BooleanAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "Value": Boolean;
        "AnnotationRef": String repeated;
    }
    CommentAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "Value": String;
        "AnnotationRef": String repeated;
    }
    DoubleAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "Value": Double;
        "AnnotationRef": String repeated;
    }
    LongAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "Value": Integer;
        "AnnotationRef": String repeated;
    }
    TagAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "Value": String;
        "AnnotationRef": String repeated;
    }
    TermAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "Value": String;
        "AnnotationRef": String repeated;
    }
    TimestampAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "Value": Timestamp;
        "AnnotationRef": String repeated;
    }
    XmlAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "Value": String;
        "AnnotationRef": String repeated;
    }
    FileAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "AnnotationRef": String repeated;
    }
    BinaryFile () {
        "FileName": String;
        "Size": NonNegativeInteger;
        "MIMEType": String;
    }
    ListAnnotation () {
        "ID": String;
        "Namespace": String;
        "Description": String;
        "Annotator": String;
        "AnnotationRef": String repeated;
    }
}

/// Annotation kinds, whose `ID`s are the targets of `AnnotationRef`.
pub const ANNOTATIONS: &[EntityKind] = &[
    EntityKind::BooleanAnnotation,
    EntityKind::CommentAnnotation,
    EntityKind::DoubleAnnotation,
    EntityKind::LongAnnotation,
    EntityKind::TagAnnotation,
    EntityKind::TermAnnotation,
    EntityKind::TimestampAnnotation,
    EntityKind::XmlAnnotation,
    EntityKind::FileAnnotation,
    EntityKind::ListAnnotation,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rows_are_unique_per_entity_and_variant() {
        let mut seen = HashSet::new();
        for def in PROPERTIES {
            assert!(
                seen.insert((def.entity, def.variant, def.name)),
                "duplicate row {:?}",
                def.flat_name()
            );
        }
    }

    #[test]
    fn variant_rows_belong_to_their_family() {
        for def in PROPERTIES.iter().filter(|d| d.variant.is_some()) {
            let variant = def.variant.unwrap();
            assert_eq!(variant.entity(), def.entity, "{}", def.flat_name());
        }
    }

    #[test]
    fn variant_rows_do_not_shadow_common_rows() {
        for def in PROPERTIES.iter().filter(|d| d.variant.is_some()) {
            assert!(
                !PROPERTIES
                    .iter()
                    .any(|c| c.entity == def.entity && c.variant.is_none() && c.name == def.name),
                "{} shadows a common property",
                def.flat_name()
            );
        }
    }

    #[test]
    fn repeated_rows_are_strings() {
        for def in PROPERTIES.iter().filter(|d| d.is_repeated()) {
            assert_eq!(def.kind, ValueKind::String, "{}", def.flat_name());
        }
    }

    #[test]
    fn annotation_kinds_all_have_ids() {
        for kind in ANNOTATIONS {
            assert!(PROPERTIES.iter().any(|d| d.entity == *kind && d.name == "ID"));
        }
    }
}
