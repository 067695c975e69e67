//! Typed accessors over the generic engine.
//!
//! Each accessor is one line in the table below; `paste` expands it into a
//! `get_*` method on [`MetadataRetrieveExt`] and a `set_*` method on
//! [`MetadataStoreExt`], both blanket-implemented for every store. Anything
//! not listed is still reachable through [`MetadataRetrieve::get`] /
//! [`MetadataStore::set`] with a [`Field`].

use ome_schema::{EntityKind, Field, LightSourceKind, ShapeKind, Variant};
use ome_types::{
    Color, DetectorType, DimensionOrder, FromValue, LaserType, NonNegativeInteger, PixelType,
    PositiveFloat, PositiveInteger, Timestamp, Value,
};
use paste::paste;

use crate::error::StoreResult;
use crate::traits::{MetadataRetrieve, MetadataStore};

const ELLIPSE: Variant = Variant::Shape(ShapeKind::Ellipse);
const RECTANGLE: Variant = Variant::Shape(ShapeKind::Rectangle);
const LASER: Variant = Variant::LightSource(LightSourceKind::Laser);

macro_rules! accessors {
    (
        counts { $($count:ident => $kind:ident ($($pidx:ident),*);)* }
        properties { $($name:ident => $field:expr, ($($idx:ident),*): $get:ty, $set:ty;)* }
    ) => {
        paste! {
            /// Typed reads, one per table row, plus per-entity counts.
            pub trait MetadataRetrieveExt: MetadataRetrieve {
                $(
                    fn [<get_ $count _count>](&self, $($pidx: usize),*) -> usize {
                        self.count(EntityKind::$kind, &[$($pidx),*])
                    }
                )*
                $(
                    fn [<get_ $name>](&self, $($idx: usize),*) -> Option<$get> {
                        self.get($field, &[$($idx),*])
                            .as_ref()
                            .and_then(<$get as FromValue>::from_value)
                    }
                )*
            }

            /// Typed writes, one per table row.
            pub trait MetadataStoreExt: MetadataStore {
                $(
                    fn [<set_ $name>](&self, value: $set, $($idx: usize),*) -> StoreResult<()> {
                        self.set($field, &[$($idx),*], Value::from(value))
                    }
                )*
            }
        }

        impl<T: MetadataRetrieve + ?Sized> MetadataRetrieveExt for T {}
        impl<T: MetadataStore + ?Sized> MetadataStoreExt for T {}
    };
}

accessors! {
    counts {
        experimenter => Experimenter();
        experimenter_group => ExperimenterGroup();
        project => Project();
        dataset => Dataset();
        experiment => Experiment();
        microbeam_manipulation => MicrobeamManipulation(experiment);
        microbeam_light_source_settings => MicrobeamLightSourceSettings(experiment, microbeam_manipulation);
        instrument => Instrument();
        light_source => LightSource(instrument);
        detector => Detector(instrument);
        objective => Objective(instrument);
        filter => Filter(instrument);
        dichroic => Dichroic(instrument);
        filter_set => FilterSet(instrument);
        image => Image();
        channel => Channel(image);
        plane => Plane(image);
        tiff_data => TiffData(image);
        roi => Roi();
        shape => Shape(roi);
        plate => Plate();
        well => Well(plate);
        well_sample => WellSample(plate, well);
        plate_acquisition => PlateAcquisition(plate);
        screen => Screen();
        reagent => Reagent(screen);
        boolean_annotation => BooleanAnnotation();
        comment_annotation => CommentAnnotation();
        double_annotation => DoubleAnnotation();
        long_annotation => LongAnnotation();
        tag_annotation => TagAnnotation();
        term_annotation => TermAnnotation();
        timestamp_annotation => TimestampAnnotation();
        xml_annotation => XmlAnnotation();
        file_annotation => FileAnnotation();
        list_annotation => ListAnnotation();
    }
    properties {
        uuid => Field::new(EntityKind::Root, "UUID"), (): String, &str;
        creator => Field::new(EntityKind::Root, "Creator"), (): String, &str;

        experimenter_id => Field::new(EntityKind::Experimenter, "ID"), (experimenter): String, &str;
        experimenter_email => Field::new(EntityKind::Experimenter, "Email"), (experimenter): String, &str;

        instrument_id => Field::new(EntityKind::Instrument, "ID"), (instrument): String, &str;
        light_source_id => Field::new(EntityKind::LightSource, "ID"), (instrument, light_source): String, &str;
        laser_type => Field::of_variant(LASER, "Type"), (instrument, light_source): LaserType, LaserType;
        laser_wavelength => Field::of_variant(LASER, "Wavelength"), (instrument, light_source): PositiveFloat, f64;
        detector_id => Field::new(EntityKind::Detector, "ID"), (instrument, detector): String, &str;
        detector_type => Field::new(EntityKind::Detector, "Type"), (instrument, detector): DetectorType, DetectorType;
        objective_id => Field::new(EntityKind::Objective, "ID"), (instrument, objective): String, &str;
        objective_nominal_magnification => Field::new(EntityKind::Objective, "NominalMagnification"), (instrument, objective): PositiveInteger, i64;
        filter_id => Field::new(EntityKind::Filter, "ID"), (instrument, filter): String, &str;
        dichroic_id => Field::new(EntityKind::Dichroic, "ID"), (instrument, dichroic): String, &str;

        image_id => Field::new(EntityKind::Image, "ID"), (image): String, &str;
        image_name => Field::new(EntityKind::Image, "Name"), (image): String, &str;
        image_description => Field::new(EntityKind::Image, "Description"), (image): String, &str;
        image_acquisition_date => Field::new(EntityKind::Image, "AcquisitionDate"), (image): Timestamp, Timestamp;
        image_instrument_ref => Field::new(EntityKind::Image, "InstrumentRef"), (image): String, &str;
        image_annotation_ref => Field::new(EntityKind::Image, "AnnotationRef"), (image, annotation_ref): String, &str;

        pixels_id => Field::new(EntityKind::Pixels, "ID"), (image): String, &str;
        pixels_dimension_order => Field::new(EntityKind::Pixels, "DimensionOrder"), (image): DimensionOrder, DimensionOrder;
        pixels_type => Field::new(EntityKind::Pixels, "Type"), (image): PixelType, PixelType;
        pixels_big_endian => Field::new(EntityKind::Pixels, "BigEndian"), (image): bool, bool;
        pixels_size_x => Field::new(EntityKind::Pixels, "SizeX"), (image): PositiveInteger, i64;
        pixels_size_y => Field::new(EntityKind::Pixels, "SizeY"), (image): PositiveInteger, i64;
        pixels_size_z => Field::new(EntityKind::Pixels, "SizeZ"), (image): PositiveInteger, i64;
        pixels_size_c => Field::new(EntityKind::Pixels, "SizeC"), (image): PositiveInteger, i64;
        pixels_size_t => Field::new(EntityKind::Pixels, "SizeT"), (image): PositiveInteger, i64;
        pixels_physical_size_x => Field::new(EntityKind::Pixels, "PhysicalSizeX"), (image): PositiveFloat, f64;
        pixels_physical_size_y => Field::new(EntityKind::Pixels, "PhysicalSizeY"), (image): PositiveFloat, f64;

        channel_id => Field::new(EntityKind::Channel, "ID"), (image, channel): String, &str;
        channel_name => Field::new(EntityKind::Channel, "Name"), (image, channel): String, &str;
        channel_samples_per_pixel => Field::new(EntityKind::Channel, "SamplesPerPixel"), (image, channel): PositiveInteger, i64;
        channel_color => Field::new(EntityKind::Channel, "Color"), (image, channel): Color, Color;

        plane_the_z => Field::new(EntityKind::Plane, "TheZ"), (image, plane): NonNegativeInteger, i64;
        plane_the_c => Field::new(EntityKind::Plane, "TheC"), (image, plane): NonNegativeInteger, i64;
        plane_the_t => Field::new(EntityKind::Plane, "TheT"), (image, plane): NonNegativeInteger, i64;

        roi_id => Field::new(EntityKind::Roi, "ID"), (roi): String, &str;
        shape_id => Field::new(EntityKind::Shape, "ID"), (roi, shape): String, &str;
        ellipse_x => Field::of_variant(ELLIPSE, "X"), (roi, shape): f64, f64;
        ellipse_y => Field::of_variant(ELLIPSE, "Y"), (roi, shape): f64, f64;
        ellipse_radius_x => Field::of_variant(ELLIPSE, "RadiusX"), (roi, shape): f64, f64;
        ellipse_radius_y => Field::of_variant(ELLIPSE, "RadiusY"), (roi, shape): f64, f64;
        rectangle_x => Field::of_variant(RECTANGLE, "X"), (roi, shape): f64, f64;
        rectangle_y => Field::of_variant(RECTANGLE, "Y"), (roi, shape): f64, f64;
        rectangle_width => Field::of_variant(RECTANGLE, "Width"), (roi, shape): f64, f64;
        rectangle_height => Field::of_variant(RECTANGLE, "Height"), (roi, shape): f64, f64;

        plate_id => Field::new(EntityKind::Plate, "ID"), (plate): String, &str;
        plate_name => Field::new(EntityKind::Plate, "Name"), (plate): String, &str;
        well_id => Field::new(EntityKind::Well, "ID"), (plate, well): String, &str;
        well_row => Field::new(EntityKind::Well, "Row"), (plate, well): NonNegativeInteger, i64;
        well_column => Field::new(EntityKind::Well, "Column"), (plate, well): NonNegativeInteger, i64;
        well_sample_image_ref => Field::new(EntityKind::WellSample, "ImageRef"), (plate, well, well_sample): String, &str;
    }
}
