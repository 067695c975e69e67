//! Helpers for populators and consumers of a metadata store.

use ome_schema::{EntityKind, Field, Multiplicity};
use ome_types::{DimensionOrder, PixelType};
use tracing::debug;
use uuid::Uuid;

use crate::accessors::MetadataStoreExt;
use crate::error::{StoreError, StoreResult};
use crate::root::INDEX_LIMIT;
use crate::traits::{Metadata, MetadataRetrieve, MetadataStore};

/// Build an LSID from an object type and its indices: `("Detector", [1, 0])`
/// gives `"Detector:1:0"`.
pub fn create_lsid(kind: &str, indices: &[usize]) -> String {
    let mut lsid = String::from(kind);
    for index in indices {
        lsid.push(':');
        lsid.push_str(&index.to_string());
    }
    lsid
}

/// A fresh document identifier for the root `UUID` property.
pub fn new_document_uuid() -> String {
    format!("urn:uuid:{}", Uuid::new_v4())
}

/// Paths of every existing instance of `kind`, in traversal order.
pub fn instance_paths<R: MetadataRetrieve + ?Sized>(src: &R, kind: EntityKind) -> Vec<Vec<usize>> {
    let mut paths: Vec<Vec<usize>> = vec![Vec::new()];
    for level in kind.chain() {
        paths = match level.multiplicity() {
            Multiplicity::Repeated => paths
                .into_iter()
                .flat_map(|parent| {
                    (0..src.count(level, &parent)).map(move |i| {
                        let mut path = parent.clone();
                        path.push(i);
                        path
                    })
                })
                .collect(),
            Multiplicity::Single => paths
                .into_iter()
                .filter(|parent| src.count(level, parent) > 0)
                .collect(),
        };
    }
    paths
}

/// Check that image `image` carries the pixels metadata a writer needs.
pub fn verify_minimum_populated<R: MetadataRetrieve + ?Sized>(src: &R, image: usize) -> StoreResult<()> {
    const REQUIRED: &[&str] = &[
        "BigEndian",
        "DimensionOrder",
        "Type",
        "SizeC",
        "SizeT",
        "SizeX",
        "SizeY",
        "SizeZ",
    ];
    for property in REQUIRED {
        let field = Field::new(EntityKind::Pixels, property);
        if src.get(field, &[image]).is_none() {
            return Err(StoreError::MissingField {
                field: field.flat_name(),
                path: vec![image],
            });
        }
    }
    Ok(())
}

/// Core dimensions of one image, as a format reader reports them.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelsDescriptor {
    pub size_x: usize,
    pub size_y: usize,
    pub size_z: usize,
    pub size_c: usize,
    pub size_t: usize,
    pub pixel_type: PixelType,
    pub little_endian: bool,
    pub dimension_order: DimensionOrder,
    /// Samples stored per pixel (3 for interleaved RGB, otherwise 1).
    pub rgb_channel_count: usize,
    /// Written as the image name when set.
    pub name: Option<String>,
}

impl PixelsDescriptor {
    /// Number of channels once RGB samples are folded together.
    pub fn effective_size_c(&self) -> usize {
        if self.rgb_channel_count == 0 {
            self.size_c
        } else {
            self.size_c / self.rgb_channel_count
        }
    }

    /// Number of planes, `None` if it does not fit in a `usize`.
    pub fn image_count(&self) -> Option<usize> {
        plane_count(self.size_z, self.effective_size_c(), self.size_t)
    }
}

/// Write the pixels of image `image` from a descriptor: ID, sizes, type,
/// byte order, dimension order, one channel per effective channel, and
/// optionally one plane per raster position with its Z/C/T coordinates.
pub fn populate_pixels<S: MetadataStore + ?Sized>(
    store: &S,
    image: usize,
    desc: &PixelsDescriptor,
    planes: bool,
) -> StoreResult<()> {
    let plane_total = match (planes, desc.image_count()) {
        (false, _) => None,
        (true, Some(total)) => Some(total),
        (true, None) => {
            return Err(StoreError::IndexOutOfRange {
                property: "Plane".into(),
                index: usize::MAX,
                limit: INDEX_LIMIT,
            })
        }
    };
    if let Some(name) = &desc.name {
        store.set_image_name(name, image)?;
    }
    store.set_pixels_id(&create_lsid("Pixels", &[image]), image)?;
    store.set_pixels_size_x(to_i64(desc.size_x), image)?;
    store.set_pixels_size_y(to_i64(desc.size_y), image)?;
    store.set_pixels_size_z(to_i64(desc.size_z), image)?;
    store.set_pixels_size_c(to_i64(desc.size_c), image)?;
    store.set_pixels_size_t(to_i64(desc.size_t), image)?;
    store.set_pixels_type(desc.pixel_type, image)?;
    store.set_pixels_big_endian(!desc.little_endian, image)?;
    store.set_pixels_dimension_order(desc.dimension_order, image)?;

    let channels = desc.effective_size_c();
    for c in 0..channels {
        store.set_channel_id(&create_lsid("Channel", &[image, c]), image, c)?;
        store.set_channel_samples_per_pixel(to_i64(desc.rgb_channel_count.max(1)), image, c)?;
    }

    if let Some(total) = plane_total {
        for q in 0..total {
            let Some([z, c, t]) =
                zct_coords(desc.dimension_order, desc.size_z, channels, desc.size_t, q)
            else {
                continue;
            };
            store.set_plane_the_z(to_i64(z), image, q)?;
            store.set_plane_the_c(to_i64(c), image, q)?;
            store.set_plane_the_t(to_i64(t), image, q)?;
        }
    }
    debug!(image, channels, planes, "populated pixels");
    Ok(())
}

fn plane_count(size_z: usize, size_c: usize, size_t: usize) -> Option<usize> {
    size_z.checked_mul(size_c)?.checked_mul(size_t)
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Z, C and T coordinates of raster plane `plane` under `order`.
///
/// `None` when any size is zero, the plane count overflows, or `plane` is
/// past the last plane.
pub fn zct_coords(
    order: DimensionOrder,
    size_z: usize,
    size_c: usize,
    size_t: usize,
    plane: usize,
) -> Option<[usize; 3]> {
    let total = plane_count(size_z, size_c, size_t)?;
    if total == 0 || plane >= total {
        return None;
    }
    let size_of = |axis: char| match axis {
        'Z' => size_z,
        'C' => size_c,
        _ => size_t,
    };
    let axes = order.plane_axes();
    let len0 = size_of(axes[0]);
    let len1 = size_of(axes[1]);
    let raster = [plane % len0, plane / len0 % len1, plane / len0 / len1];

    let mut zct = [0; 3];
    for (axis, value) in axes.iter().zip(raster) {
        let slot = match axis {
            'Z' => 0,
            'C' => 1,
            _ => 2,
        };
        zct[slot] = value;
    }
    Some(zct)
}

/// Kinds whose instances get an LSID from [`ensure_ids`].
const IDENTIFIED: &[EntityKind] = &[
    EntityKind::Experimenter,
    EntityKind::Instrument,
    EntityKind::Detector,
    EntityKind::Objective,
    EntityKind::Filter,
    EntityKind::Dichroic,
    EntityKind::LightSource,
    EntityKind::Image,
    EntityKind::Pixels,
    EntityKind::Channel,
    EntityKind::Plate,
    EntityKind::Well,
    EntityKind::Roi,
    EntityKind::Shape,
];

/// Give every identified instance without an `ID` one derived from its
/// position. Returns the number of IDs written.
pub fn ensure_ids<S: Metadata + ?Sized>(store: &S) -> StoreResult<usize> {
    let mut filled = 0;
    for kind in IDENTIFIED {
        let field = Field::new(*kind, "ID");
        for path in instance_paths(store, *kind) {
            if store.get(field, &path).is_none() {
                store.set(field, &path, create_lsid(kind.name(), &path).into())?;
                filled += 1;
            }
        }
    }
    debug!(filled, "filled missing IDs");
    Ok(filled)
}
