//! Cross-reference checking.
//!
//! References are plain ID strings; the store accepts any value for them.
//! This module reports the ones that name no existing object.

use std::collections::{BTreeSet, HashMap};

use ome_schema::{properties_of, EntityKind, Field, PropertyDef, RefTarget, ANNOTATIONS};
use ome_types::Value;
use serde::Serialize;
use tracing::warn;

use crate::tools::instance_paths;
use crate::traits::MetadataRetrieve;

/// A reference whose ID matches no object of the expected kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DanglingRef {
    /// Flattened name of the referencing property.
    pub field: String,
    /// Full path of the value, including the slot of a repeated reference.
    pub path: Vec<usize>,
    pub id: String,
}

/// Every reference in `src` that names a missing object.
pub fn dangling_references<R: MetadataRetrieve + ?Sized>(src: &R) -> Vec<DanglingRef> {
    let ids = collect_ids(src);
    let annotation_ids: BTreeSet<&str> = ANNOTATIONS
        .iter()
        .filter_map(|kind| ids.get(kind))
        .flatten()
        .map(String::as_str)
        .collect();

    let mut dangling = Vec::new();
    for kind in EntityKind::ALL {
        let refs: Vec<_> = properties_of(*kind)
            .iter()
            .filter_map(|def| def.reference_target().map(|target| (*def, target)))
            .collect();
        if refs.is_empty() {
            continue;
        }
        for path in instance_paths(src, *kind) {
            for (def, target) in &refs {
                let field = field_of(def);
                for (value_path, id) in values(src, def, field, &path) {
                    let found = match target {
                        RefTarget::Annotation => annotation_ids.contains(id.as_str()),
                        RefTarget::Entity(k) => ids.get(k).is_some_and(|set| set.contains(&id)),
                    };
                    if !found {
                        warn!(field = %field, path = ?value_path, id = %id, "dangling reference");
                        dangling.push(DanglingRef {
                            field: field.flat_name(),
                            path: value_path,
                            id,
                        });
                    }
                }
            }
        }
    }
    dangling
}

/// IDs of every identified object, per kind. Settings `ID`s are references
/// and are left out.
fn collect_ids<R: MetadataRetrieve + ?Sized>(src: &R) -> HashMap<EntityKind, BTreeSet<String>> {
    let mut ids: HashMap<EntityKind, BTreeSet<String>> = HashMap::new();
    for kind in EntityKind::ALL {
        let identified = properties_of(*kind)
            .iter()
            .any(|def| def.name == "ID" && def.variant.is_none() && def.reference_target().is_none());
        if !identified {
            continue;
        }
        let field = Field::new(*kind, "ID");
        for path in instance_paths(src, *kind) {
            if let Some(id) = src.get(field, &path) {
                ids.entry(*kind).or_default().insert(text(id));
            }
        }
    }
    ids
}

fn field_of(def: &PropertyDef) -> Field {
    match def.variant {
        Some(v) => Field::of_variant(v, def.name),
        None => Field::new(def.entity, def.name),
    }
}

fn values<R: MetadataRetrieve + ?Sized>(
    src: &R,
    def: &PropertyDef,
    field: Field,
    path: &[usize],
) -> Vec<(Vec<usize>, String)> {
    if !def.is_repeated() {
        return src
            .get(field, path)
            .map(|v| (path.to_vec(), text(v)))
            .into_iter()
            .collect();
    }
    (0..src.ref_count(field, path))
        .filter_map(|slot| {
            let mut full = path.to_vec();
            full.push(slot);
            src.get(field, &full).map(|v| (full, text(v)))
        })
        .collect()
}

fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
