use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ome_schema::{EntityKind, Multiplicity, Variant};
use ome_types::Value;

use crate::error::{StoreError, StoreResult};

/// Writes may address indices below this bound. Anything larger is
/// rejected before the tree is touched.
pub const INDEX_LIMIT: usize = 1 << 20;

/// One entity instance in the metadata tree.
///
/// Repeated children live in dense vectors indexed by position; singleton
/// children hang off `singles`. Placeholder instances created by gap
/// filling are simply default nodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub lists: BTreeMap<String, Vec<Option<Value>>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<EntityKind, Vec<Node>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub singles: BTreeMap<EntityKind, Node>,
}

impl Node {
    /// Whether nothing has been written to this node or below it.
    pub fn is_empty(&self) -> bool {
        self.variant.is_none()
            && self.values.is_empty()
            && self.lists.is_empty()
            && self.children.is_empty()
            && self.singles.is_empty()
    }
}

/// The backing object graph of a metadata store.
///
/// This is what `root()` hands out and `set_root()` takes in. It serialises
/// as plain JSON so whole graphs can be exchanged or persisted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRoot {
    node: Node,
}

impl MetadataRoot {
    /// A fresh, empty root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    /// Pretty-printed JSON form, for persisting or exchanging a graph.
    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a graph written by [`MetadataRoot::to_json`].
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read-only view of the root entity.
    pub fn node_at_root(&self) -> &Node {
        &self.node
    }

    /// Locate an existing instance. `path` holds one index per repeated
    /// level; anything out of bounds or never populated yields `None`.
    pub fn node(&self, entity: EntityKind, path: &[usize]) -> Option<&Node> {
        if path.len() != entity.depth() {
            return None;
        }
        let mut node = &self.node;
        let mut indices = path.iter();
        for kind in entity.chain() {
            node = match kind.multiplicity() {
                Multiplicity::Repeated => node.children.get(&kind)?.get(*indices.next()?)?,
                Multiplicity::Single => node.singles.get(&kind)?,
            };
        }
        Some(node)
    }

    /// Number of `entity` instances under the parent addressed by `path`.
    ///
    /// For a singleton kind this is 1 when the instance exists, else 0.
    /// The root always exists.
    pub fn count(&self, entity: EntityKind, path: &[usize]) -> usize {
        let Some(parent) = entity.parent() else {
            return 1;
        };
        if path.len() != entity.parent_depth() {
            return 0;
        }
        let Some(parent_node) = self.node(parent, path) else {
            return 0;
        };
        match entity.multiplicity() {
            Multiplicity::Repeated => parent_node.children.get(&entity).map_or(0, Vec::len),
            Multiplicity::Single => usize::from(parent_node.singles.contains_key(&entity)),
        }
    }

    /// Locate an instance for writing, extending every container on the way
    /// so that the addressed index exists.
    pub fn node_mut(
        &mut self,
        entity: EntityKind,
        path: &[usize],
        warn_on_gaps: bool,
    ) -> StoreResult<&mut Node> {
        let expected = entity.depth();
        if path.len() != expected {
            return Err(StoreError::PathArity {
                entity,
                expected,
                found: path.len(),
            });
        }
        if let Some(&index) = path.iter().find(|&&i| i >= INDEX_LIMIT) {
            return Err(StoreError::IndexOutOfRange {
                property: entity.to_string(),
                index,
                limit: INDEX_LIMIT,
            });
        }
        let mut node = &mut self.node;
        let mut indices = path.iter().copied();
        for kind in entity.chain() {
            node = match kind.multiplicity() {
                Multiplicity::Repeated => {
                    let index = indices.next().ok_or(StoreError::PathArity {
                        entity,
                        expected,
                        found: path.len(),
                    })?;
                    let list = node.children.entry(kind).or_default();
                    extend(list, index, kind, warn_on_gaps, Node::default)?;
                    &mut list[index]
                }
                Multiplicity::Single => node.singles.entry(kind).or_default(),
            };
        }
        Ok(node)
    }
}

/// Grow `list` so that `index` is in bounds. `list` is left alone when
/// `index` is at or past [`INDEX_LIMIT`].
pub(crate) fn extend<T>(
    list: &mut Vec<T>,
    index: usize,
    kind: EntityKind,
    warn_on_gaps: bool,
    fill: impl FnMut() -> T,
) -> StoreResult<()> {
    let len = list.len();
    if index < len {
        return Ok(());
    }
    let new_len = index
        .checked_add(1)
        .filter(|&n| n <= INDEX_LIMIT)
        .ok_or_else(|| StoreError::IndexOutOfRange {
            property: kind.to_string(),
            index,
            limit: INDEX_LIMIT,
        })?;
    if index > len && warn_on_gaps {
        warn!(entity = %kind, count = len, index, "write skips ahead; filling gap");
    }
    debug!(entity = %kind, from = len, to = new_len, "extended container");
    list.resize_with(new_len, fill);
    Ok(())
}
