use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ome_schema::{EntityKind, Field, Variant};
use ome_types::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::root::MetadataRoot;
use crate::traits::{MetadataRetrieve, MetadataStore};

/// In-memory metadata store.
///
/// The tree is held behind a `RwLock`: writes are serialised, reads run
/// concurrently. A write checks its path, index bounds and value before it
/// mutates, and no step after that can fail, so a poisoned lock is
/// recovered rather than propagated.
pub struct InMemoryMetadataStore {
    root: RwLock<MetadataRoot>,
    config: StoreConfig,
}

impl InMemoryMetadataStore {
    /// Create a new empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            root: RwLock::new(MetadataRoot::new()),
            config,
        }
    }

    /// Wrap an existing graph.
    pub fn from_root(root: MetadataRoot, config: StoreConfig) -> Self {
        Self {
            root: RwLock::new(root),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Consume the store, returning its graph.
    pub fn into_root(self) -> MetadataRoot {
        self.root.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the graph without copying it.
    pub fn with_root<R>(&self, f: impl FnOnce(&MetadataRoot) -> R) -> R {
        f(&self.read())
    }

    fn read(&self) -> RwLockReadGuard<'_, MetadataRoot> {
        self.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MetadataRoot> {
        self.root.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryMetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataRetrieve for InMemoryMetadataStore {
    fn count(&self, entity: EntityKind, path: &[usize]) -> usize {
        self.read().count(entity, path)
    }

    fn get(&self, field: Field, path: &[usize]) -> Option<Value> {
        self.read().get(field, path)
    }

    fn ref_count(&self, field: Field, path: &[usize]) -> usize {
        self.read().ref_count(field, path)
    }

    fn variant(&self, entity: EntityKind, path: &[usize]) -> Option<Variant> {
        self.read().variant(entity, path)
    }

    fn root(&self) -> MetadataRoot {
        self.read().clone()
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn create_root(&self) {
        debug!("created empty metadata root");
        *self.write() = MetadataRoot::new();
    }

    fn set_root(&self, root: MetadataRoot) {
        debug!(images = root.count(EntityKind::Image, &[]), "replaced metadata root");
        *self.write() = root;
    }

    fn set(&self, field: Field, path: &[usize], value: Value) -> StoreResult<()> {
        self.write().set(field, path, value, &self.config)
    }
}

impl std::fmt::Debug for InMemoryMetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let images = self.count(EntityKind::Image, &[]);
        f.debug_struct("InMemoryMetadataStore")
            .field("image_count", &images)
            .field("config", &self.config)
            .finish()
    }
}
