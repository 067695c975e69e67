//! Indexed hierarchical metadata store for OME metadata.
//!
//! Format readers populate a store through indexed setters; consumers read it
//! back through indexed getters. Addresses follow the schema's containment
//! tree: one zero-based index per repeated level on the path from the root.
//!
//! # Backends and wrappers
//!
//! All stores implement [`MetadataRetrieve`] and/or [`MetadataStore`]:
//!
//! - [`InMemoryMetadataStore`] -- the backing tree behind a `RwLock`
//! - [`DummyMetadata`] -- accepts every write, retains nothing
//! - [`FilterMetadata`] -- sanitises string values, then delegates
//! - [`AggregateMetadata`] -- fans writes out to several delegates
//!
//! Typed per-property accessors live on [`MetadataRetrieveExt`] and
//! [`MetadataStoreExt`], implemented for every store.
//!
//! # Rules
//!
//! 1. Reads never fail; anything never written reads as `None` or a count of 0.
//! 2. Writes auto-extend every container on the path; gaps hold unset instances.
//! 3. A rejected write leaves the store unchanged. [`AggregateMetadata`]
//!    checks a write once before fanning it out, so only a variant conflict
//!    inside one delegate can leave the delegates before it written.
//! 4. The first variant-specific write fixes a shape's or light source's kind.

pub mod accessors;
pub mod aggregate;
pub mod config;
pub mod convert;
pub mod dummy;
mod engine;
pub mod error;
pub mod filter;
pub mod memory;
pub mod references;
pub mod root;
pub mod tools;
pub mod traits;
mod validate;

pub use accessors::{MetadataRetrieveExt, MetadataStoreExt};
pub use aggregate::AggregateMetadata;
pub use config::StoreConfig;
pub use convert::convert_metadata;
pub use dummy::DummyMetadata;
pub use error::{StoreError, StoreResult};
pub use filter::{sanitize, FilterMetadata};
pub use memory::InMemoryMetadataStore;
pub use references::{dangling_references, DanglingRef};
pub use root::{MetadataRoot, Node, INDEX_LIMIT};
pub use tools::{
    create_lsid, ensure_ids, instance_paths, new_document_uuid, populate_pixels,
    verify_minimum_populated, zct_coords, PixelsDescriptor,
};
pub use traits::{Metadata, MetadataRetrieve, MetadataStore};
