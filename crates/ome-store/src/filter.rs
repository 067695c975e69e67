use ome_schema::{EntityKind, Field, Variant};
use ome_types::Value;
use tracing::debug;

use crate::error::StoreResult;
use crate::root::MetadataRoot;
use crate::traits::{MetadataRetrieve, MetadataStore};

/// Replace characters that cannot appear in a metadata document.
///
/// ISO control characters other than tab, line feed and carriage return
/// become spaces, as does a `&` that opens a character reference (`&#`).
pub fn sanitize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        let replace = match c {
            '\t' | '\n' | '\r' => false,
            '&' => chars.peek() == Some(&'#'),
            c => c.is_control(),
        };
        out.push(if replace { ' ' } else { c });
    }
    out
}

/// Store decorator that sanitises string values before delegating.
pub struct FilterMetadata<S> {
    inner: S,
    enabled: bool,
}

impl<S> FilterMetadata<S> {
    pub fn new(inner: S, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn filter(&self, field: Field, value: Value) -> Value {
        match value {
            Value::String(s) if self.enabled => {
                let clean = sanitize(&s);
                if clean != s {
                    debug!(field = %field, "sanitised string value");
                }
                Value::String(clean)
            }
            other => other,
        }
    }
}

impl<S: MetadataStore> MetadataStore for FilterMetadata<S> {
    fn create_root(&self) {
        self.inner.create_root()
    }

    fn set_root(&self, root: MetadataRoot) {
        self.inner.set_root(root)
    }

    fn set(&self, field: Field, path: &[usize], value: Value) -> StoreResult<()> {
        let value = self.filter(field, value);
        self.inner.set(field, path, value)
    }
}

impl<S: MetadataRetrieve> MetadataRetrieve for FilterMetadata<S> {
    fn count(&self, entity: EntityKind, path: &[usize]) -> usize {
        self.inner.count(entity, path)
    }

    fn get(&self, field: Field, path: &[usize]) -> Option<Value> {
        self.inner.get(field, path)
    }

    fn ref_count(&self, field: Field, path: &[usize]) -> usize {
        self.inner.ref_count(field, path)
    }

    fn variant(&self, entity: EntityKind, path: &[usize]) -> Option<Variant> {
        self.inner.variant(entity, path)
    }

    fn root(&self) -> MetadataRoot {
        self.inner.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMetadataStore;

    #[test]
    fn control_characters_become_spaces() {
        assert_eq!(sanitize("a\u{0}b\u{7f}c"), "a b c");
        assert_eq!(sanitize("tab\there\nnl\r"), "tab\there\nnl\r");
    }

    #[test]
    fn character_references_are_broken() {
        assert_eq!(sanitize("x&#10;y"), "x #10;y");
        assert_eq!(sanitize("R&D"), "R&D");
        assert_eq!(sanitize("&"), "&");
    }

    #[test]
    fn filter_cleans_strings_only_when_enabled() {
        let name = Field::new(EntityKind::Image, "Name");

        let on = FilterMetadata::new(InMemoryMetadataStore::new(), true);
        on.set(name, &[0], "a\u{1}b".into()).unwrap();
        assert_eq!(on.get(name, &[0]), Some(Value::from("a b")));

        let off = FilterMetadata::new(InMemoryMetadataStore::new(), false);
        off.set(name, &[0], "a\u{1}b".into()).unwrap();
        assert_eq!(off.get(name, &[0]), Some(Value::from("a\u{1}b")));
    }

    #[test]
    fn filter_passes_errors_through() {
        let filter = FilterMetadata::new(InMemoryMetadataStore::new(), true);
        let size_x = Field::new(EntityKind::Pixels, "SizeX");
        assert!(filter.set(size_x, &[0], 0.into()).is_err());
        assert_eq!(filter.inner().count(EntityKind::Image, &[]), 0);
    }
}
