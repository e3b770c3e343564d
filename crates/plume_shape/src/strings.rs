//! String interning for dynamic text.
//!
//! Dynamic text records carry a [`StringId`] instead of inline bytes, so the
//! text of a recorded shape can change between replays without re-recording
//! the stream. The table lives outside the recorder; shapes only ever see
//! ids. [`SharedStringTable`] is the shared service flavor: interned once by
//! whoever produces the text, resolved by the consumer at replay time,
//! possibly from other threads.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use plume_core::StringId;

/// Append-only string interning table.
///
/// Ids are dense indices in interning order; interning the same string twice
/// returns the same id. Entries are never removed.
#[derive(Debug, Default)]
pub struct StringTable {
    lookup: FxHashMap<String, u32>,
    entries: Vec<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning its id (existing or freshly allocated).
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.lookup.get(s) {
            return StringId(id);
        }
        let id = self.entries.len() as u32;
        self.entries.push(s.to_owned());
        self.lookup.insert(s.to_owned(), id);
        tracing::trace!(id, "interned dynamic-text string");
        StringId(id)
    }

    /// Look up the string for `id`, if it was interned here.
    pub fn resolve(&self, id: StringId) -> Option<&str> {
        self.entries.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Thread-safe shared handle to a [`StringTable`].
///
/// Clones share the same table. Interning takes a write lock; resolution a
/// read lock, which is the common case at replay time.
#[derive(Clone, Debug, Default)]
pub struct SharedStringTable {
    inner: Arc<RwLock<StringTable>>,
}

impl SharedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s` in the shared table.
    pub fn intern(&self, s: &str) -> StringId {
        self.inner.write().intern(s)
    }

    /// Look up the string for `id`, cloning it out of the table.
    pub fn resolve(&self, id: StringId) -> Option<String> {
        self.inner.read().resolve(id).map(str::to_owned)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedups() {
        let mut table = StringTable::new();
        let a = table.intern("fps: 60");
        let b = table.intern("fps: 60");
        let c = table.intern("fps: 59");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_resolve_unknown_is_none() {
        let table = StringTable::new();
        assert_eq!(table.resolve(StringId(0)), None);
    }

    #[test]
    fn test_shared_table_clones_share_state() {
        let shared = SharedStringTable::new();
        let other = shared.clone();
        let id = shared.intern("hello");
        assert_eq!(other.resolve(id).as_deref(), Some("hello"));
    }
}
