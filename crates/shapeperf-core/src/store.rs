//! A registry of loaded fonts, looked up by name
//!
//! Read-mostly: fonts are stored once during startup and then looked up from
//! any number of threads while benchmarks run. Entries are never evicted.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::font::FontResource;

/// Thread-safe font registry
///
/// Pass it explicitly to whatever needs font lookup; there is no global
/// instance.
#[derive(Default)]
pub struct FontStore {
    fonts: RwLock<HashMap<String, Arc<FontResource>>>,
}

impl FontStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a font under `name`, replacing whatever was there
    ///
    /// Returns the displaced font, if any, so callers sharing a name can tell
    /// that they overwrote someone else's entry.
    pub fn store(
        &self,
        name: impl Into<String>,
        font: impl Into<Arc<FontResource>>,
    ) -> Option<Arc<FontResource>> {
        let name = name.into();
        let font = font.into();
        log::debug!("storing font {:?} ({} bytes)", name, font.data().len());
        let previous = self.fonts.write().insert(name, font);
        if let Some(ref prev) = previous {
            log::debug!("replaced font previously stored as {:?}", prev.name());
        }
        previous
    }

    /// Look up a font; `None` simply means nobody stored that name
    pub fn find(&self, name: &str) -> Option<Arc<FontResource>> {
        self.fonts.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fonts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.read().is_empty()
    }

    /// Stored names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fonts.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for FontStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontStore")
            .field("fonts", &self.names())
            .finish()
    }
}

#[cfg(all(test, feature = "embedded-fonts"))]
mod tests {
    use super::*;
    use crate::provider::{DEJAVU_SANS, DEJAVU_SANS_MONO};
    use std::thread;

    fn mono(name: &str) -> FontResource {
        FontResource::from_data(name, DEJAVU_SANS_MONO.to_vec()).unwrap()
    }

    #[test]
    fn test_find_missing_is_none() {
        let store = FontStore::new();
        assert!(store.find("Calibri.ttf").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_then_find() {
        let store = FontStore::new();
        assert!(store.store("mono", mono("mono")).is_none());
        let found = store.find("mono").unwrap();
        assert_eq!(found.name(), "mono");
        assert!(store.contains("mono"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let store = FontStore::new();
        store.store("body", mono("first"));
        let sans = FontResource::from_data("second", DEJAVU_SANS.to_vec()).unwrap();
        let displaced = store.store("body", sans).unwrap();

        assert_eq!(displaced.name(), "first");
        assert_eq!(store.find("body").unwrap().name(), "second");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let store = FontStore::new();
        store.store("b", mono("b"));
        store.store("a", mono("a"));
        assert_eq!(store.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_store() {
        let store = Arc::new(FontStore::new());
        store.store("stable", mono("stable"));
        let expected_len = DEJAVU_SANS_MONO.len();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let stable = store.find("stable").unwrap();
                        assert_eq!(stable.data().len(), expected_len);
                        if let Some(late) = store.find("late") {
                            assert_eq!(late.name(), "late");
                            assert_eq!(late.data().len(), DEJAVU_SANS.len());
                        }
                    }
                })
            })
            .collect();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let late = FontResource::from_data("late", DEJAVU_SANS.to_vec()).unwrap();
                store.store("late", late);
            })
        };

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(store.len(), 2);
    }
}
