//! Compiled-chain cache keyed by canonical form.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ring::{RingTag, SpellChain};

/// Holds at most one compiled chain per canonical tag.
///
/// Concurrent inserts of the same tag may both build a chain, but only the
/// first one stored is ever handed out.
#[derive(Debug, Default)]
pub struct RingCache {
    entries: RwLock<FxHashMap<RingTag, Arc<SpellChain>>>,
}

impl RingCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a chain by canonical tag.
    #[must_use]
    pub fn get(&self, tag: &RingTag) -> Option<Arc<SpellChain>> {
        self.entries.read().get(tag).cloned()
    }

    /// Return the cached chain equal to `chain`, storing `chain` if there is
    /// none.
    pub fn get_or_insert(&self, chain: SpellChain) -> Arc<SpellChain> {
        if let Some(hit) = self.get(chain.tag()) {
            debug!(chain = %hit, "ring cache hit");
            return hit;
        }

        let key = chain.tag().clone();
        let mut entries = self.entries.write();
        match entries.entry(key) {
            // Another caller stored it between our read and write.
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                debug!(chain = %chain, "ring cache miss");
                Arc::clone(entry.insert(Arc::new(chain)))
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached chain. Handles already given out stay valid.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
