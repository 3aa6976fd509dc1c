//! Tick-driven re-execution of chain segments.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::SpellData;
use crate::ring::{RingIndex, RingRef, SpellChain};

/// Handle to a scheduled entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TickId(pub u64);

impl TickId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}

#[derive(Debug)]
struct TickEntry {
    id: TickId,
    chain: Arc<SpellChain>,
    ring: RingIndex,
    data: SpellData,
    remaining: u32,
}

/// Scheduler for delayed and repeating effects.
///
/// Each entry re-runs one ring (and its descendants) with a snapshot of the
/// casting context, once per [`tick`](Self::tick), until its counter runs
/// out. An entry is keyed by its chain and ring: scheduling the same ring of
/// the same chain again replaces the existing entry.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use rust_spell::builder::SpellBuilder;
/// use rust_spell::modules::{BasicModule, ModuleHandle};
/// use rust_spell::ticker::SpellTicker;
///
/// // Defers its child by handing it to the ticker instead of running it.
/// let delay: ModuleHandle = Arc::new(
///     BasicModule::new("shape_delay").with_behavior(|data, ring, _| {
///         if let Some(child) = ring.child() {
///             data.schedule(child.index(), 3);
///         }
///         false
///     }),
/// );
/// let burn: ModuleHandle = Arc::new(BasicModule::new("effect_burn"));
/// let builder = SpellBuilder::default();
/// let chain = builder.compile(&[delay, burn], &[]).unwrap();
///
/// let mut ticker = SpellTicker::new();
/// let ids = ticker.cast(&chain, builder.spell_data());
/// assert_eq!(ticker.remaining(ids[0]), Some(3));
///
/// ticker.tick();
/// assert_eq!(ticker.remaining(ids[0]), Some(2));
/// ```
#[derive(Debug, Default)]
pub struct SpellTicker {
    entries: Vec<TickEntry>,
    next_id: u64,
}

impl SpellTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `ring` of `chain` to run for the next `ticks` ticks.
    ///
    /// Returns `None` for zero ticks or a ring outside the chain.
    pub fn register(
        &mut self,
        chain: Arc<SpellChain>,
        ring: RingIndex,
        data: SpellData,
        ticks: u32,
    ) -> Option<TickId> {
        if ticks == 0 || chain.ring(ring).is_none() {
            return None;
        }

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.ring == ring && Arc::ptr_eq(&entry.chain, &chain))
        {
            entry.data = data;
            entry.remaining = ticks;
            return Some(entry.id);
        }

        let id = TickId(self.next_id);
        self.next_id += 1;
        self.entries.push(TickEntry {
            id,
            chain,
            ring,
            data,
            remaining: ticks,
        });
        Some(id)
    }

    /// Run a chain and register everything it scheduled.
    pub fn cast(&mut self, chain: &Arc<SpellChain>, mut data: SpellData) -> Vec<TickId> {
        chain.run(&mut data);
        let requests = data.take_scheduled();
        requests
            .into_iter()
            .filter_map(|request| self.register(Arc::clone(chain), request.ring, data.clone(), request.ticks))
            .collect()
    }

    /// Advance one tick. Returns how many entries ran.
    ///
    /// Every live entry runs exactly once, on a fresh copy of its snapshot.
    /// Entries whose counter reaches zero are removed. Schedules made during
    /// the tick take effect from the next one.
    pub fn tick(&mut self) -> usize {
        let mut ran = 0;
        let mut pending = Vec::new();

        for entry in &mut self.entries {
            let Some(ring) = entry.chain.ring(entry.ring) else {
                entry.remaining = 0;
                continue;
            };

            let mut data = entry.data.clone();
            ring.run(&mut data);
            ran += 1;
            entry.remaining = entry.remaining.saturating_sub(1);

            for request in data.take_scheduled() {
                pending.push((Arc::clone(&entry.chain), request, data.clone()));
            }
        }

        self.entries.retain(|entry| {
            if entry.remaining == 0 {
                debug!(id = %entry.id, ring = %entry.ring, "tick entry expired");
            }
            entry.remaining > 0
        });

        for (chain, request, data) in pending {
            self.register(chain, request.ring, data, request.ticks);
        }

        ran
    }

    /// Drop an entry early. Returns whether it existed.
    pub fn cancel(&mut self, id: TickId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() < before;
        if removed {
            debug!(%id, "tick entry cancelled");
        }
        removed
    }

    /// Drop every entry matching `predicate`. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(RingRef<'_>, &SpellData) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            let Some(ring) = entry.chain.ring(entry.ring) else {
                return false;
            };
            !predicate(ring, &entry.data)
        });
        before - self.entries.len()
    }

    /// Ticks left for an entry.
    #[must_use]
    pub fn remaining(&self, id: TickId) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.remaining)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::builder::SpellBuilder;
    use crate::modules::{BasicModule, ModuleHandle};

    fn counting(count: &Arc<AtomicUsize>) -> ModuleHandle {
        let count = Arc::clone(count);
        Arc::new(BasicModule::new("effect_count").with_behavior(move |_, _, _| {
            count.fetch_add(1, Ordering::SeqCst);
            true
        }))
    }

    #[test]
    fn test_register_rejects_zero_and_missing_ring() {
        let count = Arc::new(AtomicUsize::new(0));
        let chain = SpellBuilder::default().compile(&[counting(&count)], &[]).unwrap();
        let mut ticker = SpellTicker::new();

        assert!(ticker.register(Arc::clone(&chain), RingIndex::ROOT, SpellData::default(), 0).is_none());
        assert!(ticker.register(chain, RingIndex::new(5), SpellData::default(), 3).is_none());
        assert!(ticker.is_empty());
    }

    #[test]
    fn test_runs_then_expires() {
        let count = Arc::new(AtomicUsize::new(0));
        let chain = SpellBuilder::default().compile(&[counting(&count)], &[]).unwrap();
        let mut ticker = SpellTicker::new();
        ticker.register(chain, RingIndex::ROOT, SpellData::default(), 2);

        assert_eq!(ticker.tick(), 1);
        assert_eq!(ticker.tick(), 1);
        assert!(ticker.is_empty());
        assert_eq!(ticker.tick(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_same_ring_replaces() {
        let count = Arc::new(AtomicUsize::new(0));
        let chain = SpellBuilder::default().compile(&[counting(&count)], &[]).unwrap();
        let mut ticker = SpellTicker::new();

        let first = ticker.register(Arc::clone(&chain), RingIndex::ROOT, SpellData::default(), 2);
        let second = ticker.register(chain, RingIndex::ROOT, SpellData::default(), 7);

        assert_eq!(first, second);
        assert_eq!(ticker.len(), 1);
        assert_eq!(second.and_then(|id| ticker.remaining(id)), Some(7));
    }

    #[test]
    fn test_cancel() {
        let count = Arc::new(AtomicUsize::new(0));
        let chain = SpellBuilder::default().compile(&[counting(&count)], &[]).unwrap();
        let mut ticker = SpellTicker::new();
        let id = ticker.register(chain, RingIndex::ROOT, SpellData::default(), 5).unwrap();

        assert!(ticker.cancel(id));
        assert!(!ticker.cancel(id));
        assert_eq!(ticker.tick(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
