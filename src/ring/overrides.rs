//! Per-chain override authority.
//!
//! Modules can provide named overrides (a different tick rate, a replacement
//! targeting rule, ...) to the rest of their chain. Each chain has one
//! `OverrideHandler`, built at the root on first use and shared by every ring.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use super::chain::RingRef;
use super::node::RingIndex;
use crate::context::SpellData;

/// Index of override providers for one chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverrideHandler {
    root: RingIndex,
    providers: BTreeMap<String, SmallVec<[RingIndex; 2]>>,
}

impl OverrideHandler {
    /// Index every override provided from `root` down to the leaf.
    pub(crate) fn build(root: RingRef<'_>) -> Self {
        let mut providers: BTreeMap<String, SmallVec<[RingIndex; 2]>> = BTreeMap::new();
        for ring in std::iter::once(root).chain(root.descendants()) {
            let Some(module) = ring.module() else {
                continue;
            };
            for name in module.overrides() {
                providers.entry((*name).to_string()).or_default().push(ring.index());
            }
        }
        Self {
            root: root.index(),
            providers,
        }
    }

    /// Ring that owns this handler.
    #[must_use]
    pub fn root(&self) -> RingIndex {
        self.root
    }

    #[must_use]
    pub fn has_override(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Rings providing `name`, root first.
    #[must_use]
    pub fn providers(&self, name: &str) -> &[RingIndex] {
        self.providers.get(name).map_or(&[], |rings| rings.as_slice())
    }

    /// Names of every provided override, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Evaluate `name`, asking the leaf-most provider first.
    ///
    /// A provider returning `None` defers to the next one up. `None` if no
    /// provider answers. `ring` is any ring of the chain this handler was
    /// built for.
    pub fn invoke(&self, ring: RingRef<'_>, name: &str, data: &SpellData, input: f64) -> Option<f64> {
        let chain = ring.chain();
        self.providers(name).iter().rev().find_map(|&index| {
            let provider = chain.ring(index)?;
            provider.module()?.apply_override(name, data, provider, input)
        })
    }
}
