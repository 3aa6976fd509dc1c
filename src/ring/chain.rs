//! Chains of rings and the chain walk.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use tracing::trace;

use super::node::{Ring, RingIndex};
use super::overrides::OverrideHandler;
use super::tag::{ModifierTag, RingTag};
use crate::context::SpellData;

/// A compiled, immutable spell composition.
///
/// Rings live in an arena ordered root to leaf: the child of slot `i` is
/// slot `i + 1` and the root is slot 0. A chain always has at least one
/// ring. Two chains are equal iff their canonical tags are equal.
#[derive(Debug)]
pub struct SpellChain {
    rings: Vec<Ring>,
}

impl SpellChain {
    /// Longest chain that can be compiled or loaded. Every ring nests one
    /// level deeper in the persisted form, which must stay readable.
    pub const MAX_LEN: usize = 96;

    /// Link an ordered, non-empty list of rings into a chain.
    pub(crate) fn from_rings(mut rings: Vec<Ring>) -> Self {
        let len = rings.len();
        for (slot, ring) in rings.iter_mut().enumerate() {
            ring.parent = slot.checked_sub(1).map(RingIndex::from_slot);
            ring.child = (slot + 1 < len).then(|| RingIndex::from_slot(slot + 1));
        }
        Self { rings }
    }

    #[must_use]
    pub fn root(&self) -> RingRef<'_> {
        RingRef {
            chain: self,
            index: RingIndex::ROOT,
        }
    }

    /// Get a ring by index.
    #[must_use]
    pub fn ring(&self, index: RingIndex) -> Option<RingRef<'_>> {
        (index.slot() < self.rings.len()).then_some(RingRef { chain: self, index })
    }

    /// Rings from root to leaf.
    pub fn iter(&self) -> impl Iterator<Item = RingRef<'_>> {
        (0..self.rings.len()).map(move |slot| RingRef {
            chain: self,
            index: RingIndex::from_slot(slot),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// Always false for a built chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Canonical form of the whole chain.
    #[must_use]
    pub fn tag(&self) -> &RingTag {
        self.root().serialize()
    }

    /// Walk the chain from the root.
    pub fn run(&self, data: &mut SpellData) {
        self.root().run(data);
    }
}

impl PartialEq for SpellChain {
    fn eq(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }
}

impl Eq for SpellChain {}

impl fmt::Display for SpellChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, ring) in self.iter().enumerate() {
            if slot > 0 {
                f.write_str(" > ")?;
            }
            f.write_str(ring.readable_name())?;
        }
        Ok(())
    }
}

/// Borrowed handle to one ring together with its chain.
///
/// Dereferences to [`Ring`] for the per-ring pipeline; adds the operations
/// that need to see neighbours.
#[derive(Clone, Copy)]
pub struct RingRef<'a> {
    chain: &'a SpellChain,
    index: RingIndex,
}

impl<'a> RingRef<'a> {
    #[must_use]
    pub fn index(&self) -> RingIndex {
        self.index
    }

    #[must_use]
    pub fn chain(&self) -> &'a SpellChain {
        self.chain
    }

    /// The ring itself, for the full chain lifetime.
    #[must_use]
    pub fn ring(&self) -> &'a Ring {
        &self.chain.rings[self.index.slot()]
    }

    #[must_use]
    pub fn parent(&self) -> Option<RingRef<'a>> {
        self.ring().parent.and_then(|index| self.chain.ring(index))
    }

    #[must_use]
    pub fn child(&self) -> Option<RingRef<'a>> {
        self.ring().child.and_then(|index| self.chain.ring(index))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.ring().parent.is_none()
    }

    /// Follow parent links to the root.
    #[must_use]
    pub fn root(&self) -> RingRef<'a> {
        let mut ring = *self;
        while let Some(parent) = ring.parent() {
            ring = parent;
        }
        ring
    }

    /// Every ring below this one, nearest first.
    pub fn descendants(&self) -> impl Iterator<Item = RingRef<'a>> {
        std::iter::successors(self.child(), |ring| ring.child())
    }

    /// Execute this ring and, on success, its descendants.
    ///
    /// Stops at the first ring without a module, the first failed cast, or
    /// the first module that does not run children.
    pub fn run(&self, data: &mut SpellData) {
        let mut current = Some(*self);
        while let Some(ring) = current {
            let Some(module) = ring.module().cloned() else {
                return;
            };

            if data.caster().is_some() {
                data.process_cast_time_modifiers(ring.ring());
            }

            let success = module.cast(data, ring, true);
            trace!(ring = %ring.index, module = module.id(), success, "ring executed");

            current = if success && module.runs_children() {
                ring.child()
            } else {
                None
            };
        }
    }

    /// The chain's shared override handler.
    ///
    /// Built once at the root; every ring memoizes the same handle.
    #[must_use]
    pub fn override_handler(&self) -> Arc<OverrideHandler> {
        self.ring()
            .override_handler
            .get_or_init(|| {
                let root = self.root();
                if root.index == self.index {
                    Arc::new(OverrideHandler::build(root))
                } else {
                    root.override_handler()
                }
            })
            .clone()
    }

    /// Apply the chain's `name` override to `input`, or return `input`
    /// unchanged if nothing provides it.
    #[must_use]
    pub fn apply_override(&self, name: &str, data: &SpellData, input: f64) -> f64 {
        self.override_handler()
            .invoke(*self, name, data, input)
            .unwrap_or(input)
    }

    /// Canonical tag of this ring and its descendants. Memoized.
    ///
    /// Tags are filled leaf first and each ring shares its child's tag, so
    /// serializing a whole chain is linear in its length.
    #[must_use]
    pub fn serialize(&self) -> &'a RingTag {
        if let Some(tag) = self.ring().serialized.get() {
            return tag;
        }

        let below: Vec<RingRef<'a>> = self.descendants().collect();
        let mut child = None;
        for ring in below.into_iter().rev() {
            let tag = ring.ring().serialized.get_or_init(|| Arc::new(ring.own_tag(child.take())));
            child = Some(Arc::clone(tag));
        }
        self.ring().serialized.get_or_init(|| Arc::new(self.own_tag(child)))
    }

    fn own_tag(&self, child_ring: Option<Arc<RingTag>>) -> RingTag {
        let ring = self.ring();
        RingTag {
            modifiers: ring.modifiers.iter().map(ModifierTag::from).collect(),
            extra: ring
                .information
                .iter()
                .map(|(id, value)| (id.as_str().to_string(), *value))
                .collect(),
            primary_color: ring.primary.to_decimal_string(),
            secondary_color: ring.secondary.to_decimal_string(),
            child_ring,
            module: ring.module_id().map(str::to_string),
        }
    }
}

impl Deref for RingRef<'_> {
    type Target = Ring;

    fn deref(&self) -> &Ring {
        self.ring()
    }
}

impl PartialEq for RingRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl fmt::Debug for RingRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingRef")
            .field("index", &self.index)
            .field("module", &self.module_id())
            .finish()
    }
}
