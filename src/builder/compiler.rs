//! Chain compilation.

use std::sync::Arc;

use tracing::warn;

use super::cache::RingCache;
use super::link::{PlacedModifier, RingLink};
use crate::attributes::{AttributeModifier, AttributeRegistry};
use crate::context::SpellData;
use crate::core::EngineConfig;
use crate::error::{CompileError, SpellError};
use crate::modules::{ModuleHandle, ModuleLookup};
use crate::ring::{ChainDraft, RingTag, SpellChain};

/// Compiles compositions into shared, cached chains.
///
/// Builders are cheap to clone; clones share the registry, config and cache.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use rust_spell::attributes::{AttributeId, AttributeModifier, AttributeRange};
/// use rust_spell::builder::{PlacedModifier, SpellBuilder};
/// use rust_spell::modules::{BasicModule, ModuleHandle};
///
/// let projectile: ModuleHandle = Arc::new(
///     BasicModule::new("shape_projectile")
///         .with_range(AttributeId::RANGE, AttributeRange::new(1.0, 8.0, 32.0)),
/// );
/// let burn: ModuleHandle = Arc::new(BasicModule::new("effect_burn"));
///
/// let builder = SpellBuilder::default();
/// let chain = builder
///     .compile(
///         &[projectile, burn],
///         &[PlacedModifier::new(0, AttributeModifier::add(AttributeId::RANGE, 4.0))],
///     )
///     .unwrap();
///
/// assert_eq!(chain.to_string(), "shape_projectile > effect_burn");
/// assert_eq!(chain.root().true_value(&AttributeId::RANGE), 12.0);
/// ```
#[derive(Clone, Debug)]
pub struct SpellBuilder {
    attributes: Arc<AttributeRegistry>,
    config: Arc<EngineConfig>,
    cache: Arc<RingCache>,
}

impl SpellBuilder {
    /// Create a builder with its own empty cache.
    #[must_use]
    pub fn new(attributes: Arc<AttributeRegistry>, config: Arc<EngineConfig>) -> Self {
        Self {
            attributes,
            config,
            cache: Arc::new(RingCache::new()),
        }
    }

    /// Share an existing cache (builder pattern).
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<RingCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeRegistry {
        &self.attributes
    }

    #[must_use]
    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &RingCache {
        &self.cache
    }

    /// Fresh casting context sharing this builder's config.
    #[must_use]
    pub fn spell_data(&self) -> SpellData {
        SpellData::new(Arc::clone(&self.config))
    }

    /// Compile a linear composition: `modules[0]` is the root, each module
    /// the child of the one before it.
    pub fn compile(
        &self,
        modules: &[ModuleHandle],
        modifiers: &[PlacedModifier],
    ) -> Result<Arc<SpellChain>, CompileError> {
        if modules.is_empty() {
            return Err(CompileError::EmptyChain);
        }

        let len = modules.len();
        let mut per_ring: Vec<Vec<AttributeModifier>> = vec![Vec::new(); len];
        for placed in modifiers {
            let slot = per_ring.get_mut(placed.position).ok_or(CompileError::ModifierOutOfRange {
                position: placed.position,
                len,
            })?;
            slot.push(placed.modifier.clone());
        }

        let links = modules
            .iter()
            .zip(per_ring)
            .enumerate()
            .map(|(slot, (module, modifiers))| RingLink {
                module: Arc::clone(module),
                child: (slot + 1 < len).then_some(slot + 1),
                modifiers,
                primary_color: None,
                secondary_color: None,
            })
            .collect();

        self.compile_linked(links)
    }

    /// Compile rings that name their children by index.
    ///
    /// The links must form one path: a single root, every child index in
    /// bounds and claimed by at most one parent, no cycles.
    pub fn compile_linked(&self, links: Vec<RingLink>) -> Result<Arc<SpellChain>, CompileError> {
        let order = walk_order(&links)?;

        let mut links: Vec<Option<RingLink>> = links.into_iter().map(Some).collect();
        let mut draft = ChainDraft::new();

        for index in order {
            let Some(link) = links[index].take() else {
                continue;
            };
            let slot = draft.push(Some(link.module));

            for modifier in link.modifiers {
                if self.attributes.contains(modifier.attribute()) {
                    draft.add_modifier(slot, modifier);
                } else {
                    warn!(attribute = %modifier.attribute(), ring = index, "dropping modifier on unknown attribute");
                }
            }

            if let Some(color) = link.primary_color {
                draft.set_primary_color(slot, color);
            }
            if let Some(color) = link.secondary_color {
                draft.set_secondary_color(slot, color);
            }
        }

        Ok(self.cache.get_or_insert(draft.freeze(&self.config)))
    }

    /// Rebuild a stored composition, sharing the cache with compiled ones.
    ///
    /// Never fails: see [`RingTag`] for the lenient reading rules.
    pub fn load(&self, tag: &RingTag, lookup: &dyn ModuleLookup) -> Arc<SpellChain> {
        let draft = ChainDraft::from_tag(tag, lookup, &self.attributes);
        self.cache.get_or_insert(draft.freeze(&self.config))
    }

    /// Parse and load a stored composition.
    pub fn load_json(&self, json: &str, lookup: &dyn ModuleLookup) -> Result<Arc<SpellChain>, SpellError> {
        let tag = RingTag::from_json(json)?;
        Ok(self.load(&tag, lookup))
    }
}

impl Default for SpellBuilder {
    fn default() -> Self {
        Self::new(
            Arc::new(AttributeRegistry::with_defaults()),
            Arc::new(EngineConfig::default()),
        )
    }
}

/// Validate the link graph and return ring indices root to leaf.
fn walk_order(links: &[RingLink]) -> Result<Vec<usize>, CompileError> {
    if links.is_empty() {
        return Err(CompileError::EmptyChain);
    }
    if links.len() > SpellChain::MAX_LEN {
        return Err(CompileError::ChainTooLong {
            len: links.len(),
            max: SpellChain::MAX_LEN,
        });
    }

    let mut parent: Vec<Option<usize>> = vec![None; links.len()];
    for (ring, link) in links.iter().enumerate() {
        let Some(child) = link.child else {
            continue;
        };
        if child >= links.len() {
            return Err(CompileError::DanglingLink { ring, child });
        }
        if child == ring {
            return Err(CompileError::CyclicComposition { ring });
        }
        if parent[child].is_some() {
            return Err(CompileError::SharedChild { child });
        }
        parent[child] = Some(ring);
    }

    let roots: Vec<usize> = (0..links.len()).filter(|&ring| parent[ring].is_none()).collect();
    let root = match roots.as_slice() {
        // Every ring has a parent, so every ring sits on a cycle.
        [] => return Err(CompileError::CyclicComposition { ring: 0 }),
        [root] => *root,
        _ => return Err(CompileError::DisconnectedChain { roots: roots.len() }),
    };

    let mut visited = vec![false; links.len()];
    let mut order = Vec::with_capacity(links.len());
    let mut current = Some(root);
    while let Some(ring) = current {
        if visited[ring] {
            return Err(CompileError::CyclicComposition { ring });
        }
        visited[ring] = true;
        order.push(ring);
        current = links[ring].child;
    }

    // Rings the root cannot reach all have parents: they form cycles.
    if let Some(ring) = visited.iter().position(|seen| !seen) {
        return Err(CompileError::CyclicComposition { ring });
    }

    Ok(order)
}
