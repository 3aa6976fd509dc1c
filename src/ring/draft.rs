//! Build-phase chain construction.
//!
//! Rings are only mutable while a chain is being drafted. `ChainDraft` holds
//! the rings root first, propagates colors upward as they are set, and
//! canonicalizes every ring when frozen into a [`SpellChain`].

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::chain::SpellChain;
use super::node::Ring;
use super::tag::RingTag;
use crate::attributes::{fold_modifiers_with, AttributeId, AttributeModifier, AttributeRegistry};
use crate::core::{Color, EngineConfig, Fixed};
use crate::modules::{ModuleHandle, ModuleLookup};

#[derive(Debug)]
struct DraftRing {
    module: Option<ModuleHandle>,
    modifiers: Vec<AttributeModifier>,
    information: Option<BTreeMap<AttributeId, Fixed>>,
    primary: Color,
    secondary: Color,
}

/// A chain under construction, root first.
#[derive(Debug, Default)]
pub(crate) struct ChainDraft {
    rings: Vec<DraftRing>,
}

impl ChainDraft {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a ring below the current leaf. Returns its slot.
    ///
    /// The module's colors are applied and propagated upward.
    pub(crate) fn push(&mut self, module: Option<ModuleHandle>) -> usize {
        let (primary, secondary) = module
            .as_ref()
            .map_or((Color::WHITE, Color::WHITE), |m| (m.primary_color(), m.secondary_color()));
        self.rings.push(DraftRing {
            module,
            modifiers: Vec::new(),
            information: None,
            primary,
            secondary,
        });
        let slot = self.rings.len() - 1;
        self.set_primary_color(slot, primary);
        self.set_secondary_color(slot, secondary);
        slot
    }

    pub(crate) fn add_modifier(&mut self, slot: usize, modifier: AttributeModifier) {
        if let Some(ring) = self.rings.get_mut(slot) {
            ring.modifiers.push(modifier);
        }
    }

    /// Use a stored snapshot instead of folding modifiers for this ring.
    fn set_information(&mut self, slot: usize, information: BTreeMap<AttributeId, Fixed>) {
        if let Some(ring) = self.rings.get_mut(slot) {
            ring.information = Some(information);
        }
    }

    /// Set a ring's primary color and every ancestor's.
    pub(crate) fn set_primary_color(&mut self, slot: usize, color: Color) {
        for ring in self.rings.iter_mut().take(slot + 1) {
            ring.primary = color;
        }
    }

    /// Set a ring's secondary color and every ancestor's.
    pub(crate) fn set_secondary_color(&mut self, slot: usize, color: Color) {
        for ring in self.rings.iter_mut().take(slot + 1) {
            ring.secondary = color;
        }
    }

    /// Canonicalize every ring and link the chain.
    pub(crate) fn freeze(self, config: &EngineConfig) -> SpellChain {
        let rings = self
            .rings
            .into_iter()
            .map(|draft| {
                let information = match draft.information {
                    Some(stored) => normalize_information(draft.module.as_ref(), stored),
                    None => process_modifiers(draft.module.as_ref(), &draft.modifiers, config),
                };
                Ring::new(draft.module, draft.modifiers, information, (draft.primary, draft.secondary))
            })
            .collect();
        SpellChain::from_rings(rings)
    }

    /// Draft a stored composition.
    ///
    /// Lenient: unknown module ids give an empty ring, modifiers on unknown
    /// attributes are dropped, unparsable colors fall back to white, rings
    /// past [`SpellChain::MAX_LEN`] are cut off. The
    /// stored `extra` snapshot is kept and re-clamped rather than re-folded.
    pub(crate) fn from_tag(tag: &RingTag, lookup: &dyn ModuleLookup, attributes: &AttributeRegistry) -> Self {
        let mut draft = Self::new();

        let depth = tag.depth();
        if depth > SpellChain::MAX_LEN {
            warn!(depth, max = SpellChain::MAX_LEN, "stored chain too long, dropping the rings past the limit");
        }

        let rings = std::iter::successors(Some(tag), |t| t.child_ring.as_deref()).take(SpellChain::MAX_LEN);
        for ring_tag in rings {
            let module = ring_tag.module.as_deref().and_then(|id| {
                let found = lookup.module(id);
                if found.is_none() {
                    warn!(module = id, "unknown module in stored chain, ring left empty");
                }
                found
            });
            let slot = draft.push(module);

            for modifier_tag in &ring_tag.modifiers {
                let modifier = modifier_tag.to_modifier();
                if attributes.contains(modifier.attribute()) {
                    draft.add_modifier(slot, modifier);
                } else {
                    warn!(attribute = %modifier.attribute(), "dropping stored modifier on unknown attribute");
                }
            }

            let information = ring_tag
                .extra
                .iter()
                .map(|(key, value)| (AttributeId::new(key.as_str()), *value))
                .collect();
            draft.set_information(slot, information);

            draft.set_primary_color(slot, parse_color(&ring_tag.primary_color));
            draft.set_secondary_color(slot, parse_color(&ring_tag.secondary_color));
        }

        draft
    }
}

fn parse_color(text: &str) -> Color {
    Color::parse(text).unwrap_or_else(|| {
        if !text.is_empty() {
            warn!(color = text, "unparsable color in stored chain, using white");
        }
        Color::WHITE
    })
}

/// Fold compile-time modifiers into a canonical snapshot.
///
/// Seeds every declared attribute with its base, folds, clamps to the
/// declared range and encodes. A ring without a module has an empty snapshot.
pub(crate) fn process_modifiers(
    module: Option<&ModuleHandle>,
    modifiers: &[AttributeModifier],
    config: &EngineConfig,
) -> BTreeMap<AttributeId, Fixed> {
    let Some(module) = module else {
        return BTreeMap::new();
    };
    let ranges = module.attribute_ranges();
    let seed = ranges.iter().map(|(id, range)| (id.clone(), range.base)).collect();

    let folded = fold_modifiers_with(seed, modifiers, |modifier, old, new| {
        if config.debug_info {
            debug!(
                module = module.id(),
                attribute = %modifier.attribute(),
                operation = ?modifier.operation(),
                old,
                new,
                "applied modifier"
            );
        }
    });

    folded
        .into_iter()
        .map(|(id, value)| {
            let clamped = ranges.get(&id).map_or(value, |range| range.clamp(value));
            (id, Fixed::from_f64(clamped))
        })
        .collect()
}

/// Clamp a stored snapshot to the module's declared ranges.
fn normalize_information(
    module: Option<&ModuleHandle>,
    stored: BTreeMap<AttributeId, Fixed>,
) -> BTreeMap<AttributeId, Fixed> {
    let Some(module) = module else {
        return stored;
    };
    let ranges = module.attribute_ranges();
    stored
        .into_iter()
        .map(|(id, value)| match ranges.get(&id) {
            Some(range) => {
                let clamped = Fixed::from_f64(range.clamp(value.to_f64()));
                (id, clamped)
            }
            None => (id, value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::attributes::AttributeRange;
    use crate::modules::{BasicModule, ModuleRegistry};

    fn area_module() -> ModuleHandle {
        Arc::new(
            BasicModule::new("shape_zone")
                .with_range(AttributeId::AREA, AttributeRange::new(0.0, 5.0, 10.0))
                .with_range(AttributeId::MANA, AttributeRange::new(0.0, 2.0, 100.0)),
        )
    }

    #[test]
    fn test_process_modifiers_clamps() {
        let modifiers = [AttributeModifier::add(AttributeId::AREA, 100.0)];
        let info = process_modifiers(Some(&area_module()), &modifiers, &EngineConfig::default());

        assert_eq!(info[&AttributeId::AREA], Fixed::from_f64(10.0));
        assert_eq!(info[&AttributeId::MANA], Fixed::from_f64(2.0));
    }

    #[test]
    fn test_process_modifiers_without_module() {
        let modifiers = [AttributeModifier::add(AttributeId::AREA, 1.0)];
        assert!(process_modifiers(None, &modifiers, &EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_colors_propagate_upward() {
        let mut draft = ChainDraft::new();
        draft.push(None);
        draft.push(None);
        let leaf = draft.push(None);
        draft.set_primary_color(leaf, Color::rgb(1, 2, 3));

        let chain = draft.freeze(&EngineConfig::default());
        assert!(chain.iter().all(|ring| ring.primary_color() == Color::rgb(1, 2, 3)));
        assert_eq!(chain.root().secondary_color(), Color::WHITE);
    }

    #[test]
    fn test_leaf_module_colors_win() {
        let mut draft = ChainDraft::new();
        draft.push(Some(Arc::new(BasicModule::new("a").with_colors(Color::BLACK, Color::BLACK))));
        draft.push(Some(Arc::new(
            BasicModule::new("b").with_colors(Color::rgb(9, 9, 9), Color::rgb(8, 8, 8)),
        )));

        let chain = draft.freeze(&EngineConfig::default());
        assert_eq!(chain.root().primary_color(), Color::rgb(9, 9, 9));
        assert_eq!(chain.root().secondary_color(), Color::rgb(8, 8, 8));
    }

    #[test]
    fn test_from_tag_lenient() {
        let mut modules = ModuleRegistry::new();
        modules.register(area_module()).unwrap();
        let attributes = AttributeRegistry::with_defaults();

        let json = r#"{
            "modifiers": [
                {"operation": 0, "attribute": "area", "modifier": 1000000},
                {"operation": 0, "attribute": "sparkle", "modifier": 1000000}
            ],
            "extra": {"area": 40000000},
            "primary_color": "purple",
            "module": "shape_zone",
            "child_ring": {"module": "effect_gone"}
        }"#;
        let tag = RingTag::from_json(json).unwrap();
        let chain = ChainDraft::from_tag(&tag, &modules, &attributes).freeze(&EngineConfig::default());

        let root = chain.root();
        assert_eq!(root.modifiers().len(), 1);
        assert_eq!(root.true_value(&AttributeId::AREA), 10.0);
        assert_eq!(root.information()[&AttributeId::AREA], Fixed::from_f64(10.0));
        assert_eq!(root.primary_color(), Color::WHITE);

        let child = root.child().unwrap();
        assert!(child.module().is_none());
        assert_eq!(chain.len(), 2);
    }
}
