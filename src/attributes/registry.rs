//! Attribute registry.
//!
//! The `AttributeRegistry` is the table of attribute ids the engine accepts.
//! It is built once during start-up and then injected (usually as an `Arc`)
//! into the `SpellBuilder`; nothing reads it through global state.

use rustc_hash::FxHashMap;

use super::attribute::{Attribute, AttributeId, AttributeRange};
use crate::error::SpellError;

/// Registry of known attributes.
///
/// ## Example
///
/// ```
/// use rust_spell::attributes::{Attribute, AttributeId, AttributeRegistry};
///
/// let mut registry = AttributeRegistry::with_defaults();
/// registry.register(Attribute::new("warmth")).unwrap();
///
/// assert!(registry.lookup(&AttributeId::MANA).is_ok());
/// assert!(registry.lookup(&AttributeId::new("warmth")).is_ok());
/// assert!(registry.lookup(&AttributeId::new("chill")).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AttributeRegistry {
    attributes: FxHashMap<AttributeId, Attribute>,
}

impl AttributeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the standard attributes.
    ///
    /// Multiplier attributes default to a base of 1.
    #[must_use]
    pub fn with_defaults() -> Self {
        let multiplier = AttributeRange::new(0.0, 1.0, 10.0);
        let standard = [
            Attribute::new(AttributeId::MANA),
            Attribute::new(AttributeId::BURNOUT),
            Attribute::new(AttributeId::POWER_MULTI).with_range(multiplier),
            Attribute::new(AttributeId::MANA_MULTI).with_range(multiplier),
            Attribute::new(AttributeId::BURNOUT_MULTI).with_range(multiplier),
            Attribute::new(AttributeId::COOLDOWN),
            Attribute::new(AttributeId::CHARGEUP),
            Attribute::new(AttributeId::AREA),
            Attribute::new(AttributeId::DURATION),
            Attribute::new(AttributeId::RANGE),
            Attribute::new(AttributeId::SPEED),
            Attribute::new(AttributeId::POTENCY),
        ];

        let mut registry = Self::new();
        for attribute in standard {
            registry.attributes.insert(attribute.id.clone(), attribute);
        }
        registry
    }

    /// Register an attribute. Fails if the id is taken.
    pub fn register(&mut self, attribute: Attribute) -> Result<(), SpellError> {
        if self.attributes.contains_key(&attribute.id) {
            return Err(SpellError::DuplicateAttribute(attribute.id));
        }
        self.attributes.insert(attribute.id.clone(), attribute);
        Ok(())
    }

    /// Look up an attribute by id.
    pub fn lookup(&self, id: &AttributeId) -> Result<&Attribute, SpellError> {
        self.attributes
            .get(id)
            .ok_or_else(|| SpellError::UnknownAttribute(id.clone()))
    }

    /// Default range of an attribute.
    pub fn range(&self, id: &AttributeId) -> Result<AttributeRange, SpellError> {
        self.lookup(id).map(|a| a.default_range)
    }

    /// Check if an attribute id is registered.
    #[must_use]
    pub fn contains(&self, id: &AttributeId) -> bool {
        self.attributes.contains_key(id)
    }

    /// Get the number of registered attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Registered ids in canonical (sorted) order.
    #[must_use]
    pub fn ids(&self) -> Vec<&AttributeId> {
        let mut ids: Vec<_> = self.attributes.keys().collect();
        ids.sort();
        ids
    }
}
