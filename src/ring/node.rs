//! A single ring and its position in a chain.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::overrides::OverrideHandler;
use super::tag::RingTag;
use crate::attributes::{AttributeId, AttributeModifier, AttributeRange, Operation};
use crate::core::{Color, Fixed};
use crate::modules::ModuleHandle;

/// Position of a ring in its chain. The root is index 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RingIndex(pub u32);

impl RingIndex {
    pub const ROOT: RingIndex = RingIndex(0);

    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Arena slot.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_slot(slot: usize) -> Self {
        Self(slot as u32)
    }
}

impl fmt::Display for RingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ring({})", self.0)
    }
}

/// One link of a spell chain.
///
/// Rings are read-only once their chain is built. `information` is the
/// canonical resolved snapshot: one clamped fixed-point value per attribute,
/// sorted by id. It is only ever produced by canonicalization.
#[derive(Debug)]
pub struct Ring {
    pub(crate) module: Option<ModuleHandle>,
    pub(crate) modifiers: Vec<AttributeModifier>,
    pub(crate) information: BTreeMap<AttributeId, Fixed>,
    pub(crate) primary: Color,
    pub(crate) secondary: Color,
    pub(crate) parent: Option<RingIndex>,
    pub(crate) child: Option<RingIndex>,
    pub(crate) override_handler: OnceCell<Arc<OverrideHandler>>,
    pub(crate) serialized: OnceCell<Arc<RingTag>>,
}

impl Ring {
    pub(crate) fn new(
        module: Option<ModuleHandle>,
        mut modifiers: Vec<AttributeModifier>,
        information: BTreeMap<AttributeId, Fixed>,
        (primary, secondary): (Color, Color),
    ) -> Self {
        modifiers.sort();
        Self {
            module,
            modifiers,
            information,
            primary,
            secondary,
            parent: None,
            child: None,
            override_handler: OnceCell::new(),
            serialized: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn module(&self) -> Option<&ModuleHandle> {
        self.module.as_ref()
    }

    /// Module id, if the ring has a module.
    #[must_use]
    pub fn module_id(&self) -> Option<&str> {
        self.module.as_deref().map(|m| m.id())
    }

    /// Compile-time modifiers in canonical order.
    #[must_use]
    pub fn modifiers(&self) -> &[AttributeModifier] {
        &self.modifiers
    }

    /// Compile-time modifiers of one operation.
    pub fn modifiers_for(&self, operation: Operation) -> impl Iterator<Item = &AttributeModifier> {
        self.modifiers.iter().filter(move |m| m.operation() == operation)
    }

    /// Canonical resolved snapshot.
    #[must_use]
    pub fn information(&self) -> &BTreeMap<AttributeId, Fixed> {
        &self.information
    }

    #[must_use]
    pub fn primary_color(&self) -> Color {
        self.primary
    }

    #[must_use]
    pub fn secondary_color(&self) -> Color {
        self.secondary
    }

    /// Declared range of an attribute on this ring's module.
    #[must_use]
    pub fn range(&self, attribute: &AttributeId) -> Option<AttributeRange> {
        self.module
            .as_ref()
            .and_then(|m| m.attribute_ranges().get(attribute).copied())
    }

    /// Whether the module keeps running while channelled.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        self.module.as_ref().is_some_and(|m| m.is_continuous())
    }

    /// Module display name, or `"empty"` for a ring without a module.
    #[must_use]
    pub fn readable_name(&self) -> &str {
        self.module.as_deref().map_or("empty", |m| m.readable_name())
    }
}
