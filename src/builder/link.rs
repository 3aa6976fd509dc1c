//! Raw compilation inputs.

use crate::attributes::AttributeModifier;
use crate::core::Color;
use crate::modules::ModuleHandle;

/// A modifier attached to the ring at `position` of a linear composition.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedModifier {
    pub position: usize,
    pub modifier: AttributeModifier,
}

impl PlacedModifier {
    #[must_use]
    pub fn new(position: usize, modifier: AttributeModifier) -> Self {
        Self { position, modifier }
    }
}

/// One ring of a composition that names its child by index.
///
/// This is the shape editors and stored layouts produce: rings in any order,
/// each pointing at the ring below it.
#[derive(Clone, Debug)]
pub struct RingLink {
    pub module: ModuleHandle,
    pub child: Option<usize>,
    pub modifiers: Vec<AttributeModifier>,
    pub primary_color: Option<Color>,
    pub secondary_color: Option<Color>,
}

impl RingLink {
    /// A leaf ring with no modifiers.
    #[must_use]
    pub fn new(module: ModuleHandle) -> Self {
        Self {
            module,
            child: None,
            modifiers: Vec::new(),
            primary_color: None,
            secondary_color: None,
        }
    }

    /// Link to the ring at index `child`.
    #[must_use]
    pub fn with_child(mut self, child: usize) -> Self {
        self.child = Some(child);
        self
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: AttributeModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Override the module's colors. Propagates to every ancestor.
    #[must_use]
    pub fn with_colors(mut self, primary: Color, secondary: Color) -> Self {
        self.primary_color = Some(primary);
        self.secondary_color = Some(secondary);
        self
    }
}
