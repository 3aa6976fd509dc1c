//! Module capability surface.
//!
//! A module is the polymorphic unit a ring wraps: it declares attribute
//! ranges and implements cast behavior. Concrete modules live outside the
//! engine; the engine only calls through the [`Module`] trait.
//!
//! - `Module`: capabilities the chain walk consumes
//! - `ModuleLookup` / `ModuleRegistry`: id → module resolution for stored chains
//! - `BasicModule`: closure-backed module for hosts and tests

mod basic;
mod registry;

pub use basic::BasicModule;
pub use registry::{ModuleLookup, ModuleRegistry};

use std::fmt;
use std::sync::Arc;

use crate::attributes::AttributeRanges;
use crate::context::SpellData;
use crate::core::Color;
use crate::ring::RingRef;

/// Shared handle to a module.
pub type ModuleHandle = Arc<dyn Module>;

/// Capabilities of an effect or shape module.
pub trait Module: fmt::Debug + Send + Sync {
    /// Stable identifier written into canonical tags.
    fn id(&self) -> &str;

    /// Declared `{min, base, max}` per attribute.
    fn attribute_ranges(&self) -> &AttributeRanges;

    /// Run this module's behavior for `ring`. Returns success.
    fn cast(&self, data: &mut SpellData, ring: RingRef<'_>, primary: bool) -> bool;

    /// Whether the child ring runs after a successful cast.
    fn runs_children(&self) -> bool {
        true
    }

    /// Human-readable name.
    fn readable_name(&self) -> &str {
        self.id()
    }

    fn primary_color(&self) -> Color {
        Color::WHITE
    }

    fn secondary_color(&self) -> Color {
        Color::WHITE
    }

    /// Continuous modules keep running while their caster channels them.
    fn is_continuous(&self) -> bool {
        false
    }

    /// Names of overrides this module provides to the rest of its chain.
    fn overrides(&self) -> &[&'static str] {
        &[]
    }

    /// Evaluate a named override. `None` defers to the next provider.
    fn apply_override(
        &self,
        _name: &str,
        _data: &SpellData,
        _ring: RingRef<'_>,
        _input: f64,
    ) -> Option<f64> {
        None
    }
}
