//! Closure-backed module.
//!
//! `BasicModule` covers hosts whose modules are data plus a behavior
//! function, and is what the engine's own tests build chains from.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::Module;
use crate::attributes::{Attribute, AttributeId, AttributeRange, AttributeRanges};
use crate::context::SpellData;
use crate::core::Color;
use crate::ring::RingRef;

type Behavior = Arc<dyn Fn(&mut SpellData, RingRef<'_>, bool) -> bool + Send + Sync>;
type OverrideFn = Arc<dyn Fn(&SpellData, RingRef<'_>, f64) -> f64 + Send + Sync>;

/// A module defined by ranges, colors and a behavior closure.
///
/// ## Example
///
/// ```
/// use rust_spell::attributes::{AttributeId, AttributeRange};
/// use rust_spell::core::Color;
/// use rust_spell::modules::{BasicModule, Module};
///
/// let burn = BasicModule::new("effect_burn")
///     .with_name("Burn")
///     .with_range(AttributeId::POTENCY, AttributeRange::new(0.0, 2.0, 8.0))
///     .with_colors(Color::rgb(255, 80, 0), Color::rgb(120, 0, 0))
///     .with_behavior(|_data, ring, _primary| ring.true_value(&AttributeId::POTENCY) > 0.0);
///
/// assert_eq!(burn.readable_name(), "Burn");
/// assert_eq!(burn.attribute_ranges().len(), 1);
/// ```
#[derive(Clone)]
pub struct BasicModule {
    id: String,
    name: Option<String>,
    ranges: AttributeRanges,
    primary: Color,
    secondary: Color,
    runs_children: bool,
    continuous: bool,
    behavior: Behavior,
    override_names: Vec<&'static str>,
    overrides: FxHashMap<&'static str, OverrideFn>,
}

impl BasicModule {
    /// Create a module that declares nothing and always succeeds.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            ranges: AttributeRanges::new(),
            primary: Color::WHITE,
            secondary: Color::WHITE,
            runs_children: true,
            continuous: false,
            behavior: Arc::new(always_succeeds),
            override_names: Vec::new(),
            overrides: FxHashMap::default(),
        }
    }

    /// Set the readable name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declare an attribute range.
    #[must_use]
    pub fn with_range(mut self, attribute: impl Into<AttributeId>, range: AttributeRange) -> Self {
        self.ranges.insert(attribute.into(), range);
        self
    }

    /// Declare a registered attribute with its default range.
    #[must_use]
    pub fn with_attribute(self, attribute: &Attribute) -> Self {
        self.with_range(attribute.id.clone(), attribute.default_range)
    }

    /// Set both display colors.
    #[must_use]
    pub fn with_colors(mut self, primary: Color, secondary: Color) -> Self {
        self.primary = primary;
        self.secondary = secondary;
        self
    }

    /// Stop the chain walk after this module.
    #[must_use]
    pub fn without_children(mut self) -> Self {
        self.runs_children = false;
        self
    }

    /// Mark as continuous.
    #[must_use]
    pub fn continuous(mut self) -> Self {
        self.continuous = true;
        self
    }

    /// Set the cast behavior.
    #[must_use]
    pub fn with_behavior(
        mut self,
        behavior: impl Fn(&mut SpellData, RingRef<'_>, bool) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.behavior = Arc::new(behavior);
        self
    }

    /// Provide a named override to the chain.
    #[must_use]
    pub fn with_override(
        mut self,
        name: &'static str,
        apply: impl Fn(&SpellData, RingRef<'_>, f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        if !self.override_names.contains(&name) {
            self.override_names.push(name);
        }
        self.overrides.insert(name, Arc::new(apply));
        self
    }
}

fn always_succeeds(_: &mut SpellData, _: RingRef<'_>, _: bool) -> bool {
    true
}

impl fmt::Debug for BasicModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicModule")
            .field("id", &self.id)
            .field("ranges", &self.ranges)
            .field("runs_children", &self.runs_children)
            .field("overrides", &self.override_names)
            .finish_non_exhaustive()
    }
}

impl Module for BasicModule {
    fn id(&self) -> &str {
        &self.id
    }

    fn attribute_ranges(&self) -> &AttributeRanges {
        &self.ranges
    }

    fn cast(&self, data: &mut SpellData, ring: RingRef<'_>, primary: bool) -> bool {
        (self.behavior)(data, ring, primary)
    }

    fn runs_children(&self) -> bool {
        self.runs_children
    }

    fn readable_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    fn primary_color(&self) -> Color {
        self.primary
    }

    fn secondary_color(&self) -> Color {
        self.secondary
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }

    fn overrides(&self) -> &[&'static str] {
        &self.override_names
    }

    fn apply_override(&self, name: &str, data: &SpellData, ring: RingRef<'_>, input: f64) -> Option<f64> {
        self.overrides.get(name).map(|apply| apply(data, ring, input))
    }
}
