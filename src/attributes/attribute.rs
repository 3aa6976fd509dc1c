//! Attribute identifiers and declared ranges.
//!
//! An attribute is a named numeric parameter of a module ("mana", "range",
//! "power_multi", ...). The engine knows a set of standard ids, but modules
//! declare their own `{min, base, max}` ranges: two modules may bound the
//! same attribute differently.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key for an attribute.
///
/// Ordering is by the string key and is part of the canonical form: tags and
/// modifier lists are sorted by it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(Cow<'static, str>);

impl AttributeId {
    pub const MANA: AttributeId = AttributeId::from_static("mana");
    pub const BURNOUT: AttributeId = AttributeId::from_static("burnout");
    pub const POWER_MULTI: AttributeId = AttributeId::from_static("power_multi");
    pub const MANA_MULTI: AttributeId = AttributeId::from_static("mana_multi");
    pub const BURNOUT_MULTI: AttributeId = AttributeId::from_static("burnout_multi");
    pub const COOLDOWN: AttributeId = AttributeId::from_static("cooldown");
    pub const CHARGEUP: AttributeId = AttributeId::from_static("chargeup");
    pub const AREA: AttributeId = AttributeId::from_static("area");
    pub const DURATION: AttributeId = AttributeId::from_static("duration");
    pub const RANGE: AttributeId = AttributeId::from_static("range");
    pub const SPEED: AttributeId = AttributeId::from_static("speed");
    pub const POTENCY: AttributeId = AttributeId::from_static("potency");

    /// Create an attribute key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    /// Create an attribute key from a static string.
    #[must_use]
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// Get the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttributeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AttributeId {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared `{min, base, max}` range of an attribute on one module.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeRange {
    pub min: f64,
    pub base: f64,
    pub max: f64,
}

impl AttributeRange {
    /// Range used when nothing narrower is declared.
    pub const UNBOUNDED: AttributeRange = AttributeRange {
        min: 0.0,
        base: 0.0,
        max: u32::MAX as f64,
    };

    /// Create a range. Bounds given in the wrong order are swapped.
    #[must_use]
    pub fn new(min: f64, base: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self { min, base, max }
    }

    /// A range whose base sits at its minimum.
    #[must_use]
    pub fn from_bounds(min: f64, max: f64) -> Self {
        Self::new(min, min, max)
    }

    /// Clamp a value into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Check whether a value lies within the bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Attribute ranges declared by a module, sorted by attribute id.
pub type AttributeRanges = BTreeMap<AttributeId, AttributeRange>;

/// A registered attribute: its id plus the range modules inherit when they
/// declare the attribute without bounds of their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttributeId,
    pub default_range: AttributeRange,
}

impl Attribute {
    /// Create an attribute with the unbounded default range.
    pub fn new(id: impl Into<AttributeId>) -> Self {
        Self {
            id: id.into(),
            default_range: AttributeRange::UNBOUNDED,
        }
    }

    /// Set the default range (builder pattern).
    #[must_use]
    pub fn with_range(mut self, range: AttributeRange) -> Self {
        self.default_range = range;
        self
    }
}
