//! Attribute modifiers and the deterministic fold.
//!
//! A modifier is an `(attribute, operation, magnitude)` triple. Modifiers are
//! applied to a working map seeded with each declared attribute's base value:
//!
//! 1. Operations run in declaration order of [`Operation`]
//!    (`Add`, `Subtract`, `Multiply`, `Divide`, `Override`).
//! 2. Within one operation, modifiers are applied sorted by attribute id,
//!    then by magnitude.
//! 3. A modifier whose attribute has no seed entry is skipped.
//!
//! Insertion order therefore never affects the result.
//!
//! ```
//! use std::collections::BTreeMap;
//! use rust_spell::attributes::{fold_modifiers, AttributeId, AttributeModifier, Operation};
//!
//! let seed = BTreeMap::from([(AttributeId::RANGE, 4.0)]);
//! let modifiers = [
//!     AttributeModifier::new(AttributeId::RANGE, Operation::Multiply, 2.0),
//!     AttributeModifier::new(AttributeId::RANGE, Operation::Add, 1.0),
//! ];
//!
//! // Add runs before Multiply regardless of list order: (4 + 1) * 2
//! let folded = fold_modifiers(seed, &modifiers);
//! assert_eq!(folded[&AttributeId::RANGE], 10.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::AttributeId;
use crate::core::Fixed;

/// Modifier kind. Declaration order is evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Override,
}

impl Operation {
    /// Every operation, in evaluation order.
    pub const ALL: [Operation; 5] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Override,
    ];

    /// Position in evaluation order (the persisted integer).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Operation for a persisted index.
    ///
    /// Indices outside the known range wrap around instead of failing.
    #[must_use]
    pub fn from_index(index: i64) -> Self {
        let wrapped = index.rem_euclid(Self::ALL.len() as i64) as usize;
        Self::ALL[wrapped]
    }

    /// Apply this operation to a value.
    ///
    /// Dividing by zero leaves the value unchanged.
    #[must_use]
    pub fn apply(self, current: f64, magnitude: f64) -> f64 {
        match self {
            Operation::Add => current + magnitude,
            Operation::Subtract => current - magnitude,
            Operation::Multiply => current * magnitude,
            Operation::Divide => {
                if magnitude == 0.0 {
                    current
                } else {
                    current / magnitude
                }
            }
            Operation::Override => magnitude,
        }
    }
}

/// A single attribute modification.
///
/// The magnitude is held in fixed-point form; [`AttributeModifier::magnitude`]
/// is a derived view. The derived ordering (operation, attribute, magnitude)
/// is the canonical order used for folding and serialization.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeModifier {
    operation: Operation,
    attribute: AttributeId,
    magnitude: Fixed,
}

impl AttributeModifier {
    /// Create a modifier. The magnitude is encoded immediately.
    pub fn new(attribute: impl Into<AttributeId>, operation: Operation, magnitude: f64) -> Self {
        Self::from_fixed(attribute, operation, Fixed::from_f64(magnitude))
    }

    /// Create a modifier from an already-encoded magnitude.
    pub fn from_fixed(attribute: impl Into<AttributeId>, operation: Operation, magnitude: Fixed) -> Self {
        Self {
            operation,
            attribute: attribute.into(),
            magnitude,
        }
    }

    /// Shorthand for an `Add` modifier.
    pub fn add(attribute: impl Into<AttributeId>, magnitude: f64) -> Self {
        Self::new(attribute, Operation::Add, magnitude)
    }

    /// Shorthand for a `Multiply` modifier.
    pub fn multiply(attribute: impl Into<AttributeId>, magnitude: f64) -> Self {
        Self::new(attribute, Operation::Multiply, magnitude)
    }

    /// Shorthand for an `Override` modifier.
    pub fn set(attribute: impl Into<AttributeId>, magnitude: f64) -> Self {
        Self::new(attribute, Operation::Override, magnitude)
    }

    #[must_use]
    pub fn attribute(&self) -> &AttributeId {
        &self.attribute
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Canonical magnitude.
    #[must_use]
    pub fn magnitude_fixed(&self) -> Fixed {
        self.magnitude
    }

    /// Magnitude as a floating value.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude.to_f64()
    }

    /// Apply this modifier to a value.
    #[must_use]
    pub fn apply(&self, current: f64) -> f64 {
        self.operation.apply(current, self.magnitude())
    }
}

/// Fold modifiers into a seeded attribute map.
pub fn fold_modifiers<'a>(
    seed: BTreeMap<AttributeId, f64>,
    modifiers: impl IntoIterator<Item = &'a AttributeModifier>,
) -> BTreeMap<AttributeId, f64> {
    fold_modifiers_with(seed, modifiers, |_, _, _| {})
}

/// Fold modifiers, reporting each application as `(modifier, old, new)`.
pub fn fold_modifiers_with<'a>(
    mut values: BTreeMap<AttributeId, f64>,
    modifiers: impl IntoIterator<Item = &'a AttributeModifier>,
    mut observe: impl FnMut(&AttributeModifier, f64, f64),
) -> BTreeMap<AttributeId, f64> {
    let mut ordered: Vec<&AttributeModifier> = modifiers.into_iter().collect();
    ordered.sort();

    for modifier in ordered {
        let Some(current) = values.get_mut(&modifier.attribute) else {
            continue;
        };
        let old = *current;
        *current = modifier.apply(old);
        observe(modifier, old, *current);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_order() {
        let indices: Vec<_> = Operation::ALL.iter().map(|op| op.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(Operation::Add < Operation::Override);
    }

    #[test]
    fn test_from_index_wraps() {
        assert_eq!(Operation::from_index(2), Operation::Multiply);
        assert_eq!(Operation::from_index(5), Operation::Add);
        assert_eq!(Operation::from_index(7), Operation::Multiply);
        assert_eq!(Operation::from_index(-1), Operation::Override);
    }

    #[test]
    fn test_apply() {
        assert_eq!(Operation::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(Operation::Subtract.apply(2.0, 3.0), -1.0);
        assert_eq!(Operation::Multiply.apply(2.0, 3.0), 6.0);
        assert_eq!(Operation::Divide.apply(3.0, 2.0), 1.5);
        assert_eq!(Operation::Divide.apply(3.0, 0.0), 3.0);
        assert_eq!(Operation::Override.apply(2.0, 9.0), 9.0);
    }

    #[test]
    fn test_modifier_magnitude_is_fixed() {
        let modifier = AttributeModifier::add("area", 0.1 + 0.2);
        assert_eq!(modifier.magnitude_fixed(), Fixed::from_raw(300_000));
        assert_eq!(modifier.magnitude(), 0.3);
    }

    #[test]
    fn test_fold_skips_unknown_attributes() {
        let seed = BTreeMap::from([(AttributeId::MANA, 10.0)]);
        let modifiers = [
            AttributeModifier::add(AttributeId::MANA, 5.0),
            AttributeModifier::add(AttributeId::AREA, 5.0),
        ];
        let folded = fold_modifiers(seed, &modifiers);

        assert_eq!(folded.len(), 1);
        assert_eq!(folded[&AttributeId::MANA], 15.0);
    }

    #[test]
    fn test_fold_order_independent() {
        let seed = BTreeMap::from([(AttributeId::RANGE, 2.0), (AttributeId::SPEED, 1.0)]);
        let forward = [
            AttributeModifier::set(AttributeId::RANGE, 3.0),
            AttributeModifier::set(AttributeId::RANGE, 7.0),
            AttributeModifier::multiply(AttributeId::SPEED, 4.0),
            AttributeModifier::add(AttributeId::SPEED, 1.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = fold_modifiers(seed.clone(), &forward);
        let b = fold_modifiers(seed, &reversed);

        assert_eq!(a, b);
        assert_eq!(a[&AttributeId::SPEED], 8.0);
        // Largest override magnitude is applied last.
        assert_eq!(a[&AttributeId::RANGE], 7.0);
    }

    #[test]
    fn test_fold_observer() {
        let seed = BTreeMap::from([(AttributeId::MANA, 1.0)]);
        let modifiers = [AttributeModifier::multiply(AttributeId::MANA, 3.0)];
        let mut seen = Vec::new();

        fold_modifiers_with(seed, &modifiers, |m, old, new| {
            seen.push((m.operation(), old, new));
        });

        assert_eq!(seen, vec![(Operation::Multiply, 1.0, 3.0)]);
    }
}
