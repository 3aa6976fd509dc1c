//! Attribute system: ids, declared ranges, the registry, and modifiers.
//!
//! ## Key Types
//!
//! - `AttributeId`: Sortable string key
//! - `AttributeRange`: A module's declared `{min, base, max}`
//! - `AttributeRegistry`: Table of accepted attribute ids
//! - `AttributeModifier` / `Operation`: Compile-time and cast-time adjustments
//!
//! The fold in [`modifier`] is the canonicalization core shared by ring
//! compilation and per-cast modifiers.

pub mod attribute;
pub mod modifier;
pub mod registry;

pub use attribute::{Attribute, AttributeId, AttributeRange, AttributeRanges};
pub use modifier::{fold_modifiers, fold_modifiers_with, AttributeModifier, Operation};
pub use registry::AttributeRegistry;
