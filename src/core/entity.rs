//! Entity and location identifiers.
//!
//! The engine never owns world objects. Casters are named by an opaque
//! `EntityId` and cast origins by a `Point`; the world behind them is an
//! external collaborator.
//!
//! ```
//! use rust_spell::core::{EntityId, Point};
//!
//! let caster = EntityId::new(7);
//! assert_eq!(caster.raw(), 7);
//!
//! let origin = Point::new(1.0, 64.0, -3.5);
//! assert_eq!(origin.y, 64.0);
//! ```

use serde::{Deserialize, Serialize};

/// Opaque identifier for a world entity (usually a caster).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// A location in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}
