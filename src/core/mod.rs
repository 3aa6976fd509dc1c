//! Core engine types: fixed-point values, colors, entity ids, configuration.
//!
//! These are leaf types with no knowledge of rings or modules. Everything
//! numeric that ends up in a canonical tag goes through [`Fixed`].

pub mod color;
pub mod config;
pub mod entity;
pub mod fixed;

pub use color::Color;
pub use config::{EngineConfig, TaxPolicy};
pub use entity::{EntityId, Point};
pub use fixed::Fixed;
