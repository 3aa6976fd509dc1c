//! # rust-spell
//!
//! A spell-composition engine: spells are chains of rings, each ring wrapping
//! a module with numeric attributes that are adjusted at build time and
//! resolved at cast time.
//!
//! ## Design Principles
//!
//! 1. **Canonical Forms**: Logically equal compositions serialize to the same
//!    tag regardless of modifier insertion order. Every persisted number is
//!    fixed-point, and every list and map has a defined sort order.
//!
//! 2. **Build Once, Read Forever**: Rings are only mutable while a chain is
//!    drafted. Compiled chains are immutable and shared as `Arc<SpellChain>`,
//!    deduplicated by canonical tag.
//!
//! 3. **Injected Registries**: Attribute and module registries are plain
//!    values handed to the builder. There is no global state.
//!
//! ## Architecture
//!
//! - **Arena Chains**: Rings live in a `Vec` ordered root to leaf. Forward
//!   links are owned by the arena; parent links are indices.
//!
//! - **Resolution Pipeline**: snapshot → clamp → per-cast modifiers →
//!   burnout penalty → power multiplier.
//!
//! - **Persistent Context**: `SpellData` uses `im` collections so the ticker
//!   can snapshot it in O(1).
//!
//! ## Modules
//!
//! - `core`: Fixed-point codec, colors, entity ids, configuration
//! - `attributes`: Attribute ids, ranges, registry, modifiers and the fold
//! - `modules`: The `Module` capability trait and module lookup
//! - `context`: Casting context, casters and resource pools
//! - `ring`: Rings, chains, resolution, taxation, overrides, canonical tags
//! - `builder`: Compilation and the chain cache
//! - `ticker`: Tick-driven delayed execution
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rust_spell::{AttributeId, AttributeRange, BasicModule, Caster, EntityId, ManaPool, ModuleHandle, SpellBuilder};
//!
//! let blast: ModuleHandle = Arc::new(
//!     BasicModule::new("effect_blast")
//!         .with_range(AttributeId::MANA, AttributeRange::new(0.0, 30.0, 100.0))
//!         .with_behavior(|data, ring, _| ring.tax(data, 1.0, true)),
//! );
//!
//! let builder = SpellBuilder::default();
//! let chain = builder.compile(&[blast], &[]).unwrap();
//!
//! let pool = ManaPool::new(100.0, 100.0).shared();
//! let mut data = builder
//!     .spell_data()
//!     .with_caster(Caster::new(EntityId::new(1), pool.clone()));
//! chain.run(&mut data);
//!
//! assert_eq!(pool.lock().current_mana(), 70.0);
//! ```

pub mod attributes;
pub mod builder;
pub mod context;
pub mod core;
pub mod error;
pub mod modules;
pub mod ring;
pub mod ticker;

// Re-export commonly used types
pub use crate::core::{Color, EngineConfig, EntityId, Fixed, Point, TaxPolicy};

pub use crate::attributes::{
    fold_modifiers, Attribute, AttributeId, AttributeModifier, AttributeRange, AttributeRanges,
    AttributeRegistry, Operation,
};

pub use crate::modules::{BasicModule, Module, ModuleHandle, ModuleLookup, ModuleRegistry};

pub use crate::context::{Caster, FailureSignal, ManaPool, ResourcePool, SharedPool, SpellData};

pub use crate::ring::{ModifierTag, OverrideHandler, Ring, RingIndex, RingRef, RingTag, SpellChain};

pub use crate::builder::{PlacedModifier, RingCache, RingLink, SpellBuilder};

pub use crate::ticker::{SpellTicker, TickId};

pub use crate::error::{CompileError, SpellError};
