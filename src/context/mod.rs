//! Casting context.
//!
//! Everything a chain walk needs from the outside world: who is casting,
//! where, the shared resource pool to tax and the sink for failure cues.
//!
//! ## Key Types
//!
//! - `SpellData`: per-cast context, cheap to clone for delayed re-runs
//! - `Caster`: casting entity, its pool and equipment modifiers
//! - `ResourcePool`: host-owned mana/burnout storage contract

mod caster;
mod data;

pub use caster::{Caster, FailureSignal, ManaPool, ResourcePool, SharedPool};
pub use data::{ScheduledTick, SpellData};
