//! Discrete-tick scheduler.
//!
//! The host calls [`SpellTicker::tick`] once per game tick. Modules request
//! delayed or repeating execution through `SpellData::schedule`; the ticker
//! picks those requests up after each cast and each tick.

mod scheduler;

pub use scheduler::{SpellTicker, TickId};
