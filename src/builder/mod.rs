//! Chain construction.
//!
//! `SpellBuilder` is the only way to turn raw modules and modifiers into a
//! usable chain. It validates the composition, canonicalizes every ring,
//! links parents and children, propagates colors from the leaf upward and
//! deduplicates the result through a [`RingCache`] keyed by canonical tag.
//!
//! ## Key Types
//!
//! - `SpellBuilder`: `compile`, `compile_linked`, `load`
//! - `PlacedModifier` / `RingLink`: raw inputs
//! - `RingCache`: one `Arc<SpellChain>` per canonical form

mod cache;
mod compiler;
mod link;

pub use cache::RingCache;
pub use compiler::SpellBuilder;
pub use link::{PlacedModifier, RingLink};
