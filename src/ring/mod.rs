//! Rings and spell chains.
//!
//! A spell is a chain of rings. Each ring wraps one module, its compile-time
//! modifiers and the canonical attribute snapshot those modifiers resolve
//! to. Chains are built once (by `SpellBuilder` or from a stored tag) and are
//! read-only afterwards, so a compiled chain can be shared behind an `Arc`.
//!
//! ## Key Types
//!
//! - `SpellChain`: arena of rings, root first; owns the forward links
//! - `Ring`: one link; the resolution pipeline and taxation live here
//! - `RingRef`: a ring plus its chain; parent/child navigation, the chain
//!   walk, overrides and the canonical tag
//! - `OverrideHandler`: per-chain index of module-provided overrides
//! - `RingTag`: canonical serialized form, used for persistence and caching

mod chain;
mod draft;
mod node;
mod overrides;
mod resolve;
mod tag;

pub use chain::{RingRef, SpellChain};
pub use node::{Ring, RingIndex};
pub use overrides::OverrideHandler;
pub use tag::{ModifierTag, RingTag};

pub(crate) use draft::ChainDraft;
