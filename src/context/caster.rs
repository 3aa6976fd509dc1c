//! Casters and their resource pools.
//!
//! Pool storage belongs to the host. The engine only needs the read/mutate
//! contract in [`ResourcePool`] and takes the pool's lock for exactly one
//! read-then-mutate section per tax.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::attributes::AttributeModifier;
use crate::core::{EntityId, Point};

/// Read/mutate contract of a caster's mana and burnout.
pub trait ResourcePool: Send {
    fn current_mana(&self) -> f64;
    fn remove_mana(&mut self, amount: f64);
    fn add_burnout(&mut self, amount: f64);
    fn current_burnout(&self) -> f64;
    fn max_burnout(&self) -> f64;
}

/// A pool shared between casts. Lock it to read or mutate.
pub type SharedPool = Arc<Mutex<Box<dyn ResourcePool>>>;

/// Plain in-memory pool. Values are not clamped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManaPool {
    pub mana: f64,
    pub burnout: f64,
    pub max_burnout: f64,
}

impl ManaPool {
    /// Create a pool with the given mana and an empty burnout meter.
    #[must_use]
    pub fn new(mana: f64, max_burnout: f64) -> Self {
        Self {
            mana,
            burnout: 0.0,
            max_burnout,
        }
    }

    /// Set the current burnout (builder pattern).
    #[must_use]
    pub fn with_burnout(mut self, burnout: f64) -> Self {
        self.burnout = burnout;
        self
    }

    /// Wrap into a lockable shared pool.
    #[must_use]
    pub fn shared(self) -> SharedPool {
        let pool: Box<dyn ResourcePool> = Box::new(self);
        Arc::new(Mutex::new(pool))
    }
}

impl ResourcePool for ManaPool {
    fn current_mana(&self) -> f64 {
        self.mana
    }

    fn remove_mana(&mut self, amount: f64) {
        self.mana -= amount;
    }

    fn add_burnout(&mut self, amount: f64) {
        self.burnout += amount;
    }

    fn current_burnout(&self) -> f64 {
        self.burnout
    }

    fn max_burnout(&self) -> f64 {
        self.max_burnout
    }
}

/// Receives the audible/visual cue for a failed cast.
pub trait FailureSignal: Send + Sync {
    fn spell_failed(&self, origin: Point);
}

/// The entity casting a spell.
///
/// `modifiers` are cast-time adjustments from the caster's equipment; they
/// are activated per ring by `SpellData::process_cast_time_modifiers`.
#[derive(Clone)]
pub struct Caster {
    id: EntityId,
    pool: SharedPool,
    channels_burnout: bool,
    modifiers: Arc<[AttributeModifier]>,
}

impl Caster {
    /// Create a caster drawing on `pool`.
    #[must_use]
    pub fn new(id: EntityId, pool: SharedPool) -> Self {
        Self {
            id,
            pool,
            channels_burnout: false,
            modifiers: Arc::from(Vec::new()),
        }
    }

    /// Let burnout dampen this caster's output (a worn halo).
    #[must_use]
    pub fn channeling_burnout(mut self) -> Self {
        self.channels_burnout = true;
        self
    }

    /// Set equipment-derived cast-time modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = AttributeModifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn pool(&self) -> &SharedPool {
        &self.pool
    }

    #[must_use]
    pub fn channels_burnout(&self) -> bool {
        self.channels_burnout
    }

    #[must_use]
    pub fn modifiers(&self) -> &[AttributeModifier] {
        &self.modifiers
    }
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caster")
            .field("id", &self.id)
            .field("channels_burnout", &self.channels_burnout)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mana_pool() {
        let mut pool = ManaPool::new(50.0, 100.0);
        pool.remove_mana(20.0);
        pool.add_burnout(5.0);

        assert_eq!(pool.current_mana(), 30.0);
        assert_eq!(pool.current_burnout(), 5.0);
        assert_eq!(pool.max_burnout(), 100.0);
    }

    #[test]
    fn test_shared_pool_mutation_visible() {
        let pool = ManaPool::new(10.0, 10.0).shared();
        let caster = Caster::new(EntityId::new(1), pool.clone());

        caster.pool().lock().remove_mana(4.0);

        assert_eq!(pool.lock().current_mana(), 6.0);
    }

    #[test]
    fn test_caster_builder() {
        let caster = Caster::new(EntityId::new(3), ManaPool::default().shared())
            .channeling_burnout()
            .with_modifiers([AttributeModifier::add("mana", -1.0)]);

        assert_eq!(caster.id(), EntityId::new(3));
        assert!(caster.channels_burnout());
        assert_eq!(caster.modifiers().len(), 1);
    }
}
