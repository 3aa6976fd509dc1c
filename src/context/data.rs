//! Casting context.
//!
//! `SpellData` travels down a chain walk. It carries the caster, the cast
//! origin, the active cast-time modifiers, and schedule requests made by
//! modules. It uses `im` collections so the ticker can snapshot it per tick
//! in O(1).

use std::fmt;
use std::sync::Arc;

use im::{OrdMap, Vector};

use super::caster::{Caster, FailureSignal};
use crate::attributes::{fold_modifiers, AttributeId, AttributeModifier};
use crate::core::{EngineConfig, Point};
use crate::ring::{Ring, RingIndex};

/// A request from a module to be re-run by the ticker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    /// Ring to re-run (with its descendants).
    pub ring: RingIndex,
    /// Number of future ticks to run for.
    pub ticks: u32,
}

/// Per-cast context.
///
/// ## Example
///
/// ```
/// use rust_spell::context::{Caster, ManaPool, SpellData};
/// use rust_spell::core::{EntityId, Point};
///
/// let caster = Caster::new(EntityId::new(1), ManaPool::new(100.0, 100.0).shared());
/// let data = SpellData::default()
///     .with_caster(caster)
///     .with_origin(Point::new(0.0, 64.0, 0.0));
///
/// assert_eq!(data.caster().map(|c| c.id()), Some(EntityId::new(1)));
/// assert_eq!(data.burnout_penalty(), 1.0);
/// ```
#[derive(Clone)]
pub struct SpellData {
    config: Arc<EngineConfig>,
    caster: Option<Caster>,
    origin: Option<Point>,
    signal: Option<Arc<dyn FailureSignal>>,
    active: OrdMap<AttributeId, Vector<AttributeModifier>>,
    scheduled: Vector<ScheduledTick>,
}

impl SpellData {
    /// Create an empty context using `config`.
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            caster: None,
            origin: None,
            signal: None,
            active: OrdMap::new(),
            scheduled: Vector::new(),
        }
    }

    /// Set the caster (builder pattern).
    #[must_use]
    pub fn with_caster(mut self, caster: Caster) -> Self {
        self.caster = Some(caster);
        self
    }

    /// Set the cast origin (builder pattern).
    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Set the sink for failure cues (builder pattern).
    #[must_use]
    pub fn with_failure_signal(mut self, signal: Arc<dyn FailureSignal>) -> Self {
        self.signal = Some(signal);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn caster(&self) -> Option<&Caster> {
        self.caster.as_ref()
    }

    #[must_use]
    pub fn origin(&self) -> Option<Point> {
        self.origin
    }

    /// Activate the caster's modifiers relevant to `ring`.
    ///
    /// Replaces whatever the previous ring activated: a modifier is active
    /// only if the ring's module declares its attribute.
    pub fn process_cast_time_modifiers(&mut self, ring: &Ring) {
        self.active = OrdMap::new();

        let (Some(caster), Some(module)) = (&self.caster, ring.module()) else {
            return;
        };
        let declared = module.attribute_ranges();

        for modifier in caster.modifiers() {
            if !declared.contains_key(modifier.attribute()) {
                continue;
            }
            match self.active.get_mut(modifier.attribute()) {
                Some(active) => active.push_back(modifier.clone()),
                None => {
                    self.active
                        .insert(modifier.attribute().clone(), Vector::unit(modifier.clone()));
                }
            }
        }
    }

    /// Modifiers currently active for an attribute.
    #[must_use]
    pub fn active_modifiers(&self, attribute: &AttributeId) -> Vec<AttributeModifier> {
        self.active
            .get(attribute)
            .map(|mods| mods.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Apply active cast-time modifiers to `base`.
    ///
    /// Uses the same operation order and tie-break as compile-time folding.
    #[must_use]
    pub fn cast_time_value(&self, attribute: &AttributeId, base: f64) -> f64 {
        let Some(modifiers) = self.active.get(attribute) else {
            return base;
        };
        let seed = [(attribute.clone(), base)].into_iter().collect();
        fold_modifiers(seed, modifiers.iter())
            .get(attribute)
            .copied()
            .unwrap_or(base)
    }

    /// Output dampening from the caster's burnout.
    ///
    /// 1.0 unless the caster channels burnout; then it falls linearly from 1
    /// at `burnout_limit` of the meter to 0 at a full meter, and stays at 0
    /// past it.
    #[must_use]
    pub fn burnout_penalty(&self) -> f64 {
        let Some(caster) = self.caster.as_ref().filter(|c| c.channels_burnout()) else {
            return 1.0;
        };

        let (burnout, max) = {
            let pool = caster.pool().lock();
            (pool.current_burnout(), pool.max_burnout())
        };
        if max <= 0.0 {
            return 1.0;
        }

        let limit = self.config.burnout_limit;
        let fill = burnout / max;
        (1.0 - (fill - limit) / (1.0 - limit)).clamp(0.0, 1.0)
    }

    /// Emit the failure cue at the cast origin, if there is one.
    pub fn signal_failure(&self) {
        if let (Some(signal), Some(origin)) = (&self.signal, self.origin) {
            signal.spell_failed(origin);
        }
    }

    /// Ask the ticker to re-run `ring` for `ticks` ticks.
    pub fn schedule(&mut self, ring: RingIndex, ticks: u32) {
        self.scheduled.push_back(ScheduledTick { ring, ticks });
    }

    /// Drain schedule requests.
    pub fn take_scheduled(&mut self) -> Vec<ScheduledTick> {
        std::mem::take(&mut self.scheduled).into_iter().collect()
    }
}

impl Default for SpellData {
    fn default() -> Self {
        Self::new(Arc::new(EngineConfig::default()))
    }
}

impl fmt::Debug for SpellData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpellData")
            .field("caster", &self.caster)
            .field("origin", &self.origin)
            .field("active", &self.active)
            .field("scheduled", &self.scheduled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::context::ManaPool;
    use crate::core::EntityId;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Point>>);

    impl FailureSignal for Recorder {
        fn spell_failed(&self, origin: Point) {
            self.0.lock().push(origin);
        }
    }

    fn caster_with_burnout(burnout: f64, max: f64) -> Caster {
        let pool = ManaPool::new(100.0, max).with_burnout(burnout).shared();
        Caster::new(EntityId::new(1), pool).channeling_burnout()
    }

    #[test]
    fn test_burnout_penalty_without_halo() {
        let pool = ManaPool::new(100.0, 100.0).with_burnout(90.0).shared();
        let data = SpellData::default().with_caster(Caster::new(EntityId::new(1), pool));
        assert_eq!(data.burnout_penalty(), 1.0);
    }

    #[test]
    fn test_burnout_penalty_curve() {
        let below = SpellData::default().with_caster(caster_with_burnout(25.0, 100.0));
        assert_eq!(below.burnout_penalty(), 1.0);

        let half_way = SpellData::default().with_caster(caster_with_burnout(75.0, 100.0));
        assert_eq!(half_way.burnout_penalty(), 0.5);

        let full = SpellData::default().with_caster(caster_with_burnout(100.0, 100.0));
        assert_eq!(full.burnout_penalty(), 0.0);
    }

    #[test]
    fn test_burnout_penalty_overfull_meter() {
        let data = SpellData::default().with_caster(caster_with_burnout(150.0, 100.0));
        assert_eq!(data.burnout_penalty(), 0.0);
    }

    #[test]
    fn test_burnout_penalty_zero_max() {
        let data = SpellData::default().with_caster(caster_with_burnout(5.0, 0.0));
        assert_eq!(data.burnout_penalty(), 1.0);
    }

    #[test]
    fn test_cast_time_value_without_modifiers() {
        let data = SpellData::default();
        assert_eq!(data.cast_time_value(&AttributeId::MANA, 12.0), 12.0);
    }

    #[test]
    fn test_failure_signal_needs_origin() {
        let recorder = Arc::new(Recorder::default());
        let data = SpellData::default().with_failure_signal(recorder.clone());
        data.signal_failure();
        assert!(recorder.0.lock().is_empty());

        let data = data.with_origin(Point::new(1.0, 2.0, 3.0));
        data.signal_failure();
        assert_eq!(*recorder.0.lock(), vec![Point::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_schedule_and_drain() {
        let mut data = SpellData::default();
        data.schedule(RingIndex::new(1), 5);
        data.schedule(RingIndex::new(2), 1);

        let snapshot = data.clone();
        let drained = data.take_scheduled();

        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], ScheduledTick { ring: RingIndex::new(1), ticks: 5 });
        assert!(data.take_scheduled().is_empty());
        // Clones keep their own queue.
        assert_eq!(snapshot.clone().take_scheduled().len(), 2);
    }
}
