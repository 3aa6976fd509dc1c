//! Attribute resolution and resource taxation.
//!
//! Values flow through a fixed pipeline:
//!
//! 1. decode the canonical snapshot value
//! 2. clamp to the module's declared range (the *true* value)
//! 3. apply per-cast modifiers from the casting context
//! 4. multiply by the caster's burnout penalty
//! 5. multiply by the ring's power multiplier (a true value)
//!
//! Multiplier attributes are always read as true values so they never scale
//! themselves.

use tracing::debug;

use super::node::Ring;
use crate::attributes::AttributeId;
use crate::context::SpellData;
use crate::core::TaxPolicy;

impl Ring {
    /// Snapshot value clamped to the declared range.
    ///
    /// Zero if the ring has no module or the module does not declare the
    /// attribute.
    #[must_use]
    pub fn true_value(&self, attribute: &AttributeId) -> f64 {
        let Some(range) = self.range(attribute) else {
            return 0.0;
        };
        let raw = self
            .information
            .get(attribute)
            .map_or(range.base, |value| value.to_f64());
        range.clamp(raw)
    }

    /// Fully resolved value for use during a cast.
    #[must_use]
    pub fn effective_value(&self, attribute: &AttributeId, data: &SpellData) -> f64 {
        if self.range(attribute).is_none() {
            return 0.0;
        }
        let value = data.cast_time_value(attribute, self.true_value(attribute));
        value * data.burnout_penalty() * self.power_multiplier()
    }

    /// True value of a multiplier attribute, 1.0 when undeclared.
    fn multiplier(&self, attribute: &AttributeId) -> f64 {
        if self.range(attribute).is_some() {
            self.true_value(attribute)
        } else {
            1.0
        }
    }

    #[must_use]
    pub fn power_multiplier(&self) -> f64 {
        self.multiplier(&AttributeId::POWER_MULTI)
    }

    #[must_use]
    pub fn mana_multiplier(&self) -> f64 {
        self.multiplier(&AttributeId::MANA_MULTI)
    }

    #[must_use]
    pub fn burnout_multiplier(&self) -> f64 {
        self.multiplier(&AttributeId::BURNOUT_MULTI)
    }

    /// Cooldown in whole ticks.
    #[must_use]
    pub fn cooldown_ticks(&self) -> u32 {
        self.true_value(&AttributeId::COOLDOWN) as u32
    }

    /// Charge-up time in whole ticks.
    #[must_use]
    pub fn charge_up_ticks(&self) -> u32 {
        self.true_value(&AttributeId::CHARGEUP) as u32
    }

    /// Debit the caster's pool for this ring.
    ///
    /// Drains `mana * multiplier` and fills `burnout * multiplier` in a single
    /// locked section. The debit happens even when mana is insufficient; the
    /// configured [`TaxPolicy`] decides whether mana may go negative. Returns
    /// whether the caster could afford the cost. A context without a caster
    /// cannot pay and is left untouched.
    pub fn tax(&self, data: &SpellData, multiplier: f64, fail_signal: bool) -> bool {
        let Some(caster) = data.caster() else {
            return false;
        };

        let mana = self.effective_value(&AttributeId::MANA, data) * multiplier;
        let burnout = self.effective_value(&AttributeId::BURNOUT, data) * multiplier;

        let insufficient = {
            let mut pool = caster.pool().lock();
            let current = pool.current_mana();
            let insufficient = current < mana;

            let debit = match data.config().tax_policy {
                TaxPolicy::DebitPastZero => mana,
                TaxPolicy::ClampAtZero => mana.min(current.max(0.0)),
            };
            pool.remove_mana(debit);
            pool.add_burnout(burnout);
            insufficient
        };

        if insufficient {
            debug!(
                caster = %caster.id(),
                ring = self.readable_name(),
                mana,
                "caster could not afford ring"
            );
            if fail_signal {
                data.signal_failure();
            }
        }

        !insufficient
    }
}
