//! Engine configuration.
//!
//! Hosts configure the engine once at startup with an `EngineConfig` and
//! share it (as `Arc<EngineConfig>`) between the `SpellBuilder` and every
//! `SpellData` they create.
//!
//! ```
//! use rust_spell::core::{EngineConfig, TaxPolicy};
//!
//! let config = EngineConfig::new()
//!     .with_burnout_limit(0.25)
//!     .with_tax_policy(TaxPolicy::ClampAtZero);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.tax_policy, TaxPolicy::ClampAtZero);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SpellError;

/// What taxation does when the caster cannot pay the full mana drain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxPolicy {
    /// Debit the full drain anyway; the pool may go negative.
    #[default]
    DebitPastZero,
    /// Debit at most the mana the caster has; the pool bottoms out at zero.
    ClampAtZero,
}

/// Engine-wide tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Burnout fraction at which output starts being dampened. In `[0, 1)`.
    pub burnout_limit: f64,

    /// Taxation behaviour on insufficient mana.
    pub tax_policy: TaxPolicy,

    /// Log every compile-time modifier application.
    pub debug_info: bool,
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the burnout limit.
    #[must_use]
    pub fn with_burnout_limit(mut self, limit: f64) -> Self {
        self.burnout_limit = limit;
        self
    }

    /// Set the taxation policy.
    #[must_use]
    pub fn with_tax_policy(mut self, policy: TaxPolicy) -> Self {
        self.tax_policy = policy;
        self
    }

    /// Enable or disable modifier folding logs.
    #[must_use]
    pub fn with_debug_info(mut self, enabled: bool) -> Self {
        self.debug_info = enabled;
        self
    }

    /// Check that every value is within its allowed range.
    pub fn validate(&self) -> Result<(), SpellError> {
        if !(0.0..1.0).contains(&self.burnout_limit) {
            return Err(SpellError::InvalidConfig(format!(
                "burnout_limit must be in [0, 1), got {}",
                self.burnout_limit
            )));
        }
        Ok(())
    }

    /// Parse a JSON configuration. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SpellError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SpellError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            burnout_limit: 0.5,
            tax_policy: TaxPolicy::default(),
            debug_info: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.burnout_limit, 0.5);
        assert_eq!(config.tax_policy, TaxPolicy::DebitPastZero);
        assert!(!config.debug_info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_burnout_limit(0.75)
            .with_debug_info(true);

        assert_eq!(config.burnout_limit, 0.75);
        assert!(config.debug_info);
    }

    #[test]
    fn test_invalid_burnout_limit() {
        assert!(EngineConfig::new().with_burnout_limit(1.0).validate().is_err());
        assert!(EngineConfig::new().with_burnout_limit(-0.1).validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{ "tax_policy": "ClampAtZero" }"#).unwrap();
        assert_eq!(config.tax_policy, TaxPolicy::ClampAtZero);
        assert_eq!(config.burnout_limit, 0.5);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "burnout_limit": 2.0 }"#),
            Err(SpellError::InvalidConfig(_))
        ));
        assert!(EngineConfig::from_json("not json").is_err());
    }
}
