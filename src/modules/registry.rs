//! Module lookup for stored compositions.
//!
//! Deserializing a ring tag only yields a module id. Hosts supply a
//! [`ModuleLookup`] that turns the id back into a live module; the engine
//! ships [`ModuleRegistry`] as a plain map-backed implementation.

use rustc_hash::FxHashMap;

use super::ModuleHandle;
use crate::error::SpellError;

/// Resolves module ids to modules.
pub trait ModuleLookup {
    /// Find a module by id.
    fn module(&self, id: &str) -> Option<ModuleHandle>;
}

impl<F> ModuleLookup for F
where
    F: Fn(&str) -> Option<ModuleHandle>,
{
    fn module(&self, id: &str) -> Option<ModuleHandle> {
        self(id)
    }
}

/// Map-backed module registry.
///
/// ```
/// use std::sync::Arc;
/// use rust_spell::modules::{BasicModule, ModuleLookup, ModuleRegistry};
///
/// let mut registry = ModuleRegistry::new();
/// registry.register(Arc::new(BasicModule::new("shape_self"))).unwrap();
///
/// assert!(registry.module("shape_self").is_some());
/// assert!(registry.module("shape_cone").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModuleRegistry {
    modules: FxHashMap<String, ModuleHandle>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module under its own id. Fails if the id is taken.
    pub fn register(&mut self, module: ModuleHandle) -> Result<(), SpellError> {
        let id = module.id().to_string();
        if self.modules.contains_key(&id) {
            return Err(SpellError::DuplicateModule(id));
        }
        self.modules.insert(id, module);
        Ok(())
    }

    /// Get a module by id, failing with `UnknownModule`.
    pub fn get(&self, id: &str) -> Result<ModuleHandle, SpellError> {
        self.modules
            .get(id)
            .cloned()
            .ok_or_else(|| SpellError::UnknownModule(id.to_string()))
    }

    /// Check if a module id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Get the number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleLookup for ModuleRegistry {
    fn module(&self, id: &str) -> Option<ModuleHandle> {
        self.modules.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::modules::BasicModule;

    #[test]
    fn test_register_and_get() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(BasicModule::new("effect_burn"))).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("effect_burn"));
        assert_eq!(registry.get("effect_burn").unwrap().id(), "effect_burn");
        assert!(matches!(registry.get("effect_freeze"), Err(SpellError::UnknownModule(_))));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(BasicModule::new("a"))).unwrap();
        let err = registry.register(Arc::new(BasicModule::new("a"))).unwrap_err();
        assert!(matches!(err, SpellError::DuplicateModule(id) if id == "a"));
    }

    #[test]
    fn test_closure_lookup() {
        let module: ModuleHandle = Arc::new(BasicModule::new("only"));
        let lookup = move |id: &str| (id == "only").then(|| module.clone());

        assert!(lookup.module("only").is_some());
        assert!(lookup.module("other").is_none());
    }
}
