//! Module registry
//!
//! The registry owns every module of the current scenario, keyed by id.

use std::collections::BTreeMap;

use crate::module::{Module, ModuleInstance};
use crate::moves::{ModuleId, Move};

/// All modules of a scenario, iterated in id order
#[derive(Clone, Debug, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<ModuleId, Module>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module, returning the one it replaced (if any)
    pub fn insert(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.id, module)
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: ModuleId) -> bool {
        self.modules.contains_key(&id)
    }

    /// Number of modules
    #[inline]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Drop every module
    pub fn clear(&mut self) {
        self.modules.clear();
    }

    /// Iterate over modules in id order
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.values_mut()
    }

    /// Show `mv` on its mover at progress `pct`
    ///
    /// Returns `false` if the mover is not registered. This runs every frame,
    /// so the miss is only logged at debug level.
    pub fn animate(&mut self, mv: &Move, pct: f32) -> bool {
        match self.modules.get_mut(&mv.mover_id()) {
            Some(module) => {
                module.animate(mv, pct);
                true
            }
            None => {
                log::debug!("No module {} to animate", mv.mover_id());
                false
            }
        }
    }

    /// Commit `mv` on its mover
    ///
    /// Returns `false` (with a warning) if the mover is not registered.
    pub fn finish(&mut self, mv: &Move) -> bool {
        match self.modules.get_mut(&mv.mover_id()) {
            Some(module) => {
                module.finish(mv);
                true
            }
            None => {
                log::warn!("Move references unknown module {} -- skipped", mv.mover_id());
                false
            }
        }
    }

    /// Check whether any module changed since the last [`clear_all_dirty`](Self::clear_all_dirty)
    pub fn has_dirty(&self) -> bool {
        self.modules.values().any(Module::is_dirty)
    }

    pub fn clear_all_dirty(&mut self) {
        for module in self.modules.values_mut() {
            module.clear_dirty();
        }
    }

    /// Instance data for every module, in id order
    pub fn instances(&self) -> Vec<ModuleInstance> {
        self.modules.values().map(Module::instance).collect()
    }
}

impl FromIterator<Module> for ModuleRegistry {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        let mut registry = Self::new();
        for module in iter {
            registry.insert(module);
        }
        registry
    }
}
