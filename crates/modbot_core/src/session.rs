//! Playback session
//!
//! A [`Session`] owns everything that belongs to the scenario on screen: the
//! module registry, the move sequence and the playback controller. Replacing
//! the scenario goes through [`Session::install`], which swaps all three at
//! once so no animation state survives from the old scenario.

use crate::module::ModuleInstance;
use crate::playback::{PlaybackController, PlaybackEvent};
use crate::registry::ModuleRegistry;
use crate::scenario::Scenario;
use crate::sequence::MoveSequence;

/// The scenario being played and its playback state
#[derive(Debug, Default)]
pub struct Session {
    scenario: Option<Scenario>,
    registry: ModuleRegistry,
    sequence: MoveSequence,
    pub playback: PlaybackController,
}

impl Session {
    /// Create an empty session driven by `playback`
    pub fn new(playback: PlaybackController) -> Self {
        Self {
            scenario: None,
            registry: ModuleRegistry::new(),
            sequence: MoveSequence::default(),
            playback,
        }
    }

    /// Replace the current scenario
    ///
    /// The active move is dropped, the old modules are destroyed and the new
    /// modules and moves are installed. Playback settings (speed,
    /// auto-animation) carry over.
    pub fn install(&mut self, scenario: Scenario) {
        self.playback.cancel();

        let previous = std::mem::replace(&mut self.registry, scenario.build_modules());
        if !previous.is_empty() {
            log::debug!("Dropped {} modules of the previous scenario", previous.len());
        }
        self.sequence = scenario.move_sequence();
        log::info!(
            "Installed scenario '{}' ({}): {} modules, {} moves",
            scenario.name,
            scenario.shape,
            self.registry.len(),
            self.sequence.total()
        );
        self.scenario = Some(scenario);
    }

    /// Advance playback by `dt` seconds
    pub fn update(&mut self, dt: f32) -> PlaybackEvent {
        self.playback.update(dt, &mut self.sequence, &mut self.registry)
    }

    /// The installed scenario, as loaded
    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.registry
    }

    pub fn sequence(&self) -> &MoveSequence {
        &self.sequence
    }

    /// Check whether every move has been played and nothing is in flight
    pub fn is_complete(&self) -> bool {
        self.sequence.is_finished() && !self.playback.is_animating()
    }

    /// Current module positions as a scenario without moves
    pub fn snapshot(&self) -> Option<Scenario> {
        self.scenario.as_ref().map(|s| s.snapshot(&self.registry))
    }

    /// Instance data for the renderer, if anything changed since the last call
    pub fn take_dirty_instances(&mut self) -> Option<Vec<ModuleInstance>> {
        if !self.registry.has_dirty() {
            return None;
        }
        let instances = self.registry.instances();
        self.registry.clear_all_dirty();
        Some(instances)
    }
}
