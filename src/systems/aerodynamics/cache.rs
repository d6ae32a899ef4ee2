use tracing::debug;

use crate::components::rocket::FlightConfiguration;
use crate::components::ModId;

/// Last observed change tokens of a configuration.
///
/// A calculator compares these against the configuration on every entry
/// point and discards all derived state when either token moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTracker {
    structure: ModId,
    aero: ModId,
    generation: u64,
}

impl Default for CacheTracker {
    fn default() -> Self {
        Self {
            structure: ModId::INVALID,
            aero: ModId::INVALID,
            generation: 0,
        }
    }
}

impl CacheTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the configuration's tokens; returns `true` when the cache must be reset.
    pub fn check(&mut self, configuration: &FlightConfiguration) -> bool {
        let structure = configuration.structure_mod_id();
        let aero = configuration.aero_mod_id();
        if structure == self.structure && aero == self.aero {
            return false;
        }

        self.structure = structure;
        self.aero = aero;
        self.generation += 1;
        debug!(
            generation = self.generation,
            structure = %structure,
            aero = %aero,
            "aerodynamic cache invalidated"
        );
        true
    }

    /// Forget the observed tokens so the next check invalidates.
    pub fn reset(&mut self) {
        self.structure = ModId::INVALID;
        self.aero = ModId::INVALID;
    }

    /// Number of invalidations seen so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
