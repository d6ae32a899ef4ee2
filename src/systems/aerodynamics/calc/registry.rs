use std::collections::HashMap;
use tracing::debug;

use super::ComponentCalc;
use crate::components::rocket::{ComponentId, FlightConfiguration};
use crate::utils::{AeroError, AeroResult};

/// Strategies of every aerodynamic component and assembly in a rocket.
#[derive(Debug, Clone, Default)]
pub struct CalcMap {
    calcs: HashMap<ComponentId, ComponentCalc>,
}

impl CalcMap {
    pub fn build(configuration: &FlightConfiguration) -> Self {
        let rocket = configuration.rocket();
        let calcs = configuration
            .all_components()
            .into_iter()
            .filter_map(|id| ComponentCalc::build(rocket, id).map(|calc| (id, calc)))
            .collect();
        Self { calcs }
    }

    pub fn get(&self, id: ComponentId) -> Option<&ComponentCalc> {
        self.calcs.get(&id)
    }

    /// Strategy of a component that must have one.
    pub fn require(&self, configuration: &FlightConfiguration, id: ComponentId) -> AeroResult<&ComponentCalc> {
        self.calcs.get(&id).ok_or_else(|| AeroError::MissingStrategy {
            id,
            name: configuration
                .rocket()
                .component(id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
        })
    }

    pub fn len(&self) -> usize {
        self.calcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calcs.is_empty()
    }
}

/// Lazily built strategy map, discarded whenever the rocket changes.
#[derive(Debug, Clone, Default)]
pub struct CalcRegistry {
    map: Option<CalcMap>,
    builds: usize,
}

impl CalcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy map for the configuration, built on first use after a reset.
    pub fn ensure(&mut self, configuration: &FlightConfiguration) -> &CalcMap {
        let builds = &mut self.builds;
        self.map.get_or_insert_with(|| {
            *builds += 1;
            let map = CalcMap::build(configuration);
            debug!(strategies = map.len(), build = *builds, "built component strategies");
            map
        })
    }

    pub fn clear(&mut self) {
        self.map = None;
    }

    pub fn is_built(&self) -> bool {
        self.map.is_some()
    }

    /// Number of times the map has been built.
    pub fn builds(&self) -> usize {
        self.builds
    }
}
