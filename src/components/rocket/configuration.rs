use std::collections::BTreeSet;
use tracing::debug;

use super::component::{ComponentId, RocketComponent};
use super::tree::Rocket;
use crate::components::{ModId, Transformation};
use crate::utils::{disk_area, AeroError, AeroResult, DEFAULT_REFERENCE_LENGTH, EPSILON};

/// Every physical copy of one active component.
#[derive(Debug, Clone)]
pub struct ComponentInstances {
    pub component: ComponentId,
    pub transforms: Vec<Transformation>,
}

/// A rocket together with the set of stages active in this flight.
#[derive(Debug, Clone)]
pub struct FlightConfiguration {
    rocket: Rocket,
    inactive_stages: BTreeSet<ComponentId>,
    stage_mod_id: ModId,
}

impl FlightConfiguration {
    /// Configuration with every stage active.
    pub fn new(rocket: Rocket) -> Self {
        Self {
            rocket,
            inactive_stages: BTreeSet::new(),
            stage_mod_id: ModId::new(),
        }
    }

    pub fn rocket(&self) -> &Rocket {
        &self.rocket
    }

    /// Mutable access to the rocket; its own change tokens track edits.
    pub fn rocket_mut(&mut self) -> &mut Rocket {
        &mut self.rocket
    }

    pub fn component(&self, id: ComponentId) -> AeroResult<&RocketComponent> {
        self.rocket.get(id)
    }

    /// Token covering the tree structure and stage activation.
    pub fn structure_mod_id(&self) -> ModId {
        self.rocket.tree_mod_id().max(self.stage_mod_id)
    }

    /// Token covering aerodynamically relevant component properties.
    pub fn aero_mod_id(&self) -> ModId {
        self.rocket.aero_mod_id()
    }

    pub fn set_stage_active(&mut self, stage: ComponentId, active: bool) -> AeroResult<()> {
        if !self.rocket.get(stage)?.is_stage() {
            return Err(AeroError::UnknownComponent(stage));
        }
        let changed = if active {
            self.inactive_stages.remove(&stage)
        } else {
            self.inactive_stages.insert(stage)
        };
        if changed {
            debug!(%stage, active, "stage activation changed");
            self.stage_mod_id = ModId::new();
        }
        Ok(())
    }

    pub fn is_stage_active(&self, stage: ComponentId) -> bool {
        !self.inactive_stages.contains(&stage)
    }

    /// A component is active when its nearest enclosing stage is.
    pub fn is_component_active(&self, id: ComponentId) -> bool {
        match self.rocket.stage_of(id) {
            Some(stage) => self.is_stage_active(stage),
            None => true,
        }
    }

    pub fn all_components(&self) -> Vec<ComponentId> {
        self.rocket.ids()
    }

    pub fn active_components(&self) -> Vec<ComponentId> {
        self.rocket
            .ids()
            .into_iter()
            .filter(|&id| self.is_component_active(id))
            .collect()
    }

    /// Active components with the transforms of each of their instances, in tree order.
    pub fn active_instances(&self) -> Vec<ComponentInstances> {
        self.active_components()
            .into_iter()
            .map(|component| ComponentInstances {
                component,
                transforms: self.rocket.instance_transforms(component),
            })
            .collect()
    }

    pub fn instance_count(&self, id: ComponentId) -> usize {
        self.rocket.instance_transforms(id).len()
    }

    fn active_bodies(&self) -> impl Iterator<Item = (ComponentId, &RocketComponent)> + '_ {
        self.active_components().into_iter().filter_map(move |id| {
            self.rocket
                .component(id)
                .filter(|c| c.is_symmetric())
                .map(|c| (id, c))
        })
    }

    /// Maximum body diameter, or a unit length when there are no bodies.
    pub fn reference_length(&self) -> f64 {
        let diameter = self
            .active_bodies()
            .filter_map(|(_, c)| c.profile())
            .map(|p| 2.0 * p.max_radius())
            .fold(0.0, f64::max);
        if diameter < EPSILON {
            DEFAULT_REFERENCE_LENGTH
        } else {
            diameter
        }
    }

    pub fn reference_area(&self) -> f64 {
        disk_area(self.reference_length() / 2.0)
    }

    /// Axial extent of the active body components.
    pub fn aerodynamic_length(&self) -> f64 {
        let mut min_x = f64::MAX;
        let mut max_x = f64::MIN;
        for (id, component) in self.active_bodies() {
            let x = self.rocket.absolute_x(id);
            let length = component.own_length().unwrap_or(0.0);
            min_x = min_x.min(x);
            max_x = max_x.max(x + length);
        }
        if max_x < min_x {
            0.0
        } else {
            max_x - min_x
        }
    }
}
