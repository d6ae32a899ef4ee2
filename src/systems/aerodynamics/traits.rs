use std::collections::BTreeMap;

use crate::components::rocket::{ComponentId, FlightConfiguration};
use crate::components::{AerodynamicForces, Coordinate, FlightConditions, WarningSink};
use crate::systems::aerodynamics::drag::axial_cd;
use crate::utils::AeroResult;

/// Forces of every active aerodynamic component and every assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForceBreakdown {
    pub components: BTreeMap<ComponentId, AerodynamicForces>,
    pub assemblies: BTreeMap<ComponentId, AerodynamicForces>,
}

impl ForceBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record of a component or assembly.
    pub fn get(&self, id: ComponentId) -> Option<&AerodynamicForces> {
        self.components.get(&id).or_else(|| self.assemblies.get(&id))
    }
}

/// Provider of normal forces, moments, CP and damping.
pub trait StabilityCalculator: Send + Sync {
    /// Independent calculator of the same kind with an empty cache.
    fn new_instance(&self) -> Box<dyn StabilityCalculator>;

    /// Vehicle totals of the non-axial coefficients.
    fn non_axial_forces(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: &mut dyn WarningSink,
    ) -> AeroResult<AerodynamicForces>;

    fn cp(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: &mut dyn WarningSink,
    ) -> AeroResult<Coordinate> {
        Ok(self.non_axial_forces(configuration, conditions, warnings)?.cp())
    }

    /// Non-axial coefficients per component and per assembly.
    fn force_analysis(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        warnings: &mut dyn WarningSink,
    ) -> AeroResult<ForceBreakdown>;

    /// Store pitch and yaw damping moments in `total` and update the stall margin.
    fn damping_moments(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        total: &mut AerodynamicForces,
    ) -> AeroResult<()>;

    /// Stall margin from the most recent damping evaluation, in radians.
    fn stall_margin(&self) -> f64;

    fn check_geometry(&mut self, configuration: &FlightConfiguration, warnings: &mut dyn WarningSink);

    fn void_cache(&mut self);
}

/// Provider of drag coefficients.
pub trait DragCalculator: Send + Sync {
    fn new_instance(&self) -> Box<dyn DragCalculator>;

    /// Fill the drag split, CD and axial CD of `total`, and of the breakdown
    /// records when one is given.
    fn calculate_drag(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        breakdown: Option<&mut ForceBreakdown>,
        total: &mut AerodynamicForces,
        warnings: &mut dyn WarningSink,
    ) -> AeroResult<()>;

    /// Convert a drag coefficient to the axial force coefficient.
    fn axial_cd(&self, conditions: &FlightConditions, cd: f64) -> f64 {
        axial_cd(conditions.aoa(), cd)
    }

    fn void_cache(&mut self);
}
