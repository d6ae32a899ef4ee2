//! Per-component physics strategies.

mod fin_set;
mod nose_pressure;
mod registry;
mod symmetric;
mod tube_fin_set;

pub use fin_set::FinSetCalc;
pub use nose_pressure::nose_pressure_interpolator;
pub use registry::{CalcMap, CalcRegistry};
pub use symmetric::SymmetricCalc;
pub use tube_fin_set::TubeFinSetCalc;

use crate::components::rocket::{ComponentId, Rocket};
use crate::components::{AerodynamicForces, Coordinate, FlightConditions, Transformation, WarningSink};

/// Strategy computing the contribution of one component kind.
#[derive(Debug, Clone)]
pub enum ComponentCalc {
    Symmetric(SymmetricCalc),
    FinSet(FinSetCalc),
    TubeFinSet(TubeFinSetCalc),
    /// Rockets, stages and pod sets contribute nothing themselves
    Assembly,
}

impl ComponentCalc {
    /// Strategy for a component, `None` for components without aerodynamic effect.
    pub fn build(rocket: &Rocket, id: ComponentId) -> Option<Self> {
        let component = rocket.component(id)?;
        if let Some(fins) = component.fin_set() {
            return Some(ComponentCalc::FinSet(FinSetCalc::new(rocket, id, fins)));
        }
        if let Some(tubes) = component.tube_fin_set() {
            return Some(ComponentCalc::TubeFinSet(TubeFinSetCalc::new(rocket, id, tubes)));
        }
        if let Some(profile) = component.profile() {
            return Some(ComponentCalc::Symmetric(SymmetricCalc::new(id, component, profile)));
        }
        if component.is_assembly() {
            return Some(ComponentCalc::Assembly);
        }
        None
    }

    /// Non-axial forces of one instance in component-local coordinates.
    pub fn non_axial_forces(
        &self,
        conditions: &FlightConditions,
        transform: &Transformation,
        forces: &mut AerodynamicForces,
        warnings: &mut dyn WarningSink,
    ) {
        match self {
            ComponentCalc::Symmetric(calc) => calc.non_axial_forces(conditions, forces, warnings),
            ComponentCalc::FinSet(calc) => calc.non_axial_forces(conditions, transform, forces, warnings),
            ComponentCalc::TubeFinSet(calc) => calc.non_axial_forces(conditions, forces, warnings),
            ComponentCalc::Assembly => {
                forces.set_cp(Coordinate::ZERO);
                forces.set_cn(0.0);
                forces.set_cm(0.0);
                forces.set_c_side(0.0);
                forces.set_c_yaw(0.0);
                forces.set_c_roll(0.0);
                forces.set_c_roll_damp(0.0);
                forces.set_c_roll_force(0.0);
            }
        }
    }

    /// Friction drag of one instance given the component's skin friction coefficient.
    pub fn friction_cd(&self, conditions: &FlightConditions, cf: f64) -> f64 {
        match self {
            ComponentCalc::Symmetric(calc) => calc.friction_cd(conditions, cf),
            ComponentCalc::FinSet(calc) => calc.friction_cd(conditions, cf),
            ComponentCalc::TubeFinSet(calc) => calc.friction_cd(conditions, cf),
            ComponentCalc::Assembly => 0.0,
        }
    }

    /// Shape pressure drag of one instance, excluding body-joint annuli.
    pub fn pressure_cd(&self, conditions: &FlightConditions, stagnation_cd: f64, base_cd: f64) -> f64 {
        match self {
            ComponentCalc::Symmetric(calc) => calc.pressure_cd(conditions, stagnation_cd, base_cd),
            ComponentCalc::FinSet(calc) => calc.pressure_cd(conditions, stagnation_cd, base_cd),
            ComponentCalc::TubeFinSet(calc) => calc.pressure_cd(conditions, stagnation_cd, base_cd),
            ComponentCalc::Assembly => 0.0,
        }
    }

    pub fn as_fin_set(&self) -> Option<&FinSetCalc> {
        match self {
            ComponentCalc::FinSet(calc) => Some(calc),
            _ => None,
        }
    }
}
