use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::rocket::FlightConfiguration;
use crate::components::{AerodynamicForces, FlightConditions};
use crate::systems::aerodynamics::calculator::AerodynamicCalculator;
use crate::utils::AeroResult;

/// One Mach / angle-of-attack evaluation point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub mach: f64,
    /// Angle of attack in radians
    pub aoa: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub point: SweepPoint,
    pub forces: AerodynamicForces,
}

/// Every combination of the given Mach numbers and angles of attack, Mach-major.
pub fn grid(machs: &[f64], aoas: &[f64]) -> Vec<SweepPoint> {
    machs
        .iter()
        .flat_map(|&mach| aoas.iter().map(move |&aoa| SweepPoint { mach, aoa }))
        .collect()
}

fn evaluate(
    calculator: &mut AerodynamicCalculator,
    configuration: &FlightConfiguration,
    template: &FlightConditions,
    point: &SweepPoint,
) -> AeroResult<SweepResult> {
    let mut conditions = template.clone();
    conditions.set_mach(point.mach);
    conditions.set_aoa(point.aoa);
    let forces = calculator.aerodynamic_forces(configuration, &conditions, None)?;
    Ok(SweepResult { point: *point, forces })
}

/// Evaluate vehicle forces at every point in parallel.
///
/// Each worker thread gets its own calculator from
/// [`AerodynamicCalculator::new_instance`]; results keep the order of `points`.
pub fn sweep(
    calculator: &AerodynamicCalculator,
    configuration: &FlightConfiguration,
    template: &FlightConditions,
    points: &[SweepPoint],
) -> AeroResult<Vec<SweepResult>> {
    points
        .par_iter()
        .map_init(
            || calculator.new_instance(),
            |calc, point| evaluate(calc, configuration, template, point),
        )
        .collect()
}

/// Sequential counterpart of [`sweep`] on a single calculator.
pub fn sweep_sequential(
    calculator: &mut AerodynamicCalculator,
    configuration: &FlightConfiguration,
    template: &FlightConditions,
    points: &[SweepPoint],
) -> AeroResult<Vec<SweepResult>> {
    points
        .iter()
        .map(|point| evaluate(calculator, configuration, template, point))
        .collect()
}
