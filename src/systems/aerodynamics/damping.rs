use crate::components::rocket::FlightConfiguration;
use crate::components::FlightConditions;
use crate::systems::aerodynamics::calc::CalcMap;
use crate::utils::{pow2, pow3, AeroResult};

/// Body dimensions used by the pitch damping estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DampingGeometry {
    /// Planform-weighted mean body diameter
    pub mean_diameter: f64,
    /// Summed length of the active bodies
    pub length: f64,
}

impl DampingGeometry {
    pub fn measure(configuration: &FlightConfiguration) -> Self {
        let rocket = configuration.rocket();
        let (area, length) = configuration
            .active_components()
            .into_iter()
            .filter_map(|id| rocket.component(id)?.profile())
            .fold((0.0, 0.0), |(area, length), profile| {
                (area + profile.planform_area(), length + profile.length)
            });

        Self {
            mean_diameter: if length > 0.0 { area / length } else { 0.0 },
            length,
        }
    }
}

/// Damping moment coefficient per unit squared angular rate over velocity.
///
/// # Arguments
/// * `pivot_x` - Axial position the vehicle rotates about
/// * `max_fins` - Fins per set counted by the fin term
pub fn damping_multiplier(
    configuration: &FlightConfiguration,
    conditions: &FlightConditions,
    calcs: &CalcMap,
    geometry: &DampingGeometry,
    pivot_x: f64,
    max_fins: usize,
) -> AeroResult<f64> {
    let rocket = configuration.rocket();
    let reference = conditions.ref_area() * conditions.ref_length();

    let body = 0.275 * geometry.mean_diameter / reference
        * (pow2(pow2(pivot_x)) + pow2(pow2(geometry.length - pivot_x)));

    let mut fins = 0.0;
    for id in configuration.active_components() {
        let fin_set = match rocket.component(id).and_then(|c| c.fin_set()) {
            Some(fin_set) => fin_set,
            None => continue,
        };
        let midchord = match calcs.require(configuration, id)?.as_fin_set() {
            Some(calc) => rocket.absolute_x(id) + calc.midchord_pos(),
            None => continue,
        };
        fins += 0.6 * fin_set.fin_count.min(max_fins) as f64 * fin_set.planform_area()
            * pow3((midchord - pivot_x).abs())
            / reference;
    }

    Ok(body + fins)
}
