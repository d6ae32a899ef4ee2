use std::f64::consts::PI;

use once_cell::sync::Lazy;

use crate::components::rocket::{ComponentId, ComponentInstances, Finish, FlightConfiguration};
use crate::components::{AerodynamicForces, FlightConditions, WarningSink};
use crate::systems::aerodynamics::calc::{CalcMap, CalcRegistry};
use crate::systems::aerodynamics::traits::{DragCalculator, ForceBreakdown};
use crate::utils::{
    deg_to_rad, pow2, AeroResult, PolyInterpolator, EPSILON, TRANSONIC_HIGH, TRANSONIC_LOW,
};

/// Angle of attack at which the axial drag multiplier peaks.
static AXIAL_PEAK: Lazy<f64> = Lazy::new(|| deg_to_rad(17.0));

static AXIAL_LOW: Lazy<Vec<f64>> = Lazy::new(|| {
    PolyInterpolator::new(&[&[0.0, *AXIAL_PEAK], &[0.0, *AXIAL_PEAK]]).coefficients(&[1.0, 1.3, 0.0, 0.0])
});

static AXIAL_HIGH: Lazy<Vec<f64>> = Lazy::new(|| {
    PolyInterpolator::new(&[&[*AXIAL_PEAK, PI / 2.0], &[*AXIAL_PEAK, PI / 2.0], &[PI / 2.0]])
        .coefficients(&[1.3, 0.0, 0.0, 0.0, 0.0])
});

/// Stagnation pressure coefficient of a blunt forward face.
pub fn stagnation_cd(mach: f64) -> f64 {
    let pressure = if mach <= 1.0 {
        1.0 + pow2(mach) / 4.0 + pow2(pow2(mach)) / 40.0
    } else {
        1.84 - 0.76 / pow2(mach) + 0.166 / pow2(pow2(mach)) + 0.035 / pow2(mach * mach * mach)
    };
    0.85 * pressure
}

/// Base drag coefficient of an aft-facing face.
pub fn base_cd(mach: f64) -> f64 {
    if mach <= 1.0 {
        0.12 + 0.13 * mach * mach
    } else {
        0.25 / mach
    }
}

fn transonic_blend(mach: f64, subsonic: f64, supersonic: f64) -> f64 {
    let width = TRANSONIC_HIGH - TRANSONIC_LOW;
    supersonic * (mach - TRANSONIC_LOW) / width + subsonic * (TRANSONIC_HIGH - mach) / width
}

/// Skin friction coefficient with compressibility correction.
///
/// # Arguments
/// * `perfect_finish` - Partially laminar boundary layer instead of fully turbulent
/// * `mach` - Free stream Mach number
/// * `reynolds` - Reynolds number based on the aerodynamic length
pub fn friction_coefficient(perfect_finish: bool, mach: f64, reynolds: f64) -> f64 {
    let mut c1 = 1.0;
    let mut c2 = 1.0;

    let cf = if perfect_finish {
        let cf = if reynolds < 1.0e4 {
            1.33e-2
        } else if reynolds < 5.39e5 {
            1.328 / reynolds.sqrt()
        } else {
            1.0 / pow2(1.50 * reynolds.ln() - 5.6) - 1700.0 / reynolds
        };

        if mach < TRANSONIC_HIGH && reynolds > 1.0e6 {
            c1 = if reynolds < 3.0e6 {
                1.0 - 0.1 * pow2(mach) * (reynolds - 1.0e6) / 2.0e6
            } else {
                1.0 - 0.1 * pow2(mach)
            };
        }
        if mach > TRANSONIC_LOW && reynolds > 1.0e6 {
            let full = 1.0 / (1.0 + 0.045 * pow2(mach)).powf(0.25);
            c2 = if reynolds < 3.0e6 {
                1.0 + (full - 1.0) * (reynolds - 1.0e6) / 2.0e6
            } else {
                full
            };
        }
        cf
    } else {
        let cf = if reynolds < 1.0e4 {
            1.48e-2
        } else {
            1.0 / pow2(1.50 * reynolds.ln() - 5.6)
        };

        if mach < TRANSONIC_HIGH {
            c1 = 1.0 - 0.1 * pow2(mach);
        }
        if mach > TRANSONIC_LOW {
            c2 = 1.0 / (1.0 + 0.15 * pow2(mach)).powf(0.58);
        }
        cf
    };

    if mach < TRANSONIC_LOW {
        cf * c1
    } else if mach < TRANSONIC_HIGH {
        cf * transonic_blend(mach, c1, c2)
    } else {
        cf * c2
    }
}

/// Compressibility correction of the roughness-limited friction coefficient.
pub fn roughness_correction(mach: f64) -> f64 {
    if mach < TRANSONIC_LOW {
        1.0 - 0.1 * pow2(mach)
    } else if mach > TRANSONIC_HIGH {
        1.0 / (1.0 + 0.18 * pow2(mach))
    } else {
        let c1 = 1.0 - 0.1 * pow2(TRANSONIC_LOW);
        let c2 = 1.0 / (1.0 + 0.18 * pow2(TRANSONIC_HIGH));
        transonic_blend(mach, c1, c2)
    }
}

/// Ratio of axial force to drag at an angle of attack.
pub fn axial_cd_multiplier(aoa: f64) -> f64 {
    let mut aoa = aoa.clamp(0.0, PI);
    if aoa > PI / 2.0 {
        aoa = PI - aoa;
    }
    if aoa < *AXIAL_PEAK {
        PolyInterpolator::eval(aoa, &AXIAL_LOW)
    } else {
        PolyInterpolator::eval(aoa, &AXIAL_HIGH)
    }
}

/// Axial force coefficient; changes sign when flying backwards.
pub fn axial_cd(aoa: f64, cd: f64) -> f64 {
    let mul = axial_cd_multiplier(aoa);
    if aoa < PI / 2.0 {
        mul * cd
    } else {
        -mul * cd
    }
}

pub fn reynolds_number(configuration: &FlightConfiguration, conditions: &FlightConditions) -> f64 {
    conditions.velocity() * configuration.aerodynamic_length()
        / conditions.atmosphere().kinematic_viscosity()
}

/// Extended Barrowman drag: skin friction, pressure, base and overrides.
#[derive(Debug, Clone, Default)]
pub struct BarrowmanDragCalculator {
    registry: CalcRegistry,
}

impl BarrowmanDragCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry_builds(&self) -> usize {
        self.registry.builds()
    }
}

/// Drag inputs shared by the per-component passes.
struct DragPass<'a> {
    configuration: &'a FlightConfiguration,
    conditions: &'a FlightConditions,
    calcs: &'a CalcMap,
    instances: &'a [ComponentInstances],
}

impl<'a> DragPass<'a> {
    fn is_excluded(&self, id: ComponentId) -> bool {
        let rocket = self.configuration.rocket();
        rocket.is_cd_overridden(id) || rocket.is_cd_overridden_by_ancestor(id)
    }

    fn record<'b>(
        breakdown: &'b mut Option<&mut ForceBreakdown>,
        id: ComponentId,
    ) -> Option<&'b mut AerodynamicForces> {
        breakdown.as_mut().and_then(|b| b.components.get_mut(&id))
    }

    fn friction(&self, mut breakdown: Option<&mut ForceBreakdown>) -> AeroResult<f64> {
        let rocket = self.configuration.rocket();
        let mach = self.conditions.mach();
        let reynolds = reynolds_number(self.configuration, self.conditions);
        let perfect = rocket.is_perfect_finish();
        let cf = friction_coefficient(perfect, mach, reynolds);
        let correction = roughness_correction(mach);
        let length = self.configuration.aerodynamic_length();

        let mut roughness_limited: [Option<f64>; Finish::ALL.len()] = [None; Finish::ALL.len()];
        let mut other_cd = 0.0;
        let mut body_cd = 0.0;
        let mut max_r: f64 = 0.0;
        let mut min_x = f64::MAX;
        let mut max_x: f64 = 0.0;

        for instances in self.instances {
            let id = instances.component;
            let component = rocket.get(id)?;
            if !component.is_aerodynamic() || self.is_excluded(id) {
                continue;
            }

            let finish = component.finish;
            let limited = *roughness_limited[finish.ordinal()].get_or_insert_with(|| {
                if length < EPSILON {
                    0.0
                } else {
                    0.032 * (finish.roughness() / length).powf(0.2) * correction
                }
            });

            let component_cf = if perfect {
                if reynolds > 1.0e6 && limited > cf {
                    limited
                } else {
                    cf
                }
            } else {
                cf.max(limited)
            };

            let cd = self
                .calcs
                .require(self.configuration, id)?
                .friction_cd(self.conditions, component_cf);
            let count = instances.transforms.len() as f64;

            if let Some(profile) = component.profile() {
                body_cd += count * cd;
                let x = rocket.absolute_x(id);
                min_x = min_x.min(x);
                max_x = max_x.max(x + profile.length);
                max_r = max_r.max(profile.max_radius());
            } else {
                other_cd += count * cd;
            }

            if let Some(record) = Self::record(&mut breakdown, id) {
                record.set_friction_cd(cd);
            }
        }

        // Fineness ratio correction of the body friction
        let fineness_correction = if max_r < EPSILON {
            1.0
        } else {
            let fineness = (max_x - min_x + 0.0001) / max_r;
            1.0 + 1.0 / (2.0 * fineness)
        };

        if let Some(breakdown) = breakdown {
            for (&id, record) in breakdown.components.iter_mut() {
                let symmetric = rocket.component(id).map_or(false, |c| c.is_symmetric());
                if let (true, Some(cd)) = (symmetric, record.friction_cd()) {
                    record.set_friction_cd(cd * fineness_correction);
                }
            }
        }

        Ok(other_cd + fineness_correction * body_cd)
    }

    fn pressure(&self, mut breakdown: Option<&mut ForceBreakdown>) -> AeroResult<f64> {
        let rocket = self.configuration.rocket();
        let mach = self.conditions.mach();
        let stagnation = stagnation_cd(mach);
        let base = base_cd(mach);
        let ref_area = self.conditions.ref_area();

        let mut total = 0.0;
        for instances in self.instances {
            let id = instances.component;
            let component = rocket.get(id)?;
            if !component.is_aerodynamic() || self.is_excluded(id) {
                continue;
            }

            let count = instances.transforms.len() as f64;
            let cd = self
                .calcs
                .require(self.configuration, id)?
                .pressure_cd(self.conditions, stagnation, base);
            if let Some(record) = Self::record(&mut breakdown, id) {
                record.set_pressure_cd(cd);
            }
            total += cd * count;

            let profile = match component.profile() {
                Some(profile) => profile,
                None => continue,
            };

            let fore = if profile.length == 0.0 {
                profile.max_radius()
            } else {
                profile.fore_radius
            };
            let previous = rocket
                .previous_symmetric(id)
                .filter(|&p| self.configuration.is_component_active(p))
                .and_then(|p| rocket.component(p)?.profile())
                .map_or(0.0, |p| p.aft_radius);

            // Forward-facing annulus at the joint
            if previous < fore {
                let disk_cd = stagnation * PI * (pow2(fore) - pow2(previous)) / ref_area;
                total += count * disk_cd;
                if let Some(record) = Self::record(&mut breakdown, id) {
                    let cd = record.pressure_cd().unwrap_or(0.0);
                    record.set_pressure_cd(cd + disk_cd);
                }
            }
        }

        Ok(total)
    }

    fn base(&self, mut breakdown: Option<&mut ForceBreakdown>) -> AeroResult<f64> {
        let rocket = self.configuration.rocket();
        let base = base_cd(self.conditions.mach());
        let ref_area = self.conditions.ref_area();

        let mut total = 0.0;
        for instances in self.instances {
            let id = instances.component;
            let profile = match rocket.get(id)?.profile() {
                Some(profile) => profile,
                None => continue,
            };
            if self.is_excluded(id) {
                continue;
            }

            let aft = if profile.length == 0.0 {
                profile.max_radius()
            } else {
                profile.aft_radius
            };
            let next = rocket
                .next_symmetric(id)
                .filter(|&n| self.configuration.is_component_active(n))
                .and_then(|n| rocket.component(n)?.profile())
                .map_or(0.0, |n| n.fore_radius);

            if next < aft {
                let cd = base * PI * (pow2(aft) - pow2(next)) / ref_area;
                total += instances.transforms.len() as f64 * cd;
                if let Some(record) = Self::record(&mut breakdown, id) {
                    record.set_base_cd(cd);
                }
            }
        }

        Ok(total)
    }

    fn overrides(&self, mut breakdown: Option<&mut ForceBreakdown>) -> AeroResult<f64> {
        let rocket = self.configuration.rocket();

        let mut total = 0.0;
        for instances in self.instances {
            let id = instances.component;
            let component = rocket.get(id)?;
            if !component.is_aerodynamic() && !component.is_assembly() {
                continue;
            }

            let drag_override = match component.drag_override {
                Some(o) if !rocket.is_cd_overridden_by_ancestor(id) => o,
                _ => continue,
            };

            let cd = instances.transforms.len() as f64 * drag_override.cd;
            if let Some(breakdown) = breakdown.as_mut() {
                let records = if component.is_assembly() {
                    &mut breakdown.assemblies
                } else {
                    &mut breakdown.components
                };
                if let Some(record) = records.get_mut(&id) {
                    record.set_override_cd(cd);
                }
            }
            total += cd;
        }

        Ok(total)
    }
}

impl DragCalculator for BarrowmanDragCalculator {
    fn new_instance(&self) -> Box<dyn DragCalculator> {
        Box::new(BarrowmanDragCalculator::new())
    }

    fn calculate_drag(
        &mut self,
        configuration: &FlightConfiguration,
        conditions: &FlightConditions,
        mut breakdown: Option<&mut ForceBreakdown>,
        total: &mut AerodynamicForces,
        _warnings: &mut dyn WarningSink,
    ) -> AeroResult<()> {
        let instances = configuration.active_instances();
        let pass = DragPass {
            configuration,
            conditions,
            calcs: self.registry.ensure(configuration),
            instances: &instances,
        };

        let friction = pass.friction(breakdown.as_deref_mut())?;
        let pressure = pass.pressure(breakdown.as_deref_mut())?;
        let base = pass.base(breakdown.as_deref_mut())?;
        let overrides = pass.overrides(breakdown.as_deref_mut())?;

        let cd = friction + pressure + base + overrides;
        total.set_friction_cd(friction);
        total.set_pressure_cd(pressure);
        total.set_base_cd(base);
        total.set_override_cd(overrides);
        total.set_cd(cd);
        total.set_cd_axial(axial_cd(conditions.aoa(), cd));
        Ok(())
    }

    fn void_cache(&mut self) {
        self.registry.clear();
    }
}
