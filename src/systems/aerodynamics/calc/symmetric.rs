use std::f64::consts::PI;

use crate::components::rocket::{BodyProfile, ComponentId, ComponentKind, RocketComponent};
use crate::components::{
    AerodynamicForces, Coordinate, FlightConditions, Warning, WarningKind, WarningSink,
};
use crate::systems::aerodynamics::calc::nose_pressure::nose_pressure_interpolator;
use crate::utils::{equals, pow2, LinearInterpolator, BODY_LIFT_K, TRANSONIC_HIGH};

/// Barrowman strategy for axisymmetric bodies: nose cones, transitions and tubes.
#[derive(Debug, Clone)]
pub struct SymmetricCalc {
    component: ComponentId,
    profile: BodyProfile,
    fineness: f64,
    frontal_area: f64,
    wetted_area: f64,
    planform_area: f64,
    planform_center: f64,
    /// CNα before sinc and reference area scaling, zero for tubes
    cna: f64,
    cp_x: f64,
    nose: Option<LinearInterpolator>,
}

impl SymmetricCalc {
    pub fn new(id: ComponentId, component: &RocketComponent, profile: BodyProfile) -> Self {
        let fore = profile.fore_radius;
        let aft = profile.aft_radius;
        let length = profile.length;

        let frontal_area = match component.kind {
            ComponentKind::BodyTube(_) => 0.0,
            _ => (PI * (pow2(fore) - pow2(aft))).abs(),
        };
        let fineness = length / (2.0 * (aft - fore).abs());
        let full_volume = profile.full_volume();

        let (cna, cp_x) = if equals(fore, aft) {
            (0.0, 0.0)
        } else {
            let a0 = PI * pow2(fore);
            let a1 = PI * pow2(aft);
            (2.0 * (a1 - a0), (length * a1 - full_volume) / (a1 - a0))
        };

        // Only expanding bodies of finite length read the fore-body tables
        let nose = if fore < aft && !equals(fore, aft) && length >= 0.001 {
            Some(nose_pressure_interpolator(&profile, fineness))
        } else {
            None
        };

        Self {
            component: id,
            fineness,
            frontal_area,
            wetted_area: profile.wetted_area(),
            planform_area: profile.planform_area(),
            planform_center: profile.planform_center(),
            cna,
            cp_x,
            nose,
            profile,
        }
    }

    pub fn profile(&self) -> &BodyProfile {
        &self.profile
    }

    pub fn is_tube(&self) -> bool {
        equals(self.profile.fore_radius, self.profile.aft_radius)
    }

    /// Normal force, pitching moment and CP of one body instance.
    ///
    /// Expanding and contracting bodies carry the classical Barrowman normal
    /// force at the body-shape CP; every body adds Galejs body lift at the
    /// planform center.
    pub fn non_axial_forces(
        &self,
        conditions: &FlightConditions,
        forces: &mut AerodynamicForces,
        warnings: &mut dyn WarningSink,
    ) {
        let lift = self.lift_cp(conditions);
        let cp = if self.is_tube() {
            lift
        } else {
            Coordinate::new(
                self.cp_x,
                0.0,
                0.0,
                self.cna * conditions.sinc_aoa() / conditions.ref_area(),
            )
            .average(&lift)
        };

        forces.set_cp(cp);
        let cn = cp.weight * conditions.aoa();
        forces.set_cn(cn);
        forces.set_cm(cn * cp.x / conditions.ref_length());
        forces.set_c_roll(0.0);
        forces.set_c_roll_damp(0.0);
        forces.set_c_roll_force(0.0);
        forces.set_c_side(0.0);
        forces.set_c_yaw(0.0);

        if conditions.mach() > TRANSONIC_HIGH {
            warnings.add(Warning::for_components(WarningKind::Supersonic, &[self.component]));
        }
    }

    fn lift_cp(&self, conditions: &FlightConditions) -> Coordinate {
        // Reduced near apogee so a tumbling body does not oscillate
        let mul = if conditions.mach() < 0.05 && conditions.aoa() > PI / 4.0 {
            pow2(conditions.mach() / 0.05)
        } else {
            1.0
        };

        Coordinate::new(
            self.planform_center,
            0.0,
            0.0,
            mul * BODY_LIFT_K * self.planform_area / conditions.ref_area()
                * conditions.sin_aoa()
                * conditions.sinc_aoa(),
        )
    }

    pub fn friction_cd(&self, conditions: &FlightConditions, cf: f64) -> f64 {
        cf * self.wetted_area / conditions.ref_area()
    }

    pub fn pressure_cd(&self, conditions: &FlightConditions, stagnation_cd: f64, base_cd: f64) -> f64 {
        let fore = self.profile.fore_radius;
        let aft = self.profile.aft_radius;
        let ref_area = conditions.ref_area();

        if equals(fore, aft) {
            return 0.0;
        }

        if self.profile.length < 0.001 {
            return if fore < aft {
                stagnation_cd * self.frontal_area / ref_area
            } else {
                base_cd * self.frontal_area / ref_area
            };
        }

        // Boattail
        if aft < fore {
            if self.fineness >= 3.0 {
                return 0.0;
            }
            let cd = base_cd * self.frontal_area / ref_area;
            if self.fineness <= 1.0 {
                return cd;
            }
            return cd * (3.0 - self.fineness) / 2.0;
        }

        match &self.nose {
            Some(interpolator) => interpolator.value(conditions.mach()) * self.frontal_area / ref_area,
            None => 0.0,
        }
    }
}
