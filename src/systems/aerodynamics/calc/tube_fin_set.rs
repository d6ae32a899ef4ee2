//! Tube fin strategy.
//!
//! Each open tube is treated as a low aspect ratio ring wing whose span is
//! the tube's inner diameter. As with flat fins the aggregator invokes the
//! strategy once per tube.

use std::f64::consts::PI;

use super::fin_set::{cp_fraction, cp_polynomial};
use crate::components::rocket::{ComponentId, Rocket, TubeFinSet};
use crate::components::{
    AerodynamicForces, Coordinate, FlightConditions, Warning, WarningKind, WarningSink,
};
use crate::utils::{pow2, EPSILON, FIN_STALL_ANGLE};

/// Tubes thinner than this produce no forces.
const MIN_TUBE_RADIUS: f64 = 0.001;

#[derive(Debug, Clone)]
pub struct TubeFinSetCalc {
    fin_count: usize,
    chord: f64,
    body_radius: f64,
    outer_radius: f64,
    inner_radius: f64,
    roughness: f64,

    aspect_ratio: f64,
    cna_const: f64,
    interstice_area: f64,
    wetted_area: f64,
    cp_poly: [f64; 6],
    geometry_warnings: Vec<Warning>,
}

impl TubeFinSetCalc {
    pub fn new(rocket: &Rocket, id: ComponentId, tubes: &TubeFinSet) -> Self {
        let body_radius = rocket.body_radius_at(id);
        let outer_radius = tubes.resolved_outer_radius(body_radius);
        let inner_radius = tubes.resolved_inner_radius(body_radius);
        let chord = tubes.length.max(0.0);
        let roughness = rocket.component(id).map_or(0.0, |c| c.finish.roughness());

        let mut geometry_warnings = Vec::new();
        match tubes.tube_separation(body_radius) {
            Some(gap) if gap > EPSILON => {
                geometry_warnings.push(Warning::for_components(WarningKind::TubeSeparation, &[id]))
            }
            Some(gap) if gap < -EPSILON => {
                geometry_warnings.push(Warning::for_components(WarningKind::TubeOverlap, &[id]))
            }
            _ => {}
        }

        let aspect_ratio = if chord < EPSILON {
            0.0
        } else {
            2.0 * inner_radius / chord
        };

        let (rb, ro) = (body_radius, outer_radius);
        // Wedge between tube, body and the tangent from the body axis
        let (interstice_area, outer_area, masked_area) = if rb + ro < EPSILON {
            (0.0, 0.0, 0.0)
        } else {
            let d = (pow2(rb + ro) - pow2(ro)).max(0.0).sqrt();
            let theta1 = (ro / (ro + rb)).acos();
            let theta2 = PI / 2.0 - theta1;
            let interstice = d * ro - pow2(ro) * theta1 - pow2(rb) * theta2;
            (
                interstice,
                chord * 2.0 * (PI - theta1) * ro,
                chord * 2.0 * theta2 * rb,
            )
        };

        let ar_prime = 2.0 * aspect_ratio / PI;
        let cna_const = 2.0 * (ar_prime / (1.0 + ar_prime)) * pow2(PI) * inner_radius * chord;

        Self {
            fin_count: tubes.fin_count,
            chord,
            body_radius,
            outer_radius,
            inner_radius,
            roughness,
            aspect_ratio,
            cna_const,
            interstice_area,
            wetted_area: (outer_area - masked_area).max(0.0),
            cp_poly: cp_polynomial(aspect_ratio),
            geometry_warnings,
        }
    }

    pub fn non_axial_forces(
        &self,
        conditions: &FlightConditions,
        forces: &mut AerodynamicForces,
        warnings: &mut dyn WarningSink,
    ) {
        warnings.add_all(&self.geometry_warnings);

        if self.outer_radius < MIN_TUBE_RADIUS {
            forces.set_cm(0.0);
            forces.set_cn(0.0);
            forces.set_cp(Coordinate::ZERO);
            forces.set_c_roll(0.0);
            forces.set_c_roll_damp(0.0);
            forces.set_c_roll_force(0.0);
            forces.set_c_side(0.0);
            forces.set_c_yaw(0.0);
            return;
        }

        let cna = self.cna_const / conditions.ref_area();
        let x = cp_fraction(conditions, self.aspect_ratio, &self.cp_poly) * self.chord;

        // Tubes carry no cant, so only damping acts in roll
        let arm = self.body_radius + self.outer_radius;
        let velocity = conditions.velocity();
        let roll_damp = if velocity < EPSILON {
            0.0
        } else {
            arm * conditions.roll_rate() / velocity * cna / conditions.ref_length()
        };
        forces.set_c_roll_force(0.0);
        forces.set_c_roll_damp(roll_damp);
        forces.set_c_roll(-roll_damp);

        let cn = cna * conditions.aoa().min(FIN_STALL_ANGLE);
        forces.set_cn(cn);
        forces.set_cp(Coordinate::new(x, 0.0, 0.0, cna));
        forces.set_cm(cn * x / conditions.ref_length());

        forces.set_c_side(0.0);
        forces.set_c_yaw(0.0);
    }

    /// Friction drag of one tube over its exposed outer surface.
    pub fn friction_cd(&self, conditions: &FlightConditions, cf: f64) -> f64 {
        cf * self.wetted_area / conditions.ref_area()
    }

    /// Pressure drag of one tube: the blunt wall, the internal flow loss and
    /// the pocket between tube and body.
    pub fn pressure_cd(&self, conditions: &FlightConditions, stagnation_cd: f64, base_cd: f64) -> f64 {
        let blunt = stagnation_cd + base_cd;
        let wall_area = PI * (pow2(self.outer_radius) - pow2(self.inner_radius));
        let inner_area = PI * pow2(self.inner_radius);

        let loss = self.internal_loss(conditions).min(blunt);
        (blunt * (wall_area + self.interstice_area) + loss * inner_area) / conditions.ref_area()
    }

    /// Pressure loss through the bore relative to dynamic pressure, using the
    /// Swamee-Jain friction factor.
    fn internal_loss(&self, conditions: &FlightConditions) -> f64 {
        let diameter = 2.0 * self.inner_radius;
        if diameter < EPSILON || self.chord < EPSILON {
            return 0.0;
        }
        let reynolds = conditions.velocity() * diameter / conditions.atmosphere().kinematic_viscosity();
        if reynolds < 1.0 {
            return 0.0;
        }
        let friction = 0.25
            / pow2((self.roughness / (3.7 * diameter) + 5.74 / reynolds.powf(0.9)).log10());
        friction * self.chord / diameter
    }

    pub fn fin_count(&self) -> usize {
        self.fin_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::rocket::{AxialPosition, BodyTube, ComponentKind, RocketComponent};
    use crate::components::WarningSet;
    use crate::utils::deg_to_rad;
    use approx::assert_relative_eq;

    fn calc_for(tubes: TubeFinSet) -> TubeFinSetCalc {
        let mut rocket = Rocket::new("test");
        let stage = rocket
            .add(rocket.root(), RocketComponent::new("stage", ComponentKind::AxialStage))
            .unwrap();
        let body = rocket
            .add(stage, RocketComponent::new("tube", ComponentKind::BodyTube(BodyTube::new(0.02, 0.3))))
            .unwrap();
        let id = rocket
            .add(
                body,
                RocketComponent::new("tubes", ComponentKind::TubeFinSet(tubes.clone()))
                    .at(AxialPosition::Bottom(0.0)),
            )
            .unwrap();
        TubeFinSetCalc::new(&rocket, id, &tubes)
    }

    fn conditions(aoa_deg: f64, mach: f64) -> FlightConditions {
        let mut conditions = FlightConditions::new(0.04);
        conditions.set_aoa(deg_to_rad(aoa_deg));
        conditions.set_mach(mach);
        conditions
    }

    #[test]
    fn test_touching_tube_geometry() {
        let calc = calc_for(TubeFinSet::new(6, 0.1));
        assert_relative_eq!(calc.outer_radius, 0.02, epsilon = 1e-12);
        assert_relative_eq!(calc.inner_radius, 0.018, epsilon = 1e-12);
        assert_relative_eq!(calc.aspect_ratio, 0.36, epsilon = 1e-12);
        // d·ro less the two circular sectors at 60° and 30°
        let expected = 0.0012_f64.sqrt() * 0.02 - 0.0004 * PI / 2.0;
        assert_relative_eq!(calc.interstice_area, expected, epsilon = 1e-12);
        // Outer surface over 240° less the 60° strip masked by the body
        let wetted = 0.1 * 2.0 * (2.0 * PI / 3.0) * 0.02 - 0.1 * 2.0 * (PI / 6.0) * 0.02;
        assert_relative_eq!(calc.wetted_area, wetted, epsilon = 1e-12);
    }

    #[test]
    fn test_normal_force_is_linear_until_stall() {
        let calc = calc_for(TubeFinSet::new(6, 0.1));
        let mut warnings = WarningSet::new();

        let mut forces_at = |aoa: f64| {
            let mut forces = AerodynamicForces::new();
            calc.non_axial_forces(&conditions(aoa, 0.3), &mut forces, &mut warnings);
            forces
        };
        let small = forces_at(2.0);
        let double = forces_at(4.0);
        assert_relative_eq!(double.cn().unwrap(), 2.0 * small.cn().unwrap(), epsilon = 1e-12);
        assert!(small.cn().unwrap() > 0.0);

        let stalled = forces_at(20.0);
        let beyond = forces_at(28.0);
        assert_relative_eq!(stalled.cn().unwrap(), beyond.cn().unwrap(), epsilon = 1e-12);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_cp_at_quarter_chord_subsonic() {
        let calc = calc_for(TubeFinSet::new(6, 0.1));
        let cond = conditions(3.0, 0.3);
        let mut forces = AerodynamicForces::new();
        calc.non_axial_forces(&cond, &mut forces, &mut WarningSet::new());

        let cp = forces.cp();
        assert_relative_eq!(cp.x, 0.025, epsilon = 1e-12);
        assert_relative_eq!(cp.weight, calc.cna_const / cond.ref_area(), epsilon = 1e-12);
        assert_relative_eq!(
            forces.cm().unwrap(),
            forces.cn().unwrap() * 0.025 / cond.ref_length(),
            epsilon = 1e-12
        );

        // Transonic polynomial joins the quarter chord continuously
        let mut forces = AerodynamicForces::new();
        calc.non_axial_forces(&conditions(3.0, 0.51), &mut forces, &mut WarningSet::new());
        assert_relative_eq!(forces.cp().x, 0.025, epsilon = 5e-4);
    }

    #[test]
    fn test_roll_damping_opposes_rate() {
        let calc = calc_for(TubeFinSet::new(6, 0.1));
        let mut cond = conditions(0.0, 0.3);
        cond.set_roll_rate(5.0);
        let mut forces = AerodynamicForces::new();
        calc.non_axial_forces(&cond, &mut forces, &mut WarningSet::new());
        assert!(forces.c_roll_damp().unwrap() > 0.0);
        assert_relative_eq!(forces.c_roll().unwrap(), -forces.c_roll_damp().unwrap());
        assert_eq!(forces.c_roll_force(), Some(0.0));
    }

    #[test]
    fn test_separation_and_overlap_warnings() {
        let mut warnings = WarningSet::new();
        let mut forces = AerodynamicForces::new();

        calc_for(TubeFinSet::new(6, 0.1).with_outer_radius(0.01))
            .non_axial_forces(&conditions(2.0, 0.3), &mut forces, &mut warnings);
        assert!(warnings.contains_kind(|k| *k == WarningKind::TubeSeparation));

        calc_for(TubeFinSet::new(6, 0.1).with_outer_radius(0.03))
            .non_axial_forces(&conditions(2.0, 0.3), &mut forces, &mut warnings);
        assert!(warnings.contains_kind(|k| *k == WarningKind::TubeOverlap));

        let mut quiet = WarningSet::new();
        calc_for(TubeFinSet::new(2, 0.1))
            .non_axial_forces(&conditions(2.0, 0.3), &mut forces, &mut quiet);
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_tiny_tubes_produce_no_forces() {
        let calc = calc_for(TubeFinSet::new(6, 0.1).with_outer_radius(0.0005));
        let mut forces = AerodynamicForces::new();
        calc.non_axial_forces(&conditions(5.0, 0.3), &mut forces, &mut WarningSet::new());
        assert_eq!(forces.cn(), Some(0.0));
        assert_eq!(forces.cp(), Coordinate::ZERO);
    }

    #[test]
    fn test_pressure_drag_grows_with_tube_length() {
        let cond = conditions(0.0, 0.3);
        let short = calc_for(TubeFinSet::new(6, 0.05)).pressure_cd(&cond, 0.85, 0.12);
        let long = calc_for(TubeFinSet::new(6, 0.2)).pressure_cd(&cond, 0.85, 0.12);
        assert!(short > 0.0);
        assert!(long > short);

        // Walls thicker than the radius leave no bore
        let solid = calc_for(TubeFinSet::new(6, 0.1).with_thickness(0.05));
        let blunt = 0.97 * (PI * 0.0004 + solid.interstice_area) / cond.ref_area();
        assert_relative_eq!(solid.pressure_cd(&cond, 0.85, 0.12), blunt, epsilon = 1e-12);
    }
}
