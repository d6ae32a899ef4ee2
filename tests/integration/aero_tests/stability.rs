use approx::assert_relative_eq;
use rocket_aero::components::{Coordinate, FlightConditions, WarningKind, WarningSet};
use rocket_aero::systems::aerodynamics::AerodynamicCalculator;
use rocket_aero::utils::deg_to_rad;
use std::f64::consts::PI;

use crate::common::{assert_forces_valid, conditions_at, finned_rocket, tube_finned_rocket};

#[test]
fn test_cp_aft_of_fin_leading_edge() {
    let rocket = finned_rocket();
    let config = &rocket.configuration;
    let mut calc = AerodynamicCalculator::barrowman();
    let mut conditions = conditions_at(config, 0.3, 2.0);
    conditions.set_pitch_center(Coordinate::axial(0.3));

    let forces = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    assert_forces_valid(&forces);

    let fin_leading_edge = config.rocket().absolute_x(rocket.fins);
    assert_relative_eq!(fin_leading_edge, 0.42, epsilon = 1e-12);
    assert!(forces.cp().x > fin_leading_edge, "CP at {}", forces.cp().x);
    assert!(forces.cp().x < 0.5);
    assert!(forces.cn().unwrap() > 0.0);
    assert!(calc.stall_margin() > 0.0);
}

#[test]
fn test_normal_force_grows_with_aoa() {
    let rocket = finned_rocket();
    let config = &rocket.configuration;
    let mut calc = AerodynamicCalculator::barrowman();

    let small = calc
        .aerodynamic_forces(config, &conditions_at(config, 0.3, 1.0), None)
        .unwrap();
    let large = calc
        .aerodynamic_forces(config, &conditions_at(config, 0.3, 4.0), None)
        .unwrap();

    assert!(large.cn().unwrap() > small.cn().unwrap());
    // CN is close to CNα·α at small angles
    assert_relative_eq!(
        small.cn().unwrap(),
        small.cn_alpha() * deg_to_rad(1.0),
        max_relative = 0.05
    );
}

#[test]
fn test_force_analysis_covers_active_tree() {
    let rocket = finned_rocket();
    let config = &rocket.configuration;
    let mut calc = AerodynamicCalculator::barrowman();
    let conditions = conditions_at(config, 0.3, 2.0);

    let analysis = calc.force_analysis(config, &conditions, None).unwrap();
    let root = config.rocket().root();
    for id in [root, rocket.stage, rocket.nose, rocket.body, rocket.fins] {
        assert!(analysis.contains_key(&id), "missing record for {}", id);
        assert_forces_valid(&analysis[&id]);
    }

    let total = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    assert_relative_eq!(analysis[&root].cn().unwrap(), total.cn().unwrap(), epsilon = 1e-12);
    assert_relative_eq!(analysis[&root].cd().unwrap(), total.cd().unwrap(), epsilon = 1e-12);

    let parts = analysis[&rocket.nose].cn().unwrap()
        + analysis[&rocket.body].cn().unwrap()
        + analysis[&rocket.fins].cn().unwrap();
    assert_relative_eq!(analysis[&rocket.stage].cn().unwrap(), parts, epsilon = 1e-12);
}

#[test]
fn test_worst_cp_sets_theta() {
    let rocket = finned_rocket();
    let config = &rocket.configuration;
    let mut calc = AerodynamicCalculator::barrowman();
    let mut conditions = conditions_at(config, 0.3, 2.0);

    let reference = calc.cp(config, &conditions, None).unwrap();
    let worst = calc.worst_cp(config, &mut conditions, None).unwrap();

    assert!(worst.weight > 0.0);
    assert!(worst.x <= reference.x + 1e-12);
    assert!(conditions.theta() >= 0.0 && conditions.theta() < 2.0 * PI);

    let again = calc.cp(config, &conditions, None).unwrap();
    assert_relative_eq!(again.x, worst.x, epsilon = 1e-12);
}

#[test]
fn test_stall_margin_negative_past_stall() {
    let rocket = finned_rocket();
    let config = &rocket.configuration;
    let mut calc = AerodynamicCalculator::barrowman();

    let mut warnings = WarningSet::new();
    calc.aerodynamic_forces(config, &conditions_at(config, 0.3, 25.0), Some(&mut warnings))
        .unwrap();
    assert!(calc.stall_margin() < 0.0);
    assert_relative_eq!(
        calc.stall_margin(),
        deg_to_rad(17.5) - deg_to_rad(25.0),
        epsilon = 1e-12
    );
    assert!(!warnings.is_empty());
}

#[test]
fn test_roll_damping_opposes_roll() {
    let rocket = finned_rocket();
    let config = &rocket.configuration;
    let mut calc = AerodynamicCalculator::barrowman();
    let mut conditions = conditions_at(config, 0.3, 0.0);
    conditions.set_roll_rate(10.0);

    let forces = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    assert!(forces.c_roll().unwrap() < 0.0);
    assert_relative_eq!(forces.c_roll_force().unwrap(), 0.0);
}

#[test]
fn test_zero_reference_length_gives_finite_coefficients() {
    let rocket = finned_rocket();
    let config = &rocket.configuration;
    let mut calc = AerodynamicCalculator::barrowman();

    let mut conditions = FlightConditions::new(0.0);
    conditions.set_mach(0.3);
    conditions.set_aoa(deg_to_rad(5.0));
    conditions.set_pitch_rate(0.5);

    let forces = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    assert_forces_valid(&forces);
    assert!(forces.cd().unwrap() > 0.0);

    let analysis = calc.force_analysis(config, &conditions, None).unwrap();
    for record in analysis.values() {
        assert_forces_valid(record);
    }
}

#[test]
fn test_tube_fins_stabilize_and_add_drag() {
    let rocket = tube_finned_rocket();
    let config = &rocket.configuration;
    let mut calc = AerodynamicCalculator::barrowman();
    let conditions = conditions_at(config, 0.3, 3.0);

    let forces = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    assert_forces_valid(&forces);
    assert_eq!(config.instance_count(rocket.tubes), 6);

    let tube_leading_edge = config.rocket().absolute_x(rocket.tubes);
    assert_relative_eq!(tube_leading_edge, 0.42, epsilon = 1e-12);
    assert!(forces.cp().x > tube_leading_edge, "CP at {}", forces.cp().x);

    let mut warnings = WarningSet::new();
    let analysis = calc
        .force_analysis(config, &conditions, Some(&mut warnings))
        .unwrap();
    let tubes = &analysis[&rocket.tubes];
    assert!(tubes.cn().unwrap() > 0.0);
    assert!(tubes.friction_cd().unwrap() > 0.0);
    assert!(tubes.pressure_cd().unwrap() > 0.0);
    assert!(!warnings.contains_kind(|k| {
        matches!(k, WarningKind::TubeSeparation | WarningKind::TubeOverlap)
    }));
}
