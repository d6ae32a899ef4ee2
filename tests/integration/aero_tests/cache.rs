use approx::assert_relative_eq;
use rocket_aero::components::rocket::ComponentKind;
use rocket_aero::components::WarningSet;
use rocket_aero::systems::aerodynamics::{AerodynamicCalculator, BarrowmanStabilityCalculator, StabilityCalculator};

use crate::common::{assert_forces_close, conditions_at, finned_rocket};

#[test]
fn test_unchanged_configuration_keeps_cache() {
    let fixture = finned_rocket();
    let config = &fixture.configuration;
    let conditions = conditions_at(config, 0.3, 2.0);
    let mut calc = AerodynamicCalculator::barrowman();

    let first = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    let second = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    calc.force_analysis(config, &conditions, None).unwrap();

    assert_eq!(calc.generation(), 1);
    assert_forces_close(&first, &second, 1e-15);
}

#[test]
fn test_geometry_change_recomputes() {
    let mut fixture = finned_rocket();
    let conditions = conditions_at(&fixture.configuration, 0.3, 2.0);
    let mut calc = AerodynamicCalculator::barrowman();

    let before = calc
        .aerodynamic_forces(&fixture.configuration, &conditions, None)
        .unwrap();
    assert_eq!(calc.generation(), 1);

    if let Some(component) = fixture.configuration.rocket_mut().component_mut(fixture.fins) {
        if let ComponentKind::FinSet(fins) = &mut component.kind {
            fins.fin_count = 3;
        }
    }

    let after = calc
        .aerodynamic_forces(&fixture.configuration, &conditions, None)
        .unwrap();
    assert_eq!(calc.generation(), 2);
    assert!(after.cn().unwrap() < before.cn().unwrap());
    assert!(after.cd().unwrap() < before.cd().unwrap());
}

#[test]
fn test_stage_activation_invalidates() {
    let mut fixture = finned_rocket();
    let conditions = conditions_at(&fixture.configuration, 0.3, 2.0);
    let mut calc = AerodynamicCalculator::barrowman();

    calc.cp(&fixture.configuration, &conditions, None).unwrap();
    fixture
        .configuration
        .set_stage_active(fixture.stage, false)
        .unwrap();
    let cp = calc.cp(&fixture.configuration, &conditions, None).unwrap();

    assert_eq!(calc.generation(), 2);
    assert_relative_eq!(cp.weight, 0.0);
}

#[test]
fn test_strategies_built_once_per_generation() {
    let fixture = finned_rocket();
    let config = &fixture.configuration;
    let conditions = conditions_at(config, 0.3, 2.0);
    let mut stability = BarrowmanStabilityCalculator::new();

    for _ in 0..3 {
        stability
            .non_axial_forces(config, &conditions, &mut WarningSet::new())
            .unwrap();
    }
    assert_eq!(stability.registry_builds(), 1);

    stability.void_cache();
    stability
        .non_axial_forces(config, &conditions, &mut WarningSet::new())
        .unwrap();
    assert_eq!(stability.registry_builds(), 2);
}

#[test]
fn test_new_instance_is_independent() {
    let fixture = finned_rocket();
    let config = &fixture.configuration;
    let conditions = conditions_at(config, 0.3, 2.0);
    let mut calc = AerodynamicCalculator::barrowman();
    calc.aerodynamic_forces(config, &conditions, None).unwrap();

    let mut copy = calc.new_instance();
    assert_eq!(copy.generation(), 0);
    let a = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    let b = copy.aerodynamic_forces(config, &conditions, None).unwrap();
    assert_forces_close(&a, &b, 1e-12);
    assert_eq!(copy.generation(), 1);
}
