use approx::assert_relative_eq;
use rocket_aero::components::rocket::ComponentKind;
use rocket_aero::components::DragScope;
use rocket_aero::systems::aerodynamics::calc::SymmetricCalc;
use rocket_aero::systems::aerodynamics::drag::{base_cd, stagnation_cd};
use rocket_aero::systems::aerodynamics::AerodynamicCalculator;

use crate::common::{assert_forces_valid, conditions_at, finned_rocket, plain_tube, two_stage};

#[test]
fn test_plain_tube_at_zero_aoa() {
    let fixture = plain_tube();
    let config = &fixture.configuration;
    let conditions = conditions_at(config, 0.3, 0.0);
    let mut calc = AerodynamicCalculator::barrowman();

    let forces = calc.aerodynamic_forces(config, &conditions, None).unwrap();
    assert_forces_valid(&forces);
    assert_relative_eq!(forces.cn().unwrap(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(forces.cp().weight, 0.0);
    assert!(forces.friction_cd().unwrap() > 0.0);

    let component = config.component(fixture.tube).unwrap();
    let strategy = SymmetricCalc::new(fixture.tube, component, component.profile().unwrap());
    let own_pressure = strategy.pressure_cd(&conditions, stagnation_cd(0.3), base_cd(0.3));
    assert_relative_eq!(own_pressure, 0.0, epsilon = 1e-12);
}

#[test]
fn test_drag_split_adds_up() {
    let fixture = finned_rocket();
    let config = &fixture.configuration;
    let mut calc = AerodynamicCalculator::barrowman();

    for mach in [0.1, 0.5, 0.95, 1.05, 1.5, 2.5] {
        let forces = calc
            .axial_forces(config, &conditions_at(config, mach, 0.0), None)
            .unwrap();
        let split = forces.friction_cd().unwrap()
            + forces.pressure_cd().unwrap()
            + forces.base_cd().unwrap()
            + forces.override_cd().unwrap();
        assert_relative_eq!(forces.cd().unwrap(), split, epsilon = 1e-12);
        assert!(forces.cd().unwrap() > 0.0, "no drag at Mach {}", mach);
        assert!(forces.cn().is_none());
    }
}

#[test]
fn test_axial_drag_reverses_past_ninety_degrees() {
    let fixture = finned_rocket();
    let config = &fixture.configuration;
    let mut calc = AerodynamicCalculator::barrowman();

    let forward = calc
        .axial_forces(config, &conditions_at(config, 0.3, 10.0), None)
        .unwrap();
    assert!(forward.cd_axial().unwrap() > 0.0);

    let backward = calc
        .axial_forces(config, &conditions_at(config, 0.3, 170.0), None)
        .unwrap();
    assert!(backward.cd_axial().unwrap() < 0.0);
}

#[test]
fn test_assembly_override_replaces_its_subtree() {
    let booster_cd = 0.3;
    let fixture = two_stage(booster_cd);
    let config = &fixture.configuration;
    let conditions = conditions_at(config, 0.3, 0.0);
    let mut calc = AerodynamicCalculator::barrowman();

    let analysis = calc.force_analysis(config, &conditions, None).unwrap();
    let root = config.rocket().root();

    let booster = &analysis[&fixture.booster];
    assert_relative_eq!(booster.override_cd().unwrap(), booster_cd);
    assert_relative_eq!(booster.cd().unwrap(), booster_cd, epsilon = 1e-12);
    assert_eq!(booster.drag_scope(), DragScope::Overridden(booster_cd));

    for id in [fixture.booster_body, fixture.booster_fins] {
        let record = &analysis[&id];
        assert_eq!(record.drag_scope(), DragScope::OverriddenByAncestor);
        assert_relative_eq!(record.cd().unwrap(), 0.0);
    }

    let free = analysis[&fixture.nose].cd().unwrap() + analysis[&fixture.sustainer_body].cd().unwrap();
    assert!(free > 0.0);
    assert_relative_eq!(analysis[&root].cd().unwrap(), booster_cd + free, epsilon = 1e-12);
    assert_relative_eq!(analysis[&fixture.sustainer].cd().unwrap(), 0.0);

    let total = calc.axial_forces(config, &conditions, None).unwrap();
    assert_relative_eq!(total.cd().unwrap(), booster_cd + free, epsilon = 1e-12);
}

#[test]
fn test_override_scales_with_instances() {
    let mut fixture = finned_rocket();
    let conditions = conditions_at(&fixture.configuration, 0.3, 0.0);
    let mut calc = AerodynamicCalculator::barrowman();

    let before = calc
        .axial_forces(&fixture.configuration, &conditions, None)
        .unwrap();

    let component = fixture
        .configuration
        .rocket_mut()
        .component_mut(fixture.fins)
        .unwrap();
    assert!(matches!(component.kind, ComponentKind::FinSet(_)));
    *component = component.clone().with_override(0.05, false);

    let after = calc
        .axial_forces(&fixture.configuration, &conditions, None)
        .unwrap();
    assert_relative_eq!(after.override_cd().unwrap(), 4.0 * 0.05, epsilon = 1e-12);
    assert!(after.friction_cd().unwrap() < before.friction_cd().unwrap());
}
