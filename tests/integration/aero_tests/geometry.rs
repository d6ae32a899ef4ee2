use pretty_assertions::assert_eq;
use rocket_aero::components::{Warning, WarningKind, WarningSet};
use rocket_aero::systems::aerodynamics::AerodynamicCalculator;

use crate::common::{conditions_at, finned_rocket, stepped_tubes};

#[test]
fn test_single_discontinuity_names_both_tubes() {
    let fixture = stepped_tubes();
    let config = &fixture.configuration;
    let mut calc = AerodynamicCalculator::barrowman();

    let mut warnings = WarningSet::new();
    calc.aerodynamic_forces(config, &conditions_at(config, 0.3, 2.0), Some(&mut warnings))
        .unwrap();

    let found: Vec<&Warning> = warnings
        .iter()
        .filter(|w| w.kind == WarningKind::DiameterDiscontinuity)
        .collect();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].components, vec![fixture.upper, fixture.lower]);
}

#[test]
fn test_clean_rocket_has_no_geometry_warnings() {
    let fixture = finned_rocket();
    let config = &fixture.configuration;
    let mut calc = AerodynamicCalculator::barrowman();

    let mut warnings = WarningSet::new();
    calc.aerodynamic_forces(config, &conditions_at(config, 0.3, 2.0), Some(&mut warnings))
        .unwrap();
    assert_eq!(warnings.len(), 0, "unexpected warnings: {:?}", warnings);
}

#[test]
fn test_geometry_warnings_repeat_every_call() {
    let fixture = stepped_tubes();
    let config = &fixture.configuration;
    let mut calc = AerodynamicCalculator::barrowman();
    let conditions = conditions_at(config, 0.3, 2.0);

    calc.aerodynamic_forces(config, &conditions, None).unwrap();

    let mut warnings = WarningSet::new();
    calc.cp(config, &conditions, Some(&mut warnings)).unwrap();
    assert_eq!(
        warnings.count_where(|k| *k == WarningKind::DiameterDiscontinuity),
        1
    );
}
