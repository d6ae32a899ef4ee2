use approx::assert_relative_eq;
use rocket_aero::systems::aerodynamics::{AeroTable, AerodynamicCalculator};
use rocket_aero::utils::AeroError;
use std::io::Write;

use crate::common::{plain_tube, TEST_TABLE_JSON, TEST_TABLE_YAML};
use rocket_aero::components::FlightConditions;

fn conditions(mach: f64, aoa: f64) -> FlightConditions {
    let mut conditions = FlightConditions::new(0.05);
    conditions.set_mach(mach);
    conditions.set_aoa(aoa);
    conditions
}

#[test]
fn test_reproduces_grid_nodes() {
    let fixture = plain_tube();
    let config = &fixture.configuration;
    let table = AeroTable::from_json_str(TEST_TABLE_JSON).unwrap();
    let mut calc = AerodynamicCalculator::from_table(table).unwrap();

    let cond = conditions(0.6, 0.1);
    let forces = calc.aerodynamic_forces(config, &cond, None).unwrap();
    assert_relative_eq!(forces.cn_alpha(), 11.5, epsilon = 1e-12);
    assert_relative_eq!(forces.cn().unwrap(), 11.5 * 0.1, epsilon = 1e-12);
    assert_relative_eq!(forces.cp().x, 0.68, epsilon = 1e-12);
    assert_relative_eq!(forces.friction_cd().unwrap(), 0.27, epsilon = 1e-12);
    assert_relative_eq!(forces.cd().unwrap(), 0.27 + 0.13 + 0.17, epsilon = 1e-12);
    assert_relative_eq!(forces.pitch_damping_moment().unwrap(), 0.0);
    assert!(calc.stall_margin() > 0.0);
}

#[test]
fn test_interpolates_between_nodes() {
    let fixture = plain_tube();
    let config = &fixture.configuration;
    let table = AeroTable::from_json_str(TEST_TABLE_JSON).unwrap();
    let mut calc = AerodynamicCalculator::from_table(table).unwrap();

    let forces = calc.aerodynamic_forces(config, &conditions(0.4, 0.05), None).unwrap();
    assert_relative_eq!(forces.cn_alpha(), 10.75, epsilon = 1e-12);
    assert_relative_eq!(forces.cp().x, 0.64, epsilon = 1e-12);
    assert_relative_eq!(forces.base_cd().unwrap(), 0.145, epsilon = 1e-12);

    // Clamped beyond the last Mach point
    let fast = calc.aerodynamic_forces(config, &conditions(2.0, 0.2), None).unwrap();
    assert_relative_eq!(fast.cn_alpha(), 12.5, epsilon = 1e-12);
}

#[test]
fn test_breakdown_has_only_vehicle_total() {
    let fixture = plain_tube();
    let config = &fixture.configuration;
    let table = AeroTable::from_json_str(TEST_TABLE_JSON).unwrap();
    let mut calc = AerodynamicCalculator::from_table(table).unwrap();

    let analysis = calc.force_analysis(config, &conditions(0.2, 0.0), None).unwrap();
    let root = config.rocket().root();
    assert_eq!(analysis.len(), 1);
    assert_relative_eq!(analysis[&root].cd().unwrap(), 0.30 + 0.10 + 0.12, epsilon = 1e-12);
}

#[test]
fn test_loads_from_files() {
    let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    yaml.write_all(TEST_TABLE_YAML.as_bytes()).unwrap();
    let table = AeroTable::from_path(yaml.path()).unwrap();
    assert_eq!(table.mach, vec![0.2, 0.6]);
    assert!(table.c_roll.is_some());
    assert!(table.friction_cd.is_empty());

    let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    json.write_all(TEST_TABLE_JSON.as_bytes()).unwrap();
    let table = AeroTable::from_path(json.path()).unwrap();
    assert_eq!(table.aoa.len(), 3);

    let missing = AeroTable::from_path(json.path().with_extension("missing"));
    assert!(matches!(missing, Err(AeroError::Io(_))));
}

#[test]
fn test_yaml_roll_moment() {
    let fixture = plain_tube();
    let config = &fixture.configuration;
    let table = AeroTable::from_yaml_str(TEST_TABLE_YAML).unwrap();
    let mut calc = AerodynamicCalculator::from_table(table).unwrap();

    let forces = calc.aerodynamic_forces(config, &conditions(0.4, 0.2), None).unwrap();
    assert_relative_eq!(forces.c_roll().unwrap(), 0.03, epsilon = 1e-12);
    assert_relative_eq!(forces.cd().unwrap(), 0.0);
}

#[test]
fn test_rejects_hand_built_ragged_table() {
    let table = AeroTable {
        mach: vec![0.1, 0.5],
        aoa: vec![0.0, 0.2],
        cn_alpha: vec![vec![1.0]],
        cp_x: vec![vec![0.5, 0.5], vec![0.5, 0.5]],
        friction_cd: Vec::new(),
        pressure_cd: Vec::new(),
        base_cd: Vec::new(),
        c_roll: None,
    };
    let result = AerodynamicCalculator::from_table(table);
    assert!(matches!(result, Err(AeroError::InvalidTable(_))));

    let no_aoa = AeroTable {
        aoa: Vec::new(),
        ..AeroTable::from_json_str(TEST_TABLE_JSON).unwrap()
    };
    assert!(matches!(
        AerodynamicCalculator::from_table(no_aoa),
        Err(AeroError::InvalidTable(_))
    ));
}
