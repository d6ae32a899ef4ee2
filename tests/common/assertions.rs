use approx::assert_relative_eq;
use rocket_aero::components::AerodynamicForces;

/// Assert that every computed coefficient of a record is finite
#[track_caller]
pub fn assert_forces_valid(forces: &AerodynamicForces) {
    let values = [
        ("cn", forces.cn()),
        ("cm", forces.cm()),
        ("c_side", forces.c_side()),
        ("c_yaw", forces.c_yaw()),
        ("c_roll", forces.c_roll()),
        ("friction_cd", forces.friction_cd()),
        ("pressure_cd", forces.pressure_cd()),
        ("base_cd", forces.base_cd()),
        ("cd", forces.cd()),
        ("cd_axial", forces.cd_axial()),
    ];
    for (name, value) in values {
        if let Some(value) = value {
            assert!(value.is_finite(), "{} is not finite", name);
        }
    }

    let cp = forces.cp();
    assert!(cp.x.is_finite(), "CP x is not finite");
    assert!(cp.weight.is_finite(), "CP weight is not finite");
}

/// Assert that two records carry the same coefficients
#[track_caller]
pub fn assert_forces_close(a: &AerodynamicForces, b: &AerodynamicForces, epsilon: f64) {
    let pairs = [
        (a.cn(), b.cn()),
        (a.cm(), b.cm()),
        (a.c_roll(), b.c_roll()),
        (a.friction_cd(), b.friction_cd()),
        (a.pressure_cd(), b.pressure_cd()),
        (a.base_cd(), b.base_cd()),
        (a.cd(), b.cd()),
        (a.cd_axial(), b.cd_axial()),
    ];
    for (left, right) in pairs {
        assert_eq!(left.is_some(), right.is_some());
        if let (Some(left), Some(right)) = (left, right) {
            assert_relative_eq!(left, right, epsilon = epsilon);
        }
    }
    assert_relative_eq!(a.cp().x, b.cp().x, epsilon = epsilon);
    assert_relative_eq!(a.cp().weight, b.cp().weight, epsilon = epsilon);
}
