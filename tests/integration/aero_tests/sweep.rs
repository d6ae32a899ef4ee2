use rocket_aero::systems::aerodynamics::{grid, sweep, sweep_sequential, AerodynamicCalculator};
use rocket_aero::utils::deg_to_rad;

use crate::common::{assert_forces_close, conditions_at, finned_rocket};

#[test]
fn test_parallel_sweep_matches_sequential() {
    let fixture = finned_rocket();
    let config = &fixture.configuration;
    let template = conditions_at(config, 0.3, 0.0);

    let machs = [0.1, 0.3, 0.6, 0.9, 1.2, 2.0];
    let aoas: Vec<f64> = [0.0, 2.0, 5.0, 10.0].iter().map(|&d| deg_to_rad(d)).collect();
    let points = grid(&machs, &aoas);

    let calc = AerodynamicCalculator::barrowman();
    let parallel = sweep(&calc, config, &template, &points).unwrap();

    let mut sequential_calc = AerodynamicCalculator::barrowman();
    let sequential = sweep_sequential(&mut sequential_calc, config, &template, &points).unwrap();

    assert_eq!(parallel.len(), points.len());
    for ((p, s), point) in parallel.iter().zip(&sequential).zip(&points) {
        assert_eq!(p.point, *point);
        assert_eq!(s.point, *point);
        assert_forces_close(&p.forces, &s.forces, 1e-12);
    }
}
