use std::f64::consts::PI;

/// General floating point tolerance used for geometric comparisons.
pub const EPSILON: f64 = 1e-8;

// Atmosphere
pub const AIR_GAS_CONSTANT: f64 = 287.053; // J/(kg·K)
pub const ISA_SEA_LEVEL_TEMP: f64 = 288.15; // K
pub const ISA_SEA_LEVEL_PRESSURE: f64 = 101325.0; // Pa
pub const ISA_LAPSE_RATE: f64 = -0.0065; // K/m
pub const ISA_TROPOPAUSE: f64 = 11_000.0; // m
pub const GRAVITY: f64 = 9.80665; // m/s^2

// Reference geometry
pub const DEFAULT_REFERENCE_LENGTH: f64 = 1.0; // m
pub const DEFAULT_MACH: f64 = 0.3;

/// Angle of attack below which sin(aoa) is replaced by aoa.
pub const SMALL_AOA: f64 = 0.001;

/// Minimum Prandtl-Glauert factor, avoids the singularity at Mach 1.
pub const MIN_BETA: f64 = 0.25;

// Vehicle level limits
pub const STALL_ANGLE: f64 = 17.5 * PI / 180.0;
pub const DAMPING_BOOST: f64 = 3.0;
pub const MAX_DAMPING_FINS: usize = 4;
pub const WORST_CP_DIVISIONS: usize = 360;
pub const CP_WEIGHT_EPSILON: f64 = 1e-7;
pub const LENGTH_RESOLUTION: f64 = 1e-4; // m

// Fin limits
pub const FIN_STALL_ANGLE: f64 = 20.0 * PI / 180.0;
pub const FIN_DIVISIONS: usize = 48;

// Body lift
pub const BODY_LIFT_K: f64 = 1.1;

// Transonic blend
pub const TRANSONIC_LOW: f64 = 0.9;
pub const TRANSONIC_HIGH: f64 = 1.1;
