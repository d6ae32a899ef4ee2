//! Fore-body pressure drag versus Mach number.
//!
//! Conical and ogive noses use a closed form above Mach 1 with a cubic
//! bridge between Mach 1 and 1.3. The other families interpolate
//! experimental curves measured at fineness ratio 3, blended by shape
//! parameter, rescaled for the actual fineness ratio and completed below
//! the first tabulated Mach number with a power-law fit.

use once_cell::sync::Lazy;

use crate::components::rocket::{BodyProfile, TransitionShape};
use crate::systems::aerodynamics::drag::stagnation_cd;
use crate::utils::{pow2, LinearInterpolator, PolyInterpolator};

const GAMMA: f64 = 1.4;

static ELLIPSOID: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[1.2, 1.25, 1.3, 1.4, 1.6, 2.0, 2.4],
        &[0.110, 0.128, 0.140, 0.148, 0.152, 0.159, 0.162],
    )
});

static POWER_QUARTER: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[1.2, 1.3, 1.4, 1.6, 1.8, 2.2, 2.6, 3.0, 3.6],
        &[0.140, 0.156, 0.169, 0.192, 0.206, 0.227, 0.241, 0.249, 0.252],
    )
});

static POWER_HALF: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[0.925, 0.95, 1.0, 1.05, 1.1, 1.2, 1.3, 1.7, 2.0],
        &[0.0, 0.014, 0.050, 0.060, 0.059, 0.081, 0.084, 0.085, 0.078],
    )
});

static POWER_THREE_QUARTER: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[0.8, 0.9, 1.0, 1.06, 1.2, 1.4, 1.6, 2.0, 2.8, 3.4],
        &[0.0, 0.015, 0.078, 0.121, 0.110, 0.098, 0.090, 0.084, 0.078, 0.074],
    )
});

static VON_KARMAN: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[0.9, 0.95, 1.0, 1.05, 1.1, 1.2, 1.4, 1.6, 2.0, 3.0],
        &[0.0, 0.010, 0.027, 0.055, 0.070, 0.081, 0.095, 0.097, 0.091, 0.083],
    )
});

static LV_HAACK: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[0.9, 0.95, 1.0, 1.05, 1.1, 1.2, 1.4, 1.6, 2.0],
        &[0.0, 0.010, 0.024, 0.066, 0.084, 0.100, 0.114, 0.117, 0.113],
    )
});

static PARABOLIC_FULL: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[0.95, 0.975, 1.0, 1.05, 1.1, 1.2, 1.4, 1.7],
        &[0.0, 0.016, 0.041, 0.092, 0.109, 0.119, 0.113, 0.108],
    )
});

static PARABOLIC_HALF: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[0.8, 0.9, 0.95, 1.0, 1.05, 1.1, 1.3, 1.5, 1.8],
        &[0.0, 0.016, 0.042, 0.100, 0.126, 0.125, 0.100, 0.090, 0.088],
    )
});

static PARABOLIC_THREE_QUARTER: Lazy<LinearInterpolator> = Lazy::new(|| {
    LinearInterpolator::from_points(
        &[0.9, 0.95, 1.0, 1.05, 1.1, 1.2, 1.4, 1.7],
        &[0.0, 0.023, 0.073, 0.098, 0.107, 0.106, 0.089, 0.082],
    )
});

/// Stagnation pressure drag of a blunt face, Mach 0 to 3.
static BLUNT: Lazy<LinearInterpolator> = Lazy::new(|| {
    let mut interpolator = LinearInterpolator::new();
    for i in 0..60 {
        let mach = i as f64 * 0.05;
        interpolator.add_point(mach, stagnation_cd(mach));
    }
    interpolator
});

/// Values at Mach 1 and 1.3, then slopes at Mach 1 and 1.3.
static CONICAL_BRIDGE: Lazy<PolyInterpolator> =
    Lazy::new(|| PolyInterpolator::new(&[&[1.0, 1.3], &[1.0, 1.3]]));

fn ogive_interpolator(param: f64, sin_phi: f64) -> LinearInterpolator {
    let mut interpolator = LinearInterpolator::new();

    let cd_mach1 = 2.1 * pow2(sin_phi) + 0.6019 * sin_phi;
    let bridge = CONICAL_BRIDGE.coefficients(&[
        sin_phi,
        cd_mach1,
        4.0 / (GAMMA + 1.0) * (1.0 - 0.5 * cd_mach1),
        -1.1341 * sin_phi,
    ]);

    // Secant ogives between cone and tangent ogive
    let mul = 0.72 * pow2(param - 0.5) + 0.82;

    for i in 0..=15 {
        let mach = 1.0 + 0.02 * i as f64;
        interpolator.add_point(mach, mul * PolyInterpolator::eval(mach, &bridge));
    }
    for i in 0..134 {
        let mach = 1.32 + 0.02 * i as f64;
        interpolator.add_point(
            mach,
            mul * (2.1 * pow2(sin_phi) + 0.5 * sin_phi / (mach * mach - 1.0).sqrt()),
        );
    }
    interpolator
}

fn blend(lower: &LinearInterpolator, upper: &LinearInterpolator, p: f64) -> LinearInterpolator {
    let mut blended = LinearInterpolator::new();
    for mach in lower.x_points().into_iter().chain(upper.x_points()) {
        blended.add_point(mach, p * upper.value(mach) + (1.0 - p) * lower.value(mach));
    }
    blended
}

/// Pressure drag coefficient (referenced to the frontal annulus) versus Mach
/// number for a fore-body whose radius grows from fore to aft.
pub fn nose_pressure_interpolator(profile: &BodyProfile, fineness: f64) -> LinearInterpolator {
    let length = profile.length;
    let r = profile.radius(0.99 * length);
    let sin_phi = (profile.aft_radius - r) / (profile.aft_radius - r).hypot(0.01 * length);
    let param = profile.shape_parameter;
    let cone_like = || ogive_interpolator(0.0, 1.0 / (1.0 + 4.0 * pow2(fineness)).sqrt());

    let tabulated: LinearInterpolator = match profile.shape {
        TransitionShape::Conical => return with_subsonic_fill(ogive_interpolator(0.0, sin_phi), sin_phi),
        TransitionShape::Ogive => {
            return with_subsonic_fill(ogive_interpolator(param, sin_phi), sin_phi)
        }
        TransitionShape::Ellipsoid => ELLIPSOID.clone(),
        TransitionShape::Power => {
            if param <= 0.25 {
                blend(&BLUNT, &POWER_QUARTER, param * 4.0)
            } else if param <= 0.5 {
                blend(&POWER_QUARTER, &POWER_HALF, (param - 0.25) * 4.0)
            } else if param <= 0.75 {
                blend(&POWER_HALF, &POWER_THREE_QUARTER, (param - 0.5) * 4.0)
            } else {
                blend(&POWER_THREE_QUARTER, &cone_like(), (param - 0.75) * 4.0)
            }
        }
        TransitionShape::Parabolic => {
            if param <= 0.5 {
                blend(&cone_like(), &PARABOLIC_HALF, param * 2.0)
            } else if param <= 0.75 {
                blend(&PARABOLIC_HALF, &PARABOLIC_THREE_QUARTER, (param - 0.5) * 4.0)
            } else {
                blend(&PARABOLIC_THREE_QUARTER, &PARABOLIC_FULL, (param - 0.75) * 4.0)
            }
        }
        TransitionShape::Haack => blend(&VON_KARMAN, &LV_HAACK, param * 3.0),
    };

    // Tables were measured at fineness ratio 3
    let log4 = (fineness + 1.0).ln() / 4.0_f64.ln();
    let mut interpolator = LinearInterpolator::new();
    for mach in tabulated.x_points() {
        let stagnation = BLUNT.value(mach);
        interpolator.add_point(mach, stagnation * (tabulated.value(mach) / stagnation).powf(log4));
    }

    with_subsonic_fill(interpolator, sin_phi)
}

/// Extend below the first tabulated Mach number with `cd = a M^b + cd0`.
fn with_subsonic_fill(mut interpolator: LinearInterpolator, sin_phi: f64) -> LinearInterpolator {
    let min = match interpolator.x_points().first() {
        Some(&min) => min,
        None => return interpolator,
    };
    let min_value = interpolator.value(min);
    if min_value < 0.001 {
        return interpolator;
    }

    let cd_mach0 = 0.8 * pow2(sin_phi);
    let min_deriv = (interpolator.value(min + 0.01) - min_value) / 0.01;
    if cd_mach0 >= min_value - 0.01 || min_deriv <= 0.01 {
        return interpolator;
    }

    let a = min_value - cd_mach0;
    let b = min_deriv / a;
    let mut i = 0;
    loop {
        let mach = 0.05 * i as f64;
        if mach >= min {
            break;
        }
        interpolator.add_point(mach, a * mach.powf(b) + cd_mach0);
        i += 1;
    }
    interpolator
}
