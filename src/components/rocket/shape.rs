use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::utils::{pow2, pow3, EPSILON};

const PROFILE_DIVISIONS: usize = 128;

/// Profile family of a nose cone or transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionShape {
    Conical,
    /// Tangent ogive at parameter 1, secant ogives below, conical at 0
    Ogive,
    Ellipsoid,
    /// `r = R (x/L)^k`
    Power,
    /// `r = R (2x/L - k (x/L)²) / (2 - k)`
    Parabolic,
    /// LD-Haack family, von Kármán at parameter 0
    Haack,
}

impl TransitionShape {
    /// Radius at `x` of a nose of this shape growing from zero to `radius` over `length`.
    pub fn radius(&self, x: f64, radius: f64, length: f64, param: f64) -> f64 {
        if length <= 0.0 {
            return radius;
        }
        let x = x.clamp(0.0, length);

        match self {
            TransitionShape::Conical => radius * x / length,

            TransitionShape::Ogive => {
                if param < 0.001 {
                    return TransitionShape::Conical.radius(x, radius, length, param);
                }
                let (x, length) = if length < radius {
                    (x * radius / length, radius)
                } else {
                    (x, length)
                };
                let rc = ((pow2(length) + pow2(radius))
                    * (pow2((2.0 - param) * length) + pow2(param * radius))
                    / (4.0 * pow2(param * radius)))
                .sqrt();
                let lc = length / param;
                let y0 = (pow2(rc) - pow2(lc)).max(0.0).sqrt();
                ((pow2(rc) - pow2(lc - x)).max(0.0).sqrt() - y0).max(0.0)
            }

            TransitionShape::Ellipsoid => {
                let x = x * radius / length;
                (2.0 * radius * x - x * x).max(0.0).sqrt()
            }

            TransitionShape::Power => {
                if param <= 1e-5 {
                    if x <= EPSILON {
                        0.0
                    } else {
                        radius
                    }
                } else {
                    radius * (x / length).powf(param)
                }
            }

            TransitionShape::Parabolic => {
                let t = x / length;
                radius * (2.0 * t - param * t * t) / (2.0 - param)
            }

            TransitionShape::Haack => {
                let theta = (1.0 - 2.0 * x / length).clamp(-1.0, 1.0).acos();
                radius
                    * ((theta - (2.0 * theta).sin() / 2.0 + param * pow3(theta.sin())) / PI)
                        .max(0.0)
                        .sqrt()
            }
        }
    }
}

/// Axisymmetric outer profile of a body component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProfile {
    pub fore_radius: f64,
    pub aft_radius: f64,
    pub length: f64,
    /// Wall thickness
    pub thickness: f64,
    pub shape: TransitionShape,
    pub shape_parameter: f64,
}

impl BodyProfile {
    pub fn cylinder(radius: f64, length: f64, thickness: f64) -> Self {
        Self {
            fore_radius: radius,
            aft_radius: radius,
            length,
            thickness,
            shape: TransitionShape::Conical,
            shape_parameter: 0.0,
        }
    }

    pub fn max_radius(&self) -> f64 {
        self.fore_radius.max(self.aft_radius)
    }

    pub fn is_cylinder(&self) -> bool {
        self.fore_radius == self.aft_radius
    }

    /// Outer radius at axial distance `x` from the fore end.
    pub fn radius(&self, x: f64) -> f64 {
        let (r1, r2) = (self.fore_radius, self.aft_radius);
        if r1 == r2 {
            return r1;
        }
        let x = x.clamp(0.0, self.length);
        if r1 > r2 {
            r2 + self
                .shape
                .radius(self.length - x, r1 - r2, self.length, self.shape_parameter)
        } else {
            r1 + self
                .shape
                .radius(x, r2 - r1, self.length, self.shape_parameter)
        }
    }

    fn slices(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        let h = self.length / PROFILE_DIVISIONS as f64;
        (0..PROFILE_DIVISIONS).map(move |i| {
            let x0 = i as f64 * h;
            let x1 = x0 + h;
            (x0, x1, self.radius(x0), self.radius(x1))
        })
    }

    /// Volume enclosed by the outer surface.
    pub fn full_volume(&self) -> f64 {
        if self.is_cylinder() {
            return PI * pow2(self.fore_radius) * self.length;
        }
        self.slices()
            .map(|(x0, x1, r0, r1)| PI * (x1 - x0) * (r0 * r0 + r0 * r1 + r1 * r1) / 3.0)
            .sum()
    }

    /// Lateral outer surface area.
    pub fn wetted_area(&self) -> f64 {
        if self.is_cylinder() {
            return 2.0 * PI * self.fore_radius * self.length;
        }
        self.slices()
            .map(|(x0, x1, r0, r1)| PI * (r0 + r1) * ((x1 - x0).hypot(r1 - r0)))
            .sum()
    }

    /// Side-projected area.
    pub fn planform_area(&self) -> f64 {
        if self.is_cylinder() {
            return 2.0 * self.fore_radius * self.length;
        }
        self.slices().map(|(x0, x1, r0, r1)| (x1 - x0) * (r0 + r1)).sum()
    }

    /// Axial centroid of the planform, from the fore end.
    pub fn planform_center(&self) -> f64 {
        if self.is_cylinder() {
            return self.length / 2.0;
        }
        let (moment, area) = self
            .slices()
            .fold((0.0, 0.0), |(moment, area), (x0, x1, r0, r1)| {
                let a = (x1 - x0) * (r0 + r1);
                (moment + a * (x0 + x1) / 2.0, area + a)
            });
        if area < EPSILON {
            self.length / 2.0
        } else {
            moment / area
        }
    }
}
