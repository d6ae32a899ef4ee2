use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::utils::EPSILON;

/// Point in vehicle coordinates carrying a weight.
///
/// When used as a center of pressure the weight is the normal force
/// coefficient derivative (CNα) of the contributing part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub weight: f64,
}

impl Coordinate {
    pub const ZERO: Coordinate = Coordinate {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        weight: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64, weight: f64) -> Self {
        Self { x, y, z, weight }
    }

    /// Unweighted point on the x axis.
    pub fn axial(x: f64) -> Self {
        Self::new(x, 0.0, 0.0, 0.0)
    }

    pub fn with_weight(self, weight: f64) -> Self {
        Self { weight, ..self }
    }

    /// Projection onto the vehicle axis.
    pub fn axial_only(self) -> Self {
        Self {
            y: 0.0,
            z: 0.0,
            ..self
        }
    }

    pub fn is_weightless(&self) -> bool {
        self.weight.abs() < EPSILON
    }

    /// Weighted average of two coordinates.
    ///
    /// If the combined weight vanishes the plain midpoint is returned with
    /// zero weight.
    pub fn average(&self, other: &Coordinate) -> Coordinate {
        let w = self.weight + other.weight;
        if w.abs() < EPSILON * EPSILON {
            return Coordinate::new(
                (self.x + other.x) / 2.0,
                (self.y + other.y) / 2.0,
                (self.z + other.z) / 2.0,
                0.0,
            );
        }
        Coordinate::new(
            (self.x * self.weight + other.x * other.weight) / w,
            (self.y * self.weight + other.y * other.weight) / w,
            (self.z * self.weight + other.z * other.weight) / w,
            w,
        )
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, other: Coordinate) -> Coordinate {
        Coordinate::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.weight + other.weight,
        )
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, other: Coordinate) -> Coordinate {
        Coordinate::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.weight - other.weight,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weighted_average() {
        let a = Coordinate::new(1.0, 0.0, 0.0, 1.0);
        let b = Coordinate::new(4.0, 0.0, 0.0, 2.0);
        let avg = a.average(&b);
        assert_relative_eq!(avg.x, 3.0);
        assert_relative_eq!(avg.weight, 3.0);
    }

    #[test]
    fn test_average_of_weightless_is_midpoint() {
        let a = Coordinate::new(1.0, 2.0, 0.0, 0.0);
        let b = Coordinate::new(3.0, 0.0, 0.0, 0.0);
        let avg = a.average(&b);
        assert_eq!(avg, Coordinate::new(2.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_add_sums_weight() {
        let c = Coordinate::new(1.0, 1.0, 1.0, 1.0) + Coordinate::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(c, Coordinate::new(2.0, 3.0, 4.0, 5.0));
    }
}
