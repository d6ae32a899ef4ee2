use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

use crate::components::Coordinate;

/// Rigid transform from component-local to vehicle coordinates.
///
/// Rocket components only ever rotate about the body x axis, so the
/// roll angle is recoverable with [`Transformation::x_rotation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    isometry: Isometry3<f64>,
}

impl Default for Transformation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transformation {
    pub fn identity() -> Self {
        Self {
            isometry: Isometry3::identity(),
        }
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            isometry: Isometry3::from_parts(
                Translation3::new(x, y, z),
                UnitQuaternion::identity(),
            ),
        }
    }

    pub fn rotate_x(angle: f64) -> Self {
        Self {
            isometry: Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angle),
            ),
        }
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn then(&self, other: &Transformation) -> Transformation {
        Transformation {
            isometry: self.isometry * other.isometry,
        }
    }

    /// Transform a point, preserving its weight.
    pub fn transform(&self, c: &Coordinate) -> Coordinate {
        let p = self.isometry * Point3::new(c.x, c.y, c.z);
        Coordinate::new(p.x, p.y, p.z, c.weight)
    }

    /// Roll angle about the body x axis.
    pub fn x_rotation(&self) -> f64 {
        let (roll, _, _) = self.isometry.rotation.euler_angles();
        roll
    }

    pub fn offset(&self) -> Vector3<f64> {
        self.isometry.translation.vector
    }
}
