//! Points, vectors and angle measurement for connector geometry.

use nalgebra::{Point3, Vector3};

pub type Point = Point3<f64>;
pub type Vector = Vector3<f64>;

/// Vectors shorter than this are treated as degenerate.
const MIN_NORM: f64 = 1e-9;

/// Angle between two vectors in degrees, `None` if either is degenerate.
pub fn angle_deg(a: &Vector, b: &Vector) -> Option<f64> {
    if a.norm() < MIN_NORM || b.norm() < MIN_NORM {
        return None;
    }
    Some(a.angle(b).to_degrees())
}

/// Angle at `apex` between the rays towards `a` and `b`, in degrees.
pub fn angle_at(apex: &Point, a: &Point, b: &Point) -> Option<f64> {
    angle_deg(&(a - apex), &(b - apex))
}

/// How far a flow path `a -> apex -> b` turns away from straight, in degrees.
///
/// A straight run gives 0, a right-angle bend 90.
pub fn deflection_at(apex: &Point, a: &Point, b: &Point) -> Option<f64> {
    angle_at(apex, a, b).map(|angle| 180.0 - angle)
}

/// Whether `angle` is within `tolerance` degrees of a right angle.
pub fn is_right_angle(angle: f64, tolerance: f64) -> bool {
    (angle - 90.0).abs() <= tolerance
}
