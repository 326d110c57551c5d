//! Small vector helpers shared by the deduplicator and the normal generators.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Normalize `v`, or return the zero vector when its squared length is not above
/// `min_norm_squared`. Never produces NaN.
#[inline]
pub fn normalize_or_zero(v: &Vector3<Real>, min_norm_squared: Real) -> Vector3<Real> {
    let norm_squared = v.norm_squared();
    if norm_squared > min_norm_squared && norm_squared.is_finite() {
        v / norm_squared.sqrt()
    } else {
        Vector3::zeros()
    }
}

/// **Smallest angle between two directions**
///
/// `acos` of the dot product, clamped into `[-1, 1]`. Both inputs are expected
/// to be unit length (face normals); a zero vector yields `π/2`.
#[inline]
pub fn smallest_angle_between(a: &Vector3<Real>, b: &Vector3<Real>) -> Real {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Unit normal of triangle `(v0, v1, v2)`, computed as
/// `normalize(cross(v2 - v1, v0 - v1))`. Counter-clockwise winding faces the viewer.
///
/// Degenerate triangles give the zero vector.
#[inline]
pub fn face_normal(v0: &Point3<Real>, v1: &Point3<Real>, v2: &Point3<Real>) -> Vector3<Real> {
    let n = (v2 - v1).cross(&(v0 - v1));
    normalize_or_zero(&n, Real::EPSILON * Real::EPSILON)
}
