//! Vector and matrix helpers shared by the kernel
//!
//! Thin layer over nalgebra. Everything here is a pure function on `Copy`
//! values; nothing allocates.

use nalgebra::{Matrix3, Point3 as NaPoint3, Vector2, Vector3};

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;
pub type Mat3 = Matrix3<f32>;
pub type Point3 = NaPoint3<f32>;

/// Vectors shorter than this are treated as degenerate and never normalized.
pub const NORMALIZE_EPSILON: f32 = 1e-12;

/// Normalize `v`, or `None` if it is too short to have a direction.
pub fn safe_normalize(v: &Vec3) -> Option<Vec3> {
    v.try_normalize(NORMALIZE_EPSILON)
}

/// Normalize `v`, falling back to the zero vector for degenerate input.
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    safe_normalize(v).unwrap_or_else(Vec3::zeros)
}

/// Mirror `incident` about the surface normal `normal`.
pub fn reflect(incident: &Vec3, normal: &Vec3) -> Vec3 {
    *incident - 2.0 * normal.dot(incident) * *normal
}

/// Bend `incident` through a surface with relative index `eta`.
///
/// Both vectors are expected to be unit length. On total internal reflection
/// the zero vector is returned; callers decide what a zero direction means.
pub fn refract(incident: &Vec3, normal: &Vec3, eta: f32) -> Vec3 {
    let cos_i = normal.dot(incident);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return Vec3::zeros();
    }
    eta * *incident - (eta * cos_i + k.sqrt()) * *normal
}

/// Rotate a direction by a 3x3 (column-major) matrix.
pub fn transform(matrix: &Mat3, direction: &Vec3) -> Vec3 {
    *matrix * *direction
}
