//! Plane probe
//!
//! A single-plane hit mask, tinted over time. Useful for checking the camera
//! mapping and the frame clock without any of the sphere machinery.

use crate::intersect::Ray;
use crate::math::{Point3, Vec3};

/// `dot(normal, direction)` below this counts as parallel (or facing away)
const PARALLEL_EPSILON: f32 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vec3) -> Self {
        Self { origin, normal }
    }

    /// The tilted plane used by the probe render mode
    pub fn probe() -> Self {
        Self::new(Point3::new(0.0, 0.0, 10.0), Vec3::new(2.0, 5.0, 1.0))
    }
}

/// Point where `ray` crosses `plane`, if it does so in front of the origin.
///
/// The point is measured from the world origin (`t * direction`), which is
/// where the probe eye sits.
pub fn intersect_plane(ray: &Ray, plane: &Plane) -> Option<Point3> {
    let denom = ray.direction.dot(&plane.normal);
    if denom < PARALLEL_EPSILON {
        return None;
    }

    let t = (plane.origin - ray.origin).dot(&plane.normal) / denom;
    if t < 0.0 {
        return None;
    }

    Some(Point3::from(ray.direction * t))
}

/// Red marks a hit, green pulses with the frame clock.
pub fn probe_color(ray: &Ray, plane: &Plane, elapsed_ms: u32) -> Vec3 {
    let hit = if intersect_plane(ray, plane).is_some() { 1.0 } else { 0.0 };
    let pulse = (elapsed_ms as f32 * 0.001).sin();
    Vec3::new(hit, pulse, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_in_front() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));
        let p = intersect_plane(&ray, &plane).unwrap();
        assert!((p - Point3::new(0.0, 0.0, 10.0)).norm() < 1e-5);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        let ray = Ray::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_plane(&ray, &plane).is_none());
    }

    #[test]
    fn test_plane_behind_misses() {
        let plane = Plane::new(Point3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect_plane(&ray, &plane).is_none());
    }

    #[test]
    fn test_probe_color_pulses() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));
        let plane = Plane::probe();
        let c0 = probe_color(&ray, &plane, 0);
        assert_eq!(c0, Vec3::new(1.0, 0.0, 0.0));

        let c1 = probe_color(&ray, &plane, 1571);
        assert!((c1.y - 1.0).abs() < 1e-3);
    }
}
