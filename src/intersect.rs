//! Ray-sphere intersection
//!
//! Closed-form line/sphere test that reports the *far* root of the quadratic,
//! i.e. the point where the ray leaves the sphere. Roots closer than
//! [`MIN_HIT_DISTANCE`] are discarded so a continuation ray starting on a
//! surface does not immediately hit that surface again.

use crate::math::{safe_normalize, Point3, Vec3};
use crate::scene::Sphere;

/// Hits closer than this to the ray origin are ignored.
pub const MIN_HIT_DISTANCE: f32 = 0.01;

/// A ray in 3D space. The direction need not be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }
}

/// A successful ray/sphere hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Point3,
    /// Distance from the ray origin along the normalized direction
    pub distance: f32,
}

/// Intersect `ray` with `sphere`, returning the far hit if there is one.
pub fn intersect(ray: &Ray, sphere: &Sphere) -> Option<Intersection> {
    // A zero direction (e.g. passed through from total internal reflection) can't hit anything
    let u = safe_normalize(&ray.direction)?;
    let oc = ray.origin - sphere.origin;

    let b = u.dot(&oc);
    let c = oc.dot(&oc) - sphere.radius * sphere.radius;
    let delta = b * b - c;

    if delta.is_nan() || delta < 0.0 {
        return None;
    }

    let sqrt_delta = delta.sqrt();
    let d1 = -b - sqrt_delta;
    let d2 = -b + sqrt_delta;
    let d = d1.max(d2);

    if d < MIN_HIT_DISTANCE {
        return None;
    }

    Some(Intersection {
        point: ray.origin + u * d,
        distance: d,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere_at(z: f32) -> Sphere {
        Sphere::new(Point3::new(0.0, 0.0, z), 1.0, Vec3::new(1.0, 0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));
        assert!((ray.at(5.0).x - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_hit_reports_far_root() {
        let sphere = unit_sphere_at(10.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));

        let hit = intersect(&ray, &sphere).expect("ray aimed at the center must hit");
        assert!((hit.distance - 6.0).abs() < 1e-4);
        assert!((hit.point - Point3::new(0.0, 0.0, 11.0)).norm() < 1e-4);
        assert!(((hit.point - sphere.origin).norm() - sphere.radius).abs() < 1e-4);
    }

    #[test]
    fn test_direction_need_not_be_normalized() {
        let sphere = unit_sphere_at(10.0);
        let short = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 0.25));
        let long = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 40.0));
        let a = intersect(&short, &sphere).unwrap();
        let b = intersect(&long, &sphere).unwrap();
        assert!((a.point - b.point).norm() < 1e-4);
    }

    #[test]
    fn test_miss_when_discriminant_negative() {
        let sphere = unit_sphere_at(10.0);
        let ray = Ray::new(Point3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect(&ray, &sphere).is_none());
    }

    #[test]
    fn test_miss_when_sphere_is_behind() {
        let sphere = unit_sphere_at(10.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 20.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect(&ray, &sphere).is_none());
    }

    #[test]
    fn test_origin_on_exit_surface_is_rejected() {
        // Starting exactly where the previous bounce left the sphere
        let sphere = unit_sphere_at(10.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 11.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect(&ray, &sphere).is_none());
    }

    #[test]
    fn test_origin_inside_hits_exit() {
        let sphere = unit_sphere_at(10.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 1.0, 0.0));
        let hit = intersect(&ray, &sphere).unwrap();
        assert!((hit.point - Point3::new(0.0, 1.0, 10.0)).norm() < 1e-4);
    }

    #[test]
    fn test_zero_direction_is_a_miss() {
        let sphere = unit_sphere_at(10.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), Vec3::zeros());
        assert!(intersect(&ray, &sphere).is_none());
    }

    #[test]
    fn test_grazing_rays_never_produce_nan() {
        let sphere = unit_sphere_at(10.0);
        for i in 0..200 {
            let x = 0.99 + i as f32 * 0.0001;
            let ray = Ray::new(Point3::new(x, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
            if let Some(hit) = intersect(&ray, &sphere) {
                assert!(hit.point.coords.iter().all(|c| c.is_finite()));
            }
        }
    }
}
