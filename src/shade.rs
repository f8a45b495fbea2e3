//! Local shading at a hit point
//!
//! Lambertian diffuse weighted by a grazing-angle factor, scaled up so the
//! contributions of several bounces can be summed.

use crate::intersect::{Intersection, Ray};
use crate::math::{normalize_or_zero, Vec3};
use crate::scene::{Sphere, Sun};

/// Exponent of the grazing (Fresnel-like) factor
pub const FRESNEL_EXPONENT: i32 = 2;

/// Brightness applied to every bounce. Not normalized.
pub const INTENSITY_SCALE: f32 = 8.0;

/// Color contributed by `sphere` at `hit` for a ray coming from `ray.origin`.
pub fn shade(ray: &Ray, hit: &Intersection, sphere: &Sphere, sun: &Sun) -> Vec3 {
    let normal = sphere.normal_at(&hit.point);
    let light = normalize_or_zero(&(hit.point - sun.origin));
    let view = normalize_or_zero(&(hit.point - ray.origin));

    let lambert = sphere.color * normal.dot(&light).max(0.0);
    let fresnel = (1.0 - normal.dot(&view).clamp(0.0, 1.0)).powi(FRESNEL_EXPONENT);

    lambert * fresnel * INTENSITY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn red_sphere() -> Sphere {
        Sphere::new(Point3::origin(), 1.0, Vec3::new(1.0, 0.0, 0.0)).unwrap()
    }

    fn hit_at(point: Point3) -> Intersection {
        Intersection { point, distance: 1.0 }
    }

    #[test]
    fn test_head_on_view_is_black() {
        // View vector parallel to the normal: grazing factor is zero
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let sun = Sun::new(Point3::new(0.0, 0.0, -10.0));
        let color = shade(&ray, &hit_at(Point3::new(0.0, 0.0, 1.0)), &red_sphere(), &sun);
        assert_eq!(color, Vec3::zeros());
    }

    #[test]
    fn test_grazing_view_full_light() {
        // Normal +x, view along +z, light direction (point - sun) along +x
        let ray = Ray::new(Point3::new(1.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let sun = Sun::new(Point3::new(-10.0, 0.0, 0.0));
        let color = shade(&ray, &hit_at(Point3::new(1.0, 0.0, 0.0)), &red_sphere(), &sun);
        assert!((color.x - INTENSITY_SCALE).abs() < 1e-4);
        assert_eq!(color.y, 0.0);
        assert_eq!(color.z, 0.0);
    }

    #[test]
    fn test_light_behind_surface_is_clamped() {
        let ray = Ray::new(Point3::new(1.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let sun = Sun::new(Point3::new(10.0, 0.0, 0.0));
        let color = shade(&ray, &hit_at(Point3::new(1.0, 0.0, 0.0)), &red_sphere(), &sun);
        assert_eq!(color, Vec3::zeros());
    }

    #[test]
    fn test_fresnel_exponent_applied() {
        // 60 degrees between normal and view: (1 - 0.5)^2 = 0.25
        let sun = Sun::new(Point3::new(-10.0, 0.0, 0.0));
        let view_dir = Vec3::new(0.5, 0.0, 3f32.sqrt() / 2.0);
        let point = Point3::new(1.0, 0.0, 0.0);
        let ray = Ray::new(point - view_dir * 4.0, view_dir);
        let color = shade(&ray, &hit_at(point), &red_sphere(), &sun);
        assert!((color.x - 0.25 * INTENSITY_SCALE).abs() < 1e-4);
    }
}
