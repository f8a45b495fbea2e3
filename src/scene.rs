//! Scene definitions for the glass sphere tracer

use crate::math::{Point3, Vec3};

/// Errors raised while building scene primitives
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
}

/// Sphere primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub origin: Point3,
    pub radius: f32,
    /// Albedo, components in [0, 1]
    pub color: Vec3,
}

impl Sphere {
    pub fn new(origin: Point3, radius: f32, color: Vec3) -> Result<Self, SceneError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::InvalidRadius(radius));
        }
        Ok(Self { origin, radius, color })
    }

    /// Outward unit normal at a point on (or near) the surface
    pub fn normal_at(&self, point: &Point3) -> Vec3 {
        crate::math::normalize_or_zero(&(point - self.origin))
    }
}

/// Point light. Only its position matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sun {
    pub origin: Point3,
}

impl Sun {
    pub fn new(origin: Point3) -> Self {
        Self { origin }
    }
}

/// The complete scene: spheres in scan order plus the sun
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    spheres: Vec<Sphere>,
    sun: Sun,
}

impl Default for World {
    fn default() -> Self {
        Self::glass_trio()
    }
}

impl World {
    pub fn new(spheres: Vec<Sphere>, sun: Sun) -> Self {
        Self { spheres, sun }
    }

    /// Red, green and blue glass spheres staggered along +z, lit from far away
    pub fn glass_trio() -> Self {
        let spheres = vec![
            Sphere { origin: Point3::new(0.0, 0.0, 10.0), radius: 1.0, color: Vec3::new(1.0, 0.0, 0.0) },
            Sphere { origin: Point3::new(1.0, 0.0, 12.0), radius: 1.0, color: Vec3::new(0.0, 1.0, 0.0) },
            Sphere { origin: Point3::new(-1.0, 0.0, 14.0), radius: 1.0, color: Vec3::new(0.0, 0.0, 1.0) },
        ];

        Self {
            spheres,
            sun: Sun::new(Point3::new(100.0, -100.0, 100.0)),
        }
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}
