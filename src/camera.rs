//! Camera ray generation
//!
//! The eye pose is owned by the frame driver; this module only maps a
//! normalized screen coordinate plus that pose to a world-space ray.

use crate::intersect::Ray;
use crate::math::{transform, Mat3, Point3, Vec2, Vec3};

/// Default distance from the eye to the image plane
pub const DEFAULT_FOCAL_LENGTH: f32 = 1.0;

/// Eye position and orientation for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eye {
    pub origin: Point3,
    /// Column-major rotation applied to every view direction
    pub rotation: Mat3,
}

impl Default for Eye {
    fn default() -> Self {
        Self {
            origin: Point3::origin(),
            rotation: Mat3::identity(),
        }
    }
}

impl Eye {
    pub fn new(origin: Point3, rotation: Mat3) -> Self {
        Self { origin, rotation }
    }

    pub fn at(origin: Point3) -> Self {
        Self { origin, ..Self::default() }
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.origin += delta;
    }

    /// Move the eye according to the keys held this frame. Rotation is left alone.
    pub fn apply_input(&mut self, input: &InputState, step: f32) {
        self.translate(input.direction() * step);
    }
}

/// Movement keys held during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    /// Unscaled translation requested by the held keys
    pub fn direction(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        Vec3::new(
            axis(self.right, self.left),
            axis(self.up, self.down),
            axis(self.forward, self.back),
        )
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Build the world-space ray through screen coordinate `st` in [-1, 1]^2.
pub fn camera_ray(st: Vec2, eye: &Eye, focal_length: f32) -> Ray {
    let local = Vec3::new(st.x, st.y, focal_length).normalize();
    Ray::new(eye.origin, transform(&eye.rotation, &local))
}

/// Map the center of pixel (x, y) to screen coordinates. `y` grows downward,
/// `t` grows upward.
pub fn pixel_to_st(x: usize, y: usize, width: usize, height: usize) -> Vec2 {
    let s = 2.0 * ((x as f32 + 0.5) / width as f32) - 1.0;
    let t = 1.0 - 2.0 * ((y as f32 + 0.5) / height as f32);
    Vec2::new(s, t)
}
