//! Glass sphere ray tracer
//!
//! A per-pixel kernel traces each camera ray through a small fixed scene of
//! refractive spheres, summing a shading term at every bounce. A thin frame
//! driver runs the kernel in parallel and draws the result in the terminal.

pub mod math;
pub mod scene;
pub mod intersect;
pub mod shade;
pub mod bounce;
pub mod camera;
pub mod plane;
pub mod config;
pub mod renderer;
pub mod terminal;

pub use bounce::{step, trace, Bounce, Job};
pub use camera::{camera_ray, Eye};
pub use config::AppConfig;
pub use renderer::{FrameInput, Renderer};
pub use scene::World;

/// Bounces per camera ray
pub const MAX_BOUNCES: u32 = 3;

/// Upper bound accepted from configuration
pub const BOUNCE_LIMIT: u32 = 10;

/// Refractive index of the sphere material
pub const REFRACTIVE_INDEX: f32 = 1.1;

/// UTF-8 character gradient from dark to light
pub const ASCII_GRADIENT: &str = " ·∙:;░▒▓█";
