//! Frame driver
//!
//! Invokes the kernel once per pixel for a frame snapshot and turns the
//! unbounded accumulated colors into something displayable.

use std::path::Path;
use std::time::Instant;

use image::{ImageBuffer, Rgb};
use nalgebra::Vector4;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::bounce::trace;
use crate::camera::{camera_ray, pixel_to_st, Eye, DEFAULT_FOCAL_LENGTH};
use crate::config::{RenderConfig, RenderMode};
use crate::math::Vec3;
use crate::plane::{probe_color, Plane};
use crate::scene::World;
use crate::MAX_BOUNCES;

/// Read-only inputs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Milliseconds since the driver started
    pub elapsed_ms: u32,
    pub eye: Eye,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to write frame: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Clamp an accumulated color into the displayable range
pub fn tone_map(color: &Vec3) -> Vec3 {
    color.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) })
}

/// Per-pixel renderer holding the last frame's accumulated colors
pub struct Renderer {
    width: usize,
    height: usize,
    framebuffer: Vec<Vec3>,
    mode: RenderMode,
    max_bounces: u32,
    focal_length: f32,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            framebuffer: vec![Vec3::zeros(); width * height],
            mode: RenderMode::Glass,
            max_bounces: MAX_BOUNCES,
            focal_length: DEFAULT_FOCAL_LENGTH,
        }
    }

    pub fn from_config(width: usize, height: usize, config: &RenderConfig) -> Self {
        Self {
            mode: config.mode,
            max_bounces: config.max_bounces,
            focal_length: config.focal_length,
            ..Self::new(width, height)
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        debug!(width, height, "Resizing framebuffer");
        self.width = width;
        self.height = height;
        self.framebuffer = vec![Vec3::zeros(); width * height];
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn max_bounces(&self) -> u32 {
        self.max_bounces
    }

    /// Accumulated (unclamped) color of a pixel
    pub fn color_at(&self, x: usize, y: usize) -> Vec3 {
        self.framebuffer[y * self.width + x]
    }

    /// Output pixel as RGBA; alpha is always opaque
    pub fn rgba_at(&self, x: usize, y: usize) -> Vector4<f32> {
        let c = self.color_at(x, y);
        Vector4::new(c.x, c.y, c.z, 1.0)
    }

    /// Render one frame. Pixels are independent and computed in parallel.
    pub fn render(&mut self, world: &World, frame: &FrameInput) {
        let start = Instant::now();
        let width = self.width;
        let height = self.height;
        let mode = self.mode;
        let max_bounces = self.max_bounces;
        let focal_length = self.focal_length;
        let eye = frame.eye;
        let elapsed_ms = frame.elapsed_ms;
        let plane = Plane::probe();

        let colors: Vec<Vec3> = (0..height)
            .into_par_iter()
            .flat_map(|y| {
                (0..width).into_par_iter().map(move |x| {
                    let st = pixel_to_st(x, y, width, height);
                    let ray = camera_ray(st, &eye, focal_length);
                    match mode {
                        RenderMode::Glass => trace(ray, world, max_bounces),
                        RenderMode::Probe => probe_color(&ray, &plane, elapsed_ms),
                    }
                })
            })
            .collect();

        self.framebuffer = colors;

        debug!(
            width,
            height,
            elapsed_ms,
            render_ms = start.elapsed().as_secs_f32() * 1000.0,
            "Frame rendered"
        );
    }

    /// Convert framebuffer to ASCII string (grayscale)
    pub fn to_ascii(&self) -> String {
        let gradient_chars: Vec<char> = crate::ASCII_GRADIENT.chars().collect();
        let mut result = String::with_capacity(self.width * self.height + self.height);

        for y in 0..self.height {
            for x in 0..self.width {
                let color = tone_map(&self.color_at(x, y));
                let luminance = (0.299 * color.x + 0.587 * color.y + 0.114 * color.z).clamp(0.0, 1.0);

                let index = ((luminance * (gradient_chars.len() - 1) as f32).round() as usize)
                    .min(gradient_chars.len() - 1);

                result.push(gradient_chars[index]);
            }
            result.push('\n');
        }

        result
    }

    /// Convert RGB (0-255) to 256-color palette index
    fn rgb_to_256color(r: u8, g: u8, b: u8) -> u8 {
        // 6x6x6 color cube (colors 16-231)
        let r6 = (r as u16 * 6 / 256) as u8;
        let g6 = (g as u16 * 6 / 256) as u8;
        let b6 = (b as u16 * 6 / 256) as u8;
        16 + 36 * r6 + 6 * g6 + b6
    }

    fn to_rgb8(color: &Vec3) -> [u8; 3] {
        let c = tone_map(color);
        [(c.x * 255.0) as u8, (c.y * 255.0) as u8, (c.z * 255.0) as u8]
    }

    /// Half-block output with two vertical pixels per character.
    /// Upper pixel is the foreground color, lower pixel the background.
    pub fn to_ascii_halfblock(&self) -> String {
        let mut dithered: Vec<Vec3> = self.framebuffer.iter().map(tone_map).collect();
        self.apply_dithering(&mut dithered);

        let output_height = self.height.div_ceil(2);
        let mut result = String::with_capacity(self.width * output_height * 15);

        // ANSI state carries across cells and lines
        let mut last_fg: Option<u8> = None;
        let mut last_bg: Option<u8> = None;

        for y in 0..output_height {
            let top_y = y * 2;
            let bottom_y = y * 2 + 1;

            for x in 0..self.width {
                let [r, g, b] = Self::to_rgb8(&dithered[top_y * self.width + x]);
                let fg = Self::rgb_to_256color(r, g, b);

                let bg = if bottom_y < self.height {
                    let [r, g, b] = Self::to_rgb8(&dithered[bottom_y * self.width + x]);
                    Self::rgb_to_256color(r, g, b)
                } else {
                    16 // black
                };

                let fg_changed = last_fg != Some(fg);
                let bg_changed = last_bg != Some(bg);

                if fg_changed && bg_changed {
                    result.push_str(&format!("\x1b[38;5;{};48;5;{}m", fg, bg));
                } else if fg_changed {
                    result.push_str(&format!("\x1b[38;5;{}m", fg));
                } else if bg_changed {
                    result.push_str(&format!("\x1b[48;5;{}m", bg));
                }
                last_fg = Some(fg);
                last_bg = Some(bg);

                result.push('\u{2580}');
            }

            result.push('\n');
        }

        result.push_str("\x1b[0m");
        result
    }

    /// Floyd-Steinberg dithering, per channel
    fn apply_dithering(&self, colors: &mut [Vec3]) {
        let width = self.width;

        for y in 0..self.height {
            for x in 0..width {
                let idx = y * width + x;

                for c in 0..3 {
                    let old_val = colors[idx][c];
                    let new_val = (old_val * 255.0).round() / 255.0;
                    colors[idx][c] = new_val;

                    let error = old_val - new_val;

                    if x + 1 < width {
                        colors[idx + 1][c] += error * 7.0 / 16.0;
                    }
                    if y + 1 < self.height && x > 0 {
                        colors[idx + width - 1][c] += error * 3.0 / 16.0;
                    }
                    if y + 1 < self.height {
                        colors[idx + width][c] += error * 5.0 / 16.0;
                    }
                    if y + 1 < self.height && x + 1 < width {
                        colors[idx + width + 1][c] += error / 16.0;
                    }
                }
            }
        }
    }

    /// Write the tone-mapped frame as a PNG
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        let image: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
                Rgb(Self::to_rgb8(&self.color_at(x as usize, y as usize)))
            });
        image.save(path)?;
        info!(path = %path.display(), "Image saved");
        Ok(())
    }
}
