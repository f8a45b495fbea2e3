//! glass_rt: refractive sphere ray tracer rendered to the terminal
//!
//! Controls (interactive mode):
//! - W/S or Up/Down: move the eye forward/back
//! - A/D or Left/Right: move the eye left/right
//! - R/F or PageUp/PageDown: move the eye up/down
//! - 0: reset the eye
//! - Space: pause
//! - Q or Escape: quit

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use glass_rt::bounce::{background, trace_path, Bounce};
use glass_rt::camera::{camera_ray, InputState};
use glass_rt::config::{AppConfig, RenderMode};
use glass_rt::math::Vec2;
use glass_rt::renderer::{FrameInput, Renderer};
use glass_rt::scene::World;
use glass_rt::terminal::{parse_key_event, record_movement, Action, TerminalDisplay};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "glass_rt")]
#[command(version = "0.1.0")]
#[command(about = "Refractive sphere ray tracer rendered to the terminal")]
#[command(long_about = "
glass_rt traces three glass spheres lit by a single distant light. Every
pixel follows one refracted path for a few bounces and sums the shading
along the way.

Example usage:
  glass_rt run
  glass_rt render --frames 10 --out frames --png
  glass_rt pixel --s 0.0 --t 0.0
")]
struct Cli {
    /// Path to config file (defaults to ./glass_rt.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal renderer
    Run {
        /// Override render mode
        #[arg(long)]
        mode: Option<RenderMode>,
        /// Override bounces per ray
        #[arg(long)]
        bounces: Option<u32>,
    },

    /// Render frames to text (and optionally PNG) files
    Render {
        /// Number of frames to render
        #[arg(short, long, default_value_t = 10)]
        frames: u32,
        /// Output directory (overrides driver.output_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Also write a PNG per frame
        #[arg(long)]
        png: bool,
        /// Override render mode
        #[arg(long)]
        mode: Option<RenderMode>,
        /// Override bounces per ray
        #[arg(long)]
        bounces: Option<u32>,
    },

    /// Print every bounce of a single pixel's path
    Pixel {
        /// Horizontal screen coordinate in [-1, 1]
        #[arg(long, allow_negative_numbers = true)]
        s: f32,
        /// Vertical screen coordinate in [-1, 1]
        #[arg(long, allow_negative_numbers = true)]
        t: f32,
    },

    /// Validate configuration file
    CheckConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Run { mode, bounces } => {
            let config = apply_overrides(config, mode, bounces)?;
            run_interactive(&config)?;
        }
        Commands::Render {
            frames,
            out,
            png,
            mode,
            bounces,
        } => {
            let config = apply_overrides(config, mode, bounces)?;
            let out_dir = out.unwrap_or_else(|| config.driver.output_dir.clone());
            render_frames(&config, frames, &out_dir, png)?;
        }
        Commands::Pixel { s, t } => {
            inspect_pixel(&config, s, t)?;
        }
        Commands::CheckConfig => {
            check_config(&config);
        }
    }

    Ok(())
}

/// Apply CLI overrides and re-validate
fn apply_overrides(
    mut config: AppConfig,
    mode: Option<RenderMode>,
    bounces: Option<u32>,
) -> Result<AppConfig, Box<dyn std::error::Error>> {
    if let Some(mode) = mode {
        config.render.mode = mode;
    }
    if let Some(bounces) = bounces {
        config.render.max_bounces = bounces;
    }
    config.validate()?;
    Ok(config)
}

/// Milliseconds since `start`, saturating at the top of the u32 range
fn elapsed_ms(start: Instant) -> u32 {
    u32::try_from(start.elapsed().as_millis()).unwrap_or(u32::MAX)
}

/// Interactive mode: render to the alternate screen until the user quits
fn run_interactive(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let world = World::glass_trio();
    let mut terminal = TerminalDisplay::new()?;

    // Half-block rendering: two vertical pixels per character
    let (width, height) = terminal.get_size();
    let mut renderer = Renderer::from_config(width.max(10), (height * 2).max(10), &config.render);

    let mut eye = config.camera.eye();
    let mut input = InputState::default();
    let frame_time = Duration::from_millis(config.driver.frame_interval_ms);
    let start = Instant::now();
    let mut last_frame: Option<Instant> = None;
    let mut paused = false;

    'main_loop: loop {
        if terminal.check_resize() {
            let (width, height) = terminal.get_size();
            renderer.resize(width.max(10), (height * 2).max(10));
        }

        let mut events = Vec::new();
        if let Some(first) = terminal.poll_input(Duration::from_millis(16))? {
            events.push(first);
            events.extend(terminal.drain_input()?);
        }

        for event in events {
            match parse_key_event(event) {
                Action::Quit => break 'main_loop,
                Action::Pause => paused = !paused,
                Action::ResetEye => eye = config.camera.eye(),
                action => {
                    record_movement(&mut input, action);
                }
            }
        }

        // Skip rendering while paused (allows text selection)
        if paused {
            continue;
        }

        if last_frame.is_some_and(|t| t.elapsed() < frame_time) {
            continue;
        }
        last_frame = Some(Instant::now());

        // One snapshot per frame: fold the held keys into the pose, then render
        eye.apply_input(&input, config.camera.move_step);
        input = InputState::default();

        let frame = FrameInput {
            elapsed_ms: elapsed_ms(start),
            eye,
        };
        renderer.render(&world, &frame);

        let status = format!(
            "Eye: ({:.2}, {:.2}, {:.2}) | Mode: {:?} | Bounces: {} | [WASD/RF] Move  [0] Reset  [SPACE] Pause  [Q]uit",
            eye.origin.x,
            eye.origin.y,
            eye.origin.z,
            renderer.mode(),
            renderer.max_bounces(),
        );

        if let Err(e) = terminal.render(&renderer.to_ascii_halfblock(), &status) {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                break;
            }
            warn!(error = %e, "Render error");
        }
    }

    drop(terminal);
    info!("Interactive session ended");
    Ok(())
}

/// Batch mode: render `frames` frames into `out_dir`
fn render_frames(
    config: &AppConfig,
    frames: u32,
    out_dir: &Path,
    png: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(out_dir)?;

    let world = World::glass_trio();
    let mut renderer = Renderer::from_config(config.render.width, config.render.height, &config.render);
    let eye = config.camera.eye();

    info!(
        frames,
        width = config.render.width,
        height = config.render.height,
        mode = ?config.render.mode,
        out_dir = %out_dir.display(),
        "Rendering frames"
    );

    for frame in 0..frames {
        // Frames are spaced one driver interval apart on the clock
        let elapsed = u64::from(frame) * config.driver.frame_interval_ms;
        let input = FrameInput {
            elapsed_ms: u32::try_from(elapsed).unwrap_or(u32::MAX),
            eye,
        };
        renderer.render(&world, &input);

        let text_path = out_dir.join(format!("frame_{:03}.txt", frame));
        fs::write(&text_path, renderer.to_ascii_halfblock())?;
        info!(path = %text_path.display(), "Wrote frame");

        if png {
            renderer.save_png(&out_dir.join(format!("frame_{:03}.png", frame)))?;
        }
    }

    println!("Frames saved to {}", out_dir.display());
    println!("View with: cat {}", out_dir.join("frame_000.txt").display());
    Ok(())
}

/// Print the bounce-by-bounce path of one pixel
fn inspect_pixel(config: &AppConfig, s: f32, t: f32) -> Result<(), Box<dyn std::error::Error>> {
    if !(-1.0..=1.0).contains(&s) || !(-1.0..=1.0).contains(&t) {
        return Err(format!("screen coordinates must lie in [-1, 1], got ({}, {})", s, t).into());
    }

    let world = World::glass_trio();
    let eye = config.camera.eye();
    let ray = camera_ray(Vec2::new(s, t), &eye, config.render.focal_length);

    println!("Pixel ({:.3}, {:.3})", s, t);
    println!(
        "  Ray: origin ({:.3}, {:.3}, {:.3}) direction ({:.4}, {:.4}, {:.4})",
        ray.origin.x, ray.origin.y, ray.origin.z, ray.direction.x, ray.direction.y, ray.direction.z
    );

    let path = trace_path(ray, &world, config.render.max_bounces);
    for (i, bounce) in path.iter().enumerate() {
        match bounce {
            Bounce::Hit {
                sphere, point, color, ..
            } => {
                println!(
                    "  #{} hit sphere {} at ({:.3}, {:.3}, {:.3}) color ({:.4}, {:.4}, {:.4})",
                    i, sphere, point.x, point.y, point.z, color.x, color.y, color.z
                );
            }
            Bounce::Miss { .. } => println!("  #{} miss", i),
        }
    }

    let total = path.iter().fold(background(), |acc, b| acc + b.color());
    println!("  Total: ({:.4}, {:.4}, {:.4})", total.x, total.y, total.z);
    Ok(())
}

/// Print the effective configuration
fn check_config(config: &AppConfig) {
    println!("✓ Configuration is valid\n");
    println!("Render:");
    println!("  Size: {}x{}", config.render.width, config.render.height);
    println!("  Mode: {:?}", config.render.mode);
    println!("  Bounces: {}", config.render.max_bounces);
    println!("  Focal length: {}", config.render.focal_length);
    println!("\nCamera:");
    println!("  Origin: {:?}", config.camera.origin);
    println!("  Move step: {}", config.camera.move_step);
    println!("\nDriver:");
    println!("  Frame interval: {}ms", config.driver.frame_interval_ms);
    println!("  Output dir: {}", config.driver.output_dir.display());
}

/// Load configuration or exit with error
fn load_config_or_exit(config_path: Option<&Path>) -> AppConfig {
    let result = AppConfig::load_or_default(config_path).and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}
