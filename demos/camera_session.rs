//! Camera session demo
//!
//! Builds a camera from command line options (optionally on top of a TOML
//! configuration file), replays a closed trackball drag, optionally flies
//! forward in navigation mode, and prints the matrices a renderer would use.
//!
//! ```text
//! camera_session --trackball --view-angles 30 45 0 --view-radius 12 --fly 2.5
//! ```

use std::f64::consts::TAU;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use cloudview_core::{Point2d, Point3d};
use cloudview_visualization::{
    CameraConfig, CameraMode, CameraUniform, InteractiveCamera, NavigationKey, NavigationKeys,
    Viewport,
};

const FRAME_RATE: f64 = 60.0;

#[derive(Parser, Debug, Clone)]
#[command(name = "camera_session")]
#[command(about = "Drive the interactive camera without a window", long_about = None)]
struct Cli {
    /// TOML camera configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Use the virtual trackball instead of the turntable
    #[arg(long)]
    trackball: bool,

    /// Initial view angles in degrees
    #[arg(
        long,
        num_args = 3,
        value_names = ["YAW", "PITCH", "ROLL"],
        allow_negative_numbers = true
    )]
    view_angles: Option<Vec<f64>>,

    /// Initial eye to center distance
    #[arg(long, value_name = "R")]
    view_radius: Option<f64>,

    /// Fly forward in navigation mode for this many seconds
    #[arg(long, value_name = "SECONDS")]
    fly: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("failed to load camera configuration {}", path.display()))?,
        None => CameraConfig::default(),
    };
    let mut camera = InteractiveCamera::from_config(&config)?;
    camera.set_viewport(Viewport::with_size(cli.width, cli.height)?);
    if cli.trackball {
        camera.set_mode(CameraMode::Trackball);
    }
    if let Some(angles) = &cli.view_angles {
        camera.set_view_angles(angles[0], angles[1], angles[2]);
    }
    if let Some(radius) = cli.view_radius {
        camera.set_eye_to_center_distance(radius)?;
    }
    camera.set_center(Point3d::origin());
    camera.take_changes();

    println!("Camera session");
    println!("==============");
    print_camera(&camera);

    let before = camera.rotation();
    replay_closed_drag(&mut camera);
    let drift = (camera.rotation().to_rotation_matrix().into_inner()
        - before.to_rotation_matrix().into_inner())
    .norm();
    println!("\nAfter a closed trackball drag");
    println!("  rotation drift: {drift:.3e}");
    println!("  changes: {:?}", camera.take_changes());

    if let Some(seconds) = cli.fly {
        fly_forward(&mut camera, seconds);
        println!("\nAfter flying forward for {seconds} s at {} m/s", camera.speed());
        print_camera(&camera);
    }

    let uniform = CameraUniform::from_camera(&camera);
    println!("\nUniform buffer: {} bytes", uniform.as_bytes().len());
    Ok(())
}

/// Drag the pointer once around a circle about the viewport center using the
/// trackball, then restore the previous mode
fn replay_closed_drag(camera: &mut InteractiveCamera) {
    let mode = camera.mode();
    camera.set_mode(CameraMode::Trackball);
    let center = camera.viewport().center();
    let radius = 0.3 * f64::from(camera.viewport().width().min(camera.viewport().height()));
    let steps = 120;
    let point = |i: usize| {
        let t = TAU * i as f64 / steps as f64;
        Point2d::new(center.x + radius * t.cos(), center.y + radius * t.sin())
    };
    let start = point(0);
    // onto the circle, around it, and back to where the pointer started
    camera.mouse_drag(center, start, false);
    for i in 1..=steps {
        camera.mouse_drag(point(i - 1), point(i), false);
    }
    camera.mouse_drag(start, center, false);
    camera.set_mode(mode);
}

fn fly_forward(camera: &mut InteractiveCamera, seconds: f64) {
    camera.set_mode(CameraMode::Navigation);
    let keys: NavigationKeys = [NavigationKey::Forward].into_iter().collect();
    let start = Instant::now();
    let frames = (seconds * FRAME_RATE).round() as u32;
    for frame in 0..=frames {
        let now = start + Duration::from_secs_f64(f64::from(frame) / FRAME_RATE);
        camera.update_navigation(&keys, now);
    }
    log::info!("flew {frames} frames to {}", camera.position());
}

fn print_camera(camera: &InteractiveCamera) {
    let (near, far) = camera.clip_planes();
    println!("mode: {:?}", camera.mode());
    println!("eye: {}", camera.position());
    println!("center: {}  distance: {}", camera.center(), camera.distance());
    println!("clip planes: {near} .. {far}");
    println!("view:{}", camera.view());
    println!("projection:{}", camera.projection());
    println!("viewport:{}", camera.viewport_transform());
}
