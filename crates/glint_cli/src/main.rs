//! `glint` - render the demo room to an image file.

mod demo;
mod obj;
mod output;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glint_renderer::{render, Background, CameraSettings, Color, RenderSettings, Vec3};
use indicatif::{ProgressBar, ProgressStyle};

/// Material given to a loaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MeshMaterial {
    Glass,
    Glossy,
    Metal,
    Diffuse,
}

#[derive(Debug, Parser)]
#[command(version, about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// Width of the rendered image
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Height of the rendered image
    #[arg(long, default_value_t = 300)]
    height: u32,

    /// Samples per pixel
    #[arg(short, long, default_value_t = 64)]
    samples: u32,

    /// Maximum bounces per path
    #[arg(short, long, default_value_t = 16)]
    depth: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 50.0)]
    fov: f32,

    /// Lens aperture; 0 for a pinhole camera
    #[arg(long, default_value_t = 0.0)]
    aperture: f32,

    /// Camera position as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,2.5,8.5", allow_hyphen_values = true)]
    look_from: Vec3,

    /// Camera target as x,y,z
    #[arg(long, value_parser = parse_vec3, default_value = "0,1.2,0", allow_hyphen_values = true)]
    look_at: Vec3,

    /// OBJ mesh to place in the room instead of the sphere trio
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Material for the mesh
    #[arg(long, value_enum, default_value_t = MeshMaterial::Glass)]
    material: MeshMaterial,

    /// Interpolate vertex normals when the mesh has them
    #[arg(long)]
    smooth: bool,

    /// Image texture for the center sphere
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Open the room's front wall and light the scene with a sky gradient
    #[arg(long)]
    sky: bool,

    /// Seed for a reproducible render
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (defaults to all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Output image; the format follows the extension
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

/// Parse "x,y,z" into a vector.
fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z, got '{}'", s));
    }

    let mut xyz = [0.0f32; 3];
    for (value, part) in xyz.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|e| format!("invalid component '{}': {}", part, e))?;
    }
    Ok(Vec3::from_array(xyz))
}

impl Args {
    fn render_settings(&self) -> RenderSettings {
        let background = if self.sky {
            Background::default()
        } else {
            Background::Solid(Color::ZERO)
        };

        RenderSettings {
            width: self.width,
            height: self.height,
            samples: self.samples,
            max_depth: self.depth,
            background,
            threads: self.threads,
            seed: self.seed,
        }
    }

    fn camera_settings(&self) -> CameraSettings {
        CameraSettings::new()
            .with_position(self.look_from, self.look_at, Vec3::Y)
            .with_vfov(self.fov)
            .with_resolution(self.width, self.height)
            .with_lens(self.aperture, 1.0)
            .focus_on_target()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    log::info!("Starting glint");

    let settings = args.render_settings();
    settings.validate()?;

    let scene = demo::build(&args)?;
    let camera = args.camera_settings().build();

    let progress = ProgressBar::new(settings.samples as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} passes ({eta})",
        )
        .context("Invalid progress template")?
        .progress_chars("#>-"),
    );

    let start = Instant::now();
    let image = render(&scene, &camera, &settings, |p| {
        progress.set_position(p.passes_done as u64);
    })?;
    progress.finish_and_clear();
    log::info!("Rendered {} samples in {:.2?}", settings.samples, start.elapsed());

    output::save(&image, &args.output)?;
    log::info!("Wrote {}", args.output.display());

    Ok(())
}
