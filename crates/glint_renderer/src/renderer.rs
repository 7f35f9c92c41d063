//! Multi-threaded sample accumulation.
//!
//! The sample budget is cut into jobs of whole-image passes. Every job owns
//! its random stream and its framebuffer; the buffers are summed in job
//! order once the pool has finished and normalised by the sample count.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use rayon::prelude::*;

use crate::integrator::{radiance, Background};
use crate::sampling::gen_f32;
use crate::{Camera, Color, RenderError, RenderResult, Scene};

/// Image and sampling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel
    pub samples: u32,
    /// Maximum surface interactions per path
    pub max_depth: u32,
    pub background: Background,
    /// Worker count; defaults to the available parallelism
    pub threads: Option<usize>,
    /// Base seed for reproducible renders; entropy when unset
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            samples: 64,
            max_depth: 50,
            background: Background::default(),
            threads: None,
            seed: None,
        }
    }
}

impl RenderSettings {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples == 0 {
            return Err(RenderError::InvalidSettings(
                "sample count must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidSettings(
                "thread count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Number of workers the scheduler will run.
    pub fn worker_count(&self) -> usize {
        let available = self
            .threads
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, NonZeroUsize::get));
        available.min(self.samples as usize).max(1)
    }
}

/// Snapshot handed to the progress callback after each finished pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub passes_done: usize,
    pub passes_total: usize,
}

/// Flat row-major buffer of linear colours, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Add a sample to the pixel at (x, y).
    pub fn add(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] += color;
    }

    /// Add another buffer of the same size pixel by pixel.
    pub fn accumulate(&mut self, other: &ImageBuffer) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (dst, src) in self.pixels.iter_mut().zip(&other.pixels) {
            *dst += *src;
        }
    }

    /// Multiply every pixel by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for pixel in &mut self.pixels {
            *pixel *= factor;
        }
    }
}

/// Split `samples` passes over `workers`: one job of `samples / workers`
/// passes per worker, then one single-pass job per leftover sample.
pub fn plan_jobs(samples: u32, workers: usize) -> Vec<u32> {
    let workers = workers.max(1) as u32;
    let per_worker = samples / workers;
    let remainder = samples % workers;

    let mut jobs = Vec::with_capacity((workers + remainder) as usize);
    if per_worker > 0 {
        jobs.extend(std::iter::repeat(per_worker).take(workers as usize));
    }
    jobs.extend(std::iter::repeat(1).take(remainder as usize));
    jobs
}

/// Random stream for one job: the seed picks the state, the job index the
/// PCG stream.
fn job_rng(seed: Option<u64>, index: usize) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::new(seed, index as u64),
        None => Pcg32::from_entropy(),
    }
}

/// Accumulate `passes` full-image passes into a fresh buffer.
fn render_passes(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    passes: u32,
    rng: &mut dyn RngCore,
    mut on_pass: impl FnMut(),
) -> ImageBuffer {
    let mut buffer = ImageBuffer::new(settings.width, settings.height);
    let width = settings.width as f32;
    let height = settings.height as f32;

    for _ in 0..passes {
        for y in 0..settings.height {
            for x in 0..settings.width {
                let s = (x as f32 + gen_f32(rng)) / width;
                let t = 1.0 - (y as f32 + gen_f32(rng)) / height;
                let ray = camera.get_ray(s, t, rng);
                let color = radiance(&ray, scene, &settings.background, settings.max_depth, rng);
                buffer.add(x, y, color);
            }
        }
        on_pass();
    }

    buffer
}

/// Render `scene` through `camera`.
///
/// `on_progress` is called from worker threads after every finished pass.
/// A panic inside a worker propagates to the caller.
pub fn render<F>(
    scene: &Scene,
    camera: &Camera,
    settings: &RenderSettings,
    on_progress: F,
) -> RenderResult<ImageBuffer>
where
    F: Fn(RenderProgress) + Sync,
{
    settings.validate()?;

    let workers = settings.worker_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("glint-worker-{}", i))
        .build()?;

    let jobs = plan_jobs(settings.samples, workers);
    let passes_total = settings.samples as usize;
    let passes_done = AtomicUsize::new(0);

    log::info!(
        "Rendering {}x{} at {} spp, max depth {}, {} workers, {} jobs",
        settings.width,
        settings.height,
        settings.samples,
        settings.max_depth,
        workers,
        jobs.len()
    );
    let start = Instant::now();

    let buffers: Vec<ImageBuffer> = pool.install(|| {
        jobs.par_iter()
            .enumerate()
            .map(|(index, &passes)| {
                let job_start = Instant::now();
                let mut rng = job_rng(settings.seed, index);
                let buffer = render_passes(scene, camera, settings, passes, &mut rng, || {
                    let done = passes_done.fetch_add(1, Ordering::Relaxed) + 1;
                    on_progress(RenderProgress {
                        passes_done: done,
                        passes_total,
                    });
                });
                log::debug!(
                    "Job {} finished {} passes in {:.2?}",
                    index,
                    passes,
                    job_start.elapsed()
                );
                buffer
            })
            .collect()
    });

    let mut image = ImageBuffer::new(settings.width, settings.height);
    for buffer in &buffers {
        image.accumulate(buffer);
    }
    image.scale(1.0 / settings.samples as f32);

    log::info!("Render finished in {:.2?}", start.elapsed());

    Ok(image)
}
