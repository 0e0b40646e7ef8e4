use std::time::Instant;

use log::debug;
use pt_math::Vec3;
use rand_pcg::Pcg32;
use rayon::prelude::*;

use crate::camera::{camera_ray, Camera};
use crate::integrator;
use crate::scene::Scene;
use crate::tonemap;
use crate::RenderError;

/// A non-overlapping rectangular region of the framebuffer to render.
/// `render` requires tiles passed across calls not to overlap; nothing
/// enforces that across calls, only within the bounds check of one call.
#[derive(Clone, Copy, Debug)]
pub struct Tile {
	pub x: u32,
	pub y: u32,
	pub width: u32,
	pub height: u32,
}

/// Timing counters returned by `render`, mirroring the original renderer's
/// `TerraStats`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderStats {
	pub total_ms: f64,
	pub trace_total_ms: f64,
	pub trace_min_ms: f64,
	pub trace_max_ms: f64,
	pub trace_count: u64,
}

#[derive(Clone, Copy, Default)]
struct Accumulator {
	sum: Vec3,
	samples: u32,
}

/// Per-pixel radiance accumulator plus the tone-mapped output it's last
/// resolved to. Accumulators are never cleared by `render`, which is what
/// makes progressive refinement possible.
pub struct Framebuffer {
	width: u32,
	height: u32,
	accum: Vec<Accumulator>,
	pixels: Vec<Vec3>,
}

/// Deterministically derives a per-(pixel, sample) RNG stream so that
/// splitting a render into tiles, or into several progressive calls, never
/// changes which random numbers a given sample draws.
fn sample_rng(seed: u64, pixel_index: u64, sample_index: u64) -> Pcg32 {
	let state = seed ^ pixel_index.wrapping_mul(0x9E3779B97F4A7C15);
	Pcg32::new(state, sample_index)
}

impl Framebuffer {
	pub fn create(width: u32, height: u32) -> Result<Self, RenderError> {
		if width == 0 || height == 0 {
			return Err(RenderError::ZeroSizedFramebuffer);
		}

		let count = (width * height) as usize;
		Ok(Self { width, height, accum: vec![Accumulator::default(); count], pixels: vec![Vec3::ZERO; count] })
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	pub fn pixel(&self, x: u32, y: u32) -> Vec3 {
		self.pixels[(y * self.width + x) as usize]
	}

	/// Renders `tile` of `scene` as seen by `camera`, adding
	/// `scene.options.samples_per_pixel` new samples per pixel and
	/// re-resolving the tone-mapped output for every pixel touched.
	pub fn render(&mut self, camera: &Camera, scene: &Scene, tile: Tile, seed: u64) -> Result<RenderStats, RenderError> {
		if tile.x + tile.width > self.width || tile.y + tile.height > self.height {
			return Err(RenderError::TileOutOfBounds { x: tile.x, y: tile.y, w: tile.width, h: tile.height, fb_w: self.width, fb_h: self.height });
		}

		let total_start = Instant::now();
		let spp = scene.options.samples_per_pixel;
		let bounces = scene.options.bounces;
		let jitter = scene.options.subpixel_jitter;
		let width = self.width;
		let height = self.height;

		let results: Vec<(u32, u32, Vec3, u32, f64, f64, f64, u32)> = (tile.y..tile.y + tile.height)
			.into_par_iter()
			.flat_map(|py| {
				(tile.x..tile.x + tile.width)
					.into_par_iter()
					.map(move |px| (py, px))
					.collect::<Vec<_>>()
			})
			.map(|(py, px)| {
				let pixel_index = (py as u64) * width as u64 + px as u64;
				let base_sample = self.accum[(py * width + px) as usize].samples as u64;

				let mut acc = Vec3::ZERO;
				let mut trace_total_ms = 0.0f64;
				let mut trace_min_ms = f64::MAX;
				let mut trace_max_ms = f64::MIN;

				for s in 0..spp {
					let mut rng = sample_rng(seed, pixel_index, base_sample + s as u64);
					let ray = camera_ray(camera, width, height, px, py, jitter, &mut rng);

					let trace_start = Instant::now();
					let mut radiance = integrator::trace(scene, ray, bounces, &mut rng);
					let trace_elapsed = trace_start.elapsed().as_secs_f64() * 1000.0;

					if !radiance.x.is_finite() || !radiance.y.is_finite() || !radiance.z.is_finite() {
						radiance = Vec3::ZERO;
					}

					acc += radiance;
					trace_total_ms += trace_elapsed;
					trace_min_ms = trace_min_ms.min(trace_elapsed);
					trace_max_ms = trace_max_ms.max(trace_elapsed);
				}

				(px, py, acc, spp, trace_total_ms, trace_min_ms, trace_max_ms, spp)
			})
			.collect();

		let mut stats = RenderStats { trace_min_ms: f64::MAX, trace_max_ms: f64::MIN, ..Default::default() };

		for (px, py, acc, added_samples, trace_total_ms, trace_min_ms, trace_max_ms, trace_count) in results {
			let idx = (py * self.width + px) as usize;
			let accumulator = &mut self.accum[idx];
			accumulator.sum += acc;
			accumulator.samples += added_samples;

			let mut color = accumulator.sum / accumulator.samples as f32;
			color = color * scene.options.manual_exposure;
			self.pixels[idx] = tonemap::apply(scene.options.tonemapping_operator, color, scene.options.gamma);

			stats.trace_total_ms += trace_total_ms;
			stats.trace_min_ms = stats.trace_min_ms.min(trace_min_ms);
			stats.trace_max_ms = stats.trace_max_ms.max(trace_max_ms);
			stats.trace_count += trace_count as u64;
		}

		stats.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
		debug!("render: tile [{},{})x[{},{}) in {:.2}ms, {} traces", tile.x, tile.y, tile.width, tile.height, stats.total_ms, stats.trace_count);

		Ok(stats)
	}
}
