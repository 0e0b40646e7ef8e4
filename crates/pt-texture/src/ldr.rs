use pt_math::{clamp, Vec2, Vec3};

/// Texel fetch filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
	Point,
	Bilinear,
}

/// Out-of-range texture coordinate addressing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressMode {
	Wrap,
	Mirror,
	Clamp,
}

impl AddressMode {
	fn apply(self, mut x: i32, size: i32) -> i32 {
		match self {
			AddressMode::Clamp => x.clamp(0, size - 1),
			AddressMode::Wrap => x.rem_euclid(size),
			AddressMode::Mirror => {
				let period = x.div_euclid(size);
				x = x.rem_euclid(size);
				if period % 2 != 0 {
					x = size - 1 - x;
				}
				x
			}
		}
	}
}

/// An 8-bit packed LDR texture. `offset` lets one packed image feed several
/// material attributes of different channel counts/positions.
pub struct LdrTexture {
	pub width: u32,
	pub height: u32,
	pub comps: u32,
	pub offset: u32,
	pub filter: Filter,
	pub address_mode: AddressMode,
	pixels: Vec<u8>,
	/// Cleared once `linearize` has run; guards against double linearization.
	srgb: bool,
}

impl LdrTexture {
	pub fn new(width: u32, height: u32, comps: u32, offset: u32, pixels: Vec<u8>, filter: Filter, address_mode: AddressMode, srgb: bool) -> Self {
		assert_eq!(pixels.len(), (width * height * comps) as usize);
		Self { width, height, comps, offset, filter, address_mode, pixels, srgb }
	}

	pub fn is_srgb(&self) -> bool {
		self.srgb
	}

	/// Converts every texel from sRGB to linear in place, using `pow(x,
	/// 2.2)`. At-most-once: a no-op if the texture has already been
	/// linearized (the sRGB flag is cleared on first call).
	pub fn linearize(&mut self) {
		if !self.srgb {
			return;
		}

		log::trace!("linearizing {}x{} texture ({} comps)", self.width, self.height, self.comps);

		let comps = self.comps as usize;
		let offset = self.offset as usize;
		for texel in self.pixels.chunks_exact_mut(comps) {
			for c in texel.iter_mut().skip(offset).take(3.min(comps.saturating_sub(offset))) {
				let linear = (*c as f32 / 255.0).powf(2.2);
				*c = (linear * 255.0).round().clamp(0.0, 255.0) as u8;
			}
		}
		self.srgb = false;
	}

	fn texel(&self, x: i32, y: i32) -> Vec3 {
		let x = self.address_mode.apply(x, self.width as i32) as usize;
		let y = self.address_mode.apply(y, self.height as i32) as usize;

		let comps = self.comps as usize;
		let offset = self.offset as usize;
		let base = (y * self.width as usize + x) * comps + offset;

		Vec3::new(
			self.pixels[base] as f32 / 255.0,
			self.pixels[base + 1] as f32 / 255.0,
			self.pixels[base + 2] as f32 / 255.0,
		)
	}

	/// Samples the texture at normalized `(u, v)`.
	pub fn sample(&self, uv: Vec2) -> Vec3 {
		let mapped_x = uv.x * self.width as f32 - 0.5;
		let mapped_y = uv.y * self.height as f32 - 0.5;

		let ix = mapped_x.floor() as i32;
		let iy = mapped_y.floor() as i32;

		match self.filter {
			Filter::Point => self.texel(ix, iy),
			Filter::Bilinear => {
				let x2 = (ix + 1).min(self.width as i32 - 1);
				let y2 = (iy + 1).min(self.height as i32 - 1);

				let n1 = self.texel(ix, iy);
				let n2 = self.texel(x2, iy);
				let n3 = self.texel(ix, y2);
				let n4 = self.texel(x2, y2);

				let wu = clamp(mapped_x - ix as f32, 0.0, 1.0);
				let wv = clamp(mapped_y - iy as f32, 0.0, 1.0);

				let top = n1 * (1.0 - wu) + n2 * wu;
				let bottom = n3 * (1.0 - wu) + n4 * wu;
				top * (1.0 - wv) + bottom * wv
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn checker_2x2(address_mode: AddressMode, filter: Filter) -> LdrTexture {
		// top-left=black, top-right=white, bottom-left=white, bottom-right=black
		let pixels = vec![0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 0];
		LdrTexture::new(2, 2, 3, 0, pixels, filter, address_mode, false)
	}

	#[test]
	fn clamp_is_idempotent() {
		for x in [-5, -1, 0, 1, 2, 10] {
			let once = AddressMode::Clamp.apply(x, 4);
			let twice = AddressMode::Clamp.apply(once, 4);
			assert_eq!(once, twice);
		}
	}

	#[test]
	fn wrap_is_periodic() {
		for x in -3..7 {
			assert_eq!(AddressMode::Wrap.apply(x, 4), AddressMode::Wrap.apply(x + 4 * 3, 4));
		}
	}

	#[test]
	fn clamp_negative_uv_returns_edge_texel() {
		let tex = checker_2x2(AddressMode::Clamp, Filter::Bilinear);
		let sampled = tex.sample(Vec2::new(-1.0, 2.5));
		// Collapses to the (0, 1) texel: bottom-left, white.
		assert!((sampled.x - 1.0).abs() < 1e-3);
		assert!((sampled.y - 1.0).abs() < 1e-3);
		assert!((sampled.z - 1.0).abs() < 1e-3);
	}

	#[test]
	fn linearize_is_idempotent_by_flag() {
		let mut tex = LdrTexture::new(1, 1, 3, 0, vec![128, 128, 128], Filter::Point, AddressMode::Clamp, true);
		tex.linearize();
		let once = tex.pixels.clone();
		tex.linearize();
		assert_eq!(once, tex.pixels);
	}
}
