use pt_math::{Unit, Vec2, Vec3, PI};

/// 32-bit float RGB equirectangular (latitude/longitude) environment map.
/// Sampling is always bilinear, with the vertical pole clamped.
pub struct HdrTexture {
	pub width: u32,
	pub height: u32,
	pixels: Vec<Vec3>,
}

impl HdrTexture {
	pub fn new(width: u32, height: u32, pixels: Vec<Vec3>) -> Self {
		assert_eq!(pixels.len(), (width * height) as usize);
		Self { width, height, pixels }
	}

	/// A texture with no data: sampling always returns black.
	pub fn empty() -> Self {
		Self { width: 0, height: 0, pixels: Vec::new() }
	}

	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}

	fn texel(&self, x: i32, y: i32) -> Vec3 {
		let x = x.clamp(0, self.width as i32 - 1) as usize;
		let y = y.clamp(0, self.height as i32 - 1) as usize;
		self.pixels[y * self.width as usize + x]
	}

	/// Maps a direction to equirectangular UV and bilinearly samples it.
	pub fn sample(&self, direction: Unit<Vec3>) -> Vec3 {
		if self.is_empty() {
			return Vec3::ZERO;
		}

		let v = *direction;
		let theta = v.y.clamp(-1.0, 1.0).acos();
		let phi = v.z.atan2(v.x) + PI;

		let mapped = Vec2::new(phi / (2.0 * PI) * self.width as f32, theta / PI * self.height as f32);

		let ix = mapped.x.floor() as i32;
		let iy = mapped.y.floor() as i32;

		let x2 = (ix + 1).min(self.width as i32 - 1);
		let y2 = (iy + 1).min(self.height as i32 - 1);

		let n1 = self.texel(ix, iy);
		let n2 = self.texel(x2, iy);
		let n3 = self.texel(ix, y2);
		let n4 = self.texel(x2, y2);

		let wu = mapped.x - ix as f32;
		let wv = mapped.y - iy as f32;

		let top = n1 * (1.0 - wu) + n2 * wu;
		let bottom = n3 * (1.0 - wu) + n4 * wu;
		top * (1.0 - wv) + bottom * wv
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_map_samples_black() {
		let env = HdrTexture::empty();
		let dir = Vec3::new(1.0, 0.0, 0.0).normalize();
		assert_eq!(env.sample(dir), Vec3::ZERO);
	}

	#[test]
	fn constant_map_samples_constant() {
		let white = Vec3::splat(0.5);
		let env = HdrTexture::new(4, 2, vec![white; 8]);
		for dir in [Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(-1.0, -1.0, 0.3)] {
			let sampled = env.sample(dir.normalize());
			assert!((sampled.x - 0.5).abs() < 1e-5);
		}
	}
}
