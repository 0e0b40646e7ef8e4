use pt_math::{Vec2, Vec3};

use super::ldr::LdrTexture;

/// A material attribute: either a constant value or a reference to a
/// texture sampled at the shading UV.
pub enum Attribute {
	Constant(Vec3),
	Texture(LdrTexture),
}

impl Attribute {
	pub fn constant(value: Vec3) -> Self {
		Attribute::Constant(value)
	}

	pub fn texture(texture: LdrTexture) -> Self {
		Attribute::Texture(texture)
	}

	/// Evaluates the attribute at `uv`, sampling the bound texture if any.
	pub fn evaluate(&self, uv: Vec2) -> Vec3 {
		match self {
			Attribute::Constant(value) => *value,
			Attribute::Texture(texture) => texture.sample(uv),
		}
	}

	/// Linearizes the bound texture (if any and if sRGB); a no-op for a
	/// constant attribute.
	pub fn linearize(&mut self) {
		if let Attribute::Texture(texture) = self {
			texture.linearize();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn constant_ignores_uv() {
		let attr = Attribute::constant(Vec3::new(0.1, 0.2, 0.3));
		assert_eq!(attr.evaluate(Vec2::new(0.0, 0.0)), attr.evaluate(Vec2::new(0.9, 0.9)));
	}
}
