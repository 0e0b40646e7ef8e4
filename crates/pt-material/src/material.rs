use pt_math::{Unit, Vec2, Vec3};
use pt_texture::Attribute;

use crate::context::{ShadingContext, ShadingState};
use crate::{diffuse, glass, rough_dielectric};

/// Which BSDF preset a material shades with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BsdfKind {
	Diffuse,
	RoughDielectric,
	Glass,
}

/// A surface material: a BSDF preset plus the attributes it reads.
pub struct Material {
	pub bsdf: BsdfKind,
	pub albedo: Attribute,
	pub roughness: Attribute,
	pub metalness: Attribute,
	pub emissive: Attribute,
	/// Index of refraction, >= 1. Used by `RoughDielectric` (for F0) and
	/// `Glass` (for Snell's law).
	pub ior: f32,
}

impl Material {
	pub fn diffuse(albedo: Attribute) -> Self {
		Self {
			bsdf: BsdfKind::Diffuse,
			albedo,
			roughness: Attribute::constant(Vec3::ZERO),
			metalness: Attribute::constant(Vec3::ZERO),
			emissive: Attribute::constant(Vec3::ZERO),
			ior: 1.0,
		}
	}

	pub fn is_emissive(&self, texcoord: Vec2) -> bool {
		let e = self.emissive.evaluate(texcoord);
		e.x > 0.0 || e.y > 0.0 || e.z > 0.0
	}

	pub fn emission(&self, texcoord: Vec2) -> Vec3 {
		self.emissive.evaluate(texcoord)
	}

	/// Glass is sampled/shaded discretely and must never be combined with
	/// next-event estimation or MIS against area lights.
	pub fn is_discrete(&self) -> bool {
		self.bsdf == BsdfKind::Glass
	}

	pub fn sample(&self, state: &mut ShadingState, ctx: &ShadingContext, e1: f32, e2: f32, e3: f32) -> Unit<Vec3> {
		match self.bsdf {
			BsdfKind::Diffuse => diffuse::sample(self, ctx, e1, e2),
			BsdfKind::RoughDielectric => rough_dielectric::sample(self, state, ctx, e1, e2, e3),
			BsdfKind::Glass => glass::sample(self, state, ctx, e1, e2, e3),
		}
	}

	pub fn pdf(&self, state: &ShadingState, light: Unit<Vec3>, ctx: &ShadingContext) -> f32 {
		match self.bsdf {
			BsdfKind::Diffuse => diffuse::pdf(self, light, ctx),
			BsdfKind::RoughDielectric => rough_dielectric::pdf(self, state, light, ctx),
			BsdfKind::Glass => glass::pdf(self, state, light, ctx),
		}
	}

	pub fn shade(&self, state: &ShadingState, light: Unit<Vec3>, ctx: &ShadingContext) -> Vec3 {
		match self.bsdf {
			BsdfKind::Diffuse => diffuse::shade(self, light, ctx),
			BsdfKind::RoughDielectric => rough_dielectric::shade(self, state, light, ctx),
			BsdfKind::Glass => glass::shade(self, state, light, ctx),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn diffuse_material_is_not_discrete() {
		let m = Material::diffuse(Attribute::constant(Vec3::splat(0.8)));
		assert!(!m.is_discrete());
	}
}
