use pt_math::{clamp, Unit, Vec3, PI};

use crate::context::{ShadingContext, ShadingState};
use crate::Material;

/// Cosine-weighted hemisphere sample, rotated into world space.
pub fn sample(_material: &Material, ctx: &ShadingContext, e1: f32, e2: f32) -> Unit<Vec3> {
	let r = e1.sqrt();
	let theta = 2.0 * PI * e2;
	let x = r * theta.cos();
	let z = r * theta.sin();
	let y = (1.0 - e1).max(0.0).sqrt();

	(ctx.rot * Vec3::new(x, y, z)).normalize()
}

pub fn pdf(_material: &Material, light: Unit<Vec3>, ctx: &ShadingContext) -> f32 {
	ctx.normal.dot(*light) / PI
}

pub fn shade(material: &Material, light: Unit<Vec3>, ctx: &ShadingContext) -> Vec3 {
	let albedo = material.albedo.evaluate(ctx.texcoord);
	let n_o_l = clamp(ctx.normal.dot(*light), 0.0, 1.0);
	albedo * (n_o_l / PI)
}

pub fn init_state(_material: &Material, _ctx: &ShadingContext) -> ShadingState {
	ShadingState::default()
}
