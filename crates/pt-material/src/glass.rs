use pt_math::{Unit, Vec3};

use crate::context::{ShadingContext, ShadingState};
use crate::Material;

/// Index of refraction of air/vacuum, the "outside" medium on both faces of
/// a glass surface.
const IOR_AIR: f32 = 1.0;

/// Samples perfect specular reflection or transmission. The choice between
/// the two is a discrete Russian-roulette draw on `e3`; `e1`/`e2` are unused.
pub fn sample(material: &Material, state: &mut ShadingState, ctx: &ShadingContext, _e1: f32, _e2: f32, e3: f32) -> Unit<Vec3> {
	let mut normal = *ctx.normal;
	let incident = -*ctx.view;

	let mut cos_i = normal.dot(incident);

	let (n1, n2) = if cos_i > 0.0 {
		normal = -normal;
		(material.ior, IOR_AIR)
	} else {
		cos_i = -cos_i;
		(IOR_AIR, material.ior)
	};

	let reflected = (incident - normal * (2.0 * normal.dot(incident))).normalize();

	let nni = n1 / n2;
	let cos_t2 = 1.0 - nni * nni * (1.0 - cos_i * cos_i);
	if cos_t2 < 0.0 {
		state.fresnel = 1.0;
		return reflected;
	}
	let cos_t = cos_t2.sqrt();

	let t = 1.0 - if n1 <= n2 { cos_i } else { cos_t };
	let r0 = (n1 - n2) / (n1 + n2);
	let r0 = r0 * r0;
	let r = r0 + (1.0 - r0) * t.powi(5);

	if e3 < r {
		state.fresnel = r;
		return reflected;
	}

	let transmitted = (normal * (nni * cos_i - cos_t) + incident * nni).normalize();
	state.fresnel = 1.0 - r;
	transmitted
}

/// Glass is a discrete BSDF: there is only ever one sampled direction, so
/// its "pdf" is just the probability mass that direction carried.
pub fn pdf(_material: &Material, state: &ShadingState, _light: Unit<Vec3>, _ctx: &ShadingContext) -> f32 {
	state.fresnel
}

pub fn shade(material: &Material, state: &ShadingState, _light: Unit<Vec3>, ctx: &ShadingContext) -> Vec3 {
	let albedo = material.albedo.evaluate(ctx.texcoord);
	albedo * state.fresnel
}
