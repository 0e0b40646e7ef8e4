use pt_math::{clamp, Unit, Vec3, PI};

use crate::context::{ShadingContext, ShadingState};
use crate::{diffuse, Material};

/// Indicator function used by the GGX terms: zero for non-positive input.
fn chi(value: f32) -> f32 {
	if value <= 0.0 {
		0.0
	} else {
		1.0
	}
}

/// Smith's single-direction masking term for the GGX distribution.
fn g1(v: Vec3, n: Vec3, h: Vec3, alpha2: f32) -> f32 {
	let v_o_h = v.dot(h);
	let v_o_n = v.dot(n);

	let tan2 = (1.0 - v_o_h * v_o_h) / (v_o_h * v_o_h);
	(chi(v_o_h / v_o_n) * 2.0) / ((1.0 + alpha2 * tan2).sqrt() + 1.0)
}

/// GGX normal distribution function.
fn ggx_d(n_o_h: f32, alpha2: f32) -> f32 {
	let n_o_h2 = n_o_h * n_o_h;
	let den = n_o_h2 * alpha2 + (1.0 - n_o_h2);
	(chi(n_o_h) * alpha2) / (PI * den * den)
}

/// Dielectric normal-incidence reflectance, lerped toward `albedo` by
/// `metalness` so metals tint their specular highlight.
pub fn f0(ior: f32, albedo: Vec3, metalness: f32) -> Vec3 {
	let f = ((1.0 - ior) / (1.0 + ior)).abs();
	let f = f * f;
	Vec3::splat(f).lerp(albedo, metalness)
}

/// Schlick's Fresnel approximation.
pub fn fresnel_schlick(f0: Vec3, view: Vec3, half_vector: Vec3) -> Vec3 {
	let v_o_h = view.dot(half_vector).max(0.0);
	(Vec3::ONE - f0) * (1.0 - v_o_h).powf(5.0) + f0
}

pub fn sample(material: &Material, state: &mut ShadingState, ctx: &ShadingContext, e1: f32, e2: f32, e3: f32) -> Unit<Vec3> {
	state.roughness = material.roughness.evaluate(ctx.texcoord).x;
	state.metalness = material.metalness.evaluate(ctx.texcoord).x;

	let pd = 1.0 - state.metalness;

	if e3 <= pd {
		let light = diffuse::sample(material, ctx, e1, e2);
		state.half_vector = (*light + *ctx.view).normalize().into_inner();
		light
	} else {
		let alpha = state.roughness;
		let theta = ((alpha * e1.sqrt()) / (1.0 - e1).sqrt()).atan();
		let phi = 2.0 * PI * e2;
		let sin_theta = theta.sin();

		let local_half = Vec3::new(sin_theta * phi.cos(), theta.cos(), sin_theta * phi.sin());
		let half_vector = (ctx.rot * local_half).normalize();
		state.half_vector = *half_vector;

		let h_o_v = half_vector.dot(*ctx.view).max(0.0);
		let reflected = *half_vector * (2.0 * h_o_v) - *ctx.view;
		reflected.normalize()
	}
}

pub fn pdf(_material: &Material, state: &ShadingState, light: Unit<Vec3>, ctx: &ShadingContext) -> f32 {
	let alpha2 = state.roughness * state.roughness;
	let n_o_h = ctx.normal.dot(state.half_vector);

	let weight_specular = ggx_d(n_o_h, alpha2) * n_o_h;
	let weight_diffuse = diffuse::pdf(_material, light, ctx);

	let pd = 1.0 - state.metalness;
	let ps = 1.0 - pd;

	weight_diffuse * pd + weight_specular * ps
}

pub fn shade(material: &Material, state: &ShadingState, light: Unit<Vec3>, ctx: &ShadingContext) -> Vec3 {
	let albedo = material.albedo.evaluate(ctx.texcoord);
	let f_0 = f0(material.ior, albedo, state.metalness);
	let ks = fresnel_schlick(f_0, *ctx.view, state.half_vector);

	let n_o_l = ctx.normal.dot(*light).max(0.0);
	let n_o_v = ctx.normal.dot(*ctx.view).max(0.0);
	let n_o_h = ctx.normal.dot(state.half_vector).max(0.0);

	let alpha2 = state.roughness * state.roughness;

	let d = ggx_d(n_o_h, alpha2);
	let g = g1(*ctx.view, *ctx.normal, state.half_vector, alpha2) * g1(*light, *ctx.normal, state.half_vector, alpha2);

	let den_ct = clamp(4.0 * n_o_l * n_o_v + 0.05, 0.0, 1.0);
	let specular_term = ks * (g * d / den_ct);

	let diffuse_term = diffuse::shade(material, light, ctx);

	let pd = 1.0 - state.metalness;
	let ps = 1.0 - pd;
	let diffuse_factor = (Vec3::ONE - ks) * ((1.0 - state.metalness) * pd);
	let diffuse_term = diffuse_term.cmul(diffuse_factor);
	let specular_term = specular_term * ps;

	(diffuse_term + specular_term) * n_o_l
}
