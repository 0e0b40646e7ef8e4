use pt_geometry::{Ray, Triangle};
use pt_material::{ShadingContext, ShadingState};
use pt_math::Vec3;
use rand::Rng;

use crate::light;
use crate::scene::Scene;

/// Floor applied to any pdf before it's used as a divisor, so a vanishingly
/// small (but nonzero) pdf can't blow up throughput into infinity/NaN.
const PDF_EPSILON: f32 = 1e-6;

/// Path-traces a single primary ray through up to `bounces` scattering
/// events, with next-event estimation and balance-form MIS against
/// power-proportional light sampling when
/// `scene.options.enable_direct_light_sampling` is set. `bounces` counts
/// scatters *after* the primary ray, so the environment/emissive term of the
/// segment spawned by the last allowed bounce is still collected.
pub fn trace(scene: &Scene, primary_ray: Ray, bounces: u32, rng: &mut impl Rng) -> Vec3 {
	let mut lo = Vec3::ZERO;
	let mut throughput = Vec3::ONE;
	let mut ray = primary_ray;

	for _ in 0..=bounces {
		let Some((t, prim, hit)) = scene.accel().intersect(&ray, scene) else {
			lo += throughput.cmul(scene.environment(ray.direction));
			break;
		};

		let point = ray.at(t);
		let props = scene.triangle_properties(prim);
		let normal = Triangle::barycentric_interpolate(props.normals, hit.u, hit.v).normalize();
		let texcoord = Triangle::barycentric_interpolate_uv(props.texcoords, hit.u, hit.v);
		let view = (-*ray.direction).normalize();
		let ctx = ShadingContext::new(texcoord, normal, view);

		let material = scene.material_for(prim);

		if material.is_emissive(texcoord) {
			let albedo = material.albedo.evaluate(texcoord);
			lo += throughput.cmul(albedo).cmul(material.emission(texcoord));
		}

		let mut state = ShadingState::default();
		let e1: f32 = rng.gen();
		let e2: f32 = rng.gen();
		let e3: f32 = rng.gen();
		let bsdf_dir = material.sample(&mut state, &ctx, e1, e2, e3);
		let bsdf_pdf = material.pdf(&state, bsdf_dir, &ctx).max(PDF_EPSILON);

		let mut light_pdf = 0.0f32;
		if scene.options.enable_direct_light_sampling && !material.is_discrete() {
			let select_e: f32 = rng.gen();
			if let Some((picked, remapped_e1)) = light::pick_power_proportional(&scene.lights, select_e) {
				let disk_e2: f32 = rng.gen();
				let light_dir = light::sample_disk(picked, point, remapped_e1, disk_e2);
				light_pdf = light::pdf(picked).max(PDF_EPSILON);
				let w_l = (light_pdf * light_pdf) / (light_pdf * light_pdf + bsdf_pdf * bsdf_pdf);

				let shadow_ray = Ray::spawn(point, light_dir, *normal);
				if let Some((_, shadow_prim, _)) = scene.accel().intersect(&shadow_ray, scene) {
					if shadow_prim.object_index() == picked.object {
						let shade = material.shade(&state, light_dir, &ctx);
						lo += throughput.cmul(shade) * (w_l / light_pdf);
					}
				}
			}
		}

		let w_b = if light_pdf > 0.0 {
			(bsdf_pdf * bsdf_pdf) / (light_pdf * light_pdf + bsdf_pdf * bsdf_pdf)
		} else {
			1.0
		};

		let shade = material.shade(&state, bsdf_dir, &ctx);
		throughput = throughput.cmul(shade) * (w_b / bsdf_pdf);

		ray = Ray::spawn(point, bsdf_dir, *normal);
	}

	lo
}

#[cfg(test)]
mod tests {
	use super::*;
	use pt_accel::AccelKind;
	use pt_geometry::TriangleProperties;
	use pt_material::Material;
	use pt_math::{Unit, Vec2};
	use pt_texture::{Attribute, HdrTexture};
	use rand_pcg::Pcg32;

	use crate::scene::{Scene, SceneOptions};

	#[test]
	fn single_diffuse_triangle_under_constant_environment() {
		let mut scene = Scene::begin(1);
		let material_id = scene.add_material(Material::diffuse(Attribute::constant(Vec3::new(1.0, 0.0, 0.0))));
		let object = scene.add_object(material_id).unwrap();

		let props = TriangleProperties { normals: [Vec3::new(0.0, 0.0, 1.0); 3], texcoords: [Vec2::ZERO; 3] };
		scene.object_mut(object).push_triangle(
			Triangle { a: Vec3::new(-1.0, -1.0, 0.0), b: Vec3::new(1.0, -1.0, 0.0), c: Vec3::new(0.0, 1.0, 0.0) },
			props,
		);

		let mut options = SceneOptions::default();
		options.environment_map = Some(HdrTexture::new(1, 1, vec![Vec3::splat(0.5)]));
		options.accelerator = AccelKind::Bvh;
		options.enable_direct_light_sampling = false;
		options.samples_per_pixel = 1;
		options.bounces = 1;
		scene.end(options).unwrap();

		let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Unit::new_unchecked(Vec3::new(0.0, 0.0, -1.0)));
		let mut rng = Pcg32::new(7, 1);
		// Cosine-weighted BSDF sampling makes throughput exactly `albedo`
		// independent of the sampled direction (the cos/pi terms in shade and
		// pdf cancel), and the scattered ray can never re-hit the coplanar
		// triangle it left, so this converges to env * albedo in one bounce.
		let radiance = trace(&scene, ray, 1, &mut rng);

		assert!((radiance.x - 0.5).abs() < 1e-3, "got {:?}", radiance);
		assert_eq!(radiance.y, 0.0);
		assert_eq!(radiance.z, 0.0);
	}

	#[test]
	fn empty_scene_returns_environment_lookup() {
		let mut scene = Scene::begin(0);
		let mut options = SceneOptions::default();
		options.environment_map = Some(HdrTexture::new(1, 1, vec![Vec3::splat(0.25)]));
		scene.end(options).unwrap();

		let ray = Ray::new(Vec3::ZERO, Unit::new_unchecked(Vec3::new(0.0, 0.0, -1.0)));
		let mut rng = Pcg32::new(3, 1);
		let radiance = trace(&scene, ray, 2, &mut rng);
		assert!((radiance.x - 0.25).abs() < 1e-5);
	}
}
