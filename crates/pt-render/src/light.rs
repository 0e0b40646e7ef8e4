use pt_geometry::{Aabb, Object};
use pt_material::Material;
use pt_math::{orthonormal_basis, Unit, Vec2, Vec3, PI};

/// A light derived from an emissive object's geometry: a bounding sphere
/// approximating its extent, and a scalar power used for power-proportional
/// selection among several lights.
pub struct Light {
	pub object: usize,
	pub center: Vec3,
	pub radius: f32,
	pub aabb: Aabb,
	pub power: f32,
}

impl Light {
	/// Scans every object for nonzero emissive material and derives one
	/// `Light` per emissive object. Radiance is sampled at each triangle's
	/// centroid texcoord since emissive is rarely textured in practice; the
	/// sum over triangles weighted by area stands in for total power.
	pub fn derive(objects: &[Object], materials: &[Material]) -> Vec<Light> {
		let mut lights = Vec::new();

		for (object_idx, object) in objects.iter().enumerate() {
			if object.is_empty() {
				continue;
			}

			let material = &materials[object.material];
			let mut aabb = Aabb::EMPTY;
			let mut power = 0.0f32;

			for (triangle, properties) in object.triangles.iter().zip(object.properties.iter()) {
				aabb.grow_point(triangle.a);
				aabb.grow_point(triangle.b);
				aabb.grow_point(triangle.c);

				let centroid_uv = (properties.texcoords[0] + properties.texcoords[1] + properties.texcoords[2]) / 3.0;
				let emission = material.emissive.evaluate(centroid_uv);
				let area = (triangle.b - triangle.a).cross(triangle.c - triangle.a).length() * 0.5;
				power += luminance(emission) * area;
			}

			if power <= 0.0 {
				continue;
			}

			let center = aabb.center();
			let radius = object
				.triangles
				.iter()
				.flat_map(|t| [t.a, t.b, t.c])
				.map(|v| (v - center).length())
				.fold(0.0f32, f32::max);

			lights.push(Light { object: object_idx, center, radius: radius.max(1e-4), aabb, power });
		}

		lights
	}
}

fn luminance(c: Vec3) -> f32 {
	0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}

/// Picks a light with probability proportional to its power, remapping `e1`
/// (the selection uniform) back into `[0, 1)` for reuse by the caller.
pub fn pick_power_proportional(lights: &[Light], e1: f32) -> Option<(&Light, f32)> {
	let total_power: f32 = lights.iter().map(|l| l.power).sum();
	if lights.is_empty() || total_power <= 0.0 {
		return None;
	}

	let mut acc = e1;
	for light in lights {
		let alpha = light.power / total_power;
		acc -= alpha;
		if acc <= 0.0 {
			return Some((light, (acc + alpha) / alpha));
		}
	}

	lights.last().map(|l| (l, 1.0))
}

pub fn pdf(light: &Light) -> f32 {
	1.0 / (PI * light.radius * light.radius)
}

/// Samples a point on the disk of radius `light.radius` centered at
/// `light.center`, facing `surface_point`, and returns the direction from
/// `surface_point` toward that sample.
pub fn sample_disk(light: &Light, surface_point: Vec3, e1: f32, e2: f32) -> Unit<Vec3> {
	let light_dir = (light.center - surface_point).normalize();
	let rot = orthonormal_basis(light_dir);

	let r = light.radius * e1.sqrt();
	let theta = 2.0 * PI * e2;
	let disk_offset = Vec3::new(r * theta.cos(), 0.0, r * theta.sin());

	let sample_point = light.center + rot * disk_offset;
	(sample_point - surface_point).normalize()
}
