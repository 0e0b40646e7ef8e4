use pt_math::{Vec2, Vec3};

use super::ray::Ray;

/// Rejects self-hits against the originating surface.
const T_MIN: f32 = 1e-5;
/// Rejects rays parallel to the triangle's plane (`|a| < EPS` in the
/// Möller–Trumbore determinant).
const EPS: f32 = 1e-7;

/// Three world-space vertices, single-sided culling disabled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
	pub a: Vec3,
	pub b: Vec3,
	pub c: Vec3,
}

/// Result of a successful ray/triangle intersection: hit distance and
/// barycentric coordinates `(u, v)` with the implicit third weight `1-u-v`
/// attached to vertex `a`.
#[derive(Clone, Copy, Debug)]
pub struct TriangleHit {
	pub t: f32,
	pub u: f32,
	pub v: f32,
}

impl Triangle {
	pub fn centroid(&self) -> Vec3 {
		(self.a + self.b + self.c) / 3.0
	}

	/// Möller–Trumbore ray/triangle intersection.
	pub fn intersect_ray(&self, ray: &Ray) -> Option<TriangleHit> {
		let dir = *ray.direction;

		let e1 = self.b - self.a;
		let e2 = self.c - self.a;
		let h = dir.cross(e2);
		let a = e1.dot(h);

		if a.abs() < EPS {
			return None;
		}

		let f = 1.0 / a;
		let s = ray.origin - self.a;
		let u = f * s.dot(h);
		if !(0.0..=1.0).contains(&u) {
			return None;
		}

		let q = s.cross(e1);
		let v = f * dir.dot(q);
		if v < 0.0 || u + v > 1.0 {
			return None;
		}

		let t = f * e2.dot(q);
		if t <= T_MIN {
			return None;
		}

		Some(TriangleHit { t, u, v })
	}

	/// Interpolates a per-vertex attribute at barycentric `(u, v)`, where
	/// `attrs` are ordered `[a, b, c]` and the weight on `a` is `1-u-v`.
	pub fn barycentric_interpolate(attrs: [Vec3; 3], u: f32, v: f32) -> Vec3 {
		attrs[0] * (1.0 - u - v) + attrs[1] * u + attrs[2] * v
	}

	pub fn barycentric_interpolate_uv(attrs: [Vec2; 3], u: f32, v: f32) -> Vec2 {
		attrs[0] * (1.0 - u - v) + attrs[1] * u + attrs[2] * v
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pt_math::Unit;

	fn sample_triangle() -> Triangle {
		Triangle {
			a: Vec3::new(0.0, 0.0, 0.0),
			b: Vec3::new(1.0, 0.0, 0.0),
			c: Vec3::new(0.0, 1.0, 0.0),
		}
	}

	#[test]
	fn hits_straight_through_center() {
		let tri = sample_triangle();
		let normal = Vec3::new(0.0, 0.0, 1.0);
		let origin = tri.centroid() + normal * 1.0;
		let ray = Ray::new(origin, Unit::new_unchecked(-normal));

		let hit = tri.intersect_ray(&ray).expect("must hit");
		assert!((hit.t - 1.0).abs() < 1e-4);
	}

	#[test]
	fn misses_outside_triangle() {
		let tri = sample_triangle();
		let ray = Ray::new(Vec3::new(5.0, 5.0, 1.0), Unit::new_unchecked(Vec3::new(0.0, 0.0, -1.0)));
		assert!(tri.intersect_ray(&ray).is_none());
	}

	#[test]
	fn roundtrips_barycentrics_from_point_inside() {
		let tri = sample_triangle();
		let normal = Vec3::new(0.0, 0.0, 1.0);

		let (u_in, v_in) = (0.25, 0.25);
		let point = tri.a * (1.0 - u_in - v_in) + tri.b * u_in + tri.c * v_in;

		let eps = 1e-3;
		let origin = point + normal * eps;
		let ray = Ray::new(origin, Unit::new_unchecked(-normal));

		let hit = tri.intersect_ray(&ray).expect("must hit");
		assert!((hit.t - eps).abs() < 1e-3);
		assert!((hit.u - u_in).abs() < 1e-4);
		assert!((hit.v - v_in).abs() < 1e-4);
	}
}
