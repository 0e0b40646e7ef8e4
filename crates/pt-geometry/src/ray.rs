use pt_math::{Unit, Vec3};

/// Offset applied to shadow-ray and bounce-ray origins along the shading
/// normal, to avoid self-intersection acne at the originating surface.
pub const SELF_HIT_BIAS: f32 = 1e-4;

/// A ray with a precomputed inverse direction for the AABB slab test.
///
/// `inv_direction` may contain `±inf` for axis-aligned rays; the slab test's
/// min/max composition discards those correctly, so callers must not use
/// `inv_direction` outside of `ray_aabb_intersect`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
	pub origin: Vec3,
	pub direction: Unit<Vec3>,
	pub inv_direction: Vec3,
}

impl Ray {
	pub fn new(origin: Vec3, direction: Unit<Vec3>) -> Self {
		let d = *direction;
		Self {
			origin,
			direction,
			inv_direction: Vec3::new(1.0 / d.x, 1.0 / d.y, 1.0 / d.z),
		}
	}

	/// Spawns a ray from `point` along `direction`, offset along `normal` by
	/// [`SELF_HIT_BIAS`] in the direction that keeps the origin on the same
	/// side as `direction` (the sign of `normal . direction`).
	pub fn spawn(point: Vec3, direction: Unit<Vec3>, normal: Vec3) -> Self {
		let sign = if normal.dot(*direction) < 0.0 { -1.0 } else { 1.0 };
		let origin = point + normal * (SELF_HIT_BIAS * sign);
		Self::new(origin, direction)
	}

	pub fn at(&self, t: f32) -> Vec3 {
		self.origin + *self.direction * t
	}
}
