#![allow(dead_code)]

mod matrix;
mod unit;

pub use matrix::{Matrix3, Matrix4, Vector2, Vector3, Vector4};
pub use unit::Unit;

pub type Vec2 = Vector2;
pub type Vec3 = Vector3;
pub type Vec4 = Vector4;
pub type Mat3 = Matrix3;
pub type Mat4 = Matrix4;

pub const PI: f32 = std::f32::consts::PI;

/// Clamps `x` to be in the range `[min, max]`.
pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
	x.max(min).min(max)
}

/// Wraps `x` to be in the range `[min, max)`.
pub fn wrap(mut x: f32, min: f32, max: f32) -> f32 {
	let range = max - min;
	while x < min {
		x += range;
	}
	while x >= max {
		x -= range;
	}
	x
}

/// Builds an orthonormal tangent-space basis around `normal`, whose middle
/// column is the normal itself. Branches on `|n.x| > |n.y|` to pick a
/// numerically stable starting tangent, then explicitly normalizes it
/// before taking the cross product for the bitangent.
pub fn orthonormal_basis(normal: Unit<Vec3>) -> Mat3 {
	let n = *normal;

	let tangent = if n.x.abs() > n.y.abs() {
		Vec3::new(n.z, 0.0, -n.x)
	} else {
		Vec3::new(0.0, -n.z, n.y)
	}
	.normalize();

	let bitangent = n.cross(*tangent);

	Mat3::from_columns(*tangent, n, bitangent)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamp_bounds() {
		assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
		assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
		assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
	}

	#[test]
	fn wrap_reduces_into_range() {
		assert!((wrap(3.5, 0.0, 1.0) - 0.5).abs() < 1e-6);
		assert!((wrap(-0.5, 0.0, 1.0) - 0.5).abs() < 1e-6);
	}

	#[test]
	fn orthonormal_basis_columns_are_orthonormal() {
		let n = Vec3::new(0.2, 0.9, 0.3).normalize();
		let basis = orthonormal_basis(n);
		let t = basis.col(0);
		let b = basis.col(2);

		assert!((t.length() - 1.0).abs() < 1e-4);
		assert!((b.length() - 1.0).abs() < 1e-4);
		assert!(t.dot(*n).abs() < 1e-4);
		assert!(b.dot(*n).abs() < 1e-4);
		assert!(t.dot(b).abs() < 1e-4);
	}
}
