use pt_math::{Vec2, Vec3};

use super::triangle::Triangle;

/// Maximum objects addressable by a [`PrimitiveRef`].
pub const MAX_OBJECTS: usize = 256;
/// Maximum triangles per object addressable by a [`PrimitiveRef`].
pub const MAX_TRIANGLES_PER_OBJECT: usize = 1 << 24;

/// A compact `(object, triangle)` identity. Spec-level this is a pair;
/// 32-bit packing is an implementation choice a caller may still make when
/// serializing to a wire/GPU format, but nothing here relies on the packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimitiveRef {
	pub object: u8,
	pub triangle: u32,
}

impl PrimitiveRef {
	pub fn new(object: usize, triangle: usize) -> Self {
		debug_assert!(object < MAX_OBJECTS);
		debug_assert!(triangle < MAX_TRIANGLES_PER_OBJECT);
		Self { object: object as u8, triangle: triangle as u32 }
	}

	pub fn object_index(&self) -> usize {
		self.object as usize
	}

	pub fn triangle_index(&self) -> usize {
		self.triangle as usize
	}
}

/// Per-vertex shading data for a triangle: shading normals and texcoords.
#[derive(Clone, Copy, Debug)]
pub struct TriangleProperties {
	pub normals: [Vec3; 3],
	pub texcoords: [Vec2; 3],
}

/// Identifies a material within a [`crate::Scene`]'s material table. Kept
/// as a plain index so this crate stays independent of `pt-material`.
pub type MaterialId = usize;

/// A contiguous array of triangles, a parallel array of their shading
/// properties, and a single material. Invariant: `triangles.len() ==
/// properties.len()`, and both are stable for the scene's lifetime.
pub struct Object {
	pub triangles: Vec<Triangle>,
	pub properties: Vec<TriangleProperties>,
	pub material: MaterialId,
}

impl Object {
	pub fn new(material: MaterialId) -> Self {
		Self { triangles: Vec::new(), properties: Vec::new(), material }
	}

	pub fn push_triangle(&mut self, triangle: Triangle, properties: TriangleProperties) {
		self.triangles.push(triangle);
		self.properties.push(properties);
	}

	pub fn len(&self) -> usize {
		self.triangles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.triangles.is_empty()
	}
}
