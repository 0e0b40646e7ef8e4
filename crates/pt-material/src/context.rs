use pt_math::{orthonormal_basis, Mat3, Unit, Vec2, Vec3};

/// Everything a BSDF needs to know about the point being shaded, independent
/// of which lobe is asking.
pub struct ShadingContext {
	pub texcoord: Vec2,
	pub normal: Unit<Vec3>,
	/// Direction toward the camera/previous vertex, normalized.
	pub view: Unit<Vec3>,
	/// Tangent-space rotation; middle column is `normal`.
	pub rot: Mat3,
}

impl ShadingContext {
	pub fn new(texcoord: Vec2, normal: Unit<Vec3>, view: Unit<Vec3>) -> Self {
		Self { texcoord, normal, view, rot: orthonormal_basis(normal) }
	}
}

/// Per-bounce scratch state a BSDF's `sample` fills in and its `pdf`/`shade`
/// read back. Reset for every new bounce.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShadingState {
	pub roughness: f32,
	pub metalness: f32,
	pub half_vector: Vec3,
	/// Reflectance fraction chosen by glass's discrete reflect/transmit
	/// roulette; unused by the other lobes.
	pub fresnel: f32,
}
