use pt_geometry::{PrimitiveRef, Triangle};

/// Decouples the acceleration structures from scene storage: a builder only
/// needs to turn a [`PrimitiveRef`] into the triangle it identifies.
pub trait PrimitiveSource {
	fn triangle(&self, prim: PrimitiveRef) -> Triangle;
}
