//! Re-export facade over the path tracer's crates, so consumers depend on a
//! single `pathtracer` entry point instead of the individual `pt-*` crates.

pub use pt_accel::{Accel, AccelError, AccelKind, PrimitiveSource};
pub use pt_geometry::{
	Aabb, MaterialId, Object, PrimitiveRef, Ray, Triangle, TriangleHit, TriangleProperties, MAX_OBJECTS,
	MAX_TRIANGLES_PER_OBJECT,
};
pub use pt_material::{BsdfKind, Material, ShadingContext, ShadingState};
pub use pt_math::{orthonormal_basis, Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4, Vec2, Vec3, Vec4, PI};
pub use pt_render::{
	camera_ray, trace, Camera, Framebuffer, ObjectRef, RenderError, RenderStats, Scene, SceneError, SceneOptions, Tile,
	TonemapOperator,
};
pub use pt_texture::{Attribute, HdrTexture, LdrTexture};
