use log::{debug, info};
use pt_accel::{Accel, AccelKind, PrimitiveSource};
use pt_geometry::{MaterialId, Object, PrimitiveRef, Triangle, TriangleProperties, MAX_OBJECTS, MAX_TRIANGLES_PER_OBJECT};
use pt_material::Material;
use pt_texture::HdrTexture;

use crate::light::Light;
use crate::SceneError;

/// Handle to an object added via [`Scene::add_object`]. Opaque index, stable
/// for the scene's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRef(usize);

/// One of the five tone-mapping operators applied at `render` time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TonemapOperator {
	None,
	Linear,
	Reinhard,
	Filmic,
	Uncharted2,
}

/// User-facing render configuration, validated once by [`Scene::end`].
pub struct SceneOptions {
	pub environment_map: Option<HdrTexture>,
	pub tonemapping_operator: TonemapOperator,
	pub accelerator: AccelKind,
	pub enable_direct_light_sampling: bool,
	pub subpixel_jitter: f32,
	pub samples_per_pixel: u32,
	pub bounces: u32,
	pub manual_exposure: f32,
	pub gamma: f32,
}

impl Default for SceneOptions {
	fn default() -> Self {
		Self {
			environment_map: None,
			tonemapping_operator: TonemapOperator::Reinhard,
			accelerator: AccelKind::Bvh,
			enable_direct_light_sampling: true,
			subpixel_jitter: 0.5,
			samples_per_pixel: 16,
			bounces: 4,
			manual_exposure: 1.0,
			gamma: 2.2,
		}
	}
}

/// The scene arena: objects, materials, derived lights, and the acceleration
/// structure built over all of it. Populated via `begin`/`add_object`, then
/// frozen by `end`; immutable and safely shared read-only thereafter.
pub struct Scene {
	objects: Vec<Object>,
	materials: Vec<Material>,
	pub(crate) lights: Vec<Light>,
	primitives: Vec<PrimitiveRef>,
	accel: Option<Accel>,
	pub options: SceneOptions,
}

impl Scene {
	/// Allocates object storage for up to `capacity` objects (`scene_begin`).
	pub fn begin(capacity: usize) -> Self {
		Self {
			objects: Vec::with_capacity(capacity),
			materials: Vec::with_capacity(capacity),
			lights: Vec::new(),
			primitives: Vec::new(),
			accel: None,
			options: SceneOptions::default(),
		}
	}

	/// Appends a material to the scene's material table, returning an id
	/// to assign to one or more objects.
	pub fn add_material(&mut self, material: Material) -> MaterialId {
		self.materials.push(material);
		self.materials.len() - 1
	}

	/// Allocates a new, initially empty object bound to `material`
	/// (`scene_add_object`). The caller populates it via [`Scene::object_mut`].
	pub fn add_object(&mut self, material: MaterialId) -> Result<ObjectRef, SceneError> {
		if self.objects.len() >= MAX_OBJECTS {
			return Err(SceneError::TooManyObjects { requested: self.objects.len() + 1 });
		}
		self.objects.push(Object::new(material));
		Ok(ObjectRef(self.objects.len() - 1))
	}

	pub fn object_mut(&mut self, obj: ObjectRef) -> &mut Object {
		&mut self.objects[obj.0]
	}

	pub fn material(&self, id: MaterialId) -> &Material {
		&self.materials[id]
	}

	pub fn environment(&self, direction: pt_math::Unit<pt_math::Vec3>) -> pt_math::Vec3 {
		match &self.options.environment_map {
			Some(hdr) => hdr.sample(direction),
			None => pt_math::Vec3::ZERO,
		}
	}

	/// Freezes the scene: validates options, linearizes sRGB textures
	/// exactly once, derives the emissive light list, and builds the
	/// configured acceleration structure (`scene_end`).
	pub fn end(&mut self, options: SceneOptions) -> Result<(), SceneError> {
		if options.samples_per_pixel == 0 {
			return Err(SceneError::InvalidSampleCount(options.samples_per_pixel));
		}
		if options.bounces == 0 {
			return Err(SceneError::InvalidBounceCount(options.bounces));
		}

		for (object_idx, object) in self.objects.iter().enumerate() {
			if object.len() > MAX_TRIANGLES_PER_OBJECT {
				return Err(SceneError::TooManyTriangles { object: object_idx, triangles: object.len(), max: MAX_TRIANGLES_PER_OBJECT });
			}
		}

		for object in &mut self.objects {
			let material = &mut self.materials[object.material];
			material.albedo.linearize();
			material.emissive.linearize();
			material.roughness.linearize();
			material.metalness.linearize();
		}

		self.primitives.clear();
		for (object_idx, object) in self.objects.iter().enumerate() {
			for triangle_idx in 0..object.len() {
				self.primitives.push(PrimitiveRef::new(object_idx, triangle_idx));
			}
		}

		self.lights = Light::derive(&self.objects, &self.materials);

		let accel = Accel::build(options.accelerator, &self.primitives, self)?;

		info!("scene_end: {} objects, {} triangles, {} lights", self.objects.len(), self.primitives.len(), self.lights.len());
		debug!("scene_end: accelerator = {:?}", options.accelerator);

		self.accel = Some(accel);
		self.options = options;
		Ok(())
	}

	pub fn accel(&self) -> &Accel {
		self.accel.as_ref().expect("Scene::end must run before rendering")
	}

	pub fn triangle_properties(&self, prim: PrimitiveRef) -> &TriangleProperties {
		&self.objects[prim.object_index()].properties[prim.triangle_index()]
	}

	pub fn material_for(&self, prim: PrimitiveRef) -> &Material {
		&self.materials[self.objects[prim.object_index()].material]
	}
}

impl PrimitiveSource for Scene {
	fn triangle(&self, prim: PrimitiveRef) -> Triangle {
		self.objects[prim.object_index()].triangles[prim.triangle_index()]
	}
}
