use pathtracer::{
	Accel, AccelKind, Attribute, BsdfKind, Camera, Framebuffer, Material, PrimitiveRef, Scene, SceneOptions, Tile,
	Triangle, TriangleProperties, Vec2, Vec3,
};

/// Each test lives in its own process-shared binary, so `init()` (which
/// panics on a second call) isn't safe here; `try_init` makes logging
/// available under `RUST_LOG` without caring which test sets it up first.
fn init_logging() {
	let _ = env_logger::try_init();
}

fn single_triangle_scene(albedo: Vec3, environment: Vec3) -> Scene {
	let mut scene = Scene::begin(1);
	let material_id = scene.add_material(Material::diffuse(Attribute::constant(albedo)));
	let object = scene.add_object(material_id).unwrap();

	let props = TriangleProperties { normals: [Vec3::new(0.0, 0.0, 1.0); 3], texcoords: [Vec2::ZERO; 3] };
	scene.object_mut(object).push_triangle(
		Triangle { a: Vec3::new(-5.0, -5.0, 0.0), b: Vec3::new(5.0, -5.0, 0.0), c: Vec3::new(0.0, 5.0, 0.0) },
		props,
	);

	let mut options = SceneOptions::default();
	options.environment_map = Some(pathtracer::HdrTexture::new(1, 1, vec![environment]));
	options.enable_direct_light_sampling = false;
	scene.end(options).unwrap();
	scene
}

fn default_camera() -> Camera {
	Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 60.0)
}

#[test]
fn empty_scene_returns_pure_environment_lookup() {
	init_logging();
	let mut scene = Scene::begin(0);
	let mut options = SceneOptions::default();
	options.environment_map = Some(pathtracer::HdrTexture::new(1, 1, vec![Vec3::new(0.2, 0.4, 0.6)]));
	scene.end(options).unwrap();

	let camera = default_camera();
	let mut fb = Framebuffer::create(4, 4).unwrap();
	fb.render(&camera, &scene, Tile { x: 0, y: 0, width: 4, height: 4 }, 42).unwrap();

	// With no tone mapping operator configured here (default is Reinhard),
	// a constant environment still produces a constant, finite framebuffer.
	let first = fb.pixel(0, 0);
	for y in 0..4 {
		for x in 0..4 {
			let p = fb.pixel(x, y);
			assert!((p.x - first.x).abs() < 1e-4 && (p.y - first.y).abs() < 1e-4 && (p.z - first.z).abs() < 1e-4);
		}
	}
}

#[test]
fn progressive_accumulation_matches_one_shot_render() {
	init_logging();
	let camera = default_camera();
	let tile = Tile { x: 0, y: 0, width: 8, height: 8 };

	let mut progressive_scene = single_triangle_scene(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
	let mut progressive_options = SceneOptions::default();
	progressive_options.environment_map = Some(pathtracer::HdrTexture::new(1, 1, vec![Vec3::splat(0.5)]));
	progressive_options.enable_direct_light_sampling = false;
	progressive_options.samples_per_pixel = 8;
	progressive_scene.end(progressive_options).unwrap();

	let mut one_shot_scene = single_triangle_scene(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
	let mut one_shot_options = SceneOptions::default();
	one_shot_options.environment_map = Some(pathtracer::HdrTexture::new(1, 1, vec![Vec3::splat(0.5)]));
	one_shot_options.enable_direct_light_sampling = false;
	one_shot_options.samples_per_pixel = 16;
	one_shot_scene.end(one_shot_options).unwrap();

	let mut progressive_fb = Framebuffer::create(8, 8).unwrap();
	progressive_fb.render(&camera, &progressive_scene, tile, 7).unwrap();
	progressive_fb.render(&camera, &progressive_scene, tile, 7).unwrap();

	let mut one_shot_fb = Framebuffer::create(8, 8).unwrap();
	one_shot_fb.render(&camera, &one_shot_scene, tile, 7).unwrap();

	for y in 0..8 {
		for x in 0..8 {
			let a = progressive_fb.pixel(x, y);
			let b = one_shot_fb.pixel(x, y);
			assert!((a.x - b.x).abs() < 1e-4, "x mismatch at ({x},{y}): {a:?} vs {b:?}");
			assert!((a.y - b.y).abs() < 1e-4);
			assert!((a.z - b.z).abs() < 1e-4);
		}
	}
}

#[test]
fn tiled_render_matches_single_call_render() {
	init_logging();
	let mut tiled_scene = single_triangle_scene(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
	let mut options = SceneOptions::default();
	options.environment_map = Some(pathtracer::HdrTexture::new(1, 1, vec![Vec3::splat(0.5)]));
	options.enable_direct_light_sampling = false;
	options.samples_per_pixel = 4;
	tiled_scene.end(options).unwrap();

	let mut whole_scene = single_triangle_scene(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));
	let mut whole_options = SceneOptions::default();
	whole_options.environment_map = Some(pathtracer::HdrTexture::new(1, 1, vec![Vec3::splat(0.5)]));
	whole_options.enable_direct_light_sampling = false;
	whole_options.samples_per_pixel = 4;
	whole_scene.end(whole_options).unwrap();

	let camera = default_camera();

	let mut tiled_fb = Framebuffer::create(8, 8).unwrap();
	let quadrants = [
		Tile { x: 0, y: 0, width: 4, height: 4 },
		Tile { x: 4, y: 0, width: 4, height: 4 },
		Tile { x: 0, y: 4, width: 4, height: 4 },
		Tile { x: 4, y: 4, width: 4, height: 4 },
	];
	for tile in quadrants {
		tiled_fb.render(&camera, &tiled_scene, tile, 99).unwrap();
	}

	let mut whole_fb = Framebuffer::create(8, 8).unwrap();
	whole_fb.render(&camera, &whole_scene, Tile { x: 0, y: 0, width: 8, height: 8 }, 99).unwrap();

	for y in 0..8 {
		for x in 0..8 {
			let a = tiled_fb.pixel(x, y);
			let b = whole_fb.pixel(x, y);
			assert!((a.x - b.x).abs() < 1e-4, "x mismatch at ({x},{y})");
			assert!((a.y - b.y).abs() < 1e-4);
			assert!((a.z - b.z).abs() < 1e-4);
		}
	}
}

#[test]
fn glass_at_normal_incidence_transmits_about_96_percent() {
	init_logging();
	let mut scene = Scene::begin(1);
	let mut glass = Material::diffuse(Attribute::constant(Vec3::ONE));
	glass.bsdf = BsdfKind::Glass;
	glass.ior = 1.5;
	let material_id = scene.add_material(glass);
	let object = scene.add_object(material_id).unwrap();

	let props = TriangleProperties { normals: [Vec3::new(0.0, 0.0, 1.0); 3], texcoords: [Vec2::ZERO; 3] };
	scene.object_mut(object).push_triangle(
		Triangle { a: Vec3::new(-5.0, -5.0, 0.0), b: Vec3::new(5.0, -5.0, 0.0), c: Vec3::new(0.0, 5.0, 0.0) },
		props,
	);

	let mut options = SceneOptions::default();
	options.environment_map = Some(pathtracer::HdrTexture::new(1, 1, vec![Vec3::ONE]));
	options.enable_direct_light_sampling = false;
	scene.end(options).unwrap();

	let normal = Vec3::new(0.0, 0.0, 1.0).normalize();
	let view = Vec3::new(0.0, 0.0, 1.0).normalize();
	let ctx = pathtracer::ShadingContext::new(Vec2::ZERO, normal, view);
	let mut state = pathtracer::ShadingState::default();
	let material = scene.material(material_id);
	let mut transmitted_fraction_samples = Vec::new();
	for i in 0..64u32 {
		let e3 = (i as f32 + 0.5) / 64.0;
		let dir = material.sample(&mut state, &ctx, 0.0, 0.0, e3);
		let pdf = material.pdf(&state, dir, &ctx);
		let shade = material.shade(&state, dir, &ctx);
		if pdf > 0.0 {
			transmitted_fraction_samples.push(shade.x / pdf);
		}
	}

	let mean: f32 = transmitted_fraction_samples.iter().sum::<f32>() / transmitted_fraction_samples.len() as f32;
	assert!((mean - 1.0).abs() < 1e-3, "expected shade/pdf to cancel to albedo (1.0), got {mean}");
}

#[test]
fn bvh_and_kdtree_agree_on_a_random_point_cloud() {
	init_logging();
	let mut rng_state: u64 = 0x1234_5678_9abc_def0;
	let mut next = move || {
		rng_state ^= rng_state << 13;
		rng_state ^= rng_state >> 7;
		rng_state ^= rng_state << 17;
		(rng_state >> 11) as f32 / (1u64 << 53) as f32
	};

	struct Cloud(Vec<Triangle>);
	impl pathtracer::PrimitiveSource for Cloud {
		fn triangle(&self, prim: PrimitiveRef) -> Triangle {
			self.0[prim.triangle_index()]
		}
	}

	let mut triangles = Vec::new();
	for _ in 0..1000 {
		let cx = next() * 20.0 - 10.0;
		let cy = next() * 20.0 - 10.0;
		let cz = next() * 20.0 - 10.0;
		let center = Vec3::new(cx, cy, cz);
		triangles.push(Triangle {
			a: center + Vec3::new(0.0, 0.0, 0.0),
			b: center + Vec3::new(0.1, 0.0, 0.0),
			c: center + Vec3::new(0.0, 0.1, 0.0),
		});
	}

	let source = Cloud(triangles);
	let refs: Vec<PrimitiveRef> = (0..1000).map(|i| PrimitiveRef::new(0, i)).collect();

	let bvh = Accel::build(AccelKind::Bvh, &refs, &source).unwrap();
	let kdtree = Accel::build(AccelKind::KdTree, &refs, &source).unwrap();

	for _ in 0..100 {
		let origin = Vec3::new(next() * 40.0 - 20.0, next() * 40.0 - 20.0, next() * 40.0 - 20.0);
		let dir = Vec3::new(next() * 2.0 - 1.0, next() * 2.0 - 1.0, next() * 2.0 - 1.0).normalize();
		let ray = pathtracer::Ray::new(origin, dir);

		let bvh_hit = bvh.intersect(&ray, &source);
		let kd_hit = kdtree.intersect(&ray, &source);

		match (bvh_hit, kd_hit) {
			(None, None) => {}
			(Some((bt, bp, _)), Some((kt, kp, _))) => {
				assert!((bt - kt).abs() < 1e-3, "distance mismatch: {bt} vs {kt}");
				assert_eq!(bp, kp, "primitive mismatch");
			}
			(a, b) => panic!("hit disagreement: bvh={a:?} kd={b:?}"),
		}
	}
}
