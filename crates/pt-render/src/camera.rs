use pt_geometry::Ray;
use pt_math::{Unit, Vec3};
use rand::Rng;

/// A look-at camera: position, look direction, up vector and vertical FOV
/// (degrees). This is the renderer's camera, not a focal-length/DOF camera:
/// camera rays are pure pinhole projections with optional subpixel jitter.
pub struct Camera {
	pub position: Vec3,
	pub direction: Unit<Vec3>,
	pub up: Vec3,
	pub fov: f32,
}

impl Camera {
	pub fn look_at(position: Vec3, target: Vec3, up: Vec3, fov: f32) -> Self {
		Self { position, direction: (target - position).normalize(), up, fov }
	}
}

struct LookAtBasis {
	x: Vec3,
	y: Vec3,
	z: Vec3,
}

fn look_at_basis(camera: &Camera) -> LookAtBasis {
	let z = *camera.direction;
	let x = *camera.up.cross(z).normalize();
	let y = z.cross(x);
	LookAtBasis { x, y, z }
}

/// Builds a primary ray through pixel `(x, y)` of a `width`x`height`
/// framebuffer, jittered within `[-jitter, +jitter]` pixels. Exposed `pub`
/// for debugging/visualization independent of a full render.
pub fn camera_ray(camera: &Camera, width: u32, height: u32, x: u32, y: u32, jitter: f32, rng: &mut impl Rng) -> Ray {
	let basis = look_at_basis(camera);

	let jx = if jitter > 0.0 { rng.gen_range(-jitter..=jitter) } else { 0.0 };
	let jy = if jitter > 0.0 { rng.gen_range(-jitter..=jitter) } else { 0.0 };

	let px = x as f32 + 0.5 + jx;
	let py = y as f32 + 0.5 + jy;

	let ndc_x = (px / width as f32) * 2.0 - 1.0;
	let ndc_y = 1.0 - (py / height as f32) * 2.0;

	let aspect = width as f32 / height as f32;
	let tan_half_fov = (camera.fov.to_radians() * 0.5).tan();

	let screen_x = ndc_x * aspect * tan_half_fov;
	let screen_y = ndc_y * tan_half_fov;

	let direction = (basis.x * screen_x + basis.y * screen_y + basis.z).normalize();
	Ray::new(camera.position, direction)
}
