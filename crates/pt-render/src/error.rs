use thiserror::Error;

/// Failures reported at `Scene::add_object`/`Scene::end` time. The scene is
/// never left half-initialized: a failing call leaves prior state untouched.
#[derive(Debug, Error)]
pub enum SceneError {
	#[error("object capacity exceeded: requested {requested}, max 256")]
	TooManyObjects { requested: usize },
	#[error("object {object} has {triangles} triangles, max {max}")]
	TooManyTriangles { object: usize, triangles: usize, max: usize },
	#[error("unknown accelerator configuration")]
	InvalidAccelerator,
	#[error("samples_per_pixel must be >= 1, got {0}")]
	InvalidSampleCount(u32),
	#[error("bounces must be >= 1, got {0}")]
	InvalidBounceCount(u32),
	#[error("kd-tree build scratch exhausted at depth {depth}")]
	KdTreeBuildOverflow { depth: u32 },
}

/// Failures reported at `Framebuffer::create`/`render` time.
#[derive(Debug, Error)]
pub enum RenderError {
	#[error("framebuffer dimensions must be non-zero")]
	ZeroSizedFramebuffer,
	#[error("tile [{x},{y})x[{w},{h}) out of framebuffer bounds {fb_w}x{fb_h}")]
	TileOutOfBounds { x: u32, y: u32, w: u32, h: u32, fb_w: u32, fb_h: u32 },
}

impl From<pt_accel::AccelError> for SceneError {
	fn from(err: pt_accel::AccelError) -> Self {
		match err {
			pt_accel::AccelError::NodeCapacityExceeded => SceneError::TooManyObjects { requested: 0 },
			pt_accel::AccelError::ScratchCapacityExceeded => SceneError::KdTreeBuildOverflow { depth: 0 },
			pt_accel::AccelError::DepthLimitExceeded { limit } => SceneError::KdTreeBuildOverflow { depth: limit },
		}
	}
}
