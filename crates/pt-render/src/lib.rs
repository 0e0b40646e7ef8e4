mod camera;
mod error;
mod framebuffer;
mod integrator;
mod light;
mod scene;
mod tonemap;

pub use camera::{camera_ray, Camera};
pub use error::{RenderError, SceneError};
pub use framebuffer::{Framebuffer, RenderStats, Tile};
pub use integrator::trace;
pub use scene::{ObjectRef, Scene, SceneOptions, TonemapOperator};
