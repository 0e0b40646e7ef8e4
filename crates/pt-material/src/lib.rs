#![allow(dead_code)]

mod context;
mod diffuse;
mod glass;
mod material;
mod rough_dielectric;

pub use context::{ShadingContext, ShadingState};
pub use material::{BsdfKind, Material};
