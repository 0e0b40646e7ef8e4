#![allow(dead_code)]

mod accel;
mod bvh;
mod error;
mod kdtree;
mod source;

pub use accel::{Accel, AccelKind};
pub use bvh::Bvh;
pub use error::AccelError;
pub use kdtree::KdTree;
pub use source::PrimitiveSource;
