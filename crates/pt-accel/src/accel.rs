use pt_geometry::{PrimitiveRef, Ray, TriangleHit};

use crate::bvh::Bvh;
use crate::kdtree::KdTree;
use crate::source::PrimitiveSource;
use crate::AccelError;

/// Which acceleration structure a scene was built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccelKind {
	Bvh,
	KdTree,
}

/// Runtime-selectable acceleration structure. Both variants answer the same
/// closest-hit query; the integrator doesn't need to know which one it has.
pub enum Accel {
	Bvh(Bvh),
	KdTree(KdTree),
}

impl Accel {
	pub fn build(kind: AccelKind, primitives: &[PrimitiveRef], source: &dyn PrimitiveSource) -> Result<Self, AccelError> {
		match kind {
			AccelKind::Bvh => Ok(Self::Bvh(Bvh::build(primitives, source)?)),
			AccelKind::KdTree => Ok(Self::KdTree(KdTree::build(primitives, source)?)),
		}
	}

	pub fn intersect(&self, ray: &Ray, source: &dyn PrimitiveSource) -> Option<(f32, PrimitiveRef, TriangleHit)> {
		match self {
			Self::Bvh(bvh) => bvh.intersect(ray, source),
			Self::KdTree(kdtree) => kdtree.intersect(ray, source),
		}
	}
}
