use log::debug;
use pt_geometry::{Aabb, PrimitiveRef, Ray, Triangle, TriangleHit};

use crate::source::PrimitiveSource;
use crate::AccelError;

/// A primitive wrapped in its fitted AABB, the unit the builder sorts and
/// partitions.
#[derive(Clone, Copy)]
struct Volume {
	aabb: Aabb,
	prim: PrimitiveRef,
}

enum Child {
	Leaf(PrimitiveRef),
	/// Index into [`Bvh::nodes`].
	Internal(u32),
}

struct Node {
	aabb: [Aabb; 2],
	child: [Child; 2],
}

/// SAH-built bounding volume hierarchy with two children per node, each
/// carrying its own AABB so traversal tests a child's box without an extra
/// indirection through the child node.
pub struct Bvh {
	nodes: Vec<Node>,
}

struct Task {
	start: usize,
	end: usize,
	node_idx: usize,
}

impl Bvh {
	/// Builds a BVH over `primitives`. Node capacity is bounded by
	/// `2 * primitives.len()`; a well-formed build never exceeds it, but the
	/// bound is still checked so a bug in the splitter reports an error
	/// instead of panicking on an out-of-bounds push.
	pub fn build(primitives: &[PrimitiveRef], source: &dyn PrimitiveSource) -> Result<Self, AccelError> {
		let n = primitives.len();
		if n == 0 {
			return Ok(Self { nodes: Vec::new() });
		}

		let capacity = 2 * n;
		let mut volumes: Vec<Volume> = primitives.iter().map(|&prim| Volume { aabb: Aabb::fit_triangle(&source.triangle(prim)), prim }).collect();

		let mut nodes = Vec::with_capacity(capacity);
		nodes.push(Node { aabb: [volumes[0].aabb, volumes[0].aabb], child: [Child::Leaf(volumes[0].prim), Child::Leaf(volumes[0].prim)] });

		if n == 1 {
			return Ok(Self { nodes });
		}

		let mut stack = vec![Task { start: 0, end: n, node_idx: 0 }];

		while let Some(task) = stack.pop() {
			if nodes.len() + 2 > capacity {
				return Err(AccelError::NodeCapacityExceeded);
			}

			let split = sah_split(&mut volumes[task.start..task.end]);
			let split_idx = task.start + split;

			// Left side: [task.start, split_idx]
			assign_child(&mut nodes, &mut stack, task.node_idx, 0, &volumes[task.start..=split_idx], task.start, split_idx + 1);

			// Right side: [split_idx+1, task.end)
			assign_child(&mut nodes, &mut stack, task.node_idx, 1, &volumes[split_idx + 1..task.end], split_idx + 1, task.end);
		}

		debug!("bvh build: {} primitives, {} nodes", n, nodes.len());
		Ok(Self { nodes })
	}

	/// Closest-hit traversal: a LIFO stack of internal node indices,
	/// starting from the root, comparing every leaf's triangle against the
	/// running closest distance.
	pub fn intersect(&self, ray: &Ray, source: &dyn PrimitiveSource) -> Option<(f32, PrimitiveRef, TriangleHit)> {
		if self.nodes.is_empty() {
			return None;
		}

		let mut best: Option<(f32, PrimitiveRef, TriangleHit)> = None;
		let mut stack = vec![0u32];

		while let Some(idx) = stack.pop() {
			let node = &self.nodes[idx as usize];
			for i in 0..2 {
				if node.aabb[i].intersect_ray(ray).is_none() {
					continue;
				}
				match node.child[i] {
					Child::Internal(child_idx) => stack.push(child_idx),
					Child::Leaf(prim) => {
						let triangle: Triangle = source.triangle(prim);
						if let Some(hit) = triangle.intersect_ray(ray) {
							if best.map_or(true, |(t, _, _)| hit.t < t) {
								best = Some((hit.t, prim, hit));
							}
						}
					}
				}
			}
		}

		best
	}

	/// Every primitive reference held by any leaf, for completeness checks.
	pub fn primitive_refs(&self) -> Vec<PrimitiveRef> {
		let mut out = Vec::new();
		for node in &self.nodes {
			for child in &node.child {
				if let Child::Leaf(prim) = child {
					out.push(*prim);
				}
			}
		}
		out
	}
}

fn assign_child(nodes: &mut Vec<Node>, stack: &mut Vec<Task>, node_idx: usize, slot: usize, volumes: &[Volume], start: usize, end: usize) {
	if volumes.len() == 1 {
		nodes[node_idx].aabb[slot] = volumes[0].aabb;
		nodes[node_idx].child[slot] = Child::Leaf(volumes[0].prim);
		return;
	}

	let mut aabb = Aabb::EMPTY;
	for v in volumes {
		aabb = aabb.fit_aabb(&v.aabb);
	}

	let child_idx = nodes.len();
	nodes.push(Node { aabb: [Aabb::EMPTY; 2], child: [Child::Leaf(volumes[0].prim), Child::Leaf(volumes[0].prim)] });

	nodes[node_idx].aabb[slot] = aabb;
	nodes[node_idx].child[slot] = Child::Internal(child_idx as u32);

	stack.push(Task { start, end, node_idx: child_idx });
}

/// Finds the split minimizing SAH cost across all three axes (the source
/// material's builder only ever tries the x axis; this tries all three and
/// keeps whichever is cheapest), sorts `volumes` by the winning axis, and
/// returns the index of the last element belonging to the left child.
fn sah_split(volumes: &mut [Volume]) -> usize {
	let n = volumes.len();
	debug_assert!(n >= 2);

	let mut container = Aabb::EMPTY;
	for v in volumes.iter() {
		container = container.fit_aabb(&v.aabb);
	}
	let container_area = container.surface_area();

	let mut best_axis = 0;
	let mut best_idx = 0;
	let mut best_cost = f32::INFINITY;

	for axis in 0..3 {
		let mut order: Vec<usize> = (0..n).collect();
		order.sort_by(|&a, &b| center(&volumes[a], axis).partial_cmp(&center(&volumes[b], axis)).unwrap());

		let mut left_area = vec![0.0f32; n - 1];
		let mut running = Aabb::EMPTY;
		for i in 0..n - 1 {
			running = running.fit_aabb(&volumes[order[i]].aabb);
			left_area[i] = running.surface_area();
		}

		let mut right_area = vec![0.0f32; n - 1];
		running = Aabb::EMPTY;
		for i in (1..n).rev() {
			running = running.fit_aabb(&volumes[order[i]].aabb);
			right_area[i - 1] = running.surface_area();
		}

		for i in 0..n - 1 {
			let left_count = (i + 1) as f32;
			let right_count = (n - i - 1) as f32;
			let cost = left_count * left_area[i] / container_area + right_count * right_area[i] / container_area;
			if cost < best_cost {
				best_cost = cost;
				best_axis = axis;
				best_idx = i;
			}
		}
	}

	volumes.sort_by(|a, b| center(a, best_axis).partial_cmp(&center(b, best_axis)).unwrap());
	best_idx
}

fn center(v: &Volume, axis: usize) -> f32 {
	let c = v.aabb.center();
	match axis {
		0 => c.x,
		1 => c.y,
		_ => c.z,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pt_math::Vec3;

	struct FlatSource {
		triangles: Vec<Triangle>,
	}

	impl PrimitiveSource for FlatSource {
		fn triangle(&self, prim: PrimitiveRef) -> Triangle {
			self.triangles[prim.triangle_index()]
		}
	}

	fn grid_triangles(n: usize) -> (Vec<PrimitiveRef>, FlatSource) {
		let triangles: Vec<Triangle> = (0..n)
			.map(|i| {
				let x = i as f32 * 2.0;
				Triangle { a: Vec3::new(x, 0.0, 0.0), b: Vec3::new(x + 1.0, 0.0, 0.0), c: Vec3::new(x, 1.0, 0.0) }
			})
			.collect();
		let prims: Vec<PrimitiveRef> = (0..n).map(|i| PrimitiveRef::new(0, i)).collect();
		(prims, FlatSource { triangles })
	}

	#[test]
	fn completeness_no_loss_no_duplication() {
		let (prims, source) = grid_triangles(64);
		let bvh = Bvh::build(&prims, &source).unwrap();

		let mut leaves = bvh.primitive_refs();
		leaves.sort_by_key(|p| p.triangle_index());
		let mut expected = prims.clone();
		expected.sort_by_key(|p| p.triangle_index());
		assert_eq!(leaves, expected);
	}

	#[test]
	fn single_triangle_is_immediate_leaf() {
		let (prims, source) = grid_triangles(1);
		let bvh = Bvh::build(&prims, &source).unwrap();
		assert_eq!(bvh.nodes.len(), 1);

		use pt_math::Unit;
		let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Unit::new_unchecked(Vec3::new(0.0, 0.0, -1.0)));
		assert!(bvh.intersect(&ray, &source).is_some());
	}
}
