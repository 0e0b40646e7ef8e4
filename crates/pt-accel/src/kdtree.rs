use log::debug;
use pt_math::{Unit, Vec3};
use pt_geometry::{Aabb, PrimitiveRef, Ray, Triangle};

use crate::source::PrimitiveSource;
use crate::AccelError;

/// Matches the original reference's tuned constant; SAH candidates scoring
/// above `leaf_cost` keep the node a leaf.
const TRAVERSAL_COST: f32 = 0.32;
/// Leaves at or below this primitive count stop splitting even if SAH would
/// prefer it, per the build's stated intent.
const MIN_LEAF_SIZE: usize = 3;
const MAX_DEPTH: u32 = 20;
const TRAVERSAL_STACK_CAPACITY: usize = 64;

enum KdNode {
	Leaf { prims: Vec<PrimitiveRef> },
	Internal { axis: u8, split: f32, left: u32, right: u32 },
}

/// SAH KD-tree over triangle AABB split events, with replicated
/// straddling triangles in both children. Owns its own build-time scratch
/// (event list, per-triangle AABB cache); nothing persists across builds.
pub struct KdTree {
	nodes: Vec<KdNode>,
	bounds: Aabb,
}

struct SplitCandidate {
	offset: f32,
	min_count: u32,
	max_count: u32,
}

fn axis_of(v: Vec3, axis: usize) -> f32 {
	match axis {
		0 => v.x,
		1 => v.y,
		_ => v.z,
	}
}

fn set_axis(v: &mut Vec3, axis: usize, value: f32) {
	match axis {
		0 => v.x = value,
		1 => v.y = value,
		_ => v.z = value,
	}
}

fn split_bounds(bounds: Aabb, axis: usize, offset: f32) -> (Aabb, Aabb) {
	let mut left = bounds;
	let mut right = bounds;
	set_axis(&mut left.max, axis, offset);
	set_axis(&mut right.min, axis, offset);
	(left, right)
}

impl KdTree {
	pub fn build(primitives: &[PrimitiveRef], source: &dyn PrimitiveSource) -> Result<Self, AccelError> {
		let aabbs: Vec<Aabb> = primitives.iter().map(|&p| Aabb::fit_triangle(&source.triangle(p))).collect();

		let mut bounds = Aabb::EMPTY;
		for a in &aabbs {
			bounds = bounds.fit_aabb(a);
		}

		let items: Vec<(PrimitiveRef, Aabb)> = primitives.iter().zip(aabbs.iter()).map(|(&p, &a)| (p, a)).collect();

		let mut nodes = Vec::new();
		nodes.push(KdNode::Leaf { prims: Vec::new() });
		build_node(&mut nodes, 0, items, bounds, MAX_DEPTH)?;

		debug!("kdtree build: {} primitives, {} nodes", primitives.len(), nodes.len());
		Ok(Self { nodes, bounds })
	}

	/// Every primitive referenced by any leaf; triangles straddling a split
	/// plane appear once per leaf they were replicated into.
	pub fn primitive_refs(&self) -> Vec<PrimitiveRef> {
		let mut out = Vec::new();
		for node in &self.nodes {
			if let KdNode::Leaf { prims } = node {
				out.extend(prims.iter().copied());
			}
		}
		out
	}

	/// TA-rec traversal: a small stack of ray-parametric intervals, each
	/// remembering the far subtree to resume into on backtrack.
	pub fn intersect(&self, ray: &Ray, source: &dyn PrimitiveSource) -> Option<(f32, PrimitiveRef, pt_geometry::TriangleHit)> {
		if self.nodes.is_empty() {
			return None;
		}

		let (a, b) = self.bounds.intersect_ray(ray)?;

		#[derive(Clone, Copy)]
		struct Entry {
			node: Option<u32>,
			t: f32,
			pb: Vec3,
			prev: usize,
		}

		let mut stack: Vec<Entry> = Vec::with_capacity(TRAVERSAL_STACK_CAPACITY);

		let en_t = a.max(0.0);
		stack.push(Entry { node: None, t: en_t, pb: ray.at(en_t), prev: 0 });
		stack.push(Entry { node: None, t: b, pb: ray.at(b), prev: 0 });

		let mut enpt = 0usize;
		let mut expt = 1usize;
		let mut cur = Some(0u32);

		while let Some(node_idx) = cur {
			let mut idx = node_idx;
			loop {
				match &self.nodes[idx as usize] {
					KdNode::Leaf { .. } => break,
					KdNode::Internal { axis, split, left, right } => {
						let axis = *axis as usize;
						let splitval = *split;

						let en_side = axis_of(stack[enpt].pb, axis);
						let ex_side = axis_of(stack[expt].pb, axis);

						let (near, far_child) = if en_side <= splitval {
							if ex_side <= splitval {
								idx = *left;
								continue;
							}
							if ex_side == splitval {
								idx = *right;
								continue;
							}
							(*left, *right)
						} else {
							if splitval < ex_side {
								idx = *right;
								continue;
							}
							(*right, *left)
						};

						let origin_axis = axis_of(ray.origin, axis);
						let dir_axis = axis_of(*ray.direction, axis);
						let t = (splitval - origin_axis) / dir_axis;

						let tmp = expt;
						expt += 1;
						if expt == enpt {
							expt += 1;
						}

						let mut pb = Vec3::ZERO;
						for a in 0..3 {
							pb[a] = if a == axis { splitval } else { axis_of(ray.origin, a) + t * axis_of(*ray.direction, a) };
						}

						let entry = Entry { node: Some(far_child), t, pb, prev: tmp };
						if expt >= stack.len() {
							stack.push(entry);
						} else {
							stack[expt] = entry;
						}

						idx = near;
					}
				}
			}

			let prims = match &self.nodes[idx as usize] {
				KdNode::Leaf { prims } => prims,
				KdNode::Internal { .. } => unreachable!(),
			};

			let mut closest: Option<(f32, PrimitiveRef, pt_geometry::TriangleHit)> = None;
			for &prim in prims {
				let triangle: Triangle = source.triangle(prim);
				if let Some(hit) = triangle.intersect_ray(ray) {
					if hit.t >= stack[enpt].t && hit.t <= stack[expt].t && closest.map_or(true, |(t, _, _)| hit.t < t) {
						closest = Some((hit.t, prim, hit));
					}
				}
			}

			if closest.is_some() {
				return closest;
			}

			enpt = expt;
			cur = stack[expt].node;
			expt = stack[enpt].prev;
		}

		None
	}
}

fn build_node(nodes: &mut Vec<KdNode>, node_idx: u32, items: Vec<(PrimitiveRef, Aabb)>, bounds: Aabb, depth_remaining: u32) -> Result<(), AccelError> {
	let n = items.len();

	if depth_remaining == 0 || n <= MIN_LEAF_SIZE {
		nodes[node_idx as usize] = KdNode::Leaf { prims: items.into_iter().map(|(p, _)| p).collect() };
		return Ok(());
	}

	let axis = bounds.longest_axis();

	let mut raw: Vec<(f32, u8)> = Vec::with_capacity(n * 2);
	for (_, aabb) in &items {
		raw.push((axis_of(aabb.min, axis), 0));
		raw.push((axis_of(aabb.max, axis), 1));
	}
	raw.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

	let mut candidates: Vec<SplitCandidate> = Vec::new();
	for (offset, kind) in raw {
		if let Some(last) = candidates.last_mut() {
			if (last.offset - offset).abs() < 1e-6 {
				if kind == 0 {
					last.min_count += 1;
				} else {
					last.max_count += 1;
				}
				continue;
			}
		}
		candidates.push(SplitCandidate { offset, min_count: (kind == 0) as u32, max_count: (kind == 1) as u32 });
	}

	let parent_area = bounds.surface_area();
	let sav = 0.5 / parent_area;
	let leaf_cost = n as f32;

	let mut left_count = 0u32;
	let mut right_count = n as u32;
	let mut best_cost = f32::INFINITY;
	let mut best_offset = 0.0f32;

	for cand in &candidates {
		left_count += cand.min_count;
		let (left_box, right_box) = split_bounds(bounds, axis, cand.offset);
		let cost = TRAVERSAL_COST + sav * (left_box.surface_area() * left_count as f32 + right_box.surface_area() * right_count as f32);
		if cost < best_cost {
			best_cost = cost;
			best_offset = cand.offset;
		}
		right_count -= cand.max_count;
	}

	if best_cost >= leaf_cost {
		nodes[node_idx as usize] = KdNode::Leaf { prims: items.into_iter().map(|(p, _)| p).collect() };
		return Ok(());
	}

	let (left_bounds, right_bounds) = split_bounds(bounds, axis, best_offset);

	let mut left_items = Vec::new();
	let mut right_items = Vec::new();
	for &(prim, aabb) in &items {
		let lo = axis_of(aabb.min, axis);
		let hi = axis_of(aabb.max, axis);
		if lo <= best_offset {
			left_items.push((prim, aabb));
		}
		if hi >= best_offset {
			right_items.push((prim, aabb));
		}
	}

	let left_idx = nodes.len() as u32;
	nodes.push(KdNode::Leaf { prims: Vec::new() });
	let right_idx = nodes.len() as u32;
	nodes.push(KdNode::Leaf { prims: Vec::new() });

	nodes[node_idx as usize] = KdNode::Internal { axis: axis as u8, split: best_offset, left: left_idx, right: right_idx };

	if left_items.len() > MIN_LEAF_SIZE {
		build_node(nodes, left_idx, left_items, left_bounds, depth_remaining - 1)?;
	} else {
		nodes[left_idx as usize] = KdNode::Leaf { prims: left_items.into_iter().map(|(p, _)| p).collect() };
	}

	if right_items.len() > MIN_LEAF_SIZE {
		build_node(nodes, right_idx, right_items, right_bounds, depth_remaining - 1)?;
	} else {
		nodes[right_idx as usize] = KdNode::Leaf { prims: right_items.into_iter().map(|(p, _)| p).collect() };
	}

	Ok(())
}
