use pt_math::Vec3;

use crate::scene::TonemapOperator;

fn uncharted2_partial(x: Vec3) -> Vec3 {
	const A: f32 = 0.15;
	const B: f32 = 0.5;
	const C: f32 = 0.1;
	const D: f32 = 0.2;
	const E: f32 = 0.02;
	const F: f32 = 0.3;

	let f = |c: f32| ((c * (A * c + C * B) + D * E) / (c * (A * c + B) + D * F)) - E / F;
	Vec3::new(f(x.x), f(x.y), f(x.z))
}

/// Applies `operator` to `color` (already exposure-scaled), folding in gamma
/// correction except for `None`, which is the identity.
pub fn apply(operator: TonemapOperator, color: Vec3, gamma: f32) -> Vec3 {
	match operator {
		TonemapOperator::None => color,
		TonemapOperator::Linear => Vec3::new(color.x.powf(1.0 / gamma), color.y.powf(1.0 / gamma), color.z.powf(1.0 / gamma)),
		TonemapOperator::Reinhard => {
			let c = Vec3::new(color.x / (1.0 + color.x), color.y / (1.0 + color.y), color.z / (1.0 + color.z));
			Vec3::new(c.x.powf(1.0 / gamma), c.y.powf(1.0 / gamma), c.z.powf(1.0 / gamma))
		}
		TonemapOperator::Filmic => {
			let x = Vec3::new((color.x - 0.004).max(0.0), (color.y - 0.004).max(0.0), (color.z - 0.004).max(0.0));
			let curve = |v: f32| (v * (6.2 * v + 0.5)) / (v * (6.2 * v + 1.7) + 0.06);
			Vec3::new(curve(x.x), curve(x.y), curve(x.z))
		}
		TonemapOperator::Uncharted2 => {
			let linear_white = Vec3::splat(11.2);
			let white_scale = uncharted2_partial(linear_white);
			let white_scale = Vec3::new(1.0 / white_scale.x, 1.0 / white_scale.y, 1.0 / white_scale.z);

			const EXPOSURE_BIAS: f32 = 2.0;
			let mapped = uncharted2_partial(color * EXPOSURE_BIAS).cmul(white_scale);
			Vec3::new(mapped.x.powf(1.0 / gamma), mapped.y.powf(1.0 / gamma), mapped.z.powf(1.0 / gamma))
		}
	}
}
