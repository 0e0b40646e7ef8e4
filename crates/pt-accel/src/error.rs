use thiserror::Error;

/// Failures that can occur while building an acceleration structure. These
/// should never trigger in a well-formed scene; a bug in the splitter
/// surfaces as one of these rather than panicking mid-build.
#[derive(Debug, Error)]
pub enum AccelError {
	#[error("BVH node capacity exceeded during build")]
	NodeCapacityExceeded,
	#[error("KD-tree scratch capacity exceeded during build")]
	ScratchCapacityExceeded,
	#[error("KD-tree recursion depth limit ({limit}) exceeded")]
	DepthLimitExceeded { limit: u32 },
}
