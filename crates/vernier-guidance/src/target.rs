//! Sources of the pursued point.

use glam::DVec3;

/// Anything that can report a target's current world position.
pub trait TargetProvider {
    fn target_position(&self) -> DVec3;
}

/// A fixed point.
impl TargetProvider for DVec3 {
    fn target_position(&self) -> DVec3 {
        *self
    }
}

/// Adapts a closure into a [`TargetProvider`].
pub struct TargetFn<F>(pub F);

impl<F: Fn() -> DVec3> TargetProvider for TargetFn<F> {
    fn target_position(&self) -> DVec3 {
        (self.0)()
    }
}
