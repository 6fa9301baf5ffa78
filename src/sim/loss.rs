//! Loss detector
//!
//! The board has overflowed when a released bubble sits above the deadline
//! while still moving up (screen space: `y < deadline`, `vy < 0`). A bubble
//! that merely bounced above the line and is now falling or resting does
//! not count.

use super::bubble::BubbleRegistry;
use crate::physics::{BodyId, Kinematics, Physics};

/// Overflow test for a single bubble
#[inline]
pub fn is_overflowing(kinematics: &Kinematics, deadline_y: f32) -> bool {
    kinematics.position.y < deadline_y && kinematics.velocity.y < 0.0
}

/// First released bubble that signals overflow, in body order
pub fn find_overflow(
    registry: &BubbleRegistry,
    physics: &dyn Physics,
    deadline_y: f32,
) -> Option<BodyId> {
    registry.active().find_map(|bubble| {
        let kinematics = physics.kinematics(bubble.body)?;
        is_overflowing(&kinematics, deadline_y).then_some(bubble.body)
    })
}
