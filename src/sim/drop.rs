//! Drop controller - releasing the armed bubble and steering it
//!
//! Phase gating lives in the session; these operations only check that a
//! pending bubble exists. The post-drop cooldown is owned here as a
//! cancellable timeout.

use std::time::Duration;

use glam::Vec2;

use super::bubble::{Bubble, BubbleRegistry};
use super::spawn::SpawnManager;
use super::timer::Timeout;
use crate::config::GameConfig;
use crate::physics::{CollisionFilter, Physics};

#[derive(Debug, Clone, Default)]
pub struct DropController {
    cooldown: Timeout,
}

impl DropController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the pending bubble into the simulation and start the cooldown.
    ///
    /// The bubble is woken, its filter widened so it can touch other
    /// released bubbles, and the pending slot is freed.
    pub fn release(
        &mut self,
        registry: &mut BubbleRegistry,
        physics: &mut dyn Physics,
        cooldown: Duration,
    ) -> Option<Bubble> {
        let bubble = registry.release_pending()?;
        physics.wake(bubble.body);
        physics.set_filter(bubble.body, CollisionFilter::BUBBLE);
        self.cooldown = Timeout::new(cooldown);
        Some(bubble)
    }

    /// Move the pending bubble horizontally, clamped by its own radius.
    /// Returns the stored column.
    pub fn reposition(
        &self,
        x: f32,
        registry: &BubbleRegistry,
        physics: &mut dyn Physics,
        spawner: &mut SpawnManager,
        config: &GameConfig,
    ) -> Option<f32> {
        let bubble = registry.pending()?;
        let current = physics.kinematics(bubble.body)?;
        let clamped = config.clamp_x(x, config.radius_for(bubble.rank));
        physics.set_position(bubble.body, Vec2::new(clamped, current.position.y));
        spawner.record_cursor(clamped);
        Some(clamped)
    }

    pub fn cooling_down(&self) -> bool {
        self.cooldown.is_pending()
    }

    /// True once, when the cooldown elapses
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.cooldown.advance(elapsed)
    }

    pub fn cancel(&mut self) {
        self.cooldown.cancel();
    }
}
