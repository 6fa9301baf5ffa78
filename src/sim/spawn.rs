//! Spawn manager - picks the next bubble and where it appears
//!
//! Ranks come from a seeded PCG stream so a run is reproducible from its seed.
//! Only the low "starter" ranks are ever spawned; bigger bubbles exist only
//! as fusion products.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bubble::{BubbleRegistry, Rank};
use crate::config::GameConfig;
use crate::physics::{BodyId, CircleDesc, CollisionFilter, Physics};

#[derive(Debug, Clone)]
pub struct SpawnManager {
    rng: Pcg32,
    /// Last requested drop column; `None` until the player first moves
    cursor_x: Option<f32>,
}

impl SpawnManager {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            cursor_x: None,
        }
    }

    /// Uniform over `0..starter_ranks`
    pub fn next_rank(&mut self, config: &GameConfig) -> Rank {
        Rank::new(self.rng.random_range(0..config.starter_ranks))
    }

    /// Horizontal spawn column: last cursor position, else the field center
    pub fn spawn_x(&self, config: &GameConfig) -> f32 {
        self.cursor_x.unwrap_or_else(|| config.center_x())
    }

    pub fn record_cursor(&mut self, x: f32) {
        self.cursor_x = Some(x);
    }

    /// Arm a new pending bubble. No-op while one is already pending.
    pub fn spawn(
        &mut self,
        registry: &mut BubbleRegistry,
        physics: &mut dyn Physics,
        config: &GameConfig,
    ) -> Option<(BodyId, Rank)> {
        if registry.pending().is_some() {
            log::trace!("spawn skipped: a bubble is already pending");
            return None;
        }

        let rank = self.next_rank(config);
        let radius = config.radius_for(rank);
        let x = config.clamp_x(self.spawn_x(config), radius);
        let body = physics.add_circle(&CircleDesc {
            position: Vec2::new(x, config.spawn_y),
            radius,
            mass: config.mass,
            friction: config.friction,
            filter: CollisionFilter::PENDING,
            asleep: true,
        });
        registry.insert_pending(body, rank);
        log::debug!("Armed bubble {body} rank {rank} at x={x:.1}");
        Some((body, rank))
    }
}
