//! Game session - owns all mutable state and sequences the turn
//!
//! Phase transitions:
//! - `Ready -> CanPut`: start action. Arms the first bubble, starts the clock.
//! - `CanPut -> Interval`: drop. Releases the bubble, starts the cooldown.
//! - `Interval -> CanPut`: cooldown elapsed. Arms the next bubble.
//! - any -> `GameOver`: overflow or countdown expiry. Freezes physics.
//! - `init`: back to `Ready` from anywhere with an empty board.
//!
//! Input outside its phase is dropped silently. The host drives time through
//! [`GameSession::advance`]; physics runs on a fixed step inside it.

use std::time::Duration;

use glam::Vec2;

use super::bubble::{Bubble, BubbleRegistry};
use super::clock::{ClockTick, SessionClock};
use super::drop::DropController;
use super::loss;
use super::merge;
use super::spawn::SpawnManager;
use super::state::{GameEvent, GameOverReason, GamePhase};
use crate::config::GameConfig;
use crate::consts::MAX_SUBSTEPS;
use crate::error::ConfigError;
use crate::physics::{BodyId, Physics, WallDesc};
use crate::ui::{Affordance, GameUi, PhaseMessage};

pub struct GameSession<P: Physics, U: GameUi> {
    config: GameConfig,
    physics: P,
    ui: U,
    registry: BubbleRegistry,
    spawner: SpawnManager,
    drops: DropController,
    clock: SessionClock,
    phase: GamePhase,
    score: u64,
    game_over_reason: Option<GameOverReason>,
    events: Vec<GameEvent>,
    walls: Vec<BodyId>,
    /// Unsimulated time carried between frames (seconds)
    accumulator: f32,
    /// Physics steps taken since construction
    steps: u64,
}

impl<P: Physics, U: GameUi> GameSession<P, U> {
    /// Validate the config, build a session and put it in `Ready`
    pub fn new(config: GameConfig, physics: P, ui: U, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = SessionClock::new(config.time_limit_secs);
        let mut session = Self {
            config,
            physics,
            ui,
            registry: BubbleRegistry::new(),
            spawner: SpawnManager::new(seed),
            drops: DropController::new(),
            clock,
            phase: GamePhase::Ready,
            score: 0,
            game_over_reason: None,
            events: Vec::new(),
            walls: Vec::new(),
            accumulator: 0.0,
            steps: 0,
        };
        session.init();
        Ok(session)
    }

    /// Wipe the board, reset score and clock, rebuild walls, show the ready
    /// message
    pub fn init(&mut self) {
        self.drops.cancel();
        self.clock.reset();
        self.physics.clear();
        self.registry.clear();
        self.walls.clear();
        self.accumulator = 0.0;
        self.game_over_reason = None;

        self.ui.clear_message();
        self.set_score(0);
        self.build_boundary();

        self.phase = GamePhase::Ready;
        self.ui.timer_ticked(self.clock.time_left());
        self.ui
            .show_message(&PhaseMessage::ready(self.config.time_limit_secs));
        self.events.push(GameEvent::Reset);
        log::info!("Session ready");
    }

    /// Ground, left and right wall; the top stays open
    fn build_boundary(&mut self) {
        let w = self.config.field_width;
        let h = self.config.field_height;
        let t = self.config.wall_thickness;
        let walls = [
            WallDesc {
                center: Vec2::new(w / 2.0, h - t / 2.0),
                half_extents: Vec2::new(w / 2.0, t / 2.0),
            },
            WallDesc {
                center: Vec2::new(t / 2.0, h / 2.0),
                half_extents: Vec2::new(t / 2.0, h / 2.0),
            },
            WallDesc {
                center: Vec2::new(w - t / 2.0, h / 2.0),
                half_extents: Vec2::new(t / 2.0, h / 2.0),
            },
        ];
        for wall in &walls {
            let id = self.physics.add_wall(wall);
            self.walls.push(id);
        }
    }

    /// `Ready -> CanPut`
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            log::trace!("start ignored in {}", self.phase.as_str());
            return false;
        }
        self.phase = GamePhase::CanPut;
        self.arm();
        self.ui.clear_message();
        self.clock.start();
        self.events.push(GameEvent::Started);
        log::info!("Round started ({} s)", self.config.time_limit_secs);
        true
    }

    /// Run the action behind a phase message's button
    pub fn activate(&mut self, action: Affordance) -> bool {
        match action {
            Affordance::Start => self.start(),
            Affordance::Retry if self.phase == GamePhase::GameOver => {
                self.init();
                true
            }
            Affordance::Retry => {
                log::trace!("retry ignored in {}", self.phase.as_str());
                false
            }
        }
    }

    /// `CanPut -> Interval`: release the pending bubble
    pub fn request_drop(&mut self) -> bool {
        if self.phase != GamePhase::CanPut {
            log::trace!("drop ignored in {}", self.phase.as_str());
            return false;
        }
        let cooldown = self.config.drop_cooldown();
        let Some(bubble) = self
            .drops
            .release(&mut self.registry, &mut self.physics, cooldown)
        else {
            return false;
        };

        self.phase = GamePhase::Interval;
        let x = self
            .physics
            .kinematics(bubble.body)
            .map(|k| k.position.x)
            .unwrap_or_else(|| self.spawner.spawn_x(&self.config));
        log::debug!("Dropped bubble {} rank {} at x={x:.1}", bubble.body, bubble.rank);
        self.events.push(GameEvent::Dropped {
            body: bubble.body,
            rank: bubble.rank,
            x,
        });
        true
    }

    /// Steer the pending bubble; returns the clamped column
    pub fn request_reposition(&mut self, x: f32) -> Option<f32> {
        if self.phase != GamePhase::CanPut {
            return None;
        }
        self.drops.reposition(
            x,
            &self.registry,
            &mut self.physics,
            &mut self.spawner,
            &self.config,
        )
    }

    /// Advance timers and physics by `elapsed` of host time
    pub fn advance(&mut self, elapsed: Duration) {
        if self.phase == GamePhase::GameOver {
            return;
        }

        if self.drops.advance(elapsed) {
            self.on_cooldown_elapsed();
        }

        for tick in self.clock.advance(elapsed) {
            match tick {
                ClockTick::Tick(left) => self.ui.timer_ticked(left),
                ClockTick::Expired => self.game_over(GameOverReason::TimeUp),
            }
        }
        if self.phase == GamePhase::GameOver {
            return;
        }

        let dt = self.config.physics_dt();
        self.accumulator =
            (self.accumulator + elapsed.as_secs_f32()).min(dt * MAX_SUBSTEPS as f32);
        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            self.step_physics(dt);
            self.accumulator -= dt;
            substeps += 1;
            if self.phase == GamePhase::GameOver {
                break;
            }
        }
    }

    /// One fixed step: engine, merges, then the overflow check
    fn step_physics(&mut self, dt: f32) {
        let contacts = self.physics.step(dt);
        self.steps += 1;

        let fusions = merge::resolve_contacts(
            &contacts,
            &mut self.registry,
            &mut self.physics,
            &self.config,
        );
        for fusion in fusions {
            self.set_score(self.score + fusion.points);
            self.events.push(GameEvent::Fused(fusion));
        }

        if let Some(body) =
            loss::find_overflow(&self.registry, &self.physics, self.config.deadline_y())
        {
            log::debug!("Bubble {body} rising above the deadline");
            self.game_over(GameOverReason::Overflow);
        }
    }

    fn on_cooldown_elapsed(&mut self) {
        if self.phase != GamePhase::Interval {
            return;
        }
        self.arm();
        self.phase = GamePhase::CanPut;
    }

    fn arm(&mut self) {
        if let Some((body, rank)) =
            self.spawner
                .spawn(&mut self.registry, &mut self.physics, &self.config)
        {
            self.events.push(GameEvent::Armed { body, rank });
        }
    }

    fn game_over(&mut self, reason: GameOverReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.game_over_reason = Some(reason);
        self.drops.cancel();
        self.clock.stop();
        self.accumulator = 0.0;
        self.ui.show_message(&PhaseMessage::game_over(self.score));
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.score,
        });
        log::info!("Game over ({reason:?}), final score {}", self.score);
    }

    fn set_score(&mut self, score: u64) {
        self.score = score;
        self.ui.score_changed(score);
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.clock.time_left()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn pending(&self) -> Option<&Bubble> {
        self.registry.pending()
    }

    /// Default column for the next spawn
    pub fn cursor_x(&self) -> f32 {
        self.spawner.spawn_x(&self.config)
    }

    pub fn registry(&self) -> &BubbleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn walls(&self) -> &[BodyId] {
        &self.walls
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Take the event log
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
