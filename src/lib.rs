//! Fallin' Bubble - a merge-the-bubbles arcade game
//!
//! Core modules:
//! - `sim`: Gameplay logic (turn state machine, spawning, merging, loss, clock)
//! - `physics`: Capability interface to the rigid-body engine, plus providers
//! - `ui`: Notification interface the session reports through
//! - `config`: Field geometry and timing, fixed per session

pub mod config;
pub mod error;
pub mod physics;
pub mod sim;
pub mod ui;

pub use config::GameConfig;
pub use error::ConfigError;
pub use sim::{GameEvent, GameOverReason, GamePhase, GameSession};

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (60 Hz)
    pub const PHYSICS_HZ: u32 = 60;
    /// Maximum physics substeps per `advance` to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Field dimensions (screen space, y grows downward)
    pub const FIELD_WIDTH: f32 = 420.0;
    pub const FIELD_HEIGHT: f32 = 700.0;
    pub const WALL_THICKNESS: f32 = 10.0;
    /// Deadline line, measured down from the top edge
    pub const DEADLINE_FROM_TOP: f32 = 100.0;
    /// Vertical center of a freshly armed bubble
    pub const SPAWN_Y: f32 = 30.0;

    /// Bubble radius = rank * RADIUS_PER_RANK + BASE_RADIUS
    pub const BASE_RADIUS: f32 = 20.0;
    pub const RADIUS_PER_RANK: f32 = 10.0;
    pub const FRICTION: f32 = 0.3;
    pub const MASS: f32 = 1.0;
    /// Downward acceleration, pixels/s²
    pub const GRAVITY: f32 = 1000.0;

    /// Highest rank a bubble can have
    pub const MAX_RANK: u8 = 10;
    /// New bubbles are drawn uniformly from ranks 0..STARTER_RANKS
    pub const STARTER_RANKS: u8 = 5;

    /// Session countdown
    pub const TIME_LIMIT_SECS: u32 = 60;
    /// Delay between releasing a bubble and arming the next one
    pub const DROP_COOLDOWN_MS: u64 = 500;

    pub const WALL_COLOR: &str = "#ccc";
}
