//! Session phases and the event log

use serde::{Deserialize, Serialize};

use super::bubble::Rank;
use super::merge::Fusion;
use crate::physics::BodyId;

/// Current phase of the turn state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start action
    Ready,
    /// A bubble is armed; the player may move and drop it
    CanPut,
    /// Post-drop cooldown, nothing armed
    Interval,
    /// Round ended; frozen until `init`
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::CanPut => "canput",
            GamePhase::Interval => "interval",
            GamePhase::GameOver => "gameover",
        }
    }
}

/// Why the last round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// A bubble was still rising above the deadline
    Overflow,
    /// Countdown reached zero
    TimeUp,
}

/// Things that happened, in order, since the host last drained the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Fresh session (construction or `init`)
    Reset,
    Started,
    Armed { body: BodyId, rank: Rank },
    Dropped { body: BodyId, rank: Rank, x: f32 },
    Fused(Fusion),
    GameOver { reason: GameOverReason, score: u64 },
}
