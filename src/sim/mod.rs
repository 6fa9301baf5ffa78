//! Gameplay logic
//!
//! Everything here is deterministic given a seed and the sequence of host
//! calls:
//! - Seeded RNG only (spawn ranks)
//! - Stable iteration order (by body ID)
//! - Time enters only through `GameSession::advance`
//! - Physics and UI are reached through traits, never concrete types

pub mod bubble;
pub mod clock;
pub mod drop;
pub mod loss;
pub mod merge;
pub mod session;
pub mod spawn;
pub mod state;
pub mod timer;

pub use bubble::{BUBBLE_COLORS, Bubble, BubbleRegistry, BubbleState, Rank};
pub use clock::{ClockTick, SessionClock};
pub use drop::DropController;
pub use loss::{find_overflow, is_overflowing};
pub use merge::{Fusion, resolve_contact, resolve_contacts};
pub use session::GameSession;
pub use spawn::SpawnManager;
pub use state::{GameEvent, GameOverReason, GamePhase};
pub use timer::{Interval, Timeout};
