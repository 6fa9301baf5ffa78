//! Physics capability interface
//!
//! The gameplay core never integrates motion or resolves overlaps itself.
//! It talks to a rigid-body engine through the narrow [`Physics`] trait:
//! - create walls and circular bodies
//! - remove bodies, query their kinematics
//! - reposition, wake, and re-filter a body
//! - step the world and receive that step's contact-start events
//!
//! Providers:
//! - [`RapierWorld`]: real simulation backed by `rapier2d`
//! - [`ScriptedPhysics`]: deterministic fake for tests

pub mod rapier;
pub mod scripted;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use rapier::RapierWorld;
pub use scripted::ScriptedPhysics;

/// Opaque body identity assigned by the physics provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u64);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision categories (bit flags)
pub mod category {
    pub const WALL: u32 = 0x0001;
    pub const BUBBLE: u32 = 0x0002;
    pub const BUBBLE_PENDING: u32 = 0x0004;
    pub const ALL: u32 = u32::MAX;
}

/// Which bodies a body collides with
///
/// Two bodies interact only if each one's category is in the other's mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
}

impl CollisionFilter {
    pub const WALL: Self = Self {
        category: category::WALL,
        mask: category::ALL,
    };

    /// Released bubble: collides with walls and other released bubbles
    pub const BUBBLE: Self = Self {
        category: category::BUBBLE,
        mask: category::WALL | category::BUBBLE,
    };

    /// Armed bubble: rests against walls but is invisible to released bubbles
    pub const PENDING: Self = Self {
        category: category::BUBBLE_PENDING,
        mask: category::WALL | category::BUBBLE,
    };

    #[inline]
    pub fn interacts(&self, other: &CollisionFilter) -> bool {
        (self.category & other.mask) != 0 && (other.category & self.mask) != 0
    }
}

/// A static, axis-aligned wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallDesc {
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// A dynamic circular body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleDesc {
    pub position: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
    pub filter: CollisionFilter,
    /// Start asleep (unaffected by gravity until woken)
    pub asleep: bool,
}

/// Position and velocity of a body after the latest step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Two bodies started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
}

impl Contact {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }
}

/// Capabilities the gameplay core needs from a rigid-body engine
pub trait Physics {
    /// Add an immovable wall
    fn add_wall(&mut self, wall: &WallDesc) -> BodyId;

    /// Add a dynamic circle
    fn add_circle(&mut self, circle: &CircleDesc) -> BodyId;

    /// Destroy a body; returns false if it was already gone
    fn remove(&mut self, id: BodyId) -> bool;

    fn contains(&self, id: BodyId) -> bool;

    /// Current position and velocity, `None` for unknown bodies
    fn kinematics(&self, id: BodyId) -> Option<Kinematics>;

    /// All live bodies, walls included
    fn bodies(&self) -> Vec<BodyId>;

    /// Teleport a body without waking it
    fn set_position(&mut self, id: BodyId, position: Vec2);

    /// Put a sleeping body into the simulation
    fn wake(&mut self, id: BodyId);

    fn set_filter(&mut self, id: BodyId, filter: CollisionFilter);

    /// Remove every body
    fn clear(&mut self);

    /// Advance the world by `dt` seconds and return the contacts that began
    /// during the step, in engine order
    fn step(&mut self, dt: f32) -> Vec<Contact>;
}
