//! Deterministic physics fake
//!
//! No gravity, no overlap resolution, no contact detection. Bodies drift by
//! whatever velocity the test assigns, and contacts are reported only when
//! queued with [`ScriptedPhysics::queue_contact`]. Every removal takes effect
//! immediately, so stale-event handling can be exercised precisely.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{BodyId, CircleDesc, CollisionFilter, Contact, Kinematics, Physics, WallDesc};

#[derive(Debug, Clone)]
pub struct ScriptedBody {
    pub kinematics: Kinematics,
    /// `None` for walls
    pub radius: Option<f32>,
    pub filter: CollisionFilter,
    pub asleep: bool,
}

#[derive(Debug, Default)]
pub struct ScriptedPhysics {
    bodies: BTreeMap<BodyId, ScriptedBody>,
    queued: Vec<Contact>,
    next_id: u64,
    /// Number of completed steps
    pub steps: u64,
}

impl ScriptedPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> BodyId {
        self.next_id += 1;
        BodyId(self.next_id)
    }

    pub fn body(&self, id: BodyId) -> Option<&ScriptedBody> {
        self.bodies.get(&id)
    }

    /// Report a contact between `a` and `b` on the next step
    pub fn queue_contact(&mut self, a: BodyId, b: BodyId) {
        self.queued.push(Contact::new(a, b));
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.kinematics.velocity = velocity;
        }
    }

    /// Circles only (walls excluded)
    pub fn circles(&self) -> impl Iterator<Item = (BodyId, &ScriptedBody)> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.radius.is_some())
            .map(|(id, b)| (*id, b))
    }
}

impl Physics for ScriptedPhysics {
    fn add_wall(&mut self, wall: &WallDesc) -> BodyId {
        let id = self.allocate();
        self.bodies.insert(
            id,
            ScriptedBody {
                kinematics: Kinematics {
                    position: wall.center,
                    velocity: Vec2::ZERO,
                },
                radius: None,
                filter: CollisionFilter::WALL,
                asleep: false,
            },
        );
        id
    }

    fn add_circle(&mut self, circle: &CircleDesc) -> BodyId {
        let id = self.allocate();
        self.bodies.insert(
            id,
            ScriptedBody {
                kinematics: Kinematics {
                    position: circle.position,
                    velocity: Vec2::ZERO,
                },
                radius: Some(circle.radius),
                filter: circle.filter,
                asleep: circle.asleep,
            },
        );
        id
    }

    fn remove(&mut self, id: BodyId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn kinematics(&self, id: BodyId) -> Option<Kinematics> {
        self.bodies.get(&id).map(|b| b.kinematics)
    }

    fn bodies(&self) -> Vec<BodyId> {
        self.bodies.keys().copied().collect()
    }

    fn set_position(&mut self, id: BodyId, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.kinematics.position = position;
        }
    }

    fn wake(&mut self, id: BodyId) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.asleep = false;
        }
    }

    fn set_filter(&mut self, id: BodyId, filter: CollisionFilter) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.filter = filter;
        }
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.queued.clear();
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        for body in self.bodies.values_mut() {
            if body.radius.is_some() && !body.asleep {
                body.kinematics.position += body.kinematics.velocity * dt;
            }
        }
        self.steps += 1;
        std::mem::take(&mut self.queued)
    }
}
