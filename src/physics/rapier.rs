//! `rapier2d` physics provider
//!
//! Screen-space world: y grows downward, so gravity is `+y`. Every rigid body
//! carries its [`BodyId`] in `user_data`, which is how collider handles from
//! collision events are mapped back to gameplay identities.

use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::{
    ActiveEvents, BroadPhase, CCDSolver, ColliderBuilder, ColliderHandle, ColliderSet,
    CollisionEvent, ContactPair, EventHandler, Group, ImpulseJointSet, IntegrationParameters,
    InteractionGroups, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline, Real,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, Vector,
};

use super::{BodyId, CircleDesc, CollisionFilter, Contact, Kinematics, Physics, WallDesc};

fn groups(filter: CollisionFilter) -> InteractionGroups {
    InteractionGroups::new(
        Group::from_bits_truncate(filter.category),
        Group::from_bits_truncate(filter.mask),
    )
}

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

#[inline]
fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Collects contact-start events emitted during one pipeline step
#[derive(Default)]
struct ContactCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event {
            let mut started = self.started.lock().unwrap_or_else(|e| e.into_inner());
            started.push((a, b));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    handles: HashMap<BodyId, RigidBodyHandle>,
    next_id: u64,
}

impl RapierWorld {
    /// Create an empty world with downward (`+y`) gravity
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: Vector::new(0.0, gravity),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            handles: HashMap::new(),
            next_id: 0,
        }
    }

    fn allocate(&mut self) -> BodyId {
        self.next_id += 1;
        BodyId(self.next_id)
    }

    /// Whether the body is currently asleep
    pub fn is_sleeping(&self, id: BodyId) -> Option<bool> {
        let handle = self.handles.get(&id)?;
        self.bodies.get(*handle).map(|b| b.is_sleeping())
    }

    fn body_of(&self, collider: ColliderHandle) -> Option<BodyId> {
        let parent = self.colliders.get(collider)?.parent()?;
        let body = self.bodies.get(parent)?;
        Some(BodyId(body.user_data as u64))
    }
}

impl Physics for RapierWorld {
    fn add_wall(&mut self, wall: &WallDesc) -> BodyId {
        let id = self.allocate();
        let body = RigidBodyBuilder::fixed()
            .translation(to_vector(wall.center))
            .user_data(id.0 as u128)
            .build();
        let collider = ColliderBuilder::cuboid(wall.half_extents.x, wall.half_extents.y)
            .collision_groups(groups(CollisionFilter::WALL))
            .build();
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.handles.insert(id, handle);
        id
    }

    fn add_circle(&mut self, circle: &CircleDesc) -> BodyId {
        let id = self.allocate();
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(circle.position))
            .sleeping(circle.asleep)
            .user_data(id.0 as u128)
            .build();
        let collider = ColliderBuilder::ball(circle.radius)
            .friction(circle.friction)
            .mass(circle.mass)
            .collision_groups(groups(circle.filter))
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.handles.insert(id, handle);
        id
    }

    fn remove(&mut self, id: BodyId) -> bool {
        let Some(handle) = self.handles.remove(&id) else {
            return false;
        };
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn contains(&self, id: BodyId) -> bool {
        self.handles.contains_key(&id)
    }

    fn kinematics(&self, id: BodyId) -> Option<Kinematics> {
        let handle = self.handles.get(&id)?;
        let body = self.bodies.get(*handle)?;
        Some(Kinematics {
            position: to_vec2(body.translation()),
            velocity: to_vec2(body.linvel()),
        })
    }

    fn bodies(&self) -> Vec<BodyId> {
        let mut ids: Vec<BodyId> = self.handles.keys().copied().collect();
        ids.sort();
        ids
    }

    fn set_position(&mut self, id: BodyId, position: Vec2) {
        if let Some(body) = self.handles.get(&id).and_then(|h| self.bodies.get_mut(*h)) {
            body.set_translation(to_vector(position), false);
        }
    }

    fn wake(&mut self, id: BodyId) {
        if let Some(body) = self.handles.get(&id).and_then(|h| self.bodies.get_mut(*h)) {
            body.wake_up(true);
        }
    }

    fn set_filter(&mut self, id: BodyId, filter: CollisionFilter) {
        let Some(body) = self.handles.get(&id).and_then(|h| self.bodies.get(*h)) else {
            return;
        };
        let attached: Vec<ColliderHandle> = body.colliders().to_vec();
        for handle in attached {
            if let Some(collider) = self.colliders.get_mut(handle) {
                collider.set_collision_groups(groups(filter));
            }
        }
    }

    fn clear(&mut self) {
        let next_id = self.next_id;
        *self = Self {
            next_id,
            ..Self::new(self.gravity.y)
        };
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.params.dt = dt;
        let collector = ContactCollector::default();
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &collector,
        );

        let started = collector
            .started
            .into_inner()
            .unwrap_or_else(|e| e.into_inner());
        started
            .into_iter()
            .filter_map(|(a, b)| Some(Contact::new(self.body_of(a)?, self.body_of(b)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    const DT: f32 = 1.0 / 60.0;

    fn floor(world: &mut RapierWorld) -> BodyId {
        world.add_wall(&WallDesc {
            center: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - WALL_THICKNESS / 2.0),
            half_extents: Vec2::new(FIELD_WIDTH / 2.0, WALL_THICKNESS / 2.0),
        })
    }

    fn bubble(x: f32, y: f32, filter: CollisionFilter, asleep: bool) -> CircleDesc {
        CircleDesc {
            position: Vec2::new(x, y),
            radius: 20.0,
            mass: MASS,
            friction: FRICTION,
            filter,
            asleep,
        }
    }

    fn run(world: &mut RapierWorld, steps: usize) -> Vec<Contact> {
        (0..steps).flat_map(|_| world.step(DT)).collect()
    }

    #[test]
    fn test_released_bubble_falls_and_lands() {
        let mut world = RapierWorld::new(GRAVITY);
        floor(&mut world);
        let id = world.add_circle(&bubble(200.0, 100.0, CollisionFilter::BUBBLE, false));

        world.step(DT);
        assert!(world.kinematics(id).unwrap().velocity.y > 0.0);

        run(&mut world, 240);
        let rest_y = FIELD_HEIGHT - WALL_THICKNESS - 20.0;
        let y = world.kinematics(id).unwrap().position.y;
        assert!((y - rest_y).abs() < 2.0, "bubble rests on the floor, y = {y}");
    }

    #[test]
    fn test_sleeping_bubble_waits_until_woken() {
        let mut world = RapierWorld::new(GRAVITY);
        floor(&mut world);
        let id = world.add_circle(&bubble(200.0, 30.0, CollisionFilter::PENDING, true));

        run(&mut world, 30);
        assert_eq!(world.kinematics(id).unwrap().position, Vec2::new(200.0, 30.0));
        assert_eq!(world.is_sleeping(id), Some(true));

        world.set_position(id, Vec2::new(150.0, 30.0));
        run(&mut world, 5);
        assert_eq!(world.kinematics(id).unwrap().position.x, 150.0);

        world.wake(id);
        world.set_filter(id, CollisionFilter::BUBBLE);
        run(&mut world, 30);
        assert!(world.kinematics(id).unwrap().position.y > 30.0);
    }

    #[test]
    fn test_contact_start_is_reported() {
        let mut world = RapierWorld::new(GRAVITY);
        let ground = floor(&mut world);
        let low = world.add_circle(&bubble(200.0, 600.0, CollisionFilter::BUBBLE, false));
        let high = world.add_circle(&bubble(205.0, 500.0, CollisionFilter::BUBBLE, false));

        let contacts = run(&mut world, 120);
        let touched = |x: BodyId, y: BodyId| {
            contacts
                .iter()
                .any(|c| (c.a == x && c.b == y) || (c.a == y && c.b == x))
        };
        assert!(touched(low, high));
        assert!(touched(low, ground));
    }

    #[test]
    fn test_pending_filter_ignores_released_bubbles() {
        let mut world = RapierWorld::new(GRAVITY);
        floor(&mut world);
        let resting = world.add_circle(&bubble(200.0, 670.0, CollisionFilter::BUBBLE, false));
        let ghost = world.add_circle(&bubble(200.0, 670.0, CollisionFilter::PENDING, true));

        let contacts = run(&mut world, 10);
        assert!(
            !contacts
                .iter()
                .any(|c| (c.a == resting && c.b == ghost) || (c.a == ghost && c.b == resting))
        );
    }

    #[test]
    fn test_remove_and_clear_keep_ids_unique() {
        let mut world = RapierWorld::new(GRAVITY);
        let a = world.add_circle(&bubble(100.0, 100.0, CollisionFilter::BUBBLE, false));
        assert!(world.remove(a));
        assert!(!world.remove(a));
        assert!(!world.contains(a));

        let b = world.add_circle(&bubble(100.0, 100.0, CollisionFilter::BUBBLE, false));
        world.clear();
        assert!(world.bodies().is_empty());
        let c = world.add_circle(&bubble(100.0, 100.0, CollisionFilter::BUBBLE, false));
        assert!(c > b);
    }
}
