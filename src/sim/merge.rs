//! Merge engine - turns contact events into fusions
//!
//! Contacts arrive as an unordered batch per physics step, and one bubble can
//! show up in several pairs. Fusing removes both sources from the registry
//! and the world immediately, so the first pair to claim a bubble wins and
//! any later pair naming it is dropped as stale.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bubble::{BubbleRegistry, BubbleState, Rank};
use crate::config::GameConfig;
use crate::physics::{BodyId, CircleDesc, CollisionFilter, Contact, Physics};

/// Result of one fusion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fusion {
    /// Rank of the two consumed bubbles
    pub rank: Rank,
    pub points: u64,
    /// The new bubble; `None` when two top-rank bubbles cancel out
    pub product: Option<BodyId>,
    pub position: Vec2,
}

/// Fuse the pair if both are released bubbles of equal rank
pub fn resolve_contact(
    contact: Contact,
    registry: &mut BubbleRegistry,
    physics: &mut dyn Physics,
    config: &GameConfig,
) -> Option<Fusion> {
    if contact.a == contact.b {
        return None;
    }
    let (Some(a), Some(b)) = (registry.get(contact.a), registry.get(contact.b)) else {
        log::trace!("contact {} / {} ignored: not two live bubbles", contact.a, contact.b);
        return None;
    };
    if a.state != BubbleState::Active || b.state != BubbleState::Active || a.rank != b.rank {
        return None;
    }
    let rank = a.rank;

    let position = match (physics.kinematics(contact.a), physics.kinematics(contact.b)) {
        (Some(ka), Some(kb)) => (ka.position + kb.position) / 2.0,
        _ => return None,
    };

    registry.remove(contact.a);
    registry.remove(contact.b);
    physics.remove(contact.a);
    physics.remove(contact.b);

    let product = if rank.get() >= config.max_rank {
        None
    } else {
        let next = rank.next();
        let body = physics.add_circle(&CircleDesc {
            position,
            radius: config.radius_for(next),
            mass: config.mass,
            friction: config.friction,
            filter: CollisionFilter::BUBBLE,
            asleep: false,
        });
        registry.insert_active(body, next);
        Some(body)
    };

    let fusion = Fusion {
        rank,
        points: rank.points(),
        product,
        position,
    };
    log::debug!(
        "Fused rank {rank} pair {} + {} -> {:?} (+{})",
        contact.a,
        contact.b,
        product,
        fusion.points
    );
    Some(fusion)
}

/// Process one step's batch in engine order
pub fn resolve_contacts(
    contacts: &[Contact],
    registry: &mut BubbleRegistry,
    physics: &mut dyn Physics,
    config: &GameConfig,
) -> Vec<Fusion> {
    contacts
        .iter()
        .filter_map(|contact| resolve_contact(*contact, registry, physics, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ScriptedPhysics;

    fn active(
        registry: &mut BubbleRegistry,
        physics: &mut ScriptedPhysics,
        config: &GameConfig,
        rank: u8,
        x: f32,
        y: f32,
    ) -> BodyId {
        let rank = Rank::new(rank);
        let body = physics.add_circle(&CircleDesc {
            position: Vec2::new(x, y),
            radius: config.radius_for(rank),
            mass: config.mass,
            friction: config.friction,
            filter: CollisionFilter::BUBBLE,
            asleep: false,
        });
        registry.insert_active(body, rank);
        body
    }

    #[test]
    fn test_equal_ranks_fuse_at_midpoint() {
        let config = GameConfig::default();
        let mut registry = BubbleRegistry::new();
        let mut physics = ScriptedPhysics::new();
        let a = active(&mut registry, &mut physics, &config, 2, 100.0, 600.0);
        let b = active(&mut registry, &mut physics, &config, 2, 105.0, 540.0);

        let fusion = resolve_contact(Contact::new(a, b), &mut registry, &mut physics, &config)
            .unwrap();
        assert_eq!(fusion.points, 4);
        assert_eq!(fusion.position, Vec2::new(102.5, 570.0));

        let product = fusion.product.unwrap();
        let bubble = registry.get(product).unwrap();
        assert_eq!(bubble.rank, Rank::new(3));
        assert_eq!(bubble.state, BubbleState::Active);
        assert_eq!(physics.body(product).unwrap().radius, Some(50.0));
        assert!(!registry.contains(a) && !registry.contains(b));
        assert!(!physics.contains(a) && !physics.contains(b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_ranks_and_walls_do_not_fuse() {
        let config = GameConfig::default();
        let mut registry = BubbleRegistry::new();
        let mut physics = ScriptedPhysics::new();
        let wall = physics.add_wall(&crate::physics::WallDesc {
            center: Vec2::new(5.0, 350.0),
            half_extents: Vec2::new(5.0, 350.0),
        });
        let a = active(&mut registry, &mut physics, &config, 1, 100.0, 600.0);
        let b = active(&mut registry, &mut physics, &config, 2, 140.0, 600.0);

        assert!(resolve_contact(Contact::new(a, b), &mut registry, &mut physics, &config).is_none());
        assert!(resolve_contact(Contact::new(a, wall), &mut registry, &mut physics, &config).is_none());
        assert!(resolve_contact(Contact::new(a, a), &mut registry, &mut physics, &config).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_pending_bubble_never_fuses() {
        let config = GameConfig::default();
        let mut registry = BubbleRegistry::new();
        let mut physics = ScriptedPhysics::new();
        let a = active(&mut registry, &mut physics, &config, 0, 100.0, 600.0);
        let pending = physics.add_circle(&CircleDesc {
            position: Vec2::new(100.0, 30.0),
            radius: config.radius_for(Rank::new(0)),
            mass: config.mass,
            friction: config.friction,
            filter: CollisionFilter::PENDING,
            asleep: true,
        });
        registry.insert_pending(pending, Rank::new(0));

        assert!(
            resolve_contact(Contact::new(a, pending), &mut registry, &mut physics, &config)
                .is_none()
        );
    }

    #[test]
    fn test_top_rank_pair_vanishes() {
        let config = GameConfig::default();
        let mut registry = BubbleRegistry::new();
        let mut physics = ScriptedPhysics::new();
        let top = config.max_rank;
        let a = active(&mut registry, &mut physics, &config, top, 150.0, 550.0);
        let b = active(&mut registry, &mut physics, &config, top, 250.0, 550.0);

        let batch = [Contact::new(a, b), Contact::new(b, a)];
        let fusions = resolve_contacts(&batch, &mut registry, &mut physics, &config);
        assert_eq!(fusions.len(), 1);
        assert_eq!(fusions[0].product, None);
        assert_eq!(fusions[0].points, 1 << top);
        assert!(registry.is_empty());
        assert_eq!(physics.circles().count(), 0);
    }

    #[test]
    fn test_first_claim_wins_within_batch() {
        let config = GameConfig::default();
        let mut registry = BubbleRegistry::new();
        let mut physics = ScriptedPhysics::new();
        let a = active(&mut registry, &mut physics, &config, 0, 100.0, 600.0);
        let b = active(&mut registry, &mut physics, &config, 0, 140.0, 600.0);
        let c = active(&mut registry, &mut physics, &config, 0, 60.0, 600.0);

        let batch = [
            Contact::new(a, b),
            Contact::new(b, a),
            Contact::new(a, c),
            Contact::new(c, b),
        ];
        let fusions = resolve_contacts(&batch, &mut registry, &mut physics, &config);
        assert_eq!(fusions.len(), 1);
        assert_eq!(fusions[0].points, 1);
        assert!(registry.contains(c));
        assert_eq!(registry.len(), 2);
    }
}
