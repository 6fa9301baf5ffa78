//! Bubble entities and the registry of live bubbles
//!
//! The registry is pure data: it maps physics bodies to gameplay ranks and
//! states. A bubble that has been merged away is simply absent; absence is
//! the "removed" state, so nothing can keep referring to it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::physics::BodyId;

/// Hex colors per rank, smallest first
pub const BUBBLE_COLORS: [&str; 11] = [
    "#ff7f7f", "#ff7fbf", "#ff7fff", "#bf7fff", "#7f7fff", "#7fbfff", "#7fffff", "#7fffbf",
    "#7fff7f", "#bfff7f", "#ffff7f",
];

/// Bubble size level. Two equal ranks fuse into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    pub const fn new(rank: u8) -> Self {
        Self(rank)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Points for fusing two bubbles of this rank: `2^rank`
    #[inline]
    pub fn points(self) -> u64 {
        1u64 << self.0
    }

    /// Display color; ranks beyond the palette reuse the last entry
    pub fn color(self) -> &'static str {
        let last = BUBBLE_COLORS.len() - 1;
        BUBBLE_COLORS[(self.0 as usize).min(last)]
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a tracked bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleState {
    /// Armed above the field, asleep, movable by the player
    Pending,
    /// Released into the simulation
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub body: BodyId,
    pub rank: Rank,
    pub state: BubbleState,
}

/// Live bubbles keyed by body, iterated in body order for determinism
#[derive(Debug, Clone, Default)]
pub struct BubbleRegistry {
    bubbles: BTreeMap<BodyId, Bubble>,
    pending: Option<BodyId>,
}

impl BubbleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a freshly armed bubble. Refused while another one is pending.
    pub fn insert_pending(&mut self, body: BodyId, rank: Rank) -> bool {
        if self.pending.is_some() || self.bubbles.contains_key(&body) {
            return false;
        }
        self.bubbles.insert(
            body,
            Bubble {
                body,
                rank,
                state: BubbleState::Pending,
            },
        );
        self.pending = Some(body);
        true
    }

    /// Track a bubble that enters play already released (fusion product)
    pub fn insert_active(&mut self, body: BodyId, rank: Rank) -> bool {
        if self.bubbles.contains_key(&body) {
            return false;
        }
        self.bubbles.insert(
            body,
            Bubble {
                body,
                rank,
                state: BubbleState::Active,
            },
        );
        true
    }

    /// Pending -> active. Returns the released bubble.
    pub fn release_pending(&mut self) -> Option<Bubble> {
        let body = self.pending.take()?;
        let bubble = self.bubbles.get_mut(&body)?;
        bubble.state = BubbleState::Active;
        Some(*bubble)
    }

    pub fn remove(&mut self, body: BodyId) -> Option<Bubble> {
        if self.pending == Some(body) {
            self.pending = None;
        }
        self.bubbles.remove(&body)
    }

    pub fn get(&self, body: BodyId) -> Option<&Bubble> {
        self.bubbles.get(&body)
    }

    pub fn contains(&self, body: BodyId) -> bool {
        self.bubbles.contains_key(&body)
    }

    pub fn pending(&self) -> Option<&Bubble> {
        self.pending.and_then(|body| self.bubbles.get(&body))
    }

    pub fn active(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles
            .values()
            .filter(|b| b.state == BubbleState::Active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        self.bubbles.values()
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_points_and_colors() {
        assert_eq!(Rank::new(0).points(), 1);
        assert_eq!(Rank::new(2).points(), 4);
        assert_eq!(Rank::new(10).points(), 1024);
        assert_eq!(Rank::new(0).color(), "#ff7f7f");
        assert_eq!(Rank::new(10).color(), "#ffff7f");
        assert_eq!(Rank::new(25).color(), "#ffff7f");
    }

    #[test]
    fn test_single_pending() {
        let mut registry = BubbleRegistry::new();
        assert!(registry.insert_pending(BodyId(1), Rank::new(0)));
        assert!(!registry.insert_pending(BodyId(2), Rank::new(1)));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.pending().map(|b| b.body), Some(BodyId(1)));

        let released = registry.release_pending().unwrap();
        assert_eq!(released.state, BubbleState::Active);
        assert!(registry.pending().is_none());
        assert!(registry.insert_pending(BodyId(2), Rank::new(1)));
        assert_eq!(registry.active().count(), 1);
    }

    #[test]
    fn test_remove_pending_clears_slot() {
        let mut registry = BubbleRegistry::new();
        registry.insert_pending(BodyId(7), Rank::new(3));
        assert!(registry.remove(BodyId(7)).is_some());
        assert!(registry.pending().is_none());
        assert!(registry.release_pending().is_none());
        assert!(registry.remove(BodyId(7)).is_none());
    }

    #[test]
    fn test_clear() {
        let mut registry = BubbleRegistry::new();
        registry.insert_pending(BodyId(1), Rank::new(0));
        registry.insert_active(BodyId(2), Rank::new(4));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.pending().is_none());
    }
}
