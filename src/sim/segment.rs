//! Centipede chain storage
//!
//! Segments live in a slot arena and reference each other by handle:
//! `following` points at the segment ahead, `follower` at the one behind.
//! Only heads (no `following`) move on their own; everyone else copies the
//! position their predecessor had before the current step, which produces
//! the one-step conga-line lag.

use glam::Vec2;
use rand::Rng;

use crate::{clamp_to_field, field_contains};

/// Handle into the segment arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(u32);

impl SegmentId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Steps a bereaved follower sits still on the random-heading roll
const OUCH_STEPS: u32 = 8;

/// Chain role, drives which sub-model the renderer shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Head,
    Body,
    Tail,
}

/// One centipede segment
#[derive(Debug, Clone)]
pub struct Segment {
    pub pos: Vec2,
    /// Heading in degrees; 180 faces down-field toward the player
    pub heading: f32,
    pub following: Option<SegmentId>,
    pub follower: Option<SegmentId>,
    /// Steps remaining with heading randomness suppressed
    pub ouch: u32,
}

impl Segment {
    fn forward(&self) -> Vec2 {
        let rad = self.heading.to_radians();
        Vec2::new(rad.sin(), rad.cos())
    }
}

/// What a destroyed segment was, for the caller to resolve drops and splices
#[derive(Debug, Clone)]
pub struct DestroyedSegment {
    pub pos: Vec2,
    /// It had a predecessor, i.e. it was a body or tail
    pub had_following: bool,
    /// It had no follower, i.e. it was the chain's tail
    pub was_tail: bool,
    /// It was the chain's head
    pub was_head: bool,
}

/// Slot arena holding every live segment
#[derive(Debug, Default)]
pub struct SegmentArena {
    slots: Vec<Option<Segment>>,
    free: Vec<u32>,
    live: usize,
}

impl SegmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.slots.get(id.index()).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.slots.get_mut(id.index()).and_then(|s| s.as_mut())
    }

    /// Iterate live segments in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|seg| (SegmentId(i as u32), seg)))
    }

    /// Handles of all live segments, in slot order
    pub fn ids(&self) -> Vec<SegmentId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn role(&self, id: SegmentId) -> Option<SegmentRole> {
        let seg = self.get(id)?;
        Some(if seg.following.is_none() {
            SegmentRole::Head
        } else if seg.follower.is_none() {
            SegmentRole::Tail
        } else {
            SegmentRole::Body
        })
    }

    fn insert(&mut self, segment: Segment) -> SegmentId {
        self.live += 1;
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize] = Some(segment);
            SegmentId(slot)
        } else {
            self.slots.push(Some(segment));
            SegmentId((self.slots.len() - 1) as u32)
        }
    }

    /// Spawn a head at `(x, top_y)` with `length` followers trailing up-field.
    /// Produces `length + 1` segments linked head -> ... -> tail.
    pub fn spawn_chain(&mut self, x: f32, top_y: f32, length: u32) -> SegmentId {
        let head = self.insert(Segment {
            pos: Vec2::new(x, top_y),
            heading: 180.0,
            following: None,
            follower: None,
            ouch: 0,
        });
        let mut ahead = head;
        for i in 1..=length {
            let seg = self.insert(Segment {
                pos: Vec2::new(x, top_y + i as f32),
                heading: 180.0,
                following: Some(ahead),
                follower: None,
                ouch: 0,
            });
            self.get_mut(ahead)
                .expect("segment just inserted")
                .follower = Some(seg);
            ahead = seg;
        }
        head
    }

    /// Advance every chain by one step. Returns how many heads turned around
    /// at a field edge, for the bounce cue.
    ///
    /// Heads wander and bounce off the field edges; everyone else copies the
    /// position and heading their predecessor had before this call.
    pub fn step<R: Rng>(&mut self, rng: &mut R, half_width: f32, height: f32) -> u32 {
        // Snapshot so followers always read pre-step state, independent of
        // slot order.
        let before: Vec<Option<(Vec2, f32)>> = self
            .slots
            .iter()
            .map(|s| s.as_ref().map(|seg| (seg.pos, seg.heading)))
            .collect();

        let mut bounces = 0;
        for i in 0..self.slots.len() {
            let Some(seg) = self.slots[i].as_mut() else {
                continue;
            };
            if seg.ouch > 0 {
                seg.ouch -= 1;
            }
            match seg.following {
                Some(ahead) => {
                    if let Some(&Some((pos, heading))) = before.get(ahead.index()) {
                        seg.pos = pos;
                        seg.heading = heading;
                    } else {
                        // destroy() always severs links before freeing a slot
                        debug_assert!(false, "follower links at a freed slot");
                    }
                }
                None => {
                    if seg.ouch == 0 && rng.random_range(0..17) == 0 {
                        seg.heading += rng.random_range(-45.0..=45.0);
                    }
                    seg.pos += seg.forward();
                    if !field_contains(seg.pos, half_width, height) {
                        seg.heading += 180.0 + rng.random_range(-45.0..=45.0);
                        seg.pos = clamp_to_field(seg.pos, half_width, height);
                        bounces += 1;
                    }
                }
            }
        }
        bounces
    }

    /// Remove a segment and splice its chain.
    ///
    /// A destroyed head promotes its follower to head with a random heading
    /// kick; a destroyed interior segment leaves its follower stunned for a
    /// few steps. Idempotent: a stale handle returns `None`.
    pub fn destroy<R: Rng>(&mut self, id: SegmentId, rng: &mut R) -> Option<DestroyedSegment> {
        let seg = self.slots.get_mut(id.index())?.take()?;
        self.live -= 1;
        self.free.push(id.0);

        if let Some(ahead) = seg.following {
            if let Some(pred) = self.get_mut(ahead) {
                pred.follower = None;
            }
        }
        if let Some(behind) = seg.follower {
            if let Some(foll) = self.get_mut(behind) {
                foll.following = None;
                if seg.following.is_none() {
                    // Head death: follower takes over with a kick
                    foll.heading += rng.random_range(-45.0..=45.0);
                } else {
                    foll.ouch = OUCH_STEPS;
                }
            }
        }

        Some(DestroyedSegment {
            pos: seg.pos,
            had_following: seg.following.is_some(),
            was_tail: seg.follower.is_none(),
            was_head: seg.following.is_none(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn heads(arena: &SegmentArena) -> Vec<SegmentId> {
        arena
            .iter()
            .filter(|(_, s)| s.following.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Walk a chain from its head; panics on a broken back-link or cycle
    fn chain_len(arena: &SegmentArena, head: SegmentId) -> usize {
        let mut count = 0;
        let mut cursor = Some(head);
        while let Some(id) = cursor {
            count += 1;
            assert!(count <= arena.len(), "cycle in chain");
            let seg = arena.get(id).expect("chain link is live");
            if let Some(next) = seg.follower {
                assert_eq!(
                    arena.get(next).expect("follower is live").following,
                    Some(id)
                );
            }
            cursor = seg.follower;
        }
        count
    }

    #[test]
    fn test_spawn_chain_links_n_plus_one() {
        let mut arena = SegmentArena::new();
        let head = arena.spawn_chain(0.0, 45.0, 16);
        assert_eq!(arena.len(), 17);
        assert_eq!(heads(&arena), vec![head]);
        assert_eq!(chain_len(&arena, head), 17);
        assert_eq!(arena.role(head), Some(SegmentRole::Head));
    }

    #[test]
    fn test_destroy_interior_splits_into_two_chains() {
        let mut arena = SegmentArena::new();
        let head = arena.spawn_chain(0.0, 45.0, 4);
        // Third link: head -> a -> b -> c -> tail, destroy b
        let a = arena.get(head).unwrap().follower.unwrap();
        let b = arena.get(a).unwrap().follower.unwrap();
        arena.destroy(b, &mut rng()).unwrap();

        assert_eq!(arena.len(), 4);
        let heads = heads(&arena);
        assert_eq!(heads.len(), 2);
        let total: usize = heads.iter().map(|&h| chain_len(&arena, h)).sum();
        assert_eq!(total, 4);
        // Old predecessor became a tail
        assert_eq!(arena.role(a), Some(SegmentRole::Tail));
    }

    #[test]
    fn test_destroy_head_promotes_follower() {
        let mut arena = SegmentArena::new();
        let head = arena.spawn_chain(0.0, 45.0, 3);
        let next = arena.get(head).unwrap().follower.unwrap();

        let gone = arena.destroy(head, &mut rng()).unwrap();
        assert!(gone.was_head);
        assert!(!gone.had_following);
        assert_eq!(arena.role(next), Some(SegmentRole::Head));
        assert_eq!(heads(&arena), vec![next]);
        assert_eq!(chain_len(&arena, next), 3);
    }

    #[test]
    fn test_destroy_tail_reports_drop_site() {
        let mut arena = SegmentArena::new();
        let head = arena.spawn_chain(2.0, 45.0, 2);
        let mid = arena.get(head).unwrap().follower.unwrap();
        let tail = arena.get(mid).unwrap().follower.unwrap();

        let gone = arena.destroy(tail, &mut rng()).unwrap();
        assert!(gone.had_following);
        assert!(gone.was_tail);
        assert_eq!(arena.role(mid), Some(SegmentRole::Tail));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut arena = SegmentArena::new();
        let head = arena.spawn_chain(0.0, 45.0, 1);
        assert!(arena.destroy(head, &mut rng()).is_some());
        assert!(arena.destroy(head, &mut rng()).is_none());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_followers_lag_one_step() {
        let mut arena = SegmentArena::new();
        let head = arena.spawn_chain(0.0, 45.0, 2);
        let follower = arena.get(head).unwrap().follower.unwrap();
        let head_before = arena.get(head).unwrap().pos;

        arena.step(&mut rng(), 25.0, 50.0);
        assert_eq!(arena.get(follower).unwrap().pos, head_before);
    }

    #[test]
    fn test_head_bounces_at_field_edge() {
        let mut arena = SegmentArena::new();
        let head = arena.spawn_chain(0.0, 0.5, 0);
        let mut r = rng();
        // Heading 180 walks down off the bottom edge within a step or two
        for _ in 0..4 {
            arena.step(&mut r, 25.0, 50.0);
        }
        let seg = arena.get(head).unwrap();
        assert!(field_contains(seg.pos, 25.0, 50.0));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Destroying any single segment leaves well-formed chains whose
            /// sizes sum to the original count minus one.
            #[test]
            fn destroy_preserves_chain_shape(len in 1u32..20, victim in 0usize..21) {
                let mut arena = SegmentArena::new();
                let head = arena.spawn_chain(0.0, 45.0, len);
                let ids = arena.ids();
                let victim = ids[victim % ids.len()];
                let was_terminal = victim == head
                    || arena.get(victim).unwrap().follower.is_none();

                arena.destroy(victim, &mut rng()).unwrap();

                let heads = heads(&arena);
                prop_assert_eq!(heads.len(), if was_terminal { 1 } else { 2 });
                let total: usize = heads.iter().map(|&h| chain_len(&arena, h)).sum();
                prop_assert_eq!(total, len as usize);
            }
        }
    }
}
