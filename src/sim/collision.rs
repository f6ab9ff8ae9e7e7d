//! Proximity tests shared by the simulation
//!
//! Everything is a plain Euclidean distance check on the playfield plane.
//! Bullet hits are strict: a target at exactly the hit radius is a miss.

use glam::Vec2;

use crate::consts::*;
use crate::flat_distance;

/// Bullet vs. segment or chaser. Exclusive boundary.
#[inline]
pub fn bullet_hits(bullet: Vec2, target: Vec2) -> bool {
    flat_distance(bullet, target) < BULLET_HIT_RADIUS
}

/// Segment or chaser touching the player
#[inline]
pub fn lethal_contact(entity: Vec2, player: Vec2) -> bool {
    flat_distance(entity, player) < LETHAL_CONTACT_RADIUS
}

/// An armed mine kills within its current cross scale; an unarmed one never
#[inline]
pub fn mine_kills(mine: Vec2, cross_scale: f32, armed: bool, player: Vec2) -> bool {
    armed && flat_distance(mine, player) < cross_scale
}

/// Player brushing a flower picks it up
#[inline]
pub fn flower_pickup(flower: Vec2, player: Vec2) -> bool {
    flat_distance(flower, player) < FLOWER_PICKUP_RADIUS
}

/// Flowers eat mines in a wider radius than they are picked up in
#[inline]
pub fn flower_clears_mine(flower: Vec2, mine: Vec2) -> bool {
    flat_distance(flower, mine) < FLOWER_CLEAR_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_boundary_is_exclusive() {
        let bullet = Vec2::new(0.0, 0.0);
        // Exactly 0.5 apart: miss
        assert!(!bullet_hits(bullet, Vec2::new(0.5, 0.0)));
        assert!(!bullet_hits(bullet, Vec2::new(0.0, -0.5)));
        // Strictly closer: hit
        assert!(bullet_hits(bullet, Vec2::new(0.499, 0.0)));
        assert!(bullet_hits(bullet, Vec2::new(0.3, 0.3)));
    }

    #[test]
    fn test_lethal_contact_radius() {
        let player = Vec2::new(10.0, 10.0);
        assert!(lethal_contact(Vec2::new(10.7, 10.0), player));
        assert!(!lethal_contact(Vec2::new(10.8, 10.0), player));
    }

    #[test]
    fn test_unarmed_mine_never_kills() {
        let player = Vec2::new(0.0, 0.0);
        assert!(!mine_kills(player, 10.0, false, player));
        assert!(mine_kills(Vec2::new(0.5, 0.0), 1.0, true, player));
        assert!(!mine_kills(Vec2::new(1.5, 0.0), 1.0, true, player));
    }

    #[test]
    fn test_flower_radii() {
        let flower = Vec2::new(0.0, 0.0);
        assert!(flower_pickup(flower, Vec2::new(0.9, 0.0)));
        assert!(!flower_pickup(flower, Vec2::new(1.1, 0.0)));
        // Clears mines farther out than it can be picked up
        assert!(flower_clears_mine(flower, Vec2::new(2.5, 0.0)));
        assert!(!flower_clears_mine(flower, Vec2::new(3.2, 0.0)));
    }
}
