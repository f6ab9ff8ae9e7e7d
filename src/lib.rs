//! Butter Zapper - a Centipede-style arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, scoring)
//! - `audio`: Symbolic sound/announcer cues consumed by an external mixer
//! - `tuning`: Data-driven game balance
//! - `highscores`: In-memory leaderboard

pub mod audio;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield half-width; x spans [-FIELD_HALF_WIDTH, FIELD_HALF_WIDTH]
    pub const FIELD_HALF_WIDTH: f32 = 25.0;
    /// Playfield depth; y spans [0, FIELD_HEIGHT]
    pub const FIELD_HEIGHT: f32 = 50.0;
    /// Bullets are culled once past this y
    pub const BULLET_EXIT_Y: f32 = 60.0;

    /// Player defaults
    pub const PLAYER_ACCEL: f32 = 60.0;
    pub const PLAYER_MAX_SPEED: f32 = 30.0;
    pub const PLAYER_SPAWN_Y: f32 = 20.0;
    pub const STARTING_LIVES: u32 = 3;

    /// Fire intervals (seconds)
    pub const FIRE_INTERVAL: f32 = 0.1;
    pub const FIRE_INTERVAL_EMPOWERED: f32 = 0.05;

    /// Collision radii. Bullet hits are strict (< BULLET_HIT_RADIUS);
    /// contact at exactly the radius is a miss.
    pub const BULLET_HIT_RADIUS: f32 = 0.5;
    pub const LETHAL_CONTACT_RADIUS: f32 = 0.8;
    pub const FLOWER_PICKUP_RADIUS: f32 = 1.0;
    pub const FLOWER_CLEAR_RADIUS: f32 = 3.0;

    /// Mine timings
    pub const MINE_ARM_SECS: f32 = 1.0;
    pub const MINE_LIFETIME_SECS: f32 = 5.0;
    /// Lethal cross growth once armed (units/sec)
    pub const MINE_CROSS_GROWTH: f32 = 3.0;

    /// Flower-power
    pub const FLOWER_POWER_SECS: f32 = 8.0;
    pub const FLOWER_LIFETIME_SECS: f32 = 10.0;
    pub const FLOWER_SPAWN_COOLDOWN: f32 = 10.0;
    pub const FLOWER_SPAWN_CHANCE: f64 = 0.25;

    /// Zap drain period while the zap timer is active
    pub const ZAP_PULSE_SECS: f32 = 0.1;

    /// Scoring
    pub const HEAD_KILL_SCORE: u64 = 50;
    pub const BODY_KILL_SCORE: u64 = 10;
    pub const ZAP_KILL_SCORE: u64 = 10;
    pub const SUPER_COMBO_SCORE: u64 = 1000;
    pub const COMBO_WINDOW_SECS: f32 = 2.0;

    /// Segment stepping cadence (seconds); shrinks with level down to the floor
    pub const SEGMENT_STEP_BASE: f32 = 0.07;
    pub const SEGMENT_STEP_PER_LEVEL: f32 = 0.005;
    pub const SEGMENT_STEP_FLOOR: f32 = 0.035;

    /// Chaser speed curve, capped
    pub const CHASER_BASE_SPEED: f32 = 1.5;
    pub const CHASER_SPEED_PER_LEVEL: f32 = 0.5;
    pub const CHASER_MAX_SPEED: f32 = 6.0;

    /// Camera follow rate (per second)
    pub const CAMERA_FOLLOW_RATE: f32 = 4.0;
}

/// Clamp a position into the playfield bounds
#[inline]
pub fn clamp_to_field(pos: Vec2, half_width: f32, height: f32) -> Vec2 {
    Vec2::new(pos.x.clamp(-half_width, half_width), pos.y.clamp(0.0, height))
}

/// Whether a position is inside the playfield bounds
#[inline]
pub fn field_contains(pos: Vec2, half_width: f32, height: f32) -> bool {
    pos.x >= -half_width && pos.x <= half_width && pos.y >= 0.0 && pos.y <= height
}

/// Distance between two points on the playfield plane (height is ignored
/// throughout the sim; everything lives at ground level)
#[inline]
pub fn flat_distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_field() {
        let clamped = clamp_to_field(Vec2::new(30.0, -5.0), 25.0, 50.0);
        assert_eq!(clamped, Vec2::new(25.0, 0.0));

        let inside = Vec2::new(-10.0, 42.0);
        assert_eq!(clamp_to_field(inside, 25.0, 50.0), inside);
    }

    #[test]
    fn test_field_contains_edges() {
        assert!(field_contains(Vec2::new(25.0, 0.0), 25.0, 50.0));
        assert!(field_contains(Vec2::new(-25.0, 50.0), 25.0, 50.0));
        assert!(!field_contains(Vec2::new(25.1, 0.0), 25.0, 50.0));
        assert!(!field_contains(Vec2::new(0.0, -0.1), 25.0, 50.0));
    }

    #[test]
    fn test_flat_distance() {
        let d = flat_distance(Vec2::new(3.0, 0.0), Vec2::new(0.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }
}
