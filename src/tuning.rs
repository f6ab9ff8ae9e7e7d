//! Data-driven game balance
//!
//! Difficulty curves live here rather than in `consts` so a balance pass is
//! a JSON edit, not a rebuild. Tables are validated when loaded; a bad table
//! is a load-time error, never a mid-game surprise.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value out of range: {0}")]
    Invalid(&'static str),
}

/// Balance knobs for the wave director
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Segment stepping interval at level 1 (seconds)
    pub segment_step_base: f32,
    /// Interval reduction per level
    pub segment_step_per_level: f32,
    /// Interval never drops below this
    pub segment_step_floor: f32,

    /// Chaser homing speed at level 0
    pub chaser_base_speed: f32,
    pub chaser_speed_per_level: f32,
    pub chaser_max_speed: f32,

    /// Followers per chain at level 0
    pub chain_length_base: u32,
    pub chain_length_per_level: u32,
    pub chain_length_cap: u32,

    /// `max_combo` = this + level
    pub max_combo_base: u32,

    pub flower_spawn_chance: f64,
    pub flower_spawn_cooldown: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            segment_step_base: SEGMENT_STEP_BASE,
            segment_step_per_level: SEGMENT_STEP_PER_LEVEL,
            segment_step_floor: SEGMENT_STEP_FLOOR,
            chaser_base_speed: CHASER_BASE_SPEED,
            chaser_speed_per_level: CHASER_SPEED_PER_LEVEL,
            chaser_max_speed: CHASER_MAX_SPEED,
            chain_length_base: 8,
            chain_length_per_level: 2,
            chain_length_cap: 16,
            max_combo_base: 5,
            flower_spawn_chance: FLOWER_SPAWN_CHANCE,
            flower_spawn_cooldown: FLOWER_SPAWN_COOLDOWN,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.segment_step_floor <= 0.0 || self.segment_step_base < self.segment_step_floor {
            return Err(TuningError::Invalid(
                "segment step base must sit at or above a positive floor",
            ));
        }
        if self.chaser_max_speed <= 0.0 || self.chaser_base_speed > self.chaser_max_speed {
            return Err(TuningError::Invalid(
                "chaser base speed must not exceed the cap",
            ));
        }
        if self.chain_length_cap == 0 || self.chain_length_base > self.chain_length_cap {
            return Err(TuningError::Invalid(
                "chain length base must not exceed the cap",
            ));
        }
        if self.max_combo_base == 0 {
            return Err(TuningError::Invalid("max combo base must be positive"));
        }
        if !(0.0..=1.0).contains(&self.flower_spawn_chance) {
            return Err(TuningError::Invalid(
                "flower spawn chance must be a probability",
            ));
        }
        if self.flower_spawn_cooldown < 0.0 {
            return Err(TuningError::Invalid(
                "flower spawn cooldown must be non-negative",
            ));
        }
        Ok(())
    }

    pub fn segment_step_interval(&self, level: u32) -> f32 {
        (self.segment_step_base - self.segment_step_per_level * (level.saturating_sub(1)) as f32)
            .max(self.segment_step_floor)
    }

    pub fn chaser_speed(&self, level: u32) -> f32 {
        (self.chaser_base_speed + self.chaser_speed_per_level * level as f32)
            .min(self.chaser_max_speed)
    }

    /// Followers per chain; the head is spawned on top of these
    pub fn chain_length(&self, level: u32) -> u32 {
        (self.chain_length_base + self.chain_length_per_level * level).min(self.chain_length_cap)
    }

    pub fn max_combo(&self, level: u32) -> u32 {
        self.max_combo_base + level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_step_interval_floors() {
        let tuning = Tuning::default();
        assert_eq!(tuning.segment_step_interval(1), SEGMENT_STEP_BASE);
        // Deep levels pin to the floor instead of going negative
        assert_eq!(tuning.segment_step_interval(100), SEGMENT_STEP_FLOOR);
    }

    #[test]
    fn test_chaser_speed_caps() {
        let tuning = Tuning::default();
        assert!(tuning.chaser_speed(1) < CHASER_MAX_SPEED);
        assert_eq!(tuning.chaser_speed(50), CHASER_MAX_SPEED);
    }

    #[test]
    fn test_chain_length_caps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.chain_length(1), 10);
        assert_eq!(tuning.chain_length(10), tuning.chain_length_cap);
    }

    #[test]
    fn test_max_combo_matches_worked_example() {
        // Level 1 runs the six-kill super-combo ladder
        assert_eq!(Tuning::default().max_combo(1), 6);
    }

    #[test]
    fn test_from_json_roundtrip_and_rejects_garbage() {
        let tuning = Tuning::from_json("{\"max_combo_base\": 7}").unwrap();
        assert_eq!(tuning.max_combo_base, 7);
        assert_eq!(tuning.chain_length_base, 8);

        assert!(Tuning::from_json("{\"flower_spawn_chance\": 2.0}").is_err());
        assert!(Tuning::from_json("{\"unknown_knob\": 1}").is_err());
        assert!(Tuning::from_json("not json").is_err());
    }
}
