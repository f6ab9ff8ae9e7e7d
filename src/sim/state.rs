//! Game state and core simulation types
//!
//! `GameState` is the director: it owns the player, every entity collection,
//! lives/score, the wave counters and the per-tick outbound event queue.
//! Entities hold their own kinematic state and timers; the frame rules that
//! drive them live in `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::segment::SegmentArena;
use crate::audio::{AnnouncerLine, SoundEffect};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Player is alive and the field is live
    Playing,
    /// Player died with lives to spare; enemies idle on the field
    AwaitRespawn,
    /// Run ended
    GameOver,
}

/// Enumerated visual identifiers; the external renderer maps these to models.
/// An entity owns exactly one from construction to destroy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    Butterfly,
    Centipede,
    Spider,
    Bullet,
    MineEgg,
    MineCross,
    Flower,
    Explosion,
    ScoreDigits,
}

/// One-shot effects the shell drains after every frame
#[derive(Debug, Clone)]
pub enum GameEvent {
    Sound {
        effect: SoundEffect,
        volume: f32,
        pitch: f32,
        looping: bool,
    },
    StopSound {
        effect: SoundEffect,
    },
    Announce {
        line: AnnouncerLine,
        level: u32,
        lives: u32,
        score: u64,
        highscore: bool,
    },
    /// One-frame colored zap line
    ZapLine {
        from: Vec2,
        to: Vec2,
    },
}

/// The player's flying avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub alive: bool,
    pub model: ModelId,
    /// Seconds until the next shot
    pub fire_timer: f32,
    /// Flower-power seconds remaining
    pub flower_power: f32,
    /// Zap seconds remaining; pulses fire while positive
    pub zap: f32,
    /// Sub-timer driving individual zap pulses
    pub zap_pulse: f32,
    /// Consecutive head kills
    pub combo: u32,
    /// Seconds before the combo decays
    pub combo_timer: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(0.0, PLAYER_SPAWN_Y),
            vel: Vec2::ZERO,
            alive: false,
            model: ModelId::Butterfly,
            fire_timer: 0.0,
            flower_power: 0.0,
            zap: 0.0,
            zap_pulse: 0.0,
            combo: 0,
            combo_timer: 0.0,
        }
    }

    /// Make the player live at the spawn point with all buffs cleared
    pub fn spawn(&mut self) {
        self.pos = Vec2::new(0.0, PLAYER_SPAWN_Y);
        self.vel = Vec2::ZERO;
        self.alive = true;
        self.fire_timer = 0.0;
        self.clear_power();
        self.combo = 0;
        self.combo_timer = 0.0;
    }

    pub fn empowered(&self) -> bool {
        self.flower_power > 0.0
    }

    /// Grant flower-power: faster fire plus an armed zap timer
    pub fn empower(&mut self) {
        self.flower_power = FLOWER_POWER_SECS;
        self.zap = FLOWER_POWER_SECS;
        self.zap_pulse = 0.0;
    }

    pub fn clear_power(&mut self) {
        self.flower_power = 0.0;
        self.zap = 0.0;
        self.zap_pulse = 0.0;
    }

    pub fn fire_interval(&self) -> f32 {
        if self.empowered() {
            FIRE_INTERVAL_EMPOWERED
        } else {
            FIRE_INTERVAL
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Spider that homes in on the player
#[derive(Debug, Clone)]
pub struct Chaser {
    pub pos: Vec2,
    pub speed: f32,
    /// Hit feedback, cleared at the start of every frame
    pub flash: bool,
    pub model: ModelId,
}

impl Chaser {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            speed,
            flash: false,
            model: ModelId::Spider,
        }
    }
}

/// Player projectile, travels up-field
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub speed: f32,
    /// Stretches toward full size just after firing
    pub scale: f32,
    /// Fired under flower-power: faster and fatter
    pub empowered: bool,
    pub model: ModelId,
}

impl Bullet {
    pub fn new(pos: Vec2, empowered: bool) -> Self {
        Self {
            pos: pos + Vec2::new(0.0, 1.0),
            speed: if empowered { 32.0 } else { 24.0 },
            scale: if empowered { 0.2 } else { 0.1 },
            empowered,
            model: ModelId::Bullet,
        }
    }

    pub fn full_scale(&self) -> f32 {
        if self.empowered { 1.5 } else { 1.0 }
    }
}

/// Dropped where a trailing segment died; lethal once armed
#[derive(Debug, Clone)]
pub struct Mine {
    pub pos: Vec2,
    pub age: f32,
    /// Armed and showing the growing cross
    pub blown: bool,
    pub cross_scale: f32,
    pub model: ModelId,
}

impl Mine {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            age: 0.0,
            blown: false,
            cross_scale: 1.0,
            model: ModelId::MineEgg,
        }
    }

    pub fn armed(&self) -> bool {
        self.blown
    }
}

/// Power-up dropped by a dying tail segment
#[derive(Debug, Clone)]
pub struct Flower {
    pub pos: Vec2,
    pub age: f32,
    pub model: ModelId,
}

impl Flower {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            age: 0.0,
            model: ModelId::Flower,
        }
    }

    /// Shrinks from full size to nothing over its lifetime
    pub fn scale(&self) -> f32 {
        (1.0 - self.age / FLOWER_LIFETIME_SECS).max(0.0)
    }

    pub fn expired(&self) -> bool {
        self.age >= FLOWER_LIFETIME_SECS
    }
}

/// Explosion lifetime in seconds
pub const EXPLOSION_SECS: f32 = 0.8;
/// Elapsed-time clamp for the first tick of an explosion's decay curve
const EXPLOSION_MIN_AGE: f32 = 1.0 / 120.0;

/// Cosmetic blast; no collision role
#[derive(Debug, Clone)]
pub struct Explosion {
    pub pos: Vec2,
    pub age: f32,
    pub big: bool,
    pub model: ModelId,
}

impl Explosion {
    pub fn new(pos: Vec2, big: bool) -> Self {
        Self {
            pos,
            age: 0.0,
            big,
            model: ModelId::Explosion,
        }
    }

    pub fn scale(&self) -> f32 {
        let base = if self.big { 3.0 } else { 1.5 };
        base + self.age * 6.0
    }

    /// Fades as the inverse of elapsed time; the first tick clamps elapsed
    /// away from zero so the curve never divides by it
    pub fn alpha(&self) -> f32 {
        (0.1 / self.age.max(EXPLOSION_MIN_AGE)).min(1.0)
    }

    pub fn expired(&self) -> bool {
        self.age >= EXPLOSION_SECS
    }
}

/// Popup lifetime in seconds
pub const POPUP_SECS: f32 = 1.2;

/// Visual weight of a score popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupStyle {
    Minor,
    Combo,
    SuperCombo,
}

/// Map a point value to its popup style.
///
/// The game only ever emits 10, multiples of 50 up to the combo cap, and the
/// flat super-combo bonus; anything else is a configuration bug.
pub fn popup_style(value: u64) -> PopupStyle {
    match value {
        SUPER_COMBO_SCORE => PopupStyle::SuperCombo,
        BODY_KILL_SCORE => PopupStyle::Minor,
        v if v > 0 && v % HEAD_KILL_SCORE == 0 && v <= HEAD_KILL_SCORE * 20 => PopupStyle::Combo,
        v => {
            debug_assert!(false, "no popup style for score value {v}");
            PopupStyle::Minor
        }
    }
}

/// Floating score number; rises and fades
#[derive(Debug, Clone)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub value: u64,
    pub age: f32,
    pub model: ModelId,
}

impl ScorePopup {
    pub fn new(pos: Vec2, value: u64) -> Self {
        Self {
            pos,
            value,
            age: 0.0,
            model: ModelId::ScoreDigits,
        }
    }

    pub fn style(&self) -> PopupStyle {
        popup_style(self.value)
    }

    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / POPUP_SECS).max(0.0)
    }

    pub fn expired(&self) -> bool {
        self.age >= POPUP_SECS
    }
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,

    /// Difficulty tier
    pub level: u32,
    /// Sub-tier, 1..=4, wrapping into the next level
    pub wave: u32,
    pub lives: u32,
    pub score: u64,
    /// Best score of a previous run, set by the shell before play; the
    /// game-over announcement flags when the live score beats it
    pub highscore: u64,
    pub phase: GamePhase,
    pub time_ticks: u64,

    pub player: Player,
    pub segments: SegmentArena,
    pub chasers: Vec<Chaser>,
    pub bullets: Vec<Bullet>,
    pub mines: Vec<Mine>,
    pub flowers: Vec<Flower>,
    pub explosions: Vec<Explosion>,
    pub popups: Vec<ScorePopup>,

    /// Accumulator for the segment stepping cadence
    pub segment_step_timer: f32,
    /// Seconds until another flower may spawn
    pub flower_cooldown: f32,
    /// Eases toward the player every frame
    pub camera: Vec2,

    /// Playfield bounds, fixed at construction
    pub half_width: f32,
    pub height: f32,

    /// Outbound one-shot effects, drained by the shell
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            level: 1,
            wave: 0,
            lives: STARTING_LIVES,
            score: 0,
            highscore: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::new(),
            segments: SegmentArena::new(),
            chasers: Vec::new(),
            bullets: Vec::new(),
            mines: Vec::new(),
            flowers: Vec::new(),
            explosions: Vec::new(),
            popups: Vec::new(),
            segment_step_timer: 0.0,
            flower_cooldown: 0.0,
            camera: Vec2::new(0.0, PLAYER_SPAWN_Y),
            half_width: FIELD_HALF_WIDTH,
            height: FIELD_HEIGHT,
            events: Vec::new(),
        };
        state.player.spawn();
        state.play_sound(SoundEffect::Music, 1.0, 1.0, true);
        state.announce(AnnouncerLine::StartingGame);
        state
    }

    pub fn play_sound(&mut self, effect: SoundEffect, volume: f32, pitch: f32, looping: bool) {
        self.events.push(GameEvent::Sound {
            effect,
            volume,
            pitch,
            looping,
        });
    }

    pub fn stop_sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::StopSound { effect });
    }

    pub fn announce(&mut self, line: AnnouncerLine) {
        self.events.push(GameEvent::Announce {
            line,
            level: self.level,
            lives: self.lives,
            score: self.score,
            highscore: self.score > self.highscore,
        });
    }

    /// Add points and float a popup at the kill site
    pub fn award(&mut self, value: u64, pos: Vec2) {
        self.score += value;
        self.popups.push(ScorePopup::new(pos, value));
    }

    pub fn zap_line(&mut self, from: Vec2, to: Vec2) {
        self.events.push(GameEvent::ZapLine { from, to });
    }

    /// Hand the queued one-shot effects to the shell
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Segment stepping interval for the current level, floored
    pub fn segment_step_interval(&self) -> f32 {
        self.tuning.segment_step_interval(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_starts_playing() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.player.alive);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.level, 1);
        // Music starts and the announcer says hello
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Sound { effect: SoundEffect::Music, looping: true, .. })));
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Announce {
                line: AnnouncerLine::StartingGame,
                ..
            }
        )));
    }

    #[test]
    fn test_award_floats_popups() {
        let mut state = GameState::new(1);
        state.award(50, Vec2::ZERO);
        state.award(10, Vec2::ZERO);
        assert_eq!(state.score, 60);
        assert_eq!(state.popups.len(), 2);
        assert_eq!(state.popups[0].style(), PopupStyle::Combo);
        assert_eq!(state.popups[1].style(), PopupStyle::Minor);
    }

    #[test]
    fn test_popup_style_table() {
        assert_eq!(popup_style(10), PopupStyle::Minor);
        assert_eq!(popup_style(50), PopupStyle::Combo);
        assert_eq!(popup_style(250), PopupStyle::Combo);
        assert_eq!(popup_style(1000), PopupStyle::SuperCombo);
    }

    #[test]
    fn test_explosion_first_tick_alpha_is_finite() {
        let boom = Explosion::new(Vec2::ZERO, false);
        assert!(boom.age == 0.0);
        let alpha = boom.alpha();
        assert!(alpha.is_finite());
        assert!(alpha <= 1.0);
    }

    #[test]
    fn test_flower_shrinks_and_expires() {
        let mut flower = Flower::new(Vec2::ZERO);
        assert_eq!(flower.scale(), 1.0);
        flower.age = FLOWER_LIFETIME_SECS / 2.0;
        assert!((flower.scale() - 0.5).abs() < 1e-6);
        flower.age = FLOWER_LIFETIME_SECS + 0.1;
        assert!(flower.expired());
        assert_eq!(flower.scale(), 0.0);
    }

    #[test]
    fn test_empower_arms_zap() {
        let mut player = Player::new();
        assert_eq!(player.fire_interval(), FIRE_INTERVAL);
        player.empower();
        assert!(player.empowered());
        assert_eq!(player.fire_interval(), FIRE_INTERVAL_EMPOWERED);
        assert_eq!(player.zap, FLOWER_POWER_SECS);
        player.clear_power();
        assert!(!player.empowered());
        assert_eq!(player.zap, 0.0);
    }
}
