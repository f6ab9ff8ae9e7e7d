//! Symbolic audio cues
//!
//! The simulation never touches a mixer; it emits `SoundEffect` and
//! `AnnouncerLine` ids through the event queue and an external audio service
//! resolves them to assets. The asset-key tables here are the single source
//! of truth; an id without a key is a configuration bug caught at startup.

use log::warn;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Head turned around at a field edge
    Bounce,
    /// Player fired
    Bullet,
    /// Player died
    Die,
    /// Segment popped
    ExplosionSmall,
    /// Mine or player explosion
    ExplosionBig,
    /// Run ended
    GameOver,
    /// Mine cross snapping open
    Lines,
    /// Zap pulse consumed a mine
    ZapA,
    /// Zap pulse consumed a segment
    ZapB,
    /// Chaser skitter loop (positional)
    Spider,
    /// Background music loop
    Music,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 11] = [
        SoundEffect::Bounce,
        SoundEffect::Bullet,
        SoundEffect::Die,
        SoundEffect::ExplosionSmall,
        SoundEffect::ExplosionBig,
        SoundEffect::GameOver,
        SoundEffect::Lines,
        SoundEffect::ZapA,
        SoundEffect::ZapB,
        SoundEffect::Spider,
        SoundEffect::Music,
    ];

    /// Asset key the external audio service loads
    pub fn asset_key(self) -> &'static str {
        match self {
            SoundEffect::Bounce => "bounce",
            SoundEffect::Bullet => "bullet",
            SoundEffect::Die => "die",
            SoundEffect::ExplosionSmall => "explosion_s",
            SoundEffect::ExplosionBig => "explosion_b",
            SoundEffect::GameOver => "gameover",
            SoundEffect::Lines => "lines",
            SoundEffect::ZapA => "zap_a",
            SoundEffect::ZapB => "zap_b",
            SoundEffect::Spider => "spider",
            SoundEffect::Music => "music",
        }
    }
}

/// Announcer voice lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncerLine {
    ButterZapper,
    Die,
    FlowerPower,
    GameOver,
    GiveItToMe,
    Goodbye,
    GotYou,
    HereComesFlower,
    LittleFlower,
    OBaby,
    Sexy,
    SoClose,
    StartingGame,
    SuperCombo,
    Sure,
    ThatsTheStuff,
    YouDie,
}

impl AnnouncerLine {
    pub fn asset_key(self) -> &'static str {
        match self {
            AnnouncerLine::ButterZapper => "butterzapper",
            AnnouncerLine::Die => "die",
            AnnouncerLine::FlowerPower => "flowerpower",
            AnnouncerLine::GameOver => "gameover",
            AnnouncerLine::GiveItToMe => "giveittome",
            AnnouncerLine::Goodbye => "goodbye",
            AnnouncerLine::GotYou => "gotyou",
            AnnouncerLine::HereComesFlower => "herecomesflower",
            AnnouncerLine::LittleFlower => "littleflower",
            AnnouncerLine::OBaby => "obaby",
            AnnouncerLine::Sexy => "sexy",
            AnnouncerLine::SoClose => "soclose",
            AnnouncerLine::StartingGame => "startinggame",
            AnnouncerLine::SuperCombo => "supercombo",
            AnnouncerLine::Sure => "sure",
            AnnouncerLine::ThatsTheStuff => "thatsthestuff",
            AnnouncerLine::YouDie => "youdie",
        }
    }
}

/// Wave-clear flavor pool; the director picks one at random
pub const WAVE_CLEAR_LINES: &[AnnouncerLine] = &[
    AnnouncerLine::ButterZapper,
    AnnouncerLine::GiveItToMe,
    AnnouncerLine::OBaby,
    AnnouncerLine::Sexy,
    AnnouncerLine::Sure,
    AnnouncerLine::ThatsTheStuff,
];

/// Player-death flavor pool
pub const DEATH_LINES: &[AnnouncerLine] = &[
    AnnouncerLine::YouDie,
    AnnouncerLine::Die,
    AnnouncerLine::Goodbye,
    AnnouncerLine::GotYou,
    AnnouncerLine::SoClose,
];

/// A resolved playback request for the external audio service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    pub effect: SoundEffect,
    pub volume: f32,
    pub pitch: f32,
    pub looping: bool,
}

impl SoundRequest {
    pub fn once(effect: SoundEffect) -> Self {
        Self {
            effect,
            volume: 1.0,
            pitch: 1.0,
            looping: false,
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 2.0);
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn looped(mut self) -> Self {
        self.looping = true;
        self
    }
}

/// Verify every id resolves to a non-empty asset key.
///
/// Run once by the shell before the first tick. A broken table is fatal in
/// debug builds; release builds log and carry on (cues are cosmetic).
pub fn validate_asset_keys() -> bool {
    let mut ok = true;
    for effect in SoundEffect::ALL {
        if effect.asset_key().is_empty() {
            warn!("sound effect {:?} has no asset key", effect);
            ok = false;
        }
    }
    debug_assert!(ok, "audio asset table is incomplete");
    ok
}
