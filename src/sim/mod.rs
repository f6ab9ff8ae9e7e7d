//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies; one-shot effects leave
//!   through the event queue, everything else is read from entity state

pub mod collision;
pub mod segment;
pub mod state;
pub mod tick;

pub use collision::{bullet_hits, flower_clears_mine, flower_pickup, lethal_contact, mine_kills};
pub use segment::{DestroyedSegment, Segment, SegmentArena, SegmentId, SegmentRole};
pub use state::{
    Bullet, Chaser, Explosion, Flower, GameEvent, GamePhase, GameState, Mine, ModelId, Player,
    PopupStyle, ScorePopup, popup_style,
};
pub use tick::{TickInput, tick};
