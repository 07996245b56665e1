//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Per-tick elapsed time clamped by the caller and again on entry
//! - Single-threaded: motion, collisions, spawning strictly ordered per tick
//! - No rendering or platform dependencies

pub mod entity;
pub mod pacing;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;

pub use entity::{Entity, EntityKind, PowerUpKind};
pub use pacing::Pacing;
pub use player::Player;
pub use spawn::SpawnOdds;
pub use state::{BuffDeadlines, GameEvent, GameMode, GameState, GameStatus};
pub use tick::{TickInput, tick};
