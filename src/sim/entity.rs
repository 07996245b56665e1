//! World entities and per-kind behavior tables
//!
//! Everything the spawn planner creates and the interaction pass moves is an
//! `Entity`. Behavior differences between kinds (vertical collision band,
//! movement-speed modifier, collectability) live here as exhaustive matches
//! so a new kind cannot be added without deciding all three.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Power-up subtypes carried by `EntityKind::PowerUp`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Magnet,
    ScoreBoost,
    SlowMotion,
    /// A trap - flips left/right for a few seconds
    ReverseControls,
    /// Restores one life, clamped at the current maximum
    Heart,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
        PowerUpKind::ScoreBoost,
        PowerUpKind::SlowMotion,
        PowerUpKind::ReverseControls,
        PowerUpKind::Heart,
    ];

    /// Spawn weight for the weighted discrete choice in the planner
    pub fn weight(&self) -> f32 {
        match self {
            PowerUpKind::Shield => 0.22,
            PowerUpKind::Magnet => 0.22,
            PowerUpKind::ScoreBoost => 0.18,
            PowerUpKind::SlowMotion => 0.14,
            PowerUpKind::ReverseControls => 0.10,
            PowerUpKind::Heart => 0.14,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::ScoreBoost => "score boost",
            PowerUpKind::SlowMotion => "slow motion",
            PowerUpKind::ReverseControls => "reversed controls",
            PowerUpKind::Heart => "heart",
        }
    }
}

/// Closed set of world object kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Ground spike - occupies ground up to `OBSTACLE_HEIGHT`
    Obstacle,
    Gem { value: u32 },
    /// Collectible letter of the current level word
    Letter { index: usize },
    /// Spans all lanes; entering it opens the shop
    ShopPortal,
    /// Hovers in a lane and fires a single missile when close
    Alien { fired: bool },
    Missile,
    PowerUp { kind: PowerUpKind },
}

impl EntityKind {
    /// Collectable on contact (gates the looser pickup collision path)
    pub fn is_pickup(&self) -> bool {
        matches!(
            self,
            EntityKind::Gem { .. } | EntityKind::Letter { .. } | EntityKind::PowerUp { .. }
        )
    }

    /// Deals damage on contact (gates the tight collision path)
    pub fn is_damage_source(&self) -> bool {
        matches!(
            self,
            EntityKind::Obstacle | EntityKind::Alien { .. } | EntityKind::Missile
        )
    }

    /// Whether this kind participates in spawn-gap accounting. Missiles move
    /// independently of the lane-obstacle cadence and are excluded.
    pub fn counts_for_gap(&self) -> bool {
        !matches!(self, EntityKind::Missile)
    }

    /// Extra forward speed on top of the scrolling world
    pub fn speed_bonus(&self) -> f32 {
        match self {
            EntityKind::Missile => MISSILE_EXTRA_SPEED,
            _ => 0.0,
        }
    }

    /// Vertical extent used for damage collision, given the spawn height
    pub fn vertical_band(&self, spawn_y: f32) -> (f32, f32) {
        match self {
            EntityKind::Obstacle => (0.0, OBSTACLE_HEIGHT),
            EntityKind::Missile => MISSILE_BAND,
            _ => (spawn_y - DEFAULT_BAND_HALF, spawn_y + DEFAULT_BAND_HALF),
        }
    }

    /// Particle burst color routed to the presentation layer (0xRRGGBB)
    pub fn burst_color(&self) -> u32 {
        match self {
            EntityKind::Obstacle => 0x8a8f99,
            EntityKind::Gem { value } if *value >= BONUS_GEM_VALUE => 0x7fffd4,
            EntityKind::Gem { .. } => 0x3fd0ff,
            EntityKind::Letter { .. } => 0xffd24a,
            EntityKind::ShopPortal => 0xc77dff,
            EntityKind::Alien { .. } => 0x9a66ff,
            EntityKind::Missile => 0xff5533,
            EntityKind::PowerUp { kind } => match kind {
                PowerUpKind::Shield => 0x58c7f3,
                PowerUpKind::Magnet => 0xf35858,
                PowerUpKind::ScoreBoost => 0xffe066,
                PowerUpKind::SlowMotion => 0x8dd9cc,
                PowerUpKind::ReverseControls => 0xb06ef3,
                PowerUpKind::Heart => 0xff6b9d,
            },
        }
    }
}

/// A live world object
///
/// `active` flips to false the moment the entity is consumed or destroyed;
/// inactive entities are never collidable and are purged from the registry by
/// the end of the tick that deactivated them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// (lane axis, vertical, forward axis); player stands at z = 0
    pub pos: Vec3,
    pub active: bool,
    /// Height at spawn, anchors the default vertical band
    pub spawn_y: f32,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec3) -> Self {
        Self {
            id,
            kind,
            pos,
            active: true,
            spawn_y: pos.y,
        }
    }

    /// Vertical extent for damage collision at the current position
    pub fn vertical_band(&self) -> (f32, f32) {
        self.kind.vertical_band(self.spawn_y)
    }
}
