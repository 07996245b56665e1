//! Lane Rush - a 3D lane-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world entities, collisions, game state)
//! - `settings`: Persisted preferences
//! - `highscores`: Persisted leaderboard

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Maximum per-tick elapsed time. A slow frame (tab backgrounding, GC
    /// pause) must not teleport entities past the collision band.
    pub const MAX_TICK_DT: f32 = 0.1;

    /// Lane geometry - lanes are indexed symmetrically around center lane 0
    pub const LANE_WIDTH: f32 = 2.0;
    pub const START_LANE_COUNT: u32 = 3;
    pub const MAX_LANE_COUNT: u32 = 5;

    /// Player body
    pub const PLAYER_HEIGHT: f32 = 1.8;
    pub const JUMP_VELOCITY: f32 = 11.0;
    pub const DOUBLE_JUMP_VELOCITY: f32 = 9.9;
    pub const GRAVITY: f32 = 30.0;
    /// Lateral approach rate toward the target lane center (per second)
    pub const LANE_APPROACH_RATE: f32 = 12.0;

    /// World speed
    pub const START_SPEED: f32 = 22.5;
    /// Speed gained per collected letter
    pub const LETTER_SPEED_BONUS: f32 = 2.25;
    /// Speed jump on a story level-up
    pub const LEVEL_SPEED_BONUS: f32 = 4.5;

    /// Endless-mode ramp: gentle growth, hard-capped
    pub const ENDLESS_RAMP_DISTANCE: f32 = 150.0;
    pub const ENDLESS_RAMP_BONUS: f32 = 0.75;
    /// Cap as a multiple of the starting base speed
    pub const ENDLESS_SPEED_CAP: f32 = 2.0;

    /// Entities first appear this far ahead of the player (negative z)
    pub const SPAWN_HORIZON: f32 = 90.0;
    /// Entities this far behind the player (positive z) are dropped
    pub const REMOVAL_THRESHOLD: f32 = 12.0;
    /// Minimum longitudinal gap between spawn events scales with speed
    pub const MIN_GAP_SPEED_FACTOR: f32 = 0.55;
    pub const MAX_GAP: f32 = 26.0;

    /// Swept collision band around the player's longitudinal position
    pub const SWEEP_TOLERANCE: f32 = 2.0;
    /// Lateral tolerance for damage sources (obstacles, aliens, missiles)
    pub const DAMAGE_LATERAL_TOLERANCE: f32 = 1.0;
    /// Lateral tolerance for pickups, widened while a magnet is active
    pub const PICKUP_LATERAL_TOLERANCE: f32 = 2.0;
    pub const MAGNET_PICKUP_LATERAL_TOLERANCE: f32 = 3.25;
    /// Vertical proximity for pickup collection (generous)
    pub const PICKUP_VERTICAL_TOLERANCE: f32 = 2.5;
    /// Shop portals span all lanes - longitudinal proximity only
    pub const PORTAL_TRIGGER_RANGE: f32 = 1.5;

    /// Magnet buff pulls pickups within this longitudinal distance
    pub const MAGNET_RANGE: f32 = 28.0;
    /// Lateral pull rate toward the player (per second)
    pub const MAGNET_PULL_RATE: f32 = 9.0;

    /// Aliens fire once when within this longitudinal distance
    pub const ALIEN_FIRE_RANGE: f32 = 45.0;
    /// Missile spawns this far ahead of the firing alien
    pub const MISSILE_SPAWN_LEAD: f32 = 2.5;
    /// Missiles outrun the scrolling world by this much
    pub const MISSILE_EXTRA_SPEED: f32 = 14.0;
    /// Missile lateral homing rate toward the player (per second)
    pub const MISSILE_HOMING_RATE: f32 = 2.5;

    /// Vertical extents
    pub const OBSTACLE_HEIGHT: f32 = 1.8;
    pub const MISSILE_BAND: (f32, f32) = (0.4, 1.6);
    /// Default half-band around an entity's spawn height
    pub const DEFAULT_BAND_HALF: f32 = 1.2;
    pub const ALIEN_HOVER_HEIGHT: f32 = 0.8;
    pub const PICKUP_HEIGHT: f32 = 1.0;
    /// Bonus gems sit atop ground obstacles, reachable by jumping
    pub const BONUS_GEM_HEIGHT: f32 = 2.6;

    /// Letter-spawn schedule: level-1 interval, scaled 1.5x per level
    pub const LETTER_INTERVAL_BASE: f32 = 90.0;
    pub const LETTER_INTERVAL_GROWTH: f32 = 1.5;
    /// Endless-mode shop portal offers
    pub const PORTAL_INTERVAL: f32 = 400.0;
    /// Level-up inserts a shop portal this far ahead
    pub const STORY_PORTAL_LEAD: f32 = 160.0;
    /// Level-up purges entities deeper than this (not yet visible)
    pub const DEEP_PURGE_RANGE: f32 = 60.0;

    /// Lives and letters
    pub const START_LIVES: u8 = 6;
    pub const MAX_MAX_LIVES: u8 = 6;
    pub const WORD_LEN: usize = 6;
    pub const STORY_LEVELS: u32 = 3;
    /// One 6-letter word target per story level
    pub const LEVEL_WORDS: [&str; STORY_LEVELS as usize] = ["SPRINT", "CHARGE", "LEGEND"];

    /// Scoring
    pub const GEM_VALUE: u32 = 10;
    pub const BONUS_GEM_VALUE: u32 = 25;
    pub const LETTER_SCORE: u32 = 50;
    /// Score trickle per unit of distance traveled
    pub const DISTANCE_SCORE_RATE: f32 = 1.0;

    /// Buff durations (seconds of simulated play)
    pub const SHIELD_DURATION: f32 = 8.0;
    pub const MAGNET_DURATION: f32 = 10.0;
    pub const SCORE_BOOST_DURATION: f32 = 10.0;
    pub const SCORE_BOOST_FACTOR: f32 = 2.0;
    pub const SLOW_MOTION_DURATION: f32 = 6.0;
    pub const SLOW_MOTION_FACTOR: f32 = 0.5;
    pub const REVERSE_DURATION: f32 = 6.0;
    pub const IMMORTALITY_DURATION: f32 = 3.0;

    /// Shop prices (gems)
    pub const COST_HEAL: u32 = 50;
    pub const COST_MAX_LIFE: u32 = 150;
    pub const COST_DOUBLE_JUMP: u32 = 200;
    pub const COST_IMMORTALITY: u32 = 300;
    pub const COST_LANE: u32 = 250;
}

/// Lateral world position of a signed lane index
#[inline]
pub fn lane_offset(lane: i32) -> f32 {
    lane as f32 * consts::LANE_WIDTH
}

/// Highest valid lane index for a lane count (lanes span -half..=half)
#[inline]
pub fn half_lane_span(lane_count: u32) -> i32 {
    (lane_count as i32 - 1) / 2
}

/// All valid lane indices for the current lane count
pub fn valid_lanes(lane_count: u32) -> Vec<i32> {
    let half = half_lane_span(lane_count);
    (-half..=half).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_offset_symmetric() {
        assert_eq!(lane_offset(0), 0.0);
        assert_eq!(lane_offset(1), -lane_offset(-1));
        assert_eq!(lane_offset(2), 2.0 * consts::LANE_WIDTH);
    }

    #[test]
    fn test_valid_lanes_three() {
        assert_eq!(valid_lanes(3), vec![-1, 0, 1]);
        assert_eq!(half_lane_span(3), 1);
    }

    #[test]
    fn test_valid_lanes_five() {
        assert_eq!(valid_lanes(5), vec![-2, -1, 0, 1, 2]);
        assert_eq!(half_lane_span(5), 2);
    }

    #[test]
    fn test_level_words_are_word_len() {
        for word in consts::LEVEL_WORDS {
            assert_eq!(word.len(), consts::WORD_LEN);
        }
    }
}
