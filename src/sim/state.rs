//! Authoritative game state and its mutation surface
//!
//! Every gameplay invariant (clamping, idempotence, terminal transitions) is
//! enforced here, behind explicit operations - callers never poke fields.
//! Buffs are modeled as expiry timestamps against the simulated clock and
//! checked fresh every tick; there are no ambient timers to cancel.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, PowerUpKind};
use super::pacing::Pacing;
use super::player::Player;
use crate::consts::*;

/// Top-level game status
///
/// Transitions are one-directional except Playing <-> Shop. GameOver and
/// Victory are terminal until an explicit restart or continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Menu,
    Playing,
    Shop,
    GameOver,
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Three-level letter-collection campaign ending in victory
    Story,
    /// Ramping speed, no letter objective, no end
    Endless,
}

/// Outbound signals consumed by the presentation layer, never read back
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PlayerHit { pos: Vec3 },
    Burst { pos: Vec3, color: u32 },
}

/// Expiry timestamps for timed buffs, in seconds of simulated play.
/// A buff is active iff `clock < deadline`; re-activation overwrites the
/// deadline, so overlapping pickups extend instead of canceling each other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BuffDeadlines {
    pub shield: f32,
    pub magnet: f32,
    pub score_boost: f32,
    pub slow_motion: f32,
    pub reverse: f32,
    pub immortality: f32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub status: GameStatus,
    pub mode: GameMode,
    pub score: u64,
    /// Fractional score carry for the distance trickle
    score_carry: f32,
    /// Gems double as shop currency
    pub gems: u32,
    pub lives: u8,
    pub max_lives: u8,
    pub base_speed: f32,
    /// 1-based story level
    pub level: u32,
    pub lane_count: u32,
    /// Cumulative distance traveled this run
    pub distance: f32,
    /// Simulated play clock (seconds), reference for buff deadlines
    pub clock: f32,
    /// Which letters of the current level word are collected
    pub collected: [bool; WORD_LEN],
    pub double_jump_owned: bool,
    pub immortality_owned: bool,
    pub buffs: BuffDeadlines,
    pub player: Player,
    pub pacing: Pacing,
    /// Live world objects, rebuilt wholesale each tick
    pub entities: Vec<Entity>,
    next_id: u32,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            status: GameStatus::Menu,
            mode: GameMode::Story,
            score: 0,
            score_carry: 0.0,
            gems: 0,
            lives: START_LIVES,
            max_lives: MAX_MAX_LIVES,
            base_speed: START_SPEED,
            level: 1,
            lane_count: START_LANE_COUNT,
            distance: 0.0,
            clock: 0.0,
            collected: [false; WORD_LEN],
            double_jump_owned: false,
            immortality_owned: false,
            buffs: BuffDeadlines::default(),
            player: Player::default(),
            pacing: Pacing::new(),
            entities: Vec::new(),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Re-seed the RNG after deserializing a saved run
    pub fn after_load(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed ^ self.distance.to_bits() as u64);
        self.events.clear();
    }

    /// Start or restart a run: full reset of every per-run field
    pub fn start_run(&mut self, mode: GameMode) {
        let seed = self.seed;
        let abilities = (self.double_jump_owned, self.immortality_owned);
        *self = GameState::new(seed.wrapping_add(1));
        self.mode = mode;
        self.status = GameStatus::Playing;
        // Purchased abilities persist across runs
        (self.double_jump_owned, self.immortality_owned) = abilities;
        if mode == GameMode::Endless {
            self.pacing.enter_endless(0.0);
        }
        log::info!("run started ({mode:?}), seed {}", self.seed);
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an entity to the registry
    pub fn push_entity(&mut self, kind: EntityKind, pos: Vec3) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity::new(id, kind, pos));
        id
    }

    // --- clock and buffs ---------------------------------------------------

    pub fn advance_clock(&mut self, dt: f32) {
        self.clock += dt;
    }

    pub fn shield_active(&self) -> bool {
        self.clock < self.buffs.shield
    }

    pub fn magnet_active(&self) -> bool {
        self.clock < self.buffs.magnet
    }

    pub fn reverse_active(&self) -> bool {
        self.clock < self.buffs.reverse
    }

    pub fn slow_motion_active(&self) -> bool {
        self.clock < self.buffs.slow_motion
    }

    pub fn immortality_active(&self) -> bool {
        self.clock < self.buffs.immortality
    }

    /// Damage is a no-op while a shield or immortality window is open
    pub fn is_invincible(&self) -> bool {
        self.shield_active() || self.immortality_active()
    }

    pub fn score_factor(&self) -> f32 {
        if self.clock < self.buffs.score_boost {
            SCORE_BOOST_FACTOR
        } else {
            1.0
        }
    }

    /// World speed after active multipliers; re-read every tick
    pub fn effective_speed(&self) -> f32 {
        if self.slow_motion_active() {
            self.base_speed * SLOW_MOTION_FACTOR
        } else {
            self.base_speed
        }
    }

    /// Timed invincibility ability: gated on ownership, not-already-active
    pub fn activate_immortality(&mut self) -> bool {
        if !self.immortality_owned || self.immortality_active() {
            return false;
        }
        self.buffs.immortality = self.clock + IMMORTALITY_DURATION;
        true
    }

    // --- collection and damage ---------------------------------------------

    pub fn collect_gem(&mut self, value: u32) {
        self.gems += 1;
        self.score += (value as f32 * self.score_factor()) as u64;
    }

    /// Mark a letter collected. Duplicate indices are a guarded no-op; the
    /// first call adds score and speed, and completing the word triggers
    /// exactly one level advance or the victory transition.
    pub fn collect_letter(&mut self, index: usize) {
        if index >= WORD_LEN || self.collected[index] {
            return;
        }
        self.collected[index] = true;
        self.score += (LETTER_SCORE as f32 * self.score_factor()) as u64;
        self.base_speed += LETTER_SPEED_BONUS;
        if self.word_complete() {
            if self.level < STORY_LEVELS {
                self.advance_level();
            } else {
                self.status = GameStatus::Victory;
                log::info!("story complete at distance {:.0}", self.distance);
            }
        }
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Shield => self.buffs.shield = self.clock + SHIELD_DURATION,
            PowerUpKind::Magnet => self.buffs.magnet = self.clock + MAGNET_DURATION,
            PowerUpKind::ScoreBoost => self.buffs.score_boost = self.clock + SCORE_BOOST_DURATION,
            PowerUpKind::SlowMotion => self.buffs.slow_motion = self.clock + SLOW_MOTION_DURATION,
            PowerUpKind::ReverseControls => self.buffs.reverse = self.clock + REVERSE_DURATION,
            PowerUpKind::Heart => self.heal_life(),
        }
        log::debug!("power-up applied: {}", kind.as_str());
    }

    fn heal_life(&mut self) {
        self.lives = (self.lives + 1).min(self.max_lives);
    }

    /// Apply one hit. No-op while invincible; losing the last life is a
    /// direct transition to GameOver with zero speed, never negative lives.
    pub fn take_damage(&mut self) {
        if self.is_invincible() {
            return;
        }
        if self.lives <= 1 {
            self.lives = 0;
            self.base_speed = 0.0;
            self.status = GameStatus::GameOver;
            log::info!(
                "game over: score {}, distance {:.0}",
                self.score,
                self.distance
            );
        } else {
            self.lives -= 1;
        }
    }

    // --- distance and scoring ----------------------------------------------

    /// Advance the distance counter and trickle score from it
    pub fn add_distance(&mut self, step: f32) {
        self.distance += step;
        self.score_carry += step * DISTANCE_SCORE_RATE * self.score_factor();
        let whole = self.score_carry.floor();
        if whole > 0.0 {
            self.score += whole as u64;
            self.score_carry -= whole;
        }
    }

    // --- letters and levels -------------------------------------------------

    pub fn word_complete(&self) -> bool {
        self.collected.iter().all(|&c| c)
    }

    pub fn collected_count(&self) -> usize {
        self.collected.iter().filter(|&&c| c).count()
    }

    pub fn uncollected_indices(&self) -> Vec<usize> {
        (0..WORD_LEN).filter(|&i| !self.collected[i]).collect()
    }

    /// Word target for the current story level
    pub fn level_word(&self) -> &'static str {
        let idx = (self.level.saturating_sub(1) as usize).min(LEVEL_WORDS.len() - 1);
        LEVEL_WORDS[idx]
    }

    /// Level-up: fresh letter set, speed jump, deep off-screen purge, shop
    /// portal inserted far ahead, letter schedule re-anchored.
    fn advance_level(&mut self) {
        self.level += 1;
        self.collected = [false; WORD_LEN];
        self.base_speed += LEVEL_SPEED_BONUS;
        self.entities.retain(|e| e.pos.z > -DEEP_PURGE_RANGE);
        let portal_pos = Vec3::new(0.0, 0.0, -STORY_PORTAL_LEAD);
        self.push_entity(EntityKind::ShopPortal, portal_pos);
        self.pacing.on_level_up(self.level);
        log::info!("level up -> {} ({})", self.level, self.level_word());
    }

    /// Victory -> open-ended endless continuation
    pub fn continue_endless(&mut self) {
        if self.status != GameStatus::Victory {
            return;
        }
        self.mode = GameMode::Endless;
        self.status = GameStatus::Playing;
        self.pacing.enter_endless(self.distance);
        log::info!("continuing into endless mode at distance {:.0}", self.distance);
    }

    /// Endless-mode speed ramp, hard-capped relative to the starting speed
    pub fn ramp_speed(&mut self) {
        let cap = START_SPEED * ENDLESS_SPEED_CAP;
        self.base_speed = (self.base_speed + ENDLESS_RAMP_BONUS).min(cap);
    }

    // --- shop ----------------------------------------------------------------

    pub fn open_shop(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Shop;
        }
    }

    pub fn leave_shop(&mut self) {
        if self.status == GameStatus::Shop {
            self.status = GameStatus::Playing;
        }
    }

    fn spend(&mut self, cost: u32) -> bool {
        if self.gems < cost {
            return false;
        }
        self.gems -= cost;
        true
    }

    /// Refill one life. Soft failure at the life cap or on empty pockets.
    pub fn buy_heal(&mut self) -> bool {
        if self.lives >= self.max_lives || !self.spend(COST_HEAL) {
            return false;
        }
        self.lives += 1;
        true
    }

    /// Raise the life cap, itself capped at the fixed maximum
    pub fn buy_max_life(&mut self) -> bool {
        if self.max_lives >= MAX_MAX_LIVES || !self.spend(COST_MAX_LIFE) {
            return false;
        }
        self.max_lives += 1;
        true
    }

    pub fn buy_double_jump(&mut self) -> bool {
        if self.double_jump_owned || !self.spend(COST_DOUBLE_JUMP) {
            return false;
        }
        self.double_jump_owned = true;
        true
    }

    pub fn buy_immortality(&mut self) -> bool {
        if self.immortality_owned || !self.spend(COST_IMMORTALITY) {
            return false;
        }
        self.immortality_owned = true;
        true
    }

    /// Widen the track by one lane on each side
    pub fn buy_lane(&mut self) -> bool {
        if self.lane_count + 2 > MAX_LANE_COUNT || !self.spend(COST_LANE) {
            return false;
        }
        self.lane_count += 2;
        true
    }

    // --- outbound signals ----------------------------------------------------

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain queued signals; called by the presentation layer each frame
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
