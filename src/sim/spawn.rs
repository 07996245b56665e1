//! Spawn planner
//!
//! Runs once per tick, after motion and collisions. Looks at the front line
//! (the farthest-ahead gap-relevant entity) and, when it has scrolled nearer
//! than the spawn horizon, rolls the decision tiers in order: portal offer,
//! mandatory letter, skip, power-up, obstacle-vs-gem. Tiers 1 and 2 are
//! schedule-driven and bypass the dice entirely.

use glam::Vec3;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::entity::{EntityKind, PowerUpKind};
use super::state::{GameMode, GameState};
use crate::consts::*;
use crate::{lane_offset, valid_lanes};

/// Mode-dependent tier probabilities. Endless trends toward higher obstacle
/// density and alien frequency.
#[derive(Debug, Clone, Copy)]
pub struct SpawnOdds {
    /// Chance a spawn opportunity is skipped outright
    pub skip: f64,
    /// Chance of a power-up after the skip roll
    pub power_up: f64,
    /// Chance the final tier yields an obstacle rather than a plain gem
    pub obstacle: f64,
    /// Chance an obstacle spawn is an alien squad (level 2+)
    pub alien: f64,
}

impl SpawnOdds {
    pub fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Story => Self {
                skip: 0.20,
                power_up: 0.08,
                obstacle: 0.55,
                alien: 0.25,
            },
            GameMode::Endless => Self {
                skip: 0.12,
                power_up: 0.10,
                obstacle: 0.70,
                alien: 0.35,
            },
        }
    }
}

/// Ground-spike cluster sizes, weighted toward singles
const CLUSTER_WEIGHTS: [(usize, f32); 3] = [(1, 0.55), (2, 0.30), (3, 0.15)];
/// Independent chance of a bonus gem atop each ground obstacle
const BONUS_GEM_CHANCE: f64 = 0.3;

/// One spawn opportunity. May create nothing.
pub fn plan(state: &mut GameState) {
    // Front line: minimum z among kept gap-relevant entities. Missiles move
    // off the lane cadence and are excluded from gap accounting.
    let front = state
        .entities
        .iter()
        .filter(|e| e.active && e.kind.counts_for_gap())
        .map(|e| e.pos.z)
        .fold(f32::INFINITY, f32::min);

    // Nothing to do until the front line scrolls nearer than the horizon
    if front <= -SPAWN_HORIZON {
        return;
    }

    let gap = (state.effective_speed() * MIN_GAP_SPEED_FACTOR).min(MAX_GAP);
    // Never nearer than the horizon; an empty registry spawns exactly there
    let z = (front - gap).min(-SPAWN_HORIZON);

    // Tier 1: portal offer (endless only, one at a time)
    if state.mode == GameMode::Endless && state.pacing.portal_due(state.distance) {
        state.push_entity(EntityKind::ShopPortal, Vec3::new(0.0, 0.0, z));
        state.pacing.portal_issued(state.distance);
        log::debug!("portal offered at z {z:.1}");
        return;
    }

    // Tier 2: mandatory letter (story schedule)
    if state.mode == GameMode::Story && state.pacing.letter_due(state.distance) {
        spawn_letter(state, z);
        state.pacing.letter_issued();
        return;
    }

    let odds = SpawnOdds::for_mode(state.mode);

    // Tier 3: skip - keeps the rhythm irregular
    if state.rng.random_bool(odds.skip) {
        return;
    }

    // Tier 4: power-up
    if state.rng.random_bool(odds.power_up) {
        let kind = pick_power_up(&mut state.rng);
        let lane = pick_lanes(&mut state.rng, state.lane_count, 1)[0];
        state.push_entity(
            EntityKind::PowerUp { kind },
            Vec3::new(lane_offset(lane), PICKUP_HEIGHT, z),
        );
        return;
    }

    // Tier 5: obstacle vs plain gem
    if state.rng.random_bool(odds.obstacle) {
        if state.level >= 2 && state.rng.random_bool(odds.alien) {
            spawn_alien_squad(state, z);
        } else {
            spawn_spike_cluster(state, z);
        }
    } else {
        let lane = pick_lanes(&mut state.rng, state.lane_count, 1)[0];
        state.push_entity(
            EntityKind::Gem { value: GEM_VALUE },
            Vec3::new(lane_offset(lane), PICKUP_HEIGHT, z),
        );
    }
}

/// Uniform pick among not-yet-collected letter indices; once the word is
/// complete the schedule degrades to a plain gem.
fn spawn_letter(state: &mut GameState, z: f32) {
    let lane = pick_lanes(&mut state.rng, state.lane_count, 1)[0];
    let pos = Vec3::new(lane_offset(lane), PICKUP_HEIGHT, z);
    let remaining = state.uncollected_indices();
    if remaining.is_empty() {
        state.push_entity(EntityKind::Gem { value: GEM_VALUE }, pos);
        return;
    }
    let index = remaining[state.rng.random_range(0..remaining.len())];
    state.push_entity(EntityKind::Letter { index }, pos);
    log::debug!("letter {index} scheduled at z {z:.1}");
}

fn spawn_alien_squad(state: &mut GameState, z: f32) {
    let count = state.rng.random_range(1..=2usize);
    for lane in pick_lanes(&mut state.rng, state.lane_count, count) {
        state.push_entity(
            EntityKind::Alien { fired: false },
            Vec3::new(lane_offset(lane), ALIEN_HOVER_HEIGHT, z),
        );
    }
}

/// 1-3 ground spikes across distinct lanes, each with an independent chance
/// of a bonus gem on top (jump height)
fn spawn_spike_cluster(state: &mut GameState, z: f32) {
    let count = pick_cluster_size(&mut state.rng).min(state.lane_count as usize);
    for lane in pick_lanes(&mut state.rng, state.lane_count, count) {
        let x = lane_offset(lane);
        state.push_entity(EntityKind::Obstacle, Vec3::new(x, 0.0, z));
        if state.rng.random_bool(BONUS_GEM_CHANCE) {
            state.push_entity(
                EntityKind::Gem {
                    value: BONUS_GEM_VALUE,
                },
                Vec3::new(x, BONUS_GEM_HEIGHT, z),
            );
        }
    }
}

fn pick_cluster_size(rng: &mut Pcg32) -> usize {
    let roll = rng.random::<f32>();
    let mut acc = 0.0;
    for (size, weight) in CLUSTER_WEIGHTS {
        acc += weight;
        if roll < acc {
            return size;
        }
    }
    1
}

/// Weighted discrete choice among the six power-up subtypes
fn pick_power_up(rng: &mut Pcg32) -> PowerUpKind {
    let roll = rng.random::<f32>();
    let mut acc = 0.0;
    for kind in PowerUpKind::ALL {
        acc += kind.weight();
        if roll < acc {
            return kind;
        }
    }
    PowerUpKind::Heart
}

/// Distinct lanes for a multi-entity spawn: shuffle the valid band, take n
fn pick_lanes(rng: &mut Pcg32, lane_count: u32, n: usize) -> Vec<i32> {
    let mut lanes = valid_lanes(lane_count);
    lanes.shuffle(rng);
    lanes.truncate(n.max(1));
    lanes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;
    use rand::SeedableRng;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42);
        state.start_run(GameMode::Story);
        state
    }

    #[test]
    fn test_no_spawn_while_front_beyond_horizon() {
        let mut state = playing_state();
        state.push_entity(EntityKind::Obstacle, Vec3::new(0.0, 0.0, -120.0));
        let before = state.entities.len();
        plan(&mut state);
        assert_eq!(state.entities.len(), before);
    }

    #[test]
    fn test_spawns_never_nearer_than_horizon() {
        let mut state = playing_state();
        for _ in 0..100 {
            plan(&mut state);
        }
        assert!(!state.entities.is_empty());
        for e in &state.entities {
            assert!(e.pos.z <= -SPAWN_HORIZON, "{:?} at {}", e.kind, e.pos.z);
        }
    }

    #[test]
    fn test_letter_spawn_is_mandatory_and_gap_scaled() {
        let mut state = playing_state();
        state.push_entity(EntityKind::Obstacle, Vec3::new(0.0, 0.0, -80.0));
        state.distance = state.pacing.next_letter_at;
        plan(&mut state);

        let letter = state
            .entities
            .iter()
            .find(|e| matches!(e.kind, EntityKind::Letter { .. }))
            .expect("letter must spawn when the schedule fires");
        let gap = (state.effective_speed() * MIN_GAP_SPEED_FACTOR).min(MAX_GAP);
        let expected = (-80.0 - gap).min(-SPAWN_HORIZON);
        assert!((letter.pos.z - expected).abs() < 1e-3);
        // Schedule advanced by one interval
        assert!(!state.pacing.letter_due(state.distance));
    }

    #[test]
    fn test_letter_picks_uncollected_index() {
        for seed in 0..20 {
            let mut state = playing_state();
            state.rng = Pcg32::seed_from_u64(seed);
            state.collected = [true, true, false, true, true, true];
            state.distance = state.pacing.next_letter_at;
            plan(&mut state);
            let letter = state
                .entities
                .iter()
                .find(|e| matches!(e.kind, EntityKind::Letter { .. }))
                .expect("letter expected");
            assert_eq!(letter.kind, EntityKind::Letter { index: 2 });
        }
    }

    #[test]
    fn test_letter_falls_back_to_gem_when_word_complete() {
        let mut state = playing_state();
        state.collected = [true; WORD_LEN];
        state.distance = state.pacing.next_letter_at;
        plan(&mut state);
        assert!(
            state
                .entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::Gem { .. }))
        );
        assert!(
            !state
                .entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::Letter { .. }))
        );
    }

    #[test]
    fn test_endless_portal_offer_reschedules() {
        let mut state = playing_state();
        state.start_run(GameMode::Endless);
        state.distance = state.pacing.next_portal_at;
        let mark = state.distance;
        plan(&mut state);
        assert!(
            state
                .entities
                .iter()
                .any(|e| e.kind == EntityKind::ShopPortal)
        );
        assert!(state.pacing.next_portal_at > mark);
    }

    #[test]
    fn test_no_aliens_at_level_one() {
        let mut state = playing_state();
        let mut saw_alien = false;
        for _ in 0..500 {
            plan(&mut state);
            saw_alien |= state
                .entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::Alien { .. }));
            // Keep the front line open so every roll is a real opportunity
            state.entities.clear();
        }
        assert!(!saw_alien);
    }

    #[test]
    fn test_aliens_appear_from_level_two() {
        let mut state = playing_state();
        state.level = 2;
        let mut saw_alien = false;
        for _ in 0..500 {
            plan(&mut state);
            saw_alien |= state
                .entities
                .iter()
                .any(|e| matches!(e.kind, EntityKind::Alien { .. }));
            state.entities.clear();
        }
        assert!(saw_alien);
    }

    #[test]
    fn test_cluster_lanes_are_distinct() {
        let mut state = playing_state();
        for _ in 0..300 {
            plan(&mut state);
            let mut xs: Vec<i32> = state
                .entities
                .iter()
                .filter(|e| e.kind == EntityKind::Obstacle)
                .map(|e| e.pos.x.round() as i32)
                .collect();
            let len = xs.len();
            xs.sort_unstable();
            xs.dedup();
            assert_eq!(xs.len(), len, "spike cluster reused a lane");
            state.entities.clear();
        }
    }

    #[test]
    fn test_bonus_gems_sit_atop_their_obstacle() {
        let mut state = playing_state();
        let mut saw_bonus = false;
        for _ in 0..500 {
            plan(&mut state);
            for gem in state.entities.iter().filter(
                |e| matches!(e.kind, EntityKind::Gem { value } if value == BONUS_GEM_VALUE),
            ) {
                saw_bonus = true;
                assert_eq!(gem.pos.y, BONUS_GEM_HEIGHT);
                assert!(
                    state.entities.iter().any(|o| o.kind == EntityKind::Obstacle
                        && o.pos.x == gem.pos.x
                        && o.pos.z == gem.pos.z)
                );
            }
            state.entities.clear();
        }
        assert!(saw_bonus);
    }

    #[test]
    fn test_all_powerup_kinds_reachable() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut seen = [false; 6];
        for _ in 0..2000 {
            let kind = pick_power_up(&mut rng);
            let slot = PowerUpKind::ALL.iter().position(|k| *k == kind).unwrap();
            seen[slot] = true;
        }
        assert!(seen.iter().all(|&s| s), "{seen:?}");
    }
}
