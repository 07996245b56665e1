//! Per-tick world advancement
//!
//! One synchronous pass per render-loop callback: player intents, entity
//! motion, swept collision resolution, then spawning and pacing. The entity
//! registry is taken out of the state, filtered into a fresh "kept" vector,
//! and installed wholesale - nothing mutates it concurrently.
//!
//! Collision uses the entity's pre/post-move longitudinal interval rather
//! than a sampled point: at high speed (or after a slow frame) a single move
//! can exceed the tolerance band, and a point test would let entities tunnel
//! straight through the player.

use glam::Vec3;

use super::entity::{Entity, EntityKind, PowerUpKind};
use super::spawn;
use super::state::{GameEvent, GameMode, GameState, GameStatus};
use crate::consts::*;

/// Player intents for a single tick. One-shot: the shell clears them after
/// every processed frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Lane-change request: -1 left, +1 right. Flipped while the
    /// reversed-controls buff is active, clamped to the lane band.
    pub steer: i32,
    pub jump: bool,
    /// Activate the owned timed-invincibility ability
    pub immortality: bool,
}

/// Advance the simulation by one render-loop delta
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.status != GameStatus::Playing {
        return;
    }
    // Clamp so a backgrounded tab or GC pause cannot teleport the world
    let dt = dt.clamp(0.0, MAX_TICK_DT);

    state.advance_clock(dt);

    // Buff state may have changed since last tick - read it fresh
    if input.steer != 0 {
        let dir = if state.reverse_active() {
            -input.steer
        } else {
            input.steer
        };
        state.player.shift_lane(dir, state.lane_count);
    }
    if input.jump {
        state.player.jump(state.double_jump_owned);
    }
    if input.immortality {
        state.activate_immortality();
    }

    state.player.advance(dt);
    let player_pos = state.player.position();

    let step = state.effective_speed() * dt;
    state.add_distance(step);

    move_and_interact(state, player_pos, step, dt);

    // A collision above may have ended the run or opened the shop
    if state.status == GameStatus::Playing {
        spawn::plan(state);
        if state.mode == GameMode::Endless && state.pacing.ramp_due(state.distance) {
            state.ramp_speed();
            state.pacing.ramp_issued();
        }
    }
}

/// What a collision resolved to; applied to the store only after the
/// registry is rebuilt, since level-up both purges and inserts entities.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    Gem(u32),
    Letter(usize),
    PowerUp(PowerUpKind),
    Damage,
    OpenShop,
}

/// Move every live entity, resolve interactions against the player, and
/// install the rebuilt registry (kept survivors + missiles fired this tick).
fn move_and_interact(state: &mut GameState, player_pos: Vec3, step: f32, dt: f32) {
    let magnet = state.magnet_active();
    let mut world = std::mem::take(&mut state.entities);
    let mut kept: Vec<Entity> = Vec::with_capacity(world.len());
    let mut fired: Vec<Entity> = Vec::new();
    let mut outcomes: Vec<Outcome> = Vec::new();

    for mut e in world.drain(..) {
        if !e.active {
            continue;
        }
        let pre_z = e.pos.z;
        e.pos.z += step + e.kind.speed_bonus() * dt;

        // Per-type motion
        match &mut e.kind {
            EntityKind::Missile => {
                // Lateral homing toward the player
                let blend = (MISSILE_HOMING_RATE * dt).min(1.0);
                e.pos.x += (player_pos.x - e.pos.x) * blend;
            }
            EntityKind::Alien { fired: has_fired } => {
                let range = player_pos.z - e.pos.z;
                if !*has_fired && e.pos.z < player_pos.z && range <= ALIEN_FIRE_RANGE {
                    // One-shot: the flag guarantees a single missile per alien
                    *has_fired = true;
                    let id = state.next_entity_id();
                    let pos = Vec3::new(e.pos.x, 1.0, e.pos.z + MISSILE_SPAWN_LEAD);
                    fired.push(Entity::new(id, EntityKind::Missile, pos));
                    state.push_event(GameEvent::Burst {
                        pos,
                        color: EntityKind::Alien { fired: true }.burst_color(),
                    });
                }
            }
            _ => {}
        }

        // Magnet buff: drag nearby pickups into the player's lane
        if magnet && e.kind.is_pickup() && (player_pos.z - e.pos.z).abs() <= MAGNET_RANGE {
            let blend = (MAGNET_PULL_RATE * dt).min(1.0);
            e.pos.x += (player_pos.x - e.pos.x) * blend;
        }

        interact(state, &mut e, player_pos, pre_z, magnet, &mut outcomes);

        // Inactive or scrolled past the removal threshold: dropped
        if e.active && e.pos.z < REMOVAL_THRESHOLD {
            kept.push(e);
        }
    }

    kept.extend(fired);
    // Survivors of this pass plus anything a store op inserts next
    state.entities = kept;

    for outcome in outcomes {
        match outcome {
            Outcome::Gem(value) => state.collect_gem(value),
            Outcome::Letter(index) => state.collect_letter(index),
            Outcome::PowerUp(kind) => state.apply_power_up(kind),
            // No-op while a shield or immortality window is open
            Outcome::Damage => state.take_damage(),
            Outcome::OpenShop => state.open_shop(),
        }
    }
}

/// Resolve one entity against the player for this tick. Deactivation and
/// signals happen here; store mutations are deferred into `outcomes`.
fn interact(
    state: &mut GameState,
    e: &mut Entity,
    player_pos: Vec3,
    pre_z: f32,
    magnet: bool,
    outcomes: &mut Vec<Outcome>,
) {
    let post_z = e.pos.z;

    // Shop portals span all lanes: longitudinal proximity is the whole test
    if e.kind == EntityKind::ShopPortal {
        if pre_z <= player_pos.z + PORTAL_TRIGGER_RANGE
            && post_z >= player_pos.z - PORTAL_TRIGGER_RANGE
        {
            e.active = false;
            state.push_event(GameEvent::Burst {
                pos: e.pos,
                color: e.kind.burst_color(),
            });
            outcomes.push(Outcome::OpenShop);
        }
        return;
    }

    // Swept zone: the move interval must overlap the tolerance band around
    // the player. This is what catches entities that cross in one tick.
    let in_zone = pre_z <= player_pos.z + SWEEP_TOLERANCE && post_z >= player_pos.z - SWEEP_TOLERANCE;
    if !in_zone {
        return;
    }

    let lateral = (e.pos.x - player_pos.x).abs();

    if e.kind.is_damage_source() {
        if lateral > DAMAGE_LATERAL_TOLERANCE {
            return;
        }
        let (lo, hi) = e.vertical_band();
        let (body_lo, body_hi) = (player_pos.y, player_pos.y + PLAYER_HEIGHT);
        if body_lo < hi && lo < body_hi {
            e.active = false;
            state.push_event(GameEvent::PlayerHit { pos: e.pos });
            if e.kind == EntityKind::Missile {
                state.push_event(GameEvent::Burst {
                    pos: e.pos,
                    color: e.kind.burst_color(),
                });
            }
            outcomes.push(Outcome::Damage);
        }
        return;
    }

    if e.kind.is_pickup() {
        let lateral_tol = if magnet {
            MAGNET_PICKUP_LATERAL_TOLERANCE
        } else {
            PICKUP_LATERAL_TOLERANCE
        };
        if lateral > lateral_tol {
            return;
        }
        if (e.pos.y - player_pos.y).abs() > PICKUP_VERTICAL_TOLERANCE {
            return;
        }
        e.active = false;
        state.push_event(GameEvent::Burst {
            pos: e.pos,
            color: e.kind.burst_color(),
        });
        match e.kind {
            EntityKind::Gem { value } => outcomes.push(Outcome::Gem(value)),
            EntityKind::Letter { index } => outcomes.push(Outcome::Letter(index)),
            EntityKind::PowerUp { kind } => outcomes.push(Outcome::PowerUp(kind)),
            _ => {}
        }
    }
}
