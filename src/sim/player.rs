//! The runner avatar: lane shifting and jump physics
//!
//! The interaction pass samples `position()` once per tick; everything else
//! in the world is defined relative to that point.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{half_lane_span, lane_offset};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Signed lane index, 0 = center
    pub lane: i32,
    /// Smoothed lateral position (approaches the lane center, no teleport)
    pub x: f32,
    /// Height above ground
    pub y: f32,
    vel_y: f32,
    /// 0 grounded, 1 after first jump, 2 after double jump
    jumps_used: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: 0,
            x: 0.0,
            y: 0.0,
            vel_y: 0.0,
            jumps_used: 0,
        }
    }
}

impl Player {
    /// Request a lane change. Out-of-range requests clamp to the valid band.
    pub fn shift_lane(&mut self, dir: i32, lane_count: u32) {
        let half = half_lane_span(lane_count);
        self.lane = (self.lane + dir.signum()).clamp(-half, half);
    }

    /// Request a jump. The second press mid-air only fires when the double
    /// jump ability is owned.
    pub fn jump(&mut self, double_jump_owned: bool) {
        if self.grounded() {
            self.vel_y = JUMP_VELOCITY;
            self.jumps_used = 1;
        } else if double_jump_owned && self.jumps_used == 1 {
            self.vel_y = DOUBLE_JUMP_VELOCITY;
            self.jumps_used = 2;
        }
    }

    pub fn grounded(&self) -> bool {
        self.jumps_used == 0 && self.y <= 0.0
    }

    /// Advance lateral smoothing and vertical physics by one tick
    pub fn advance(&mut self, dt: f32) {
        let target = lane_offset(self.lane);
        let blend = (LANE_APPROACH_RATE * dt).min(1.0);
        self.x += (target - self.x) * blend;

        if self.jumps_used > 0 {
            self.y += self.vel_y * dt;
            self.vel_y -= GRAVITY * dt;
            if self.y <= 0.0 {
                self.y = 0.0;
                self.vel_y = 0.0;
                self.jumps_used = 0;
            }
        }
    }

    /// World position sampled by the interaction pass (player defines z = 0)
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }

    /// Reset to the center lane on the ground
    pub fn reset(&mut self) {
        *self = Player::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(player: &mut Player) {
        // Enough ticks for smoothing/physics to converge
        for _ in 0..300 {
            player.advance(1.0 / 60.0);
        }
    }

    #[test]
    fn test_lane_clamps_at_band_edge() {
        let mut p = Player::default();
        p.shift_lane(1, 3);
        p.shift_lane(1, 3);
        p.shift_lane(1, 3);
        assert_eq!(p.lane, 1);
        for _ in 0..10 {
            p.shift_lane(-1, 3);
        }
        assert_eq!(p.lane, -1);
    }

    #[test]
    fn test_wider_band_after_lane_upgrade() {
        let mut p = Player::default();
        for _ in 0..5 {
            p.shift_lane(1, 5);
        }
        assert_eq!(p.lane, 2);
    }

    #[test]
    fn test_x_converges_to_lane_center() {
        let mut p = Player::default();
        p.shift_lane(1, 3);
        settle(&mut p);
        assert!((p.x - lane_offset(1)).abs() < 1e-3);
    }

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let mut p = Player::default();
        p.jump(false);
        assert!(!p.grounded());
        let mut peak: f32 = 0.0;
        for _ in 0..300 {
            p.advance(1.0 / 60.0);
            peak = peak.max(p.y);
        }
        assert!(p.grounded());
        assert!(peak > OBSTACLE_HEIGHT);
    }

    #[test]
    fn test_double_jump_requires_ownership() {
        let mut p = Player::default();
        p.jump(false);
        p.advance(1.0 / 60.0);
        let y_before = p.y;
        p.jump(false); // Not owned - ignored
        p.advance(1.0 / 60.0);
        assert!(p.y < y_before + JUMP_VELOCITY / 30.0);

        let mut q = Player::default();
        q.jump(true);
        q.advance(1.0 / 60.0);
        q.jump(true);
        assert_eq!(q.jumps_used, 2);
        // A third press mid-air does nothing
        q.jump(true);
        assert_eq!(q.jumps_used, 2);
    }
}
