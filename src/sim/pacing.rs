//! Distance-based difficulty and scheduling
//!
//! Tracks where the next letter, shop portal, and endless speed ramp are due.
//! All schedules are expressed as absolute cumulative-distance marks so a
//! slow frame can never skip one - the planner fires a mark as soon as the
//! distance counter passes it.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pacing {
    /// Distance mark for the next mandatory letter spawn (story mode)
    pub next_letter_at: f32,
    /// Where the previous letter was issued; anchors level-up rescheduling
    pub last_letter_at: f32,
    /// Current gap between letters, grows 1.5x per level
    pub letter_interval: f32,
    /// Distance mark for the next portal offer (endless mode)
    pub next_portal_at: f32,
    /// Distance mark for the next speed ramp (endless mode)
    pub next_ramp_at: f32,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacing {
    /// Level-1 schedule, used on run start and restart
    pub fn new() -> Self {
        Self {
            next_letter_at: LETTER_INTERVAL_BASE,
            last_letter_at: 0.0,
            letter_interval: LETTER_INTERVAL_BASE,
            next_portal_at: f32::INFINITY,
            next_ramp_at: f32::INFINITY,
        }
    }

    /// Letter interval for a 1-based story level
    pub fn interval_for_level(level: u32) -> f32 {
        LETTER_INTERVAL_BASE * LETTER_INTERVAL_GROWTH.powi(level.saturating_sub(1) as i32)
    }

    /// True once the distance counter has passed the letter mark
    pub fn letter_due(&self, distance: f32) -> bool {
        distance >= self.next_letter_at
    }

    /// Record a letter issuance and advance the mark by one interval
    pub fn letter_issued(&mut self) {
        self.last_letter_at = self.next_letter_at;
        self.next_letter_at += self.letter_interval;
    }

    /// Rescale the schedule for a new level: the gap between the old level's
    /// final letter and the new level's first letter equals the new interval.
    pub fn on_level_up(&mut self, level: u32) {
        self.letter_interval = Self::interval_for_level(level);
        self.next_letter_at = self.last_letter_at + self.letter_interval;
        log::info!(
            "level {} letter interval {:.1}, next letter at {:.1}",
            level,
            self.letter_interval,
            self.next_letter_at
        );
    }

    /// Endless mode: letters stop, portal and ramp schedules start from here
    pub fn enter_endless(&mut self, distance: f32) {
        self.next_letter_at = f32::INFINITY;
        self.next_portal_at = distance + PORTAL_INTERVAL;
        self.next_ramp_at = distance + ENDLESS_RAMP_DISTANCE;
    }

    pub fn portal_due(&self, distance: f32) -> bool {
        distance >= self.next_portal_at
    }

    /// One portal offer at a time; reschedules on each issuance
    pub fn portal_issued(&mut self, distance: f32) {
        self.next_portal_at = distance + PORTAL_INTERVAL;
    }

    pub fn ramp_due(&self, distance: f32) -> bool {
        distance >= self.next_ramp_at
    }

    pub fn ramp_issued(&mut self) {
        self.next_ramp_at += ENDLESS_RAMP_DISTANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_scales_geometrically() {
        let base = Pacing::interval_for_level(1);
        assert!((base - LETTER_INTERVAL_BASE).abs() < 1e-3);
        for level in 2..=6u32 {
            let expected = LETTER_INTERVAL_BASE * LETTER_INTERVAL_GROWTH.powi(level as i32 - 1);
            assert!(
                (Pacing::interval_for_level(level) - expected).abs() < 1e-3,
                "level {level}"
            );
        }
    }

    #[test]
    fn test_letter_marks_advance_by_interval() {
        let mut pacing = Pacing::new();
        assert!(!pacing.letter_due(LETTER_INTERVAL_BASE - 1.0));
        assert!(pacing.letter_due(LETTER_INTERVAL_BASE));
        pacing.letter_issued();
        assert!((pacing.next_letter_at - 2.0 * LETTER_INTERVAL_BASE).abs() < 1e-3);
        assert!((pacing.last_letter_at - LETTER_INTERVAL_BASE).abs() < 1e-3);
    }

    #[test]
    fn test_level_up_gap_equals_new_interval() {
        let mut pacing = Pacing::new();
        // Issue the six letters of level 1
        for _ in 0..WORD_LEN {
            pacing.letter_issued();
        }
        let last = pacing.last_letter_at;
        pacing.on_level_up(2);
        let gap = pacing.next_letter_at - last;
        assert!((gap - Pacing::interval_for_level(2)).abs() < 1e-3);
    }

    #[test]
    fn test_endless_disables_letters() {
        let mut pacing = Pacing::new();
        pacing.enter_endless(1000.0);
        assert!(!pacing.letter_due(f32::MAX));
        assert!(!pacing.portal_due(1000.0 + PORTAL_INTERVAL - 1.0));
        assert!(pacing.portal_due(1000.0 + PORTAL_INTERVAL));
        pacing.portal_issued(1500.0);
        assert!((pacing.next_portal_at - (1500.0 + PORTAL_INTERVAL)).abs() < 1e-3);
    }

    #[test]
    fn test_ramp_reschedules_from_own_mark() {
        let mut pacing = Pacing::new();
        pacing.enter_endless(0.0);
        assert!(pacing.ramp_due(ENDLESS_RAMP_DISTANCE));
        pacing.ramp_issued();
        assert!((pacing.next_ramp_at - 2.0 * ENDLESS_RAMP_DISTANCE).abs() < 1e-3);
    }
}
