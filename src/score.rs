//! Score, level and fall speed.

use std::time::Duration;

pub const POINTS_PER_JEWEL: u32 = 10;
pub const POINTS_PER_LEVEL: u32 = 1000;
/// Speed-up per level, as a fraction of the base interval.
const SPEED_STEP: f64 = 0.10;
/// Fastest allowed interval as a fraction of the base (5x speed cap).
const MIN_SPEED_FACTOR: f64 = 0.2;

pub fn level_for(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + 1
}

pub fn fall_interval_for(level: u32, base: Duration) -> Duration {
    let factor = (1.0 - f64::from(level.saturating_sub(1)) * SPEED_STEP).max(MIN_SPEED_FACTOR);
    base.mul_f64(factor)
}

#[derive(Debug, Clone)]
pub struct ScoreTracker {
    score: u32,
    level: u32,
    base_interval: Duration,
}

impl ScoreTracker {
    pub fn new(base_interval: Duration) -> Self {
        Self {
            score: 0,
            level: 1,
            base_interval,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn fall_interval(&self) -> Duration {
        fall_interval_for(self.level, self.base_interval)
    }

    /// Awards points for `cells` cleared jewels. Returns the new level only on the award
    /// that crosses a level threshold.
    pub fn award(&mut self, cells: usize) -> Option<u32> {
        let points = POINTS_PER_JEWEL.saturating_mul(cells as u32);
        self.score = self.score.saturating_add(points);
        let level = level_for(self.score);
        if level > self.level {
            self.level = level;
            Some(level)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Duration = Duration::from_millis(500);

    #[test]
    fn test_award_is_ten_per_cell() {
        let mut t = ScoreTracker::new(BASE);
        t.award(3);
        assert_eq!(t.score(), 30);
        t.award(4);
        assert_eq!(t.score(), 70);
    }

    #[test]
    fn test_level_up_fires_once_at_threshold() {
        let mut t = ScoreTracker::new(BASE);
        for _ in 0..33 {
            assert_eq!(t.award(3), None);
        }
        assert_eq!(t.score(), 990);
        assert_eq!(t.award(1), Some(2));
        assert_eq!(t.score(), 1000);
        assert_eq!(t.award(0), None);
        assert_eq!(t.award(1), None);
        assert_eq!(t.level(), 2);
    }

    #[test]
    fn test_level_for_thresholds() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(999), 1);
        assert_eq!(level_for(1000), 2);
        assert_eq!(level_for(5500), 6);
    }

    #[test]
    fn test_fall_interval_decays_and_floors() {
        assert_eq!(fall_interval_for(1, BASE), BASE);
        assert_eq!(fall_interval_for(2, BASE), Duration::from_millis(450));
        assert_eq!(fall_interval_for(9, BASE), Duration::from_millis(100));
        assert_eq!(fall_interval_for(50, BASE), Duration::from_millis(100));
        let mut prev = BASE;
        for level in 2..20 {
            let next = fall_interval_for(level, BASE);
            assert!(next <= prev);
            prev = next;
        }
    }

    #[test]
    fn test_reset() {
        let mut t = ScoreTracker::new(BASE);
        t.award(200);
        t.reset();
        assert_eq!((t.score(), t.level()), (0, 1));
        assert_eq!(t.fall_interval(), BASE);
    }
}
