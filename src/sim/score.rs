//! Scoring engine
//!
//! Tracks the running total and detects milestone crossings. Presentation is
//! decided elsewhere from the returned [`ScoreUpdate`].

use serde::{Deserialize, Serialize};

use crate::consts::{BAND_LARGE, BAND_SMALL};

/// Sign of a score delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaSign {
    Negative,
    Zero,
    Positive,
}

impl DeltaSign {
    pub fn of(delta: i64) -> Self {
        match delta.signum() {
            1 => DeltaSign::Positive,
            -1 => DeltaSign::Negative,
            _ => DeltaSign::Zero,
        }
    }
}

/// Result of applying one delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub new_total: i64,
    pub delta: i64,
    /// Moved up into a new 50-point band
    pub crossed_50: bool,
    /// Moved up into a new 100-point band
    pub crossed_100: bool,
    pub sign: DeltaSign,
}

/// Cumulative score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub total: i64,
    /// floor(total / 50)
    pub band_50: i64,
    /// floor(total / 100)
    pub band_100: i64,
}

/// Floor division that stays correct for negative totals
fn band(total: i64, size: i64) -> i64 {
    total.div_euclid(size)
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, delta: i64) -> ScoreUpdate {
        let prev_50 = self.band_50;
        let prev_100 = self.band_100;

        self.total += delta;
        self.band_50 = band(self.total, BAND_SMALL);
        self.band_100 = band(self.total, BAND_LARGE);

        ScoreUpdate {
            new_total: self.total,
            delta,
            crossed_50: self.band_50 > prev_50,
            crossed_100: self.band_100 > prev_100,
            sign: DeltaSign::of(delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(total: i64) -> ScoreState {
        let mut s = ScoreState::new();
        s.apply(total);
        s
    }

    #[test]
    fn test_good_hit_from_zero() {
        let mut s = ScoreState::new();
        let u = s.apply(10);
        assert_eq!(u.new_total, 10);
        assert_eq!(u.sign, DeltaSign::Positive);
        assert!(!u.crossed_50 && !u.crossed_100);
    }

    #[test]
    fn test_crossing_fifty() {
        let mut s = at(45);
        let u = s.apply(10);
        assert_eq!(u.new_total, 55);
        assert!(u.crossed_50);
        assert!(!u.crossed_100);
    }

    #[test]
    fn test_overshoot_crosses_once() {
        let mut s = at(45);
        let u = s.apply(16);
        assert_eq!(u.new_total, 61);
        assert!(u.crossed_50);
        // Staying in the band afterwards does not re-fire
        let u = s.apply(10);
        assert!(!u.crossed_50);
    }

    #[test]
    fn test_downward_move_never_crosses() {
        let mut s = at(95);
        let u = s.apply(-15);
        assert_eq!(u.new_total, 80);
        assert!(!u.crossed_50 && !u.crossed_100);

        let mut s = at(55);
        let u = s.apply(-10);
        assert_eq!(u.new_total, 45);
        assert!(!u.crossed_50);
    }

    #[test]
    fn test_hundred_implies_fifty() {
        let mut s = at(95);
        let u = s.apply(10);
        assert!(u.crossed_100);
        assert!(u.crossed_50);
    }

    #[test]
    fn test_miss_from_zero_goes_negative() {
        let mut s = ScoreState::new();
        let u = s.apply(-5);
        assert_eq!(u.new_total, -5);
        assert_eq!(u.sign, DeltaSign::Negative);
        assert_eq!(s.band_50, -1);
    }

    #[test]
    fn test_climbing_out_of_negative_band() {
        let mut s = at(-5);
        // -5 -> 5 enters band 0 from band -1
        let u = s.apply(10);
        assert!(u.crossed_50);
        assert!(u.crossed_100);
    }

    proptest! {
        #[test]
        fn apply_is_cumulative(a in -500i64..500, b in -500i64..500) {
            let mut split = ScoreState::new();
            split.apply(a);
            split.apply(b);
            let mut joined = ScoreState::new();
            joined.apply(a + b);
            prop_assert_eq!(split.total, joined.total);
            prop_assert_eq!(split.band_50, joined.band_50);
        }

        #[test]
        fn crossing_matches_band_arithmetic(start in -1000i64..1000, delta in -200i64..200) {
            let mut s = at(start);
            let u = s.apply(delta);
            let before = start.div_euclid(50);
            let after = (start + delta).div_euclid(50);
            prop_assert_eq!(u.crossed_50, after > before);
            if delta <= 0 {
                prop_assert!(!u.crossed_50 && !u.crossed_100);
            }
        }
    }
}
