//! Bounded random values
//!
//! Every randomized decision in the game (positions, sizes, delays, skins,
//! effect choice) goes through [`ChaosRng`]. Probability tables are resolved by
//! a single weighted-choice helper so duplicated thresholds cannot drift apart.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Millis;
use crate::settings::{DelayRange, PointRange};

/// Seedable PCG32 wrapper
#[derive(Debug, Clone)]
pub struct ChaosRng {
    seed: u64,
    rng: Pcg32,
}

impl ChaosRng {
    /// Deterministic generator for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the thread RNG
    pub fn from_entropy() -> Self {
        Self::seeded(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[min, max)`; returns `min` for an empty range
    pub fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Unit roll in `[0, 1)`
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.roll() < p
    }

    /// Integer in `[min, max]`
    pub fn int_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    /// Points drawn from an inclusive range
    pub fn points(&mut self, range: PointRange) -> i64 {
        self.int_inclusive(range.min, range.max)
    }

    /// Delay drawn from `[min, max)`
    pub fn delay(&mut self, range: DelayRange) -> Millis {
        if range.max <= range.min {
            return range.min;
        }
        self.rng.random_range(range.min..range.max)
    }

    /// Uniform index in `[0, len)`
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    /// Weighted choice; `None` only when the table is empty or all-zero
    pub fn pick<'a, T>(&mut self, options: &'a [(f32, T)]) -> Option<&'a T> {
        let roll = self.roll();
        pick_at(options, roll)
    }
}

/// Weighted choice driven by a caller-supplied unit roll
///
/// The roll is scaled by the total weight and options are consumed in order,
/// so `[(0.2, a), (0.8, b)]` maps rolls below 0.2 to `a`.
pub fn pick_at<T>(options: &[(f32, T)], roll: f32) -> Option<&T> {
    let total: f32 = options.iter().map(|(w, _)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut threshold = roll.clamp(0.0, 1.0) * total;
    let mut last = None;
    for (weight, value) in options {
        let weight = weight.max(0.0);
        if weight == 0.0 {
            continue;
        }
        if threshold < weight {
            return Some(value);
        }
        threshold -= weight;
        last = Some(value);
    }
    // Float rounding at roll == 1.0
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pick_at_thresholds() {
        let options = [(0.2, 'a'), (0.2, 'b'), (0.6, 'c')];
        assert_eq!(pick_at(&options, 0.0), Some(&'a'));
        assert_eq!(pick_at(&options, 0.19), Some(&'a'));
        assert_eq!(pick_at(&options, 0.25), Some(&'b'));
        assert_eq!(pick_at(&options, 0.41), Some(&'c'));
        assert_eq!(pick_at(&options, 1.0), Some(&'c'));
    }

    #[test]
    fn test_pick_at_skips_zero_weights() {
        let options = [(0.0, 'a'), (1.0, 'b'), (0.0, 'c')];
        assert_eq!(pick_at(&options, 0.0), Some(&'b'));
        assert_eq!(pick_at(&options, 0.99), Some(&'b'));
    }

    #[test]
    fn test_pick_empty_table() {
        let empty: [(f32, u8); 0] = [];
        assert_eq!(pick_at(&empty, 0.5), None);
        assert_eq!(pick_at(&[(0.0, 1u8)], 0.5), None);
    }

    #[test]
    fn test_degenerate_ranges_return_min() {
        let mut rng = ChaosRng::seeded(1);
        assert_eq!(rng.uniform(5.0, 5.0), 5.0);
        assert_eq!(rng.uniform(5.0, 2.0), 5.0);
        assert_eq!(rng.int_inclusive(3, 3), 3);
        assert_eq!(rng.delay(DelayRange::new(500, 500)), 500);
        assert_eq!(rng.index(0), 0);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = ChaosRng::seeded(42);
        let mut b = ChaosRng::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.uniform(0.0, 100.0), b.uniform(0.0, 100.0));
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = ChaosRng::seeded(7);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    proptest! {
        #[test]
        fn uniform_stays_in_range(seed in any::<u64>(), min in -1000.0f32..1000.0, span in 0.001f32..1000.0) {
            let mut rng = ChaosRng::seeded(seed);
            let v = rng.uniform(min, min + span);
            prop_assert!(v >= min && v < min + span);
        }

        #[test]
        fn points_stay_inclusive(seed in any::<u64>(), min in -100i64..100, span in 0i64..50) {
            let mut rng = ChaosRng::seeded(seed);
            let v = rng.points(PointRange::new(min, min + span));
            prop_assert!(v >= min && v <= min + span);
        }
    }
}
