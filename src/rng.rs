//! Date-derived deterministic randomness.
//!
//! Every client computes the same day from the date alone, so the mapping
//! `seed -> value` below is frozen. Changing it reshuffles every past and
//! future day for every player.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const SEED_SCALE: f64 = 10_000.0;

/// Offset of the second (presentation) shuffle of the daily selection.
pub const PRESENTATION_SEED_OFFSET: i64 = 1000;
/// Offset of the shuffle that orders a question's answer options.
pub const OPTION_SHUFFLE_OFFSET: i64 = 50;
/// Spacing between consecutive question seeds of one day.
pub const QUESTION_SEED_MULTIPLIER: i64 = 100;

/// `frac(sin(seed) * 10000)`, always in `[0, 1)`.
pub fn seeded_random(seed: i64) -> f64 {
  let x = (seed as f64).sin() * SEED_SCALE;
  x - x.floor()
}

/// Stream view over [`seeded_random`]: each draw consumes one seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededRandom {
  seed: i64,
}

impl SeededRandom {
  pub fn new(seed: i64) -> Self { Self { seed } }

  pub fn seed(&self) -> i64 { self.seed }

  pub fn next_f64(&mut self) -> f64 {
    let value = seeded_random(self.seed);
    self.seed = self.seed.wrapping_add(1);
    value
  }

  /// Uniform index in `0..bound`. `bound` must be non-zero.
  pub fn next_index(&mut self, bound: usize) -> usize {
    let j = (self.next_f64() * bound as f64).floor() as usize;
    // sin() never yields exactly 1.0 after frac, but stay in range regardless
    j.min(bound - 1)
  }
}

/// Fisher-Yates from the back, one seed per swap. Returns a shuffled copy.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: i64) -> Vec<T> {
  let mut out = items.to_vec();
  let mut rng = SeededRandom::new(seed);
  for i in (1..out.len()).rev() {
    let j = rng.next_index(i + 1);
    out.swap(i, j);
  }
  out
}

/// `YEAR*10000 + MONTH*100 + DAY`, e.g. 2024-03-15 -> 20240315.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySeed(pub i64);

impl DailySeed {
  pub fn from_date(date: NaiveDate) -> Self {
    DailySeed(date.year() as i64 * 10_000 + date.month() as i64 * 100 + date.day() as i64)
  }

  /// Inverse of [`DailySeed::from_date`]; `None` for seeds that are not a calendar day.
  pub fn to_date(self) -> Option<NaiveDate> {
    let year = self.0.div_euclid(10_000);
    let month = self.0.rem_euclid(10_000) / 100;
    let day = self.0.rem_euclid(100);
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month as u32, day as u32)
  }

  pub fn value(self) -> i64 { self.0 }

  pub fn question_seed(self, question_index: usize) -> i64 {
    self.0.wrapping_add((question_index as i64).wrapping_mul(QUESTION_SEED_MULTIPLIER))
  }
}

impl std::fmt::Display for DailySeed {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seeded_random_is_pure_and_in_unit_interval() {
    for seed in [0_i64, 1, 42, 20240315, -7, i32::MAX as i64] {
      let a = seeded_random(seed);
      assert_eq!(a, seeded_random(seed));
      assert!((0.0..1.0).contains(&a), "seed {seed} gave {a}");
    }
  }

  #[test]
  fn seeded_random_matches_frozen_formula() {
    // sin(1) = 0.8414709848078965 -> 8414.709848078965
    assert!((seeded_random(1) - 0.709848078965).abs() < 1e-6);
    assert_eq!(seeded_random(0), 0.0);
  }

  #[test]
  fn stream_advances_seed_by_one() {
    let mut rng = SeededRandom::new(10);
    let first = rng.next_f64();
    assert_eq!(first, seeded_random(10));
    assert_eq!(rng.seed(), 11);
    assert_eq!(rng.next_f64(), seeded_random(11));
  }

  #[test]
  fn shuffle_is_deterministic_permutation_and_leaves_input_alone() {
    let input: Vec<u32> = (0..50).collect();
    let a = seeded_shuffle(&input, 20240101);
    let b = seeded_shuffle(&input, 20240101);
    assert_eq!(a, b);
    assert_eq!(input, (0..50).collect::<Vec<_>>());

    let mut sorted = a.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, input);
    assert_ne!(a, input);
  }

  #[test]
  fn shuffle_handles_tiny_inputs() {
    assert!(seeded_shuffle::<u8>(&[], 5).is_empty());
    assert_eq!(seeded_shuffle(&[7], 5), vec![7]);
  }

  #[test]
  fn daily_seed_round_trips_through_dates() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let seed = DailySeed::from_date(d);
    assert_eq!(seed, DailySeed(20240315));
    assert_eq!(seed.to_date(), Some(d));
    assert_eq!(DailySeed(20241301).to_date(), None);
    assert_eq!(seed.question_seed(3), 20240615);
  }

  #[test]
  fn question_seeds_wrap_at_the_edges() {
    assert_eq!(DailySeed(i64::MAX).question_seed(1), i64::MIN + 99);
    assert_eq!(DailySeed(i64::MAX).to_date(), None);
    assert!((0.0..1.0).contains(&seeded_random(i64::MAX)));
  }
}
