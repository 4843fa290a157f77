//! Daily selection: ten streets per calendar day, stratified by tier, with a
//! rolling seven-day no-repeat window.
//!
//! The window is a pure recomputation: each past day's raw selection is
//! rebuilt from that day's own seed over the full catalog. Nothing is read
//! from stored history.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use tracing::{debug, instrument};

use crate::catalog::StreetCatalog;
use crate::domain::StreetRecord;
use crate::rng::{seeded_shuffle, DailySeed, PRESENTATION_SEED_OFFSET};

/// Streets per day.
pub const DAILY_STREET_COUNT: usize = 10;
/// Previous days whose streets are excluded from today.
pub const EXCLUSION_DAYS: u64 = 7;

/// `(tier, how many)` in concatenation order.
const TIER_QUOTAS: [(u8, usize); 4] = [(1, 3), (2, 3), (3, 2), (4, 2)];

/// Shuffle `pool` with `seed`, then take the tier quotas in tier order.
/// Sparse tiers fall back to the first [`DAILY_STREET_COUNT`] of the shuffle.
pub(crate) fn raw_selection<'a>(pool: &[&'a StreetRecord], seed: i64) -> Vec<&'a StreetRecord> {
  let shuffled = seeded_shuffle(pool, seed);
  let mut selected: Vec<&StreetRecord> = Vec::with_capacity(DAILY_STREET_COUNT);
  for (tier, quota) in TIER_QUOTAS {
    selected.extend(shuffled.iter().copied().filter(|s| s.tier == tier).take(quota));
  }
  if selected.len() < DAILY_STREET_COUNT {
    selected = shuffled.into_iter().take(DAILY_STREET_COUNT).collect();
  }
  selected
}

/// Today's ordered streets for `date`.
pub fn select_daily(catalog: &StreetCatalog, date: NaiveDate) -> Vec<StreetRecord> {
  select_daily_for_seed(catalog, DailySeed::from_date(date))
}

/// Same as [`select_daily`] for a raw seed. A seed that does not decode to a
/// calendar date has no predecessors, so no exclusion window applies.
#[instrument(level = "debug", target = "daily", skip_all, fields(seed = %seed, catalog = catalog.len()))]
pub fn select_daily_for_seed(catalog: &StreetCatalog, seed: DailySeed) -> Vec<StreetRecord> {
  let all: Vec<&StreetRecord> = catalog.iter().collect();
  if all.is_empty() {
    return Vec::new();
  }

  let mut excluded: HashSet<&str> = HashSet::new();
  if let Some(today) = seed.to_date() {
    for back in 1..=EXCLUSION_DAYS {
      let Some(past) = today.checked_sub_days(Days::new(back)) else { break };
      for s in raw_selection(&all, DailySeed::from_date(past).value()) {
        excluded.insert(s.id.as_str());
      }
    }
  }

  let available: Vec<&StreetRecord> =
    all.iter().copied().filter(|s| !excluded.contains(s.id.as_str())).collect();
  let pool = if available.len() >= DAILY_STREET_COUNT {
    available
  } else {
    debug!(target: "daily", available = available.len(), excluded = excluded.len(), "Exclusion window too tight; using full catalog");
    all
  };

  let selected = raw_selection(&pool, seed.value());
  let ordered = seeded_shuffle(&selected, seed.value().wrapping_add(PRESENTATION_SEED_OFFSET));
  debug!(target: "daily", picked = ordered.len(), pool = pool.len(), "Daily streets selected");
  ordered.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{LatLng, Polyline};
  use rand::{rngs::StdRng, Rng, SeedableRng};

  fn street(id: usize, tier: u8) -> StreetRecord {
    let lat = 41.35 + id as f64 * 0.0005;
    StreetRecord {
      id: id.to_string(),
      name: format!("Carrer {id}"),
      tier,
      geometry: vec![Polyline(vec![LatLng::new(lat, 2.15), LatLng::new(lat, 2.16)])],
      lat: Some(lat),
      lng: Some(2.15),
    }
  }

  fn catalog_with_tiers(tiers: &[u8]) -> StreetCatalog {
    StreetCatalog::from_records(tiers.iter().enumerate().map(|(i, &t)| street(i + 1, t)).collect())
  }

  fn random_catalog(size: usize, seed: u64) -> StreetCatalog {
    let mut rng = StdRng::seed_from_u64(seed);
    let tiers: Vec<u8> = (0..size).map(|_| rng.gen_range(1..=4)).collect();
    catalog_with_tiers(&tiers)
  }

  fn ids(streets: &[StreetRecord]) -> Vec<String> {
    streets.iter().map(|s| s.id.clone()).collect()
  }

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn twelve_street_example_day() {
    let cat = catalog_with_tiers(&[1, 1, 1, 2, 2, 2, 3, 3, 4, 4, 4, 1]);
    let a = select_daily_for_seed(&cat, DailySeed(20240101));
    assert_eq!(a.len(), 10);
    let unique: HashSet<_> = a.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(unique.len(), 10);
    for tier in 1..=4 {
      assert!(a.iter().any(|s| s.tier == tier), "tier {tier} missing");
    }
    assert_eq!(ids(&a), ids(&select_daily_for_seed(&cat, DailySeed(20240101))));
  }

  #[test]
  fn same_date_same_order() {
    let cat = random_catalog(400, 7);
    for day in 1..=28 {
      let d = date(2025, 2, day);
      assert_eq!(ids(&select_daily(&cat, d)), ids(&select_daily(&cat, d)));
    }
  }

  #[test]
  fn no_street_from_previous_week_raw_selections() {
    let cat = random_catalog(300, 11);
    let all: Vec<&StreetRecord> = cat.iter().collect();
    let today = date(2024, 3, 1); // crosses the February/leap-day boundary
    let picked = select_daily(&cat, today);
    assert_eq!(picked.len(), DAILY_STREET_COUNT);

    for back in 1..=EXCLUSION_DAYS {
      let past = today.checked_sub_days(Days::new(back)).unwrap();
      let earlier: HashSet<&str> = raw_selection(&all, DailySeed::from_date(past).value())
        .into_iter()
        .map(|s| s.id.as_str())
        .collect();
      for s in &picked {
        assert!(!earlier.contains(s.id.as_str()), "{} repeats from {past}", s.id);
      }
    }
  }

  #[test]
  fn exactly_eighty_streets_still_honours_window() {
    let mut tiers = Vec::new();
    for t in 1..=4u8 {
      tiers.extend(std::iter::repeat(t).take(20));
    }
    let cat = catalog_with_tiers(&tiers);
    let picked = select_daily(&cat, date(2025, 6, 10));
    assert_eq!(picked.len(), DAILY_STREET_COUNT);
  }

  #[test]
  fn small_catalog_relaxes_window_without_crashing() {
    let cat = catalog_with_tiers(&[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3]);
    for day in 1..=10 {
      assert_eq!(select_daily(&cat, date(2024, 12, day)).len(), DAILY_STREET_COUNT);
    }
  }

  #[test]
  fn tiny_and_empty_catalogs_return_what_exists() {
    assert!(select_daily(&StreetCatalog::default(), date(2024, 1, 1)).is_empty());
    let cat = catalog_with_tiers(&[1, 4, 2]);
    let picked = select_daily(&cat, date(2024, 1, 1));
    assert_eq!(picked.len(), 3);
  }

  #[test]
  fn result_mixes_tiers() {
    let cat = random_catalog(200, 3);
    let picked = select_daily(&cat, date(2025, 9, 9));
    let tiers: HashSet<u8> = picked.iter().map(|s| s.tier).collect();
    assert!(tiers.len() > 1);
  }

  #[test]
  fn stratified_counts_per_tier() {
    let cat = random_catalog(500, 5);
    let all: Vec<&StreetRecord> = cat.iter().collect();
    let raw = raw_selection(&all, 20250101);
    let count = |t: u8| raw.iter().filter(|s| s.tier == t).count();
    assert_eq!((count(1), count(2), count(3), count(4)), (3, 3, 2, 2));
    // concatenated in tier order before the presentation shuffle
    let order: Vec<u8> = raw.iter().map(|s| s.tier).collect();
    assert_eq!(order, vec![1, 1, 1, 2, 2, 2, 3, 3, 4, 4]);
  }

  #[test]
  fn sparse_tiers_fall_back_to_plain_shuffle() {
    let cat = catalog_with_tiers(&[1; 30]);
    let all: Vec<&StreetRecord> = cat.iter().collect();
    let raw = raw_selection(&all, 42);
    let shuffled = seeded_shuffle(&all, 42);
    assert_eq!(
      raw.iter().map(|s| &s.id).collect::<Vec<_>>(),
      shuffled.iter().take(10).map(|s| &s.id).collect::<Vec<_>>()
    );
  }

  #[test]
  fn extreme_seeds_wrap_instead_of_overflowing() {
    let cat = random_catalog(60, 13);
    for seed in [i64::MAX, i64::MAX - 500, i64::MIN] {
      assert_eq!(select_daily_for_seed(&cat, DailySeed(seed)).len(), DAILY_STREET_COUNT);
    }
  }

  #[test]
  fn served_days_can_repeat_within_the_window() {
    // The window is checked against recomputed raw picks, not against what
    // earlier days served. Both catalogs below show served repeats.
    let small = catalog_with_tiers(&[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3]);
    let d = date(2025, 3, 10);
    let today: HashSet<String> = ids(&select_daily(&small, d)).into_iter().collect();
    let yesterday: HashSet<String> = ids(&select_daily(&small, d.pred_opt().unwrap())).into_iter().collect();
    // 10 + 10 picks out of 15 streets must share at least 5
    assert!(today.intersection(&yesterday).count() >= 5);

    let cat = random_catalog(100, 21);
    let start = date(2025, 1, 1);
    let served: Vec<HashSet<String>> = (0..30u64)
      .map(|i| ids(&select_daily(&cat, start.checked_add_days(Days::new(i)).unwrap())).into_iter().collect())
      .collect();
    let mut overlaps = 0;
    for day in 1..served.len() {
      for back in 1..=(EXCLUSION_DAYS as usize).min(day) {
        overlaps += served[day].intersection(&served[day - back]).count();
      }
    }
    assert!(overlaps > 0);
  }

  #[test]
  fn non_calendar_seed_skips_exclusion() {
    let cat = random_catalog(100, 9);
    assert_eq!(select_daily_for_seed(&cat, DailySeed(12345)).len(), DAILY_STREET_COUNT);
  }
}
