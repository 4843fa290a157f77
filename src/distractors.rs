//! Wrong answers for one question.
//!
//! Decoys share the target's street-type prefix whenever enough of them
//! exist, so "Carrer de ..." is never the obvious pick among "Avinguda ...".

use tracing::{debug, instrument};

use crate::catalog::StreetCatalog;
use crate::domain::StreetRecord;
use crate::rng::{seeded_shuffle, OPTION_SHUFFLE_OFFSET};
use crate::util::street_prefix;

pub const DISTRACTOR_COUNT: usize = 3;
pub const OPTION_COUNT: usize = DISTRACTOR_COUNT + 1;

/// Degrees, applied to both axes (~1 km in Barcelona).
const NEIGHBOR_THRESHOLD: f64 = 0.01;
/// Neighbors needed before one of them is forced into the options.
const NEIGHBOR_MIN: usize = 4;

fn is_neighbor(target: &StreetRecord, other: &StreetRecord) -> bool {
  match (target.representative_point(), other.representative_point()) {
    (Some(a), Some(b)) => {
      (a.lat - b.lat).abs() < NEIGHBOR_THRESHOLD
        && (a.lng - b.lng).abs() < NEIGHBOR_THRESHOLD
        && other.name != target.name
    }
    _ => false,
  }
}

/// Up to three decoys for `target`, deterministic in `question_seed`.
pub fn select_distractors<'a>(
  target: &StreetRecord,
  catalog: &'a StreetCatalog,
  question_seed: i64,
) -> Vec<&'a StreetRecord> {
  let prefix = street_prefix(&target.name);
  let same_prefix: Vec<&StreetRecord> = catalog
    .iter()
    .filter(|s| s.id != target.id && street_prefix(&s.name) == prefix)
    .collect();

  let neighbors: Vec<&StreetRecord> =
    same_prefix.iter().copied().filter(|s| is_neighbor(target, s)).collect();

  let pool: Vec<&StreetRecord> = if same_prefix.len() < DISTRACTOR_COUNT {
    catalog.iter().filter(|s| s.id != target.id).collect()
  } else {
    same_prefix
  };

  if neighbors.len() >= NEIGHBOR_MIN {
    let neighbor = neighbors[question_seed.rem_euclid(neighbors.len() as i64) as usize];
    let rest: Vec<&StreetRecord> = pool.into_iter().filter(|s| s.id != neighbor.id).collect();
    let mut out = vec![neighbor];
    out.extend(seeded_shuffle(&rest, question_seed.wrapping_add(1)).into_iter().take(DISTRACTOR_COUNT - 1));
    debug!(target: "daily", target_id = %target.id, neighbor = %neighbor.id, "Neighbor distractor forced");
    return out;
  }

  seeded_shuffle(&pool, question_seed).into_iter().take(DISTRACTOR_COUNT).collect()
}

/// `[target, ...distractors]` in display order for `question_seed`.
#[instrument(level = "debug", target = "daily", skip_all, fields(target_id = %target.id, question_seed = question_seed))]
pub fn generate_options_for_seed(
  target: &StreetRecord,
  catalog: &StreetCatalog,
  question_seed: i64,
) -> Vec<StreetRecord> {
  let mut options = Vec::with_capacity(OPTION_COUNT);
  options.push(target);
  options.extend(select_distractors(target, catalog, question_seed));
  seeded_shuffle(&options, question_seed.wrapping_add(OPTION_SHUFFLE_OFFSET))
    .into_iter()
    .cloned()
    .collect()
}
