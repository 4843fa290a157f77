//! Geometric hints: streets that cross the target first, nearest ones after.
//!
//! The returned order is the reveal order shown to the player, one hint at
//! a time. Intersecting streets come in catalog order, distance fallbacks in
//! ascending distance (ties keep catalog order).

use std::collections::HashSet;

use geo::{Coord, Distance, Haversine, Intersects, Point};
use tracing::{debug, instrument, warn};

use crate::catalog::StreetCatalog;
use crate::domain::StreetRecord;
use crate::util::{matches_denylist, HINT_DENYLIST};

pub const HINT_LIMIT: usize = 3;

/// Plain mean of every vertex, duplicates included; not length-weighted.
fn vertex_centroid(street: &StreetRecord) -> Option<Point<f64>> {
  let mut sum = Coord { x: 0.0, y: 0.0 };
  let mut n = 0usize;
  for p in street.geometry.iter().flat_map(|line| line.0.iter()) {
    sum = sum + p.to_coord();
    n += 1;
  }
  (n > 0).then(|| Point::from(sum / n as f64))
}

fn eligible(target: &StreetRecord, candidate: &StreetRecord) -> bool {
  candidate.id != target.id && !matches_denylist(&candidate.name, HINT_DENYLIST)
}

/// Up to [`HINT_LIMIT`] hint streets for `target`. Not seeded: hints are a
/// fixed fact about the map and do not change from day to day.
#[instrument(level = "debug", target = "hints", skip_all, fields(target_id = %target.id))]
pub fn generate_hints(target: &StreetRecord, catalog: &StreetCatalog) -> Vec<StreetRecord> {
  let target_geo = match target.to_multi_line_string() {
    Ok(g) => g,
    Err(e) => {
      warn!(target: "hints", target_id = %target.id, error = %e, "Target geometry unusable; no hints");
      return Vec::new();
    }
  };

  let mut found: Vec<&StreetRecord> = Vec::with_capacity(HINT_LIMIT);
  for candidate in catalog {
    if !eligible(target, candidate) || candidate.geometry.is_empty() {
      continue;
    }
    match candidate.to_multi_line_string() {
      Ok(geo) => {
        if target_geo.intersects(&geo) {
          found.push(candidate);
          if found.len() >= HINT_LIMIT {
            break;
          }
        }
      }
      Err(e) => {
        debug!(target: "hints", candidate = %candidate.id, error = %e, "Skipping candidate with bad geometry");
      }
    }
  }
  let crossing = found.len();

  if found.len() < HINT_LIMIT {
    if let Some(origin) = vertex_centroid(target) {
      let taken: HashSet<&str> = found.iter().map(|s| s.id.as_str()).collect();
      let mut by_distance: Vec<(&StreetRecord, f64)> = catalog
        .iter()
        .filter(|s| eligible(target, s) && !taken.contains(s.id.as_str()))
        .filter_map(|s| {
          let p = s.first_vertex()?;
          let d = Haversine.distance(origin, Point::from(p.to_coord()));
          d.is_finite().then_some((s, d))
        })
        .collect();
      by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
      let needed = HINT_LIMIT - found.len();
      found.extend(by_distance.into_iter().take(needed).map(|(s, _)| s));
    }
  }

  debug!(target: "hints", target_id = %target.id, crossing, total = found.len(), "Hints computed");
  found.into_iter().cloned().collect()
}
