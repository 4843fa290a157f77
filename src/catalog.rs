//! Validated, de-duplicated street catalog.
//!
//! Built once at startup and never mutated afterwards; every engine call
//! borrows it. Iteration order is first-seen order of the raw input and is
//! part of the hint tie-breaking contract.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::domain::{RawStreet, StreetRecord};
use crate::error::DataError;
use crate::util::{matches_denylist, CATALOG_DENYLIST};

#[derive(Clone, Debug, Default)]
pub struct StreetCatalog {
  streets: Vec<StreetRecord>,
  by_id: HashMap<String, usize>,
}

impl StreetCatalog {
  /// Filter non-street entities and empty geometry, then collapse duplicate
  /// names keeping the record with the most vertices (first one on ties).
  pub fn build(raw: Vec<RawStreet>) -> Self {
    Self::build_counted(raw, 0)
  }

  /// [`StreetCatalog::build`] for input where `malformed` entries were
  /// already dropped at parse time; they are reported with the inventory.
  #[instrument(level = "info", skip_all, fields(raw = raw.len(), malformed = malformed))]
  fn build_counted(raw: Vec<RawStreet>, malformed: usize) -> Self {
    let raw_len = raw.len();
    let mut slots: Vec<(usize, StreetRecord)> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0usize;

    for r in raw {
      if r.name().trim().is_empty() || matches_denylist(r.name(), CATALOG_DENYLIST) || r.raw_vertex_count() == 0 {
        dropped += 1;
        continue;
      }
      let weight = r.raw_vertex_count();
      let Some(record) = r.into_record() else {
        dropped += 1;
        continue;
      };
      match by_name.get(&record.name) {
        Some(&slot) => {
          if weight > slots[slot].0 {
            slots[slot] = (weight, record);
          }
        }
        None => {
          by_name.insert(record.name.clone(), slots.len());
          slots.push((weight, record));
        }
      }
    }

    let mut streets = Vec::with_capacity(slots.len());
    let mut seen_ids = HashSet::new();
    for (_, record) in slots {
      if !seen_ids.insert(record.id.clone()) {
        warn!(target: "catalog", id = %record.id, name = %record.name, "Duplicate street id; keeping the first");
        continue;
      }
      streets.push(record);
    }

    info!(
      target: "catalog",
      raw = raw_len,
      kept = streets.len(),
      filtered = dropped,
      malformed,
      merged = raw_len - dropped - streets.len(),
      "Street catalog built"
    );
    Self::from_records(streets)
  }

  /// Wrap already validated records. Order is kept as given.
  pub fn from_records(streets: Vec<StreetRecord>) -> Self {
    let by_id = streets.iter().enumerate().map(|(i, s)| (s.id.clone(), i)).collect();
    Self { streets, by_id }
  }

  /// Parse a JSON array of street entries. Only a file that is not an array
  /// at all is an error; entries that do not fit [`RawStreet`] are skipped.
  pub fn from_json_str(json: &str, origin: &str) -> Result<Self, DataError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)
      .map_err(|source| DataError::Json { path: origin.to_string(), source })?;
    let total = entries.len();

    let mut raw = Vec::with_capacity(total);
    for (index, entry) in entries.into_iter().enumerate() {
      match serde_json::from_value::<RawStreet>(entry) {
        Ok(r) => raw.push(r),
        Err(e) => debug!(target: "catalog", %origin, index, error = %e, "Skipping malformed catalog entry"),
      }
    }
    let malformed = total - raw.len();

    let catalog = Self::build_counted(raw, malformed);
    if catalog.is_empty() {
      return Err(DataError::EmptyCatalog { raw: total });
    }
    Ok(catalog)
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let json = std::fs::read_to_string(path)
      .map_err(|source| DataError::Io { path: origin.clone(), source })?;
    Self::from_json_str(&json, &origin)
  }

  pub fn get(&self, id: &str) -> Option<&StreetRecord> {
    self.by_id.get(id).map(|&i| &self.streets[i])
  }

  pub fn contains(&self, id: &str) -> bool { self.by_id.contains_key(id) }

  pub fn iter(&self) -> std::slice::Iter<'_, StreetRecord> { self.streets.iter() }

  pub fn len(&self) -> usize { self.streets.len() }

  pub fn is_empty(&self) -> bool { self.streets.is_empty() }
}

impl<'a> IntoIterator for &'a StreetCatalog {
  type Item = &'a StreetRecord;
  type IntoIter = std::slice::Iter<'a, StreetRecord>;

  fn into_iter(self) -> Self::IntoIter { self.streets.iter() }
}
