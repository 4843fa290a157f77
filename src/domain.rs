//! Domain models used by the engine: streets, their geometry, and editorial quiz plans.

use geo::{Coord, LineString, MultiLineString};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A coordinate in storage order. Source data and API payloads carry points
/// as `[lat, lng]`; the geometry library wants `(x = lng, y = lat)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
  pub lat: f64,
  pub lng: f64,
}

impl LatLng {
  pub fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }

  /// The only place where storage order becomes geometry order.
  pub fn to_coord(self) -> Coord<f64> {
    Coord { x: self.lng, y: self.lat }
  }
}

impl From<[f64; 2]> for LatLng {
  fn from(p: [f64; 2]) -> Self { Self { lat: p[0], lng: p[1] } }
}

impl From<LatLng> for [f64; 2] {
  fn from(p: LatLng) -> Self { [p.lat, p.lng] }
}

/// One connected run of vertices. A street split across blocks has several.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline(pub Vec<LatLng>);

impl Polyline {
  pub fn len(&self) -> usize { self.0.len() }
  pub fn is_empty(&self) -> bool { self.0.is_empty() }
  pub fn first(&self) -> Option<LatLng> { self.0.first().copied() }
}

/// One named thoroughfare of the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreetRecord {
  pub id: String,
  /// Display name including its type prefix, e.g. "Carrer de Balmes".
  pub name: String,
  /// 1 = most iconic .. 4 = obscure. 0 when the source had no rank.
  pub tier: u8,
  pub geometry: Vec<Polyline>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lat: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lng: Option<f64>,
}

impl StreetRecord {
  /// Total vertices across all polylines.
  pub fn vertex_count(&self) -> usize {
    self.geometry.iter().map(Polyline::len).sum()
  }

  pub fn first_vertex(&self) -> Option<LatLng> {
    self.geometry.first().and_then(Polyline::first)
  }

  /// Cheap proximity point: explicit lat/lng if both are present, else the first vertex.
  pub fn representative_point(&self) -> Option<LatLng> {
    match (self.lat, self.lng) {
      (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
      _ => self.first_vertex(),
    }
  }

  pub fn to_multi_line_string(&self) -> Result<MultiLineString<f64>, GeometryError> {
    if self.geometry.is_empty() {
      return Err(GeometryError::NoPolylines);
    }
    let mut lines = Vec::with_capacity(self.geometry.len());
    for (index, line) in self.geometry.iter().enumerate() {
      if line.len() < 2 {
        return Err(GeometryError::DegeneratePolyline { index, vertices: line.len() });
      }
      lines.push(LineString::new(line.0.iter().map(|p| p.to_coord()).collect()));
    }
    Ok(MultiLineString::new(lines))
  }
}

/// Street ids show up both as strings and as bare numbers in exported data.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
  Text(String),
  Number(serde_json::Number),
}

impl RawId {
  pub fn into_string(self) -> String {
    match self {
      RawId::Text(s) => s,
      RawId::Number(n) => n.to_string(),
    }
  }
}

/// Street entry as found in the source JSON, before validation.
///
/// Every field is optional or loosely typed: exported data has nulls,
/// string coordinates and half-written points, and one bad entry must not
/// sink the rest of the file.
#[derive(Clone, Debug, Deserialize)]
pub struct RawStreet {
  #[serde(default)] pub id: Option<RawId>,
  #[serde(default)] pub name: Option<String>,
  #[serde(default)] pub tier: Option<serde_json::Value>,
  #[serde(default)] pub geometry: Option<Vec<Vec<serde_json::Value>>>,
  #[serde(default)] pub lat: Option<serde_json::Value>,
  #[serde(default)] pub lng: Option<serde_json::Value>,
}

/// `[lat, lng, ...]` with both leading entries numeric.
fn parse_point(p: &serde_json::Value) -> Option<LatLng> {
  let pair = p.as_array()?;
  if pair.len() < 2 {
    return None;
  }
  Some(LatLng::new(pair[0].as_f64()?, pair[1].as_f64()?))
}

impl RawStreet {
  pub fn name(&self) -> &str {
    self.name.as_deref().unwrap_or("")
  }

  /// Flattened point count, as exported (malformed points included).
  pub fn raw_vertex_count(&self) -> usize {
    self.geometry.as_ref().map(|g| g.iter().map(Vec::len).sum()).unwrap_or(0)
  }

  /// Typed record, or `None` without an id or a single usable vertex.
  /// Malformed points are dropped; a non-numeric tier reads as 0; the
  /// representative point falls back to the first vertex.
  pub fn into_record(self) -> Option<StreetRecord> {
    let id = self.id?.into_string();
    let geometry: Vec<Polyline> = self
      .geometry
      .unwrap_or_default()
      .iter()
      .map(|line| Polyline(line.iter().filter_map(parse_point).collect()))
      .collect();

    let mut record = StreetRecord {
      id,
      name: self.name.unwrap_or_default(),
      tier: self.tier.as_ref().and_then(serde_json::Value::as_u64).and_then(|t| u8::try_from(t).ok()).unwrap_or(0),
      geometry,
      lat: self.lat.as_ref().and_then(serde_json::Value::as_f64),
      lng: self.lng.as_ref().and_then(serde_json::Value::as_f64),
    };
    if record.vertex_count() == 0 {
      return None;
    }
    if record.lat.is_none() || record.lng.is_none() {
      if let Some(p) = record.first_vertex() {
        record.lat = Some(p.lat);
        record.lng = Some(p.lng);
      }
    }
    Some(record)
  }
}

/// One pre-authored question: the answer and its decoys.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub correct_id: String,
  #[serde(default)]
  pub distractor_ids: Vec<String>,
}

/// Editorial override for one calendar date (`YYYY-MM-DD`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizPlan {
  pub date: String,
  #[serde(default)]
  pub questions: Vec<QuizQuestion>,
}

/// Whole plan file: `{ "quizzes": [ ... ] }`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QuizPlanBook {
  #[serde(default)]
  pub quizzes: Vec<QuizPlan>,
}
