//! Error taxonomy for the street engine.
//!
//! None of these ever escape the selection/distractor/hint algorithms: they
//! degrade to "fewer results" or "use the full catalog". Only the loaders
//! (catalog file, plan file) hand them back to the caller.

use thiserror::Error;

/// Malformed or missing catalog data.
#[derive(Debug, Error)]
pub enum DataError {
  #[error("I/O error reading '{path}': {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid JSON in '{path}': {source}")]
  Json {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("catalog is empty after filtering ({raw} raw records)")]
  EmptyCatalog { raw: usize },
}

/// A single street's polylines cannot be turned into a testable geometry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
  #[error("street has no polylines")]
  NoPolylines,

  #[error("polyline {index} has {vertices} vertices, need at least 2")]
  DegeneratePolyline { index: usize, vertices: usize },
}

/// An editorial quiz plan that cannot be trusted for its date.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanOverrideError {
  #[error("plan for {date} has no questions")]
  NoQuestions { date: String },

  #[error("plan for {date} references unknown street id '{id}'")]
  UnknownStreet { date: String, id: String },

  #[error("plan for {date} uses street id '{id}' as answer more than once")]
  DuplicateStreet { date: String, id: String },

  #[error("plan date '{0}' is not a YYYY-MM-DD date")]
  BadDate(String),
}

/// A client request the service cannot answer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
  #[error("date '{0}' is not a YYYY-MM-DD date")]
  BadDate(String),

  #[error("no question {index} on {date}")]
  NoQuestion { date: String, index: usize },

  #[error("no streets available")]
  NoStreets,
}
