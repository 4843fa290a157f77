//! Carrers · daily Barcelona street quiz.
//!
//! The engine (`daily`, `distractors`, `hints`, `engine`) is pure and
//! deterministic: the same catalog and date give the same quiz on every
//! machine. The service layer (`state`, `routes`, `logic`, `protocol`) wraps
//! it in an Axum HTTP + WebSocket API.

pub mod catalog;
pub mod config;
pub mod daily;
pub mod distractors;
pub mod domain;
pub mod engine;
pub mod error;
pub mod hints;
pub mod logic;
pub mod plan;
pub mod protocol;
pub mod rng;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
pub mod util;

pub use catalog::StreetCatalog;
pub use domain::{LatLng, Polyline, QuizPlan, QuizPlanBook, RawStreet, StreetRecord};
pub use engine::{generate_hints, generate_options, select_daily, time_until_next, DailyQuiz, GameSetup, SelectionSource};
pub use error::{DataError, GeometryError, PlanOverrideError, RequestError};
pub use rng::{seeded_random, seeded_shuffle, DailySeed};
