//! The engine's public operations, with editorial plan overrides applied.
//!
//! Callers pass the date explicitly; nothing here reads the clock.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{info, instrument};

use crate::catalog::StreetCatalog;
use crate::daily;
use crate::distractors::generate_options_for_seed;
use crate::domain::{QuizPlanBook, StreetRecord};
use crate::plan::plan_for_date;
use crate::rng::{seeded_shuffle, DailySeed, OPTION_SHUFFLE_OFFSET};

pub use crate::hints::generate_hints;

/// Where a day's streets came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionSource {
  Plan,
  Algorithm,
}

#[derive(Clone, Debug, Serialize)]
pub struct DailyQuiz {
  pub date: NaiveDate,
  pub seed: DailySeed,
  pub source: SelectionSource,
  pub streets: Vec<StreetRecord>,
}

/// Today's streets: the editorial plan when one is valid for `date`,
/// otherwise the deterministic daily selection.
#[instrument(level = "info", target = "daily", skip(catalog, plans), fields(catalog = catalog.len()))]
pub fn select_daily(catalog: &StreetCatalog, date: NaiveDate, plans: Option<&QuizPlanBook>) -> DailyQuiz {
  let seed = DailySeed::from_date(date);
  if let Some(plan) = plan_for_date(plans, catalog, date) {
    info!(target: "daily", %date, questions = plan.questions.len(), "Serving editorial plan");
    return DailyQuiz { date, seed, source: SelectionSource::Plan, streets: plan.streets() };
  }
  DailyQuiz { date, seed, source: SelectionSource::Algorithm, streets: daily::select_daily(catalog, date) }
}

/// Answer options for question `question_index` (0-based) of `date`.
pub fn generate_options(
  target: &StreetRecord,
  catalog: &StreetCatalog,
  date: NaiveDate,
  question_index: usize,
  plans: Option<&QuizPlanBook>,
) -> Vec<StreetRecord> {
  let question_seed = DailySeed::from_date(date).question_seed(question_index);

  let planned = plan_for_date(plans, catalog, date).and_then(|plan| {
    let distractors = plan.question_for(&target.id)?.distractors.clone()?;
    let mut options = Vec::with_capacity(distractors.len() + 1);
    options.push(target.clone());
    options.extend(distractors.into_iter().cloned());
    Some(seeded_shuffle(&options, question_seed.wrapping_add(OPTION_SHUFFLE_OFFSET)))
  });

  planned.unwrap_or_else(|| generate_options_for_seed(target, catalog, question_seed))
}

/// Everything a client needs to start today's game.
#[derive(Clone, Debug, Serialize)]
pub struct GameSetup {
  pub quiz: DailyQuiz,
  pub initial_options: Vec<StreetRecord>,
}

impl GameSetup {
  /// `None` only when the catalog is empty.
  pub fn prepare(catalog: &StreetCatalog, date: NaiveDate, plans: Option<&QuizPlanBook>) -> Option<Self> {
    if catalog.is_empty() {
      tracing::error!(target: "daily", %date, "No valid streets; cannot set up a game");
      return None;
    }
    let quiz = select_daily(catalog, date, plans);
    let initial_options = quiz
      .streets
      .first()
      .map(|first| generate_options(first, catalog, date, 0, plans))
      .unwrap_or_default();
    Some(Self { quiz, initial_options })
  }
}

/// Time left until the next day's challenge (local midnight after `now`).
pub fn time_until_next(now: NaiveDateTime) -> chrono::Duration {
  let next_midnight = now
    .date()
    .checked_add_days(Days::new(1))
    .map(|d| d.and_time(NaiveTime::MIN))
    .unwrap_or(now);
  next_midnight - now
}
