//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Resolving the requested day (explicit date or server "today")
//!   - Serving a question without revealing its answer
//!   - Revealing hints for a question
//!   - Checking a submitted answer

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::engine::time_until_next;
use crate::error::RequestError;
use crate::plan::PLAN_DATE_FORMAT;
use crate::protocol::{AnswerOut, DailyOut, HintStreetOut, HintsOut, OptionOut, QuestionOut};
use crate::state::AppState;

/// `None` or blank means `today`.
pub fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, RequestError> {
  match raw.map(str::trim).filter(|s| !s.is_empty()) {
    None => Ok(today),
    Some(s) => NaiveDate::parse_from_str(s, PLAN_DATE_FORMAT).map_err(|_| RequestError::BadDate(s.to_string())),
  }
}

fn resolve_date(state: &AppState, raw: Option<&str>) -> Result<NaiveDate, RequestError> {
  parse_date(raw, state.today())
}

#[instrument(level = "info", skip(state))]
pub async fn daily_out(state: &AppState, date: Option<&str>) -> Result<DailyOut, RequestError> {
  let date = resolve_date(state, date)?;
  let quiz = state.daily(date).await;
  if quiz.streets.is_empty() {
    return Err(RequestError::NoStreets);
  }
  let next_in = time_until_next(chrono::Local::now().naive_local());
  info!(target: "daily", %date, source = ?quiz.source, count = quiz.streets.len(), "Daily served");
  Ok(DailyOut {
    date: date.format(PLAN_DATE_FORMAT).to_string(),
    seed: quiz.seed.value(),
    source: quiz.source,
    question_count: quiz.streets.len(),
    next_challenge_in: next_in.num_seconds(),
  })
}

#[instrument(level = "info", skip(state))]
pub async fn question_out(state: &AppState, date: Option<&str>, index: usize) -> Result<QuestionOut, RequestError> {
  let date = resolve_date(state, date)?;
  let (target, options) = state.options(date, index).await.ok_or_else(|| no_question(date, index))?;
  Ok(QuestionOut {
    date: date.format(PLAN_DATE_FORMAT).to_string(),
    question_index: index,
    tier: target.tier,
    geometry: target.geometry,
    options: options.iter().map(OptionOut::from).collect(),
  })
}

#[instrument(level = "info", skip(state))]
pub async fn hints_out(state: &AppState, date: Option<&str>, index: usize) -> Result<HintsOut, RequestError> {
  let date = resolve_date(state, date)?;
  let quiz = state.daily(date).await;
  let target = quiz.streets.get(index).ok_or_else(|| no_question(date, index))?;
  let hints = state.hints(&target.id).await.unwrap_or_default();
  info!(target: "hints", %date, index, count = hints.len(), "Hints served");
  Ok(HintsOut {
    date: date.format(PLAN_DATE_FORMAT).to_string(),
    question_index: index,
    hints: hints.iter().map(HintStreetOut::from).collect(),
  })
}

#[instrument(level = "info", skip(state))]
pub async fn evaluate_answer(
  state: &AppState,
  date: Option<&str>,
  index: usize,
  street_id: &str,
) -> Result<AnswerOut, RequestError> {
  let date = resolve_date(state, date)?;
  let quiz = state.daily(date).await;
  let target = quiz.streets.get(index).ok_or_else(|| no_question(date, index))?;
  let correct = target.id == street_id;
  info!(target: "daily", %date, index, %correct, "Answer evaluated");
  Ok(AnswerOut { correct, correct_id: target.id.clone(), correct_name: target.name.clone() })
}

fn no_question(date: NaiveDate, index: usize) -> RequestError {
  RequestError::NoQuestion { date: date.format(PLAN_DATE_FORMAT).to_string(), index }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GameConfig;
  use crate::seeds::seed_catalog;

  fn state() -> AppState {
    AppState::from_parts(seed_catalog(), None, GameConfig::default())
  }

  #[test]
  fn parse_date_defaults_to_today_and_rejects_garbage() {
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    assert_eq!(parse_date(None, today).unwrap(), today);
    assert_eq!(parse_date(Some("  "), today).unwrap(), today);
    assert_eq!(parse_date(Some("2025-01-15"), today).unwrap(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    assert_eq!(parse_date(Some("15/01/2025"), today), Err(RequestError::BadDate("15/01/2025".into())));
  }

  #[tokio::test]
  async fn question_hides_the_answer_but_lists_it_among_options() {
    let st = state();
    let q = question_out(&st, Some("2025-03-03"), 2).await.unwrap();
    assert_eq!(q.options.len(), 4);
    let quiz = st.daily(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()).await;
    assert!(q.options.iter().any(|o| o.id == quiz.streets[2].id));
    assert_eq!(q.geometry, quiz.streets[2].geometry);
  }

  #[tokio::test]
  async fn answers_are_checked_against_the_days_street() {
    let st = state();
    let quiz = st.daily(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()).await;
    let right = evaluate_answer(&st, Some("2025-03-03"), 0, &quiz.streets[0].id).await.unwrap();
    assert!(right.correct);
    let wrong = evaluate_answer(&st, Some("2025-03-03"), 0, "nope").await.unwrap();
    assert!(!wrong.correct);
    assert_eq!(wrong.correct_id, quiz.streets[0].id);
  }

  #[tokio::test]
  async fn out_of_range_questions_are_errors() {
    let st = state();
    assert_eq!(
      hints_out(&st, Some("2025-03-03"), 10).await.unwrap_err(),
      RequestError::NoQuestion { date: "2025-03-03".into(), index: 10 }
    );
    assert!(question_out(&st, Some("2025-03-03"), 99).await.is_err());
  }

  #[tokio::test]
  async fn daily_reports_ten_questions_and_a_countdown() {
    let st = state();
    let d = daily_out(&st, Some("2025-03-03")).await.unwrap();
    assert_eq!(d.question_count, 10);
    assert_eq!(d.seed, 20250303);
    assert!(d.next_challenge_in > 0 && d.next_challenge_in <= 86_400);
  }
}
