//! Editorial quiz plans: pre-authored days that replace the algorithm.
//!
//! A plan is only trusted when every answer it names exists in the catalog.
//! Anything else is treated as "no plan" by the engine.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::catalog::StreetCatalog;
use crate::distractors::DISTRACTOR_COUNT;
use crate::domain::{QuizPlan, QuizPlanBook, StreetRecord};
use crate::error::{DataError, PlanOverrideError};

pub const PLAN_DATE_FORMAT: &str = "%Y-%m-%d";

impl QuizPlanBook {
  pub fn from_json_str(json: &str, origin: &str) -> Result<Self, DataError> {
    serde_json::from_str(json).map_err(|source| DataError::Json { path: origin.to_string(), source })
  }

  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let json = std::fs::read_to_string(path)
      .map_err(|source| DataError::Io { path: origin.clone(), source })?;
    let book = Self::from_json_str(&json, &origin)?;
    info!(target: "plan", path = %origin, days = book.quizzes.len(), "Loaded quiz plan");
    Ok(book)
  }

  /// First plan whose `date` parses to `date`.
  pub fn for_date(&self, date: NaiveDate) -> Option<&QuizPlan> {
    self.quizzes.iter().find(|q| {
      NaiveDate::parse_from_str(q.date.trim(), PLAN_DATE_FORMAT).ok() == Some(date)
    })
  }
}

/// One plan question with its streets looked up.
#[derive(Clone, Debug)]
pub struct ResolvedQuestion<'a> {
  pub correct: &'a StreetRecord,
  /// `None` when fewer than three listed decoys exist; the algorithm fills in.
  pub distractors: Option<Vec<&'a StreetRecord>>,
}

#[derive(Clone, Debug)]
pub struct ResolvedPlan<'a> {
  pub date: NaiveDate,
  pub questions: Vec<ResolvedQuestion<'a>>,
}

impl<'a> ResolvedPlan<'a> {
  pub fn streets(&self) -> Vec<StreetRecord> {
    self.questions.iter().map(|q| q.correct.clone()).collect()
  }

  /// The plan question whose answer is `target_id`.
  pub fn question_for(&self, target_id: &str) -> Option<&ResolvedQuestion<'a>> {
    self.questions.iter().find(|q| q.correct.id == target_id)
  }
}

/// Check `plan` against the catalog.
pub fn resolve_plan<'a>(
  plan: &QuizPlan,
  catalog: &'a StreetCatalog,
) -> Result<ResolvedPlan<'a>, PlanOverrideError> {
  let date = NaiveDate::parse_from_str(plan.date.trim(), PLAN_DATE_FORMAT)
    .map_err(|_| PlanOverrideError::BadDate(plan.date.clone()))?;
  if plan.questions.is_empty() {
    return Err(PlanOverrideError::NoQuestions { date: plan.date.clone() });
  }

  let mut answers = HashSet::new();
  let mut questions = Vec::with_capacity(plan.questions.len());
  for q in &plan.questions {
    let correct = catalog.get(&q.correct_id).ok_or_else(|| PlanOverrideError::UnknownStreet {
      date: plan.date.clone(),
      id: q.correct_id.clone(),
    })?;
    if !answers.insert(correct.id.as_str()) {
      return Err(PlanOverrideError::DuplicateStreet { date: plan.date.clone(), id: correct.id.clone() });
    }

    let mut seen = HashSet::new();
    let known: Vec<&StreetRecord> = q
      .distractor_ids
      .iter()
      .filter_map(|id| catalog.get(id))
      .filter(|s| s.id != correct.id && seen.insert(s.id.as_str()))
      .take(DISTRACTOR_COUNT)
      .collect();
    let distractors = if known.len() == DISTRACTOR_COUNT {
      Some(known)
    } else {
      warn!(target: "plan", date = %plan.date, correct = %correct.id, known = known.len(), "Plan question lacks decoys; algorithm fills in");
      None
    };
    questions.push(ResolvedQuestion { correct, distractors });
  }

  Ok(ResolvedPlan { date, questions })
}

/// The usable plan for `date`, if any. Broken plans are logged and ignored.
pub fn plan_for_date<'a>(
  book: Option<&QuizPlanBook>,
  catalog: &'a StreetCatalog,
  date: NaiveDate,
) -> Option<ResolvedPlan<'a>> {
  let plan = book?.for_date(date)?;
  match resolve_plan(plan, catalog) {
    Ok(resolved) => Some(resolved),
    Err(e) => {
      warn!(target: "plan", %date, error = %e, "Ignoring quiz plan; using algorithmic selection");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{LatLng, Polyline, QuizQuestion};

  fn catalog() -> StreetCatalog {
    StreetCatalog::from_records(
      (1..=8)
        .map(|i| StreetRecord {
          id: i.to_string(),
          name: format!("Carrer {i}"),
          tier: 1,
          geometry: vec![Polyline(vec![LatLng::new(41.0, 2.0), LatLng::new(41.1, 2.1)])],
          lat: None,
          lng: None,
        })
        .collect(),
    )
  }

  fn q(correct: &str, ds: &[&str]) -> QuizQuestion {
    QuizQuestion { correct_id: correct.into(), distractor_ids: ds.iter().map(|s| s.to_string()).collect() }
  }

  fn plan(date: &str, questions: Vec<QuizQuestion>) -> QuizPlan {
    QuizPlan { date: date.into(), questions }
  }

  #[test]
  fn valid_plan_resolves_in_order() {
    let cat = catalog();
    let p = plan("2026-01-09", vec![q("3", &["1", "2", "4"]), q("5", &["6", "7", "8"])]);
    let resolved = resolve_plan(&p, &cat).unwrap();
    assert_eq!(resolved.streets().iter().map(|s| s.id.as_str()).collect::<Vec<_>>(), vec!["3", "5"]);
    assert_eq!(resolved.question_for("5").unwrap().distractors.as_ref().unwrap().len(), 3);
  }

  #[test]
  fn unknown_answer_invalidates_the_plan() {
    let cat = catalog();
    let p = plan("2026-01-09", vec![q("3", &["1", "2", "4"]), q("99", &[])]);
    assert_eq!(
      resolve_plan(&p, &cat).unwrap_err(),
      PlanOverrideError::UnknownStreet { date: "2026-01-09".into(), id: "99".into() }
    );
  }

  #[test]
  fn empty_duplicate_and_bad_dates_are_rejected() {
    let cat = catalog();
    assert!(matches!(resolve_plan(&plan("2026-01-09", vec![]), &cat), Err(PlanOverrideError::NoQuestions { .. })));
    assert!(matches!(
      resolve_plan(&plan("2026-01-09", vec![q("1", &[]), q("1", &[])]), &cat),
      Err(PlanOverrideError::DuplicateStreet { .. })
    ));
    assert!(matches!(resolve_plan(&plan("09/01/2026", vec![q("1", &[])]), &cat), Err(PlanOverrideError::BadDate(_))));
  }

  #[test]
  fn short_decoy_lists_fall_back_per_question() {
    let cat = catalog();
    let p = plan("2026-01-09", vec![q("1", &["2", "404", "1", "2"])]);
    let resolved = resolve_plan(&p, &cat).unwrap();
    assert!(resolved.questions[0].distractors.is_none());
  }

  #[test]
  fn plan_file_loads_from_disk() {
    let path = std::env::temp_dir().join(format!("carrers-plan-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"quizzes":[{"date":"2026-01-09","questions":[{"correctId":"1"}]}]}"#).unwrap();
    let book = QuizPlanBook::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(book.quizzes.len(), 1);
    assert!(book.for_date(NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()).is_some());
    assert!(matches!(QuizPlanBook::from_path(&path), Err(DataError::Io { .. })));
  }

  #[test]
  fn book_lookup_by_date() {
    let cat = catalog();
    let book = QuizPlanBook {
      quizzes: vec![
        plan("2026-01-09", vec![q("1", &["2", "3", "4"])]),
        plan("2026-01-10", vec![q("404", &[])]),
      ],
    };
    let d = |day| NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
    assert!(plan_for_date(Some(&book), &cat, d(9)).is_some());
    assert!(plan_for_date(Some(&book), &cat, d(10)).is_none());
    assert!(plan_for_date(Some(&book), &cat, d(11)).is_none());
    assert!(plan_for_date(None, &cat, d(9)).is_none());
  }
}
