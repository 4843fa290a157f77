//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters.

use std::sync::Arc;
use axum::{extract::{State, Query}, http::StatusCode, Json, response::{IntoResponse, Response}};
use tracing::{instrument, warn};

use crate::error::RequestError;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

impl IntoResponse for RequestError {
  fn into_response(self) -> Response {
    let status = match &self {
      RequestError::BadDate(_) => StatusCode::BAD_REQUEST,
      RequestError::NoQuestion { .. } => StatusCode::NOT_FOUND,
      RequestError::NoStreets => StatusCode::SERVICE_UNAVAILABLE,
    };
    warn!(target: "carrers_backend", %status, error = %self, "Request rejected");
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, streets: state.catalog.len() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_daily(
  State(state): State<Arc<AppState>>,
  Query(q): Query<DailyQuery>,
) -> Result<Json<DailyOut>, RequestError> {
  daily_out(&state, q.date.as_deref()).await.map(Json)
}

#[instrument(level = "info", skip(state), fields(index = q.question_index))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionQuery>,
) -> Result<Json<QuestionOut>, RequestError> {
  question_out(&state, q.date.as_deref(), q.question_index).await.map(Json)
}

#[instrument(level = "info", skip(state), fields(index = q.question_index))]
pub async fn http_get_hints(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionQuery>,
) -> Result<Json<HintsOut>, RequestError> {
  hints_out(&state, q.date.as_deref(), q.question_index).await.map(Json)
}

#[instrument(level = "info", skip(state, body), fields(index = body.question_index, street_id = %body.street_id))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, RequestError> {
  evaluate_answer(&state, body.date.as_deref(), body.question_index, &body.street_id).await.map(Json)
}
