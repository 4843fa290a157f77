//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::RequestError;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;
use crate::util::trunc_for_log;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "carrers_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "carrers_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply = handle_text(&txt, &state).await;
        if let Err(e) = socket.send(Message::Text(reply)).await {
          error!(target: "carrers_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "carrers_backend", "WebSocket disconnected");
}

/// Parse, dispatch, serialize: one JSON reply per incoming text frame.
pub async fn handle_text(txt: &str, state: &AppState) -> String {
  let reply_msg = match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "carrers_backend", "WS received: {:?}", &incoming);
      handle_client_ws(incoming, state).await
    }
    Err(e) => {
      debug!(target: "carrers_backend", raw = %trunc_for_log(txt, 200), error = %e, "WS invalid JSON");
      ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }
    }
  };

  serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

fn or_error<T>(res: Result<T, RequestError>, wrap: impl FnOnce(T) -> ServerWsMessage) -> ServerWsMessage {
  match res {
    Ok(v) => wrap(v),
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Daily { date } =>
      or_error(daily_out(state, date.as_deref()).await, |daily| ServerWsMessage::Daily { daily }),

    ClientWsMessage::Question { date, question_index } =>
      or_error(question_out(state, date.as_deref(), question_index).await, |question| ServerWsMessage::Question { question }),

    ClientWsMessage::Hints { date, question_index } =>
      or_error(hints_out(state, date.as_deref(), question_index).await, |hints| ServerWsMessage::Hints { hints }),

    ClientWsMessage::SubmitAnswer { date, question_index, street_id } =>
      or_error(
        evaluate_answer(state, date.as_deref(), question_index, &street_id).await,
        |answer| ServerWsMessage::AnswerResult { answer },
      ),
  }
}
