//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.
//!
//! A question never carries its answer: the client gets the target geometry
//! to draw and the option names to pick from.

use serde::{Deserialize, Serialize};

use crate::domain::{Polyline, StreetRecord};
use crate::engine::SelectionSource;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Daily {
        #[serde(default)]
        date: Option<String>,
    },
    Question {
        #[serde(default)]
        date: Option<String>,
        #[serde(rename = "questionIndex")]
        question_index: usize,
    },
    Hints {
        #[serde(default)]
        date: Option<String>,
        #[serde(rename = "questionIndex")]
        question_index: usize,
    },
    SubmitAnswer {
        #[serde(default)]
        date: Option<String>,
        #[serde(rename = "questionIndex")]
        question_index: usize,
        #[serde(rename = "streetId")]
        street_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Daily {
        daily: DailyOut,
    },
    Question {
        question: QuestionOut,
    },
    Hints {
        hints: HintsOut,
    },
    AnswerResult {
        answer: AnswerOut,
    },
    Error {
        message: String,
    },
}

/// A street as an answer option: name only.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OptionOut {
    pub id: String,
    pub name: String,
}

impl From<&StreetRecord> for OptionOut {
    fn from(s: &StreetRecord) -> Self {
        Self { id: s.id.clone(), name: s.name.clone() }
    }
}

/// A street revealed as a hint: name and geometry to draw.
#[derive(Debug, Clone, Serialize)]
pub struct HintStreetOut {
    pub id: String,
    pub name: String,
    pub geometry: Vec<Polyline>,
}

impl From<&StreetRecord> for HintStreetOut {
    fn from(s: &StreetRecord) -> Self {
        Self { id: s.id.clone(), name: s.name.clone(), geometry: s.geometry.clone() }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOut {
    pub date: String,
    pub seed: i64,
    pub source: SelectionSource,
    pub question_count: usize,
    /// Seconds until the next day's challenge, from the server clock.
    pub next_challenge_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    pub date: Option<String>,
    #[serde(rename = "questionIndex")]
    pub question_index: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub date: String,
    pub question_index: usize,
    pub tier: u8,
    pub geometry: Vec<Polyline>,
    pub options: Vec<OptionOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintsOut {
    pub date: String,
    pub question_index: usize,
    /// Reveal order: show one at a time, front to back.
    pub hints: Vec<HintStreetOut>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub date: Option<String>,
    #[serde(rename = "questionIndex")]
    pub question_index: usize,
    #[serde(rename = "streetId")]
    pub street_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOut {
    pub correct: bool,
    pub correct_id: String,
    pub correct_name: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub streets: usize,
}
