//! Local answer export.
//!
//! Server-side exports (chunks/entities/graph/trace) come from
//! [`crate::client::BackendClient::export`]; this module assembles the
//! client-side JSON export of the current answer with its evidence, the
//! shape a user saves to disk after a query.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::grounding::parse_answer;
use crate::types::{Entity, QueryResult};

/// The saved-answer JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerExport {
    pub query: String,
    pub answer: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub entities: Vec<Entity>,
    pub sources: Vec<String>,
    pub confidence: f64,
    pub exported_at: DateTime<Utc>,
}

/// Assemble the export document for `result`.
pub fn answer_export(result: &QueryResult, exported_at: DateTime<Utc>) -> AnswerExport {
    let parsed = parse_answer(&result.answer);
    AnswerExport {
        query: result.query.clone(),
        answer: result.answer.clone(),
        summary: parsed.summary,
        key_points: parsed.key_points,
        entities: result.entities.clone(),
        sources: result.snippets.clone(),
        confidence: result.confidence_score.clamp(0.0, 1.0),
        exported_at,
    }
}

/// Default filename for a saved answer.
pub fn answer_export_filename(exported_at: DateTime<Utc>) -> String {
    format!("answer-{}.json", exported_at.format("%Y%m%dT%H%M%S"))
}
