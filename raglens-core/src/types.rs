//! Data-transfer types for the backend's JSON shapes.
//!
//! Every field the backend omits in practice carries `#[serde(default)]`:
//! a missing `entities` or `citations` array deserializes to an empty list
//! rather than failing the whole response. Consumers treat these types as
//! already validated and never re-check presence.

use serde::{Deserialize, Serialize};

/// An entity extracted by the backend from the indexed documents.
///
/// Identity is the `name` compared case-insensitively; there is no unique ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub entity_type: String,
    /// Index of the chunk the entity was first extracted from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_chunk_id: Option<i64>,
}

impl Entity {
    /// Create an entity with a name and type.
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            source_chunk_id: None,
        }
    }
}

/// A backend-asserted link between part of the answer and a source chunk.
///
/// Authoritative when present; the client-side evidence linker is only a
/// fallback heuristic for sentence-level granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub chunk_index: usize,
    #[serde(default)]
    pub chunk_text: String,
    #[serde(default = "default_relevance")]
    pub relevance_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
}

fn default_relevance() -> f64 {
    0.5
}

/// Per-chunk provenance metadata, positionally aligned with `snippets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkReference {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub relevance_score: f64,
}

/// A directed relationship between two named entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub from_entity: String,
    #[serde(default)]
    pub to_entity: String,
    #[serde(default)]
    pub relation: String,
}

/// A node in the knowledge-graph visualization payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// An edge in the knowledge-graph visualization payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub label: String,
}

/// The knowledge graph the backend built for the current query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// An entity mention the backend located inside the generated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEntity {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_chunk_id: Option<i64>,
    #[serde(default = "default_position")]
    pub position_in_answer: i64,
    #[serde(default = "default_relevance")]
    pub retrieval_score: f64,
}

fn default_position() -> i64 {
    -1
}

/// The backend's complete response to one query.
///
/// Replaces the previous result wholesale on each successful submission;
/// nothing here is merged incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub answer_entities: Vec<AnswerEntity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub graph_data: GraphData,
    /// Retrieved passage texts; order is retrieval rank.
    #[serde(default)]
    pub snippets: Vec<String>,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default = "default_relevance")]
    pub confidence_score: f64,
    #[serde(default)]
    pub unsupported_segments: Vec<String>,
    #[serde(default)]
    pub retrieval_scores: Vec<f64>,
    #[serde(default)]
    pub chunk_references: Vec<ChunkReference>,
    #[serde(default)]
    pub status: String,
}

/// Request body for the query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_id: Option<String>,
    pub top_k: usize,
}

impl QueryRequest {
    /// Build a request with the given query text, session and fan-out.
    pub fn new(query: impl Into<String>, index_id: Option<String>, top_k: usize) -> Self {
        Self {
            query: query.into(),
            index_id,
            top_k,
        }
    }
}

/// Response from the upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// Opaque session/index identifier used by every later call.
    #[serde(default)]
    pub index_id: String,
    #[serde(default)]
    pub chunks_count: usize,
}

/// Processing status of a single document in the ingestion pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentProcessingStatus {
    #[serde(default)]
    pub filename: String,
    /// One of `uploaded`, `chunking`, `embedding`, `indexed`.
    #[serde(default)]
    pub status: String,
    /// Progress percentage, 0-100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub chunks_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Overall processing status for an upload session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionProcessingStatus {
    #[serde(default)]
    pub session_id: String,
    /// One of `idle`, `processing`, `completed`, `error`.
    #[serde(default)]
    pub overall_status: String,
    #[serde(default)]
    pub documents: Vec<DocumentProcessingStatus>,
    #[serde(default)]
    pub total_chunks: usize,
    #[serde(default)]
    pub total_entities: usize,
    #[serde(default)]
    pub total_graph_edges: usize,
    #[serde(default)]
    pub current_stage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SessionProcessingStatus {
    /// Whether polling should stop: the session reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.overall_status.as_str(), "completed" | "error")
    }

    /// Whether the session finished successfully.
    pub fn is_completed(&self) -> bool {
        self.overall_status == "completed"
    }
}

/// A server-side export artifact (chunks, entities, graph, or trace).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub content: serde_json::Value,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub format: String,
}

/// Response from the backend health endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_result_defaults_missing_arrays() {
        // The backend omits optional arrays in practice; they must come back empty.
        let json = r#"{"answer": "Paris is the capital of France.", "confidence_score": 0.8}"#;
        let result: QueryResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.answer, "Paris is the capital of France.");
        assert_eq!(result.confidence_score, 0.8);
        assert!(result.entities.is_empty());
        assert!(result.snippets.is_empty());
        assert!(result.citations.is_empty());
        assert!(result.chunk_references.is_empty());
    }

    #[test]
    fn test_query_result_empty_object() {
        let result: QueryResult = serde_json::from_str("{}").unwrap();
        assert_eq!(result.answer, "");
        assert_eq!(result.confidence_score, 0.5);
    }

    #[test]
    fn test_entity_type_field_rename() {
        let json = r#"{"name": "Marie Curie", "type": "PERSON"}"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.name, "Marie Curie");
        assert_eq!(entity.entity_type, "PERSON");
        assert_eq!(entity.source_chunk_id, None);

        let back = serde_json::to_value(&entity).unwrap();
        assert_eq!(back["type"], "PERSON");
    }

    #[test]
    fn test_citation_defaults() {
        let json = r#"{"chunk_index": 2}"#;
        let citation: Citation = serde_json::from_str(json).unwrap();
        assert_eq!(citation.chunk_index, 2);
        assert_eq!(citation.relevance_score, 0.5);
        assert_eq!(citation.matched_text, None);
    }

    #[test]
    fn test_session_status_terminal_states() {
        let mut status = SessionProcessingStatus {
            overall_status: "processing".into(),
            ..Default::default()
        };
        assert!(!status.is_terminal());

        status.overall_status = "completed".into();
        assert!(status.is_terminal());
        assert!(status.is_completed());

        status.overall_status = "error".into();
        assert!(status.is_terminal());
        assert!(!status.is_completed());
    }

    #[test]
    fn test_query_request_omits_missing_index() {
        let request = QueryRequest::new("what is radium?", None, 5);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("index_id").is_none());
        assert_eq!(json["top_k"], 5);
    }
}
