//! Confidence scoring for sentences and answers.
//!
//! The backend reports an overall `confidence_score` for the whole answer;
//! that value is displayed as-is wherever it applies. Sentence-level views
//! have no backend equivalent, so they use a local formula: a 0.5 base plus
//! 0.1 per matched entity, saturating at 1.0. More textual corroboration
//! can only raise the score, never lower it.

/// Base confidence for a sentence with no matched entities.
const BASE_CONFIDENCE: f64 = 0.5;

/// Confidence added per matched entity.
const PER_ENTITY_BONUS: f64 = 0.1;

/// Compute a bounded confidence signal.
///
/// When `backend_confidence` is present it wins outright (clamped to
/// `[0, 1]`); otherwise the local per-entity formula applies. The result is
/// always within `[0, 1]` and is monotone non-decreasing in
/// `matched_entity_count`.
pub fn score(matched_entity_count: usize, backend_confidence: Option<f64>) -> f64 {
    match backend_confidence {
        Some(confidence) => confidence.clamp(0.0, 1.0),
        None => sentence_confidence(matched_entity_count),
    }
}

/// The local per-sentence formula: `min(0.5 + 0.1 * n, 1.0)`.
pub fn sentence_confidence(matched_entity_count: usize) -> f64 {
    (BASE_CONFIDENCE + PER_ENTITY_BONUS * matched_entity_count as f64).min(1.0)
}
