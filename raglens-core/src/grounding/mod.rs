//! The evidence grounding engine.
//!
//! A pure, stateless computation layer that links a generated answer to the
//! evidence behind it: per-sentence entity matches, supporting passages,
//! backend citations, and a bounded confidence signal. Everything here is
//! recomputed on demand from the current [`QueryResult`] — no caching, no
//! side effects, no I/O.

pub mod answer;
pub mod linker;
pub mod matcher;
pub mod scorer;
pub mod segmenter;
pub mod sources;

pub use answer::{parse_answer, ParsedAnswer};
pub use linker::{link_evidence, EvidenceLinks};
pub use matcher::{dedup_entities, match_entities};
pub use scorer::{score, sentence_confidence};
pub use segmenter::{segment, Sentence};
pub use sources::{enrich_snippets, EnrichedSnippet, SnippetSentence};

use crate::types::{Entity, QueryResult};

/// The grounding record for one answer sentence.
///
/// `supporting_chunks` always indexes into `QueryResult::snippets`;
/// `cited_chunks` carries the backend's own chunk indices and is
/// authoritative when non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundingResult {
    pub sentence: Sentence,
    /// Entities present in the sentence, de-duplicated by name.
    pub matched_entities: Vec<Entity>,
    pub supporting_chunks: Vec<usize>,
    pub cited_chunks: Vec<usize>,
    /// Local per-sentence confidence in `[0, 1]`.
    pub confidence: f64,
}

impl GroundingResult {
    /// Whether any evidence at all backs this sentence.
    pub fn has_evidence(&self) -> bool {
        !self.matched_entities.is_empty()
            || !self.supporting_chunks.is_empty()
            || !self.cited_chunks.is_empty()
    }
}

/// Ground every sentence of the answer's main body against the result's
/// entities, snippets, and citations.
///
/// Produces exactly one record per segmented sentence, in order — a
/// sentence with no evidence still gets a record (with base confidence).
/// The entity list is de-duplicated by case-insensitive name before
/// matching, so a name never counts twice toward one sentence's score.
pub fn ground_answer(result: &QueryResult) -> Vec<GroundingResult> {
    let parsed = parse_answer(&result.answer);
    let entities = dedup_entities(&result.entities);

    segment(&parsed.main)
        .into_iter()
        .map(|sentence| {
            let matched_entities = match_entities(&sentence.text, &entities);
            let links = link_evidence(&sentence.text, &result.snippets, &result.citations);
            let confidence = sentence_confidence(matched_entities.len());
            GroundingResult {
                sentence,
                matched_entities,
                supporting_chunks: links.supporting_chunks,
                cited_chunks: links.cited_chunks,
                confidence,
            }
        })
        .collect()
}
