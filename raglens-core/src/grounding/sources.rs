//! Per-snippet evidence view: the sources panel's derived data.
//!
//! For each retrieved snippet this combines the backend's own claims
//! (citations, chunk references) with the client-side heuristics: which
//! entities appear in the snippet, and which of its sentences the answer
//! appears to have drawn from.

use crate::grounding::linker::lexical_overlap;
use crate::grounding::matcher::match_entities;
use crate::grounding::segmenter::segment;
use crate::types::{Entity, QueryResult};

/// One sentence of a snippet, flagged when the answer appears to use it.
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetSentence {
    pub text: String,
    /// True when some answer sentence lexically overlaps this sentence.
    pub used_in_answer: bool,
    /// Entities present in this sentence.
    pub entities: Vec<Entity>,
}

/// A retrieved snippet enriched with provenance and evidence metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSnippet {
    /// Position in the retrieval ranking; indexes `QueryResult::snippets`.
    pub index: usize,
    pub text: String,
    /// True when a backend citation names this chunk.
    pub cited: bool,
    /// Relevance score from the chunk reference, 0.0 when absent.
    pub relevance_score: f64,
    /// Source filename from the chunk reference, empty when absent.
    pub filename: String,
    /// Entities present anywhere in the snippet.
    pub entities: Vec<Entity>,
    pub sentences: Vec<SnippetSentence>,
}

/// Build the enriched view of every snippet in `result`.
///
/// Missing citations or chunk references degrade to `cited = false` and a
/// zero relevance score; a snippet that does not segment (no terminator)
/// becomes a single whole-snippet sentence.
pub fn enrich_snippets(result: &QueryResult) -> Vec<EnrichedSnippet> {
    let answer_sentences: Vec<String> = segment(&result.answer)
        .into_iter()
        .map(|s| s.text)
        .collect();

    result
        .snippets
        .iter()
        .enumerate()
        .map(|(index, snippet)| {
            let cited = result.citations.iter().any(|c| c.chunk_index == index);
            let reference = result.chunk_references.iter().find(|r| r.index == index);

            let mut sentences: Vec<String> =
                segment(snippet).into_iter().map(|s| s.text).collect();
            if sentences.is_empty() && !snippet.trim().is_empty() {
                sentences.push(snippet.trim().to_string());
            }

            let sentences = sentences
                .into_iter()
                .map(|text| {
                    let used_in_answer = answer_sentences
                        .iter()
                        .any(|answer_sentence| lexical_overlap(&text, answer_sentence));
                    let entities = match_entities(&text, &result.entities);
                    SnippetSentence {
                        text,
                        used_in_answer,
                        entities,
                    }
                })
                .collect();

            EnrichedSnippet {
                index,
                text: snippet.clone(),
                cited,
                relevance_score: reference.map(|r| r.relevance_score).unwrap_or(0.0),
                filename: reference.map(|r| r.filename.clone()).unwrap_or_default(),
                entities: match_entities(snippet, &result.entities),
                sentences,
            }
        })
        .collect()
}
