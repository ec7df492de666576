//! Evidence linking: which retrieved passages plausibly support a sentence.
//!
//! Two signals, in order of authority:
//!
//! 1. **Citations** — the backend's own claim that a chunk supports part of
//!    the answer. Matching a citation to a sentence is exact substring
//!    containment of the citation's `matched_text`.
//! 2. **Lexical overlap** — a fallback heuristic for sentence-level
//!    granularity when citations are absent: a snippet supports a sentence
//!    when enough of the sentence's long words occur in it.
//!
//! The overlap rule is coarse lexical matching, NOT semantic similarity.
//! Upgrading it to embedding similarity would silently change every support
//! decision; the thresholds below are replaceable policy, so treat them as
//! the policy knobs they are.

/// Minimum character count for a token to count as a content word.
/// Short words ("the", "was", "1919") are ignored as a stop-word proxy.
const MIN_CONTENT_WORD_CHARS: usize = 5;

/// A snippet never needs more than this many overlapping content words.
const MAX_REQUIRED_OVERLAP: f64 = 3.0;

/// Evidence links computed for one sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceLinks {
    /// Snippet indices flagged by the lexical-overlap heuristic.
    pub supporting_chunks: Vec<usize>,
    /// Chunk indices from backend citations whose matched text lines up
    /// with the sentence. Authoritative when non-empty.
    pub cited_chunks: Vec<usize>,
}

/// Link a sentence to its evidence among `snippets` and `citations`.
///
/// Total over its inputs: empty snippet and citation lists produce empty
/// links, never an error. `supporting_chunks` indices always fall in
/// `[0, snippets.len())`.
pub fn link_evidence(
    sentence: &str,
    snippets: &[String],
    citations: &[crate::types::Citation],
) -> EvidenceLinks {
    EvidenceLinks {
        supporting_chunks: supporting_chunks(sentence, snippets),
        cited_chunks: cited_chunks(sentence, citations),
    }
}

/// Chunk indices of citations whose `matched_text` occurs in the sentence
/// (or contains it), compared case-insensitively. Duplicates collapse to
/// the first occurrence, preserving citation order.
fn cited_chunks(sentence: &str, citations: &[crate::types::Citation]) -> Vec<usize> {
    let sentence_lower = sentence.trim().to_lowercase();
    if sentence_lower.is_empty() {
        return Vec::new();
    }

    let mut indices = Vec::new();
    for citation in citations {
        let Some(matched) = citation.matched_text.as_deref() else {
            continue;
        };
        let matched_lower = matched.trim().to_lowercase();
        if matched_lower.is_empty() {
            continue;
        }
        if sentence_lower.contains(&matched_lower) || matched_lower.contains(&sentence_lower) {
            if !indices.contains(&citation.chunk_index) {
                indices.push(citation.chunk_index);
            }
        }
    }
    indices
}

/// Snippet indices flagged as supporting by the lexical-overlap heuristic.
fn supporting_chunks(sentence: &str, snippets: &[String]) -> Vec<usize> {
    let words = content_words(sentence);
    if words.is_empty() {
        // A sentence with no content words has no lexical evidence to offer;
        // flagging every snippet would be noise, not support.
        return Vec::new();
    }

    snippets
        .iter()
        .enumerate()
        .filter(|(_, snippet)| overlaps(&words, snippet))
        .map(|(idx, _)| idx)
        .collect()
}

/// Whether `passage` contains enough of `words` to count as support:
/// at least `min(3, words.len() / 2)` case-insensitive occurrences.
fn overlaps(words: &[String], passage: &str) -> bool {
    let passage_lower = passage.to_lowercase();
    let match_count = words.iter().filter(|w| passage_lower.contains(w.as_str())).count();
    let required = MAX_REQUIRED_OVERLAP.min(words.len() as f64 / 2.0);
    match_count as f64 >= required
}

/// Lowercased content words of a sentence: whitespace-delimited tokens,
/// trimmed of surrounding punctuation, longer than four characters.
fn content_words(sentence: &str) -> Vec<String> {
    sentence
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| token.chars().count() >= MIN_CONTENT_WORD_CHARS)
        .map(|token| token.to_lowercase())
        .collect()
}

/// Whether `source_sentence` lexically overlaps `target` per the same rule
/// used for answer-sentence support. Used in reverse by the sources view to
/// mark snippet sentences the answer drew from.
pub fn lexical_overlap(source_sentence: &str, target: &str) -> bool {
    let words = content_words(source_sentence);
    if words.is_empty() {
        return false;
    }
    overlaps(&words, target)
}
