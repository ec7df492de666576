//! Entity highlight spans for source passages.
//!
//! Computes the non-overlapping `[start, end)` byte ranges where entity
//! names occur in a passage, so renderers can mark them up without doing
//! any text analysis themselves. Matching is case-insensitive; overlapping
//! occurrences keep the earliest span and drop the rest.

use crate::grounding::dedup_entities;
use crate::types::Entity;

/// A highlighted occurrence of an entity name inside a passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Byte offset of the occurrence start in the passage.
    pub start: usize,
    /// Byte offset one past the occurrence end.
    pub end: usize,
    /// Canonical entity name (as listed, not as it appears in the text).
    pub entity_name: String,
    pub entity_type: String,
}

/// Compute non-overlapping entity highlight spans over `text`, sorted by
/// start offset.
///
/// Entities are de-duplicated by name first; empty names are skipped. When
/// two occurrences overlap, the one starting earlier wins (ties keep the
/// entity listed first).
pub fn highlight_spans(text: &str, entities: &[Entity]) -> Vec<HighlightSpan> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<HighlightSpan> = Vec::new();
    for entity in dedup_entities(entities) {
        let mut from = 0usize;
        while let Some(offset) = find_ci(text, &entity.name, from) {
            let len = ci_match_len(&text[offset..], &entity.name);
            candidates.push(HighlightSpan {
                start: offset,
                end: offset + len,
                entity_name: entity.name.clone(),
                entity_type: entity.entity_type.clone(),
            });
            from = offset + len;
        }
    }

    candidates.sort_by_key(|span| span.start);

    // Drop spans overlapping an already-kept one.
    let mut spans: Vec<HighlightSpan> = Vec::new();
    for candidate in candidates {
        match spans.last() {
            Some(last) if candidate.start < last.end => {}
            _ => spans.push(candidate),
        }
    }
    spans
}

/// Count case-insensitive occurrences of `needle` in `haystack`.
/// Zero when `needle` is empty.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    let mut count = 0;
    let mut from = 0usize;
    while let Some(offset) = find_ci(haystack, needle, from) {
        count += 1;
        from = offset + ci_match_len(&haystack[offset..], needle);
    }
    count
}

/// Case-insensitive substring search starting at byte offset `from`.
/// Returns the byte offset of the first match in `haystack`, comparing
/// characters through their full lowercase expansions.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    let region = &haystack[from..];
    for (offset, _) in region.char_indices() {
        if ci_starts_with(&region[offset..], needle) {
            return Some(from + offset);
        }
    }
    None
}

/// Whether `text` starts with `needle`, ignoring case.
fn ci_starts_with(text: &str, needle: &str) -> bool {
    let mut text_chars = text.chars().flat_map(char::to_lowercase);
    let mut needle_chars = needle.chars().flat_map(char::to_lowercase);
    loop {
        match needle_chars.next() {
            None => return true,
            Some(n) => match text_chars.next() {
                Some(t) if t == n => continue,
                _ => return false,
            },
        }
    }
}

/// Byte length of the prefix of `text` that case-insensitively matches
/// `needle`. `text` must start with such a match.
fn ci_match_len(text: &str, needle: &str) -> usize {
    let needle_folded = needle.chars().flat_map(char::to_lowercase).count();
    let mut folded = 0usize;
    for (offset, c) in text.char_indices() {
        if folded >= needle_folded {
            return offset;
        }
        folded += c.to_lowercase().count();
    }
    text.len()
}
