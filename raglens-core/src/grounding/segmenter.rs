//! Sentence segmentation for answers and source passages.
//!
//! The splitter is deliberately simple: a sentence ends at a run of `.`, `!`
//! or `?` that is followed by whitespace or end of input. Terminators stay
//! attached to the sentence; a decimal point ("2.1M") does not split because
//! the terminator run is followed by a non-space character. Abbreviations are
//! NOT handled: "Mr. Smith" splits after "Mr." — a known limitation of the
//! heuristic, kept so alternate implementations can be swapped in behind this
//! module without changing consumers.

/// A single sentence produced by [`segment`], with its byte offsets into the
/// source text. `text` is whitespace-trimmed and equals `&source[start..end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Characters that terminate a sentence.
fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split `text` into sentences.
///
/// Pure and idempotent: re-segmenting any produced sentence yields exactly
/// that sentence. Empty input yields an empty vec. A trailing fragment with
/// no terminator is not emitted (it is an incomplete sentence, and the
/// passage-level views fall back to the whole passage in that case).
pub fn segment(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    if text.is_empty() {
        return sentences;
    }

    let mut chars = text.char_indices().peekable();
    let mut sentence_start = 0usize;

    while let Some((idx, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }

        // Extend over the full terminator run ("?!", "...").
        let mut run_end = idx + c.len_utf8();
        while let Some(&(next_idx, next_c)) = chars.peek() {
            if is_terminator(next_c) {
                run_end = next_idx + next_c.len_utf8();
                chars.next();
            } else {
                break;
            }
        }

        // A run only closes the sentence when followed by whitespace or EOF.
        let closes = match chars.peek() {
            None => true,
            Some(&(_, next_c)) => next_c.is_whitespace(),
        };
        if !closes {
            continue;
        }

        if let Some(sentence) = trimmed_span(text, sentence_start, run_end) {
            sentences.push(sentence);
        }
        sentence_start = run_end;
    }

    sentences
}

/// Trim the `[start, end)` span of `text` and return it as a [`Sentence`],
/// or `None` when nothing but whitespace remains.
fn trimmed_span(text: &str, start: usize, end: usize) -> Option<Sentence> {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lead = raw.len() - raw.trim_start().len();
    let trimmed_start = start + lead;
    let trimmed_end = trimmed_start + trimmed.len();
    Some(Sentence {
        text: trimmed.to_string(),
        start: trimmed_start,
        end: trimmed_end,
    })
}
