//! Answer section parsing.
//!
//! Generated answers may embed a `Summary:` line and a `Key Points:` block
//! using line-prefix conventions. The grounding breakdown runs over the main
//! body only; summary and key points are rendered as their own sections.

/// An answer split into its line-prefix sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAnswer {
    /// The main answer body, with the summary/key-point lines removed.
    pub main: String,
    /// Text of the `Summary:` section, continuation lines folded in.
    pub summary: String,
    /// Items of the `Key Points:` section (dash-prefixed lines).
    pub key_points: Vec<String>,
}

enum Section {
    Main,
    Summary,
    KeyPoints,
}

/// Parse an answer into main body, summary, and key points.
///
/// Prefix matching is case-insensitive. Inside the summary section,
/// non-empty lines are folded into the summary text; inside the key-points
/// section only dash-prefixed lines become items, anything else is ignored.
pub fn parse_answer(answer: &str) -> ParsedAnswer {
    if answer.is_empty() {
        return ParsedAnswer::default();
    }

    let mut main: Vec<&str> = Vec::new();
    let mut summary = String::new();
    let mut key_points: Vec<String> = Vec::new();
    let mut section = Section::Main;

    for line in answer.lines() {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        if lower.starts_with("summary:") {
            section = Section::Summary;
            // Take the remainder from the original line to keep its casing.
            let after_prefix = trimmed
                .char_indices()
                .nth("summary:".chars().count())
                .map(|(idx, _)| idx)
                .unwrap_or(trimmed.len());
            summary = trimmed[after_prefix..].trim().to_string();
        } else if lower.starts_with("key points:") {
            section = Section::KeyPoints;
        } else {
            match section {
                Section::Main => main.push(line),
                Section::Summary => {
                    if !trimmed.is_empty() {
                        if !summary.is_empty() {
                            summary.push(' ');
                        }
                        summary.push_str(trimmed);
                    }
                }
                Section::KeyPoints => {
                    if let Some(point) = trimmed.strip_prefix('-') {
                        key_points.push(point.trim().to_string());
                    }
                }
            }
        }
    }

    ParsedAnswer {
        main: main.join("\n").trim().to_string(),
        summary,
        key_points,
    }
}
