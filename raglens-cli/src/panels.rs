//! Text renderers for the result panels.
//!
//! Every renderer is a pure function from session data to a `String`, so
//! panel output is testable without a terminal. Color is applied per line
//! after wrapping, which keeps wrap widths honest.

use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use raglens_core::grounding::{
    enrich_snippets, ground_answer, parse_answer, GroundingResult,
};
use raglens_core::highlight::highlight_spans;
use raglens_core::session::SessionState;
use raglens_core::types::{Entity, QueryResult};
use raglens_core::view::Tab;

/// Styling switchboard: no-ops when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
}

impl Style {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn bold(&self, s: &str) -> String {
        if self.color { s.bold().to_string() } else { s.to_string() }
    }

    fn dim(&self, s: &str) -> String {
        if self.color { s.dark_grey().to_string() } else { s.to_string() }
    }

    fn accent(&self, s: &str) -> String {
        if self.color { s.cyan().to_string() } else { s.to_string() }
    }

    fn entity(&self, s: &str) -> String {
        if self.color { s.magenta().to_string() } else { format!("[{s}]") }
    }

    fn good(&self, s: &str) -> String {
        if self.color { s.green().to_string() } else { s.to_string() }
    }

    fn warn_color(&self, s: &str) -> String {
        if self.color { s.yellow().to_string() } else { s.to_string() }
    }

    pub fn error(&self, s: &str) -> String {
        if self.color { s.red().to_string() } else { s.to_string() }
    }
}

/// Render the panel for the session's active tab.
pub fn render_active_tab(session: &SessionState, width: usize, style: Style) -> String {
    match session.view.tab {
        Tab::Upload => render_upload(session, style),
        Tab::Answer => match session.result() {
            Some(result) => render_answer(result, width, style),
            None => empty_panel("No answer yet. Upload documents and submit a query.", style),
        },
        Tab::Sources => match session.result() {
            Some(result) => {
                render_sources(result, session.view.highlighted_source, width, style)
            }
            None => empty_panel("No sources yet.", style),
        },
        Tab::Entities => match session.result() {
            Some(result) => render_entities(result, style),
            None => empty_panel("No entities yet.", style),
        },
        Tab::Graph => match session.result() {
            Some(result) => render_graph(result, session.view.focused_entity.as_ref(), style),
            None => empty_panel("No graph yet.", style),
        },
        Tab::Pipeline => render_pipeline(session, style),
        Tab::Export => render_export_help(style),
    }
}

fn empty_panel(message: &str, style: Style) -> String {
    format!("{}\n", style.dim(message))
}

fn render_upload(session: &SessionState, style: Style) -> String {
    let mut out = String::new();
    match session.processing() {
        Some(status) => {
            out.push_str(&format!(
                "{} {}\n",
                style.bold("Session:"),
                status.session_id
            ));
            out.push_str(&format!(
                "{} {} ({})\n",
                style.bold("Status:"),
                status.overall_status,
                status.current_stage
            ));
            for doc in &status.documents {
                let line = format!(
                    "  {} [{}] {}% ({} chunks)",
                    doc.filename, doc.status, doc.progress, doc.chunks_count
                );
                out.push_str(&line);
                if let Some(err) = &doc.error {
                    out.push_str(&format!(" {}", style.error(err)));
                }
                out.push('\n');
            }
            out.push_str(&style.dim(&format!(
                "chunks: {} | entities: {} | graph edges: {}\n",
                status.total_chunks, status.total_entities, status.total_graph_edges
            )));
        }
        None => out.push_str(&style.dim("No documents uploaded yet. Use /upload <files>.\n")),
    }
    out
}

/// The answer panel: overall confidence, summary, key points, then the
/// per-sentence grounding breakdown.
pub fn render_answer(result: &QueryResult, width: usize, style: Style) -> String {
    let parsed = parse_answer(&result.answer);
    let grounded = ground_answer(result);
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} {}\n",
        style.bold("Confidence:"),
        confidence_bar(result.confidence_score, 10),
        format_percent(result.confidence_score)
    ));
    out.push_str(&style.dim(&format!(
        "{} entities | {} sources | {} citations\n\n",
        result.entities.len(),
        result.snippets.len(),
        result.citations.len()
    )));

    if !parsed.summary.is_empty() {
        out.push_str(&format!("{}\n", style.bold("Summary")));
        push_wrapped(&mut out, &parsed.summary, width, "  ");
        out.push('\n');
    }

    if !parsed.key_points.is_empty() {
        out.push_str(&format!("{}\n", style.bold("Key Points")));
        for point in &parsed.key_points {
            push_wrapped(&mut out, point, width.saturating_sub(4), "  - ");
        }
        out.push('\n');
    }

    if grounded.is_empty() {
        // The answer did not segment; show it whole.
        push_wrapped(&mut out, &parsed.main, width, "");
        return out;
    }

    out.push_str(&format!("{}\n", style.bold("Answer")));
    for (idx, record) in grounded.iter().enumerate() {
        out.push_str(&format!("{:>3}. ", idx + 1));
        let body_width = width.saturating_sub(5);
        let wrapped = textwrap::fill(&record.sentence.text, body_width.max(20));
        let mut lines = wrapped.lines();
        if let Some(first) = lines.next() {
            out.push_str(first);
            out.push('\n');
        }
        for line in lines {
            out.push_str("     ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("     ");
        out.push_str(&grounding_summary_line(record, style));
        out.push('\n');
    }
    out
}

/// One dim line summarizing a sentence's evidence.
fn grounding_summary_line(record: &GroundingResult, style: Style) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !record.matched_entities.is_empty() {
        let names: Vec<String> = record
            .matched_entities
            .iter()
            .map(|e| style.entity(&e.name))
            .collect();
        parts.push(names.join(", "));
    }
    if !record.cited_chunks.is_empty() {
        let refs: Vec<String> =
            record.cited_chunks.iter().map(|i| format!("#{}", i + 1)).collect();
        parts.push(style.good(&format!("cited {}", refs.join(" "))));
    } else if !record.supporting_chunks.is_empty() {
        let refs: Vec<String> =
            record.supporting_chunks.iter().map(|i| format!("#{}", i + 1)).collect();
        parts.push(format!("support {}", refs.join(" ")));
    }
    if parts.is_empty() {
        parts.push(style.warn_color("no evidence"));
    }
    parts.push(style.dim(&format!("confidence {:.2}", record.confidence)));
    parts.join(&style.dim(" | "))
}

/// The sources panel: every snippet with provenance, citation badge,
/// entity highlights, and answer-overlap markers.
pub fn render_sources(
    result: &QueryResult,
    highlighted: Option<usize>,
    width: usize,
    style: Style,
) -> String {
    let enriched = enrich_snippets(result);
    if enriched.is_empty() {
        return empty_panel("No sources were retrieved for this query.", style);
    }

    let mut out = String::new();
    for snippet in &enriched {
        let mut header = format!("Source {}", snippet.index + 1);
        if !snippet.filename.is_empty() {
            header.push_str(&format!(" — {}", snippet.filename));
        }
        if snippet.relevance_score > 0.0 {
            header.push_str(&format!(" (relevance {:.2})", snippet.relevance_score));
        }
        let mut line = style.bold(&header);
        if snippet.cited {
            line.push(' ');
            line.push_str(&style.good("[cited]"));
        }
        if highlighted == Some(snippet.index) {
            line.push(' ');
            line.push_str(&style.accent("<- highlighted"));
        }
        out.push_str(&line);
        out.push('\n');

        for sentence in &snippet.sentences {
            let marker = if sentence.used_in_answer {
                style.good("| ")
            } else {
                style.dim("  ")
            };
            let wrapped = textwrap::fill(&sentence.text, width.saturating_sub(4).max(20));
            for wrapped_line in wrapped.lines() {
                out.push_str("  ");
                out.push_str(&marker);
                out.push_str(&highlight_line(wrapped_line, &result.entities, style));
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}

/// Apply entity styling to one already-wrapped line.
fn highlight_line(line: &str, entities: &[Entity], style: Style) -> String {
    let spans = highlight_spans(line, entities);
    if spans.is_empty() {
        return line.to_string();
    }
    let mut out = String::new();
    let mut cursor = 0usize;
    for span in spans {
        out.push_str(&line[cursor..span.start]);
        out.push_str(&style.entity(&line[span.start..span.end]));
        cursor = span.end;
    }
    out.push_str(&line[cursor..]);
    out
}

/// The entities panel: de-duplicated, grouped by type.
pub fn render_entities(result: &QueryResult, style: Style) -> String {
    let entities = raglens_core::grounding::dedup_entities(&result.entities);
    if entities.is_empty() {
        return empty_panel("No entities were extracted.", style);
    }

    // Group by type, preserving first-seen type order.
    let mut groups: Vec<(String, Vec<&Entity>)> = Vec::new();
    for entity in &entities {
        let type_label = if entity.entity_type.is_empty() {
            "UNTYPED".to_string()
        } else {
            entity.entity_type.clone()
        };
        match groups.iter_mut().find(|(label, _)| *label == type_label) {
            Some((_, members)) => members.push(entity),
            None => groups.push((type_label, vec![entity])),
        }
    }

    let mut out = String::new();
    out.push_str(&style.dim(&format!("{} unique entities\n", entities.len())));
    for (label, members) in groups {
        let names: Vec<String> = members.iter().map(|e| style.entity(&e.name)).collect();
        out.push_str(&format!(
            "{} ({}): {}\n",
            style.bold(&label),
            members.len(),
            names.join(", ")
        ));
    }
    out
}

/// The graph panel: node/edge counts and an adjacency listing, with the
/// focused entity's edges surfaced first.
pub fn render_graph(result: &QueryResult, focused: Option<&Entity>, style: Style) -> String {
    let graph = &result.graph_data;
    if graph.nodes.is_empty() && result.relationships.is_empty() {
        return empty_panel("No graph was built for this query.", style);
    }

    let mut out = String::new();
    out.push_str(&style.dim(&format!(
        "{} nodes | {} edges\n",
        graph.nodes.len(),
        graph.edges.len()
    )));
    if let Some(entity) = focused {
        out.push_str(&format!("{} {}\n", style.bold("Focused:"), style.entity(&entity.name)));
    }

    let focus_name = focused.map(|e| e.name.to_lowercase());
    let involves_focus = |a: &str, b: &str| {
        focus_name
            .as_deref()
            .map(|name| a.to_lowercase() == name || b.to_lowercase() == name)
            .unwrap_or(false)
    };

    let mut edges: Vec<(bool, String)> = Vec::new();
    for rel in &result.relationships {
        let line = format!("{} -[{}]-> {}", rel.from_entity, rel.relation, rel.to_entity);
        edges.push((involves_focus(&rel.from_entity, &rel.to_entity), line));
    }
    if result.relationships.is_empty() {
        for edge in &graph.edges {
            let line = format!("{} -[{}]-> {}", edge.source, edge.label, edge.target);
            edges.push((involves_focus(&edge.source, &edge.target), line));
        }
    }

    // Focused edges first, otherwise stable.
    edges.sort_by_key(|(focused_edge, _)| !*focused_edge);
    for (focused_edge, line) in edges {
        if focused_edge {
            out.push_str(&format!("  {}\n", style.accent(&line)));
        } else {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out
}

/// The pipeline panel: ingestion totals plus any fetched stage metrics.
pub fn render_pipeline(session: &SessionState, style: Style) -> String {
    let mut out = String::new();
    match session.processing() {
        Some(status) => {
            out.push_str(&format!("{}\n", style.bold("Ingestion")));
            out.push_str(&format!(
                "  status: {} | stage: {}\n",
                status.overall_status, status.current_stage
            ));
            out.push_str(&format!(
                "  chunks: {} | entities: {} | graph edges: {}\n",
                status.total_chunks, status.total_entities, status.total_graph_edges
            ));
            for doc in &status.documents {
                out.push_str(&format!(
                    "  {} [{}] {}%\n",
                    doc.filename, doc.status, doc.progress
                ));
            }
        }
        None => out.push_str(&style.dim("No pipeline data. Upload documents first.\n")),
    }
    out
}

fn render_export_help(style: Style) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style.bold("Export")));
    out.push_str("  /export answer           save the current answer as JSON\n");
    out.push_str("  /export chunks|entities|graph|trace\n");
    out.push_str(&style.dim("  server-side artifacts are written to the current directory\n"));
    out
}

/// Render the query history, most recent first.
pub fn render_history(session: &SessionState, style: Style) -> String {
    if session.history().is_empty() {
        return empty_panel("No queries yet.", style);
    }
    let mut out = String::new();
    for (idx, entry) in session.history().iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {} {}\n",
            idx + 1,
            entry.query,
            style.dim(&format!(
                "({}, confidence {})",
                entry.timestamp.format("%H:%M:%S"),
                format_percent(entry.result.confidence_score)
            ))
        ));
    }
    out
}

/// A ten-cell confidence meter like `[########--]`.
pub fn confidence_bar(confidence: f64, cells: usize) -> String {
    let clamped = confidence.clamp(0.0, 1.0);
    let filled = (clamped * cells as f64).round() as usize;
    let mut bar = String::with_capacity(cells + 2);
    bar.push('[');
    for i in 0..cells {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push(']');
    bar
}

fn format_percent(confidence: f64) -> String {
    format!("{}%", (confidence.clamp(0.0, 1.0) * 100.0).round() as u32)
}

fn push_wrapped(out: &mut String, text: &str, width: usize, prefix: &str) {
    let wrapped = textwrap::fill(text, width.max(20));
    let continuation = " ".repeat(prefix.width());
    for (idx, line) in wrapped.lines().enumerate() {
        out.push_str(if idx == 0 { prefix } else { &continuation });
        out.push_str(line);
        out.push('\n');
    }
}
