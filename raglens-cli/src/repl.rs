//! Interactive session: a prompt loop over the panels.
//!
//! Plain text submits a query; slash commands drive navigation. Every
//! transition goes through the core view-state machine, then the active
//! tab's panel is re-rendered. Network failures print one dismissible
//! error line and never disturb the currently displayed result.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use raglens_core::client::{BackendClient, ExportKind};
use raglens_core::config::RagLensConfig;
use raglens_core::grounding::ground_answer;
use raglens_core::session::SessionState;
use raglens_core::types::{Entity, QueryRequest};
use raglens_core::view::Tab;

use crate::commands;
use crate::panels::{self, Style};

const HELP: &str = "\
Commands:
  <text>                submit a query
  /upload <files...>    upload and index documents
  /tab <name>           switch panel (answer|sources|entities|graph|pipeline|export)
  /entity <name>        focus the graph on an entity
  /sources <name>       jump to the best source for an entity
  /inspect <n>          inspect evidence for answer sentence n
  /history              list past queries
  /export <kind>        answer | chunks | entities | graph | trace
  /pipeline [info]      refresh pipeline metrics (or show stage descriptions)
  /clear                clear the backend session and local state
  /help                 this text
  /quit                 exit";

/// Run the interactive loop until `/quit` or EOF.
pub async fn run_interactive(config: RagLensConfig) -> anyhow::Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let style = Style::new(config.ui.color);
    let mut session = SessionState::new();

    println!("RagLens — explainable RAG client ({})", client.base_url());
    println!("Type /help for commands.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("raglens> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match handle_input(input, &client, &config, &mut session, style).await {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Quit) => break,
            // Transient failure: one error line, prior state stays visible.
            Err(err) => println!("{}", style.error(&format!("error: {err:#}"))),
        }
    }

    Ok(())
}

enum Outcome {
    Continue,
    Quit,
}

async fn handle_input(
    input: &str,
    client: &BackendClient,
    config: &RagLensConfig,
    session: &mut SessionState,
    style: Style,
) -> anyhow::Result<Outcome> {
    let (command, rest) = match input.strip_prefix('/') {
        Some(stripped) => match stripped.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (stripped, ""),
        },
        None => ("query", input),
    };

    match command {
        "query" => submit_query(rest, client, config, session).await?,
        "upload" => upload(rest, client, session).await?,
        "tab" => change_tab(rest, session)?,
        "entity" => focus_entity(rest, session),
        "sources" => sources_for_entity(rest, session),
        "inspect" => {
            inspect_sentence(rest, session, config, style);
            return Ok(Outcome::Continue);
        }
        "history" => {
            print!("{}", panels::render_history(session, style));
            return Ok(Outcome::Continue);
        }
        "export" => {
            export(rest, client, session).await?;
            return Ok(Outcome::Continue);
        }
        "pipeline" => refresh_pipeline(rest, client, session).await?,
        "clear" => clear(client, session).await?,
        "help" => {
            println!("{HELP}");
            return Ok(Outcome::Continue);
        }
        "quit" | "exit" => return Ok(Outcome::Quit),
        other => {
            println!("{}", style.error(&format!("unknown command: /{other}")));
            return Ok(Outcome::Continue);
        }
    }

    print!("{}", panels::render_active_tab(session, config.ui.wrap_width, style));
    Ok(Outcome::Continue)
}

async fn submit_query(
    text: &str,
    client: &BackendClient,
    config: &RagLensConfig,
    session: &mut SessionState,
) -> anyhow::Result<()> {
    if text.is_empty() {
        anyhow::bail!("empty query");
    }
    if session.index_id().is_none() {
        println!("note: no documents uploaded yet; querying without an index");
    }
    let request = QueryRequest::new(
        text,
        session.index_id().map(String::from),
        config.query.top_k,
    );
    let result = client.query(&request).await?;
    session.set_result(result);
    Ok(())
}

async fn upload(
    rest: &str,
    client: &BackendClient,
    session: &mut SessionState,
) -> anyhow::Result<()> {
    let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: /upload <files...>");
    }
    let index_id = commands::upload(client, &paths).await?;
    session.set_index_id(&index_id);
    if let Ok(status) = client.upload_status(&index_id).await {
        session.set_processing(status);
    }
    session.view.change_tab(Tab::Upload);
    Ok(())
}

fn change_tab(rest: &str, session: &mut SessionState) -> anyhow::Result<()> {
    let tab: Tab = rest.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    session.view.change_tab(tab);
    Ok(())
}

fn focus_entity(name: &str, session: &mut SessionState) {
    let entities = session
        .result()
        .map(|r| r.entities.clone())
        .unwrap_or_default();
    let before = session.view.clone();
    session.view.navigate_to_entity_by_name(name, &entities);
    if session.view == before {
        // Unknown entity: a silent no-op at the state level; the prompt
        // still deserves a hint.
        println!("no entity named '{name}' in the current result");
    }
}

fn sources_for_entity(name: &str, session: &mut SessionState) {
    let snippets = session
        .result()
        .map(|r| r.snippets.clone())
        .unwrap_or_default();
    session
        .view
        .show_sources_for_entity(&Entity::new(name, ""), &snippets);
}

/// Print the evidence detail for one answer sentence (1-based).
fn inspect_sentence(rest: &str, session: &SessionState, config: &RagLensConfig, style: Style) {
    let Some(result) = session.result() else {
        println!("no answer to inspect");
        return;
    };
    let grounded = ground_answer(result);
    let index = rest.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
    let Some(record) = index.and_then(|i| grounded.get(i)) else {
        println!("usage: /inspect <1..{}>", grounded.len());
        return;
    };

    println!("{}", style.bold(&record.sentence.text));
    if record.matched_entities.is_empty() {
        println!("  entities: none");
    } else {
        let names: Vec<String> = record
            .matched_entities
            .iter()
            .map(|e| format!("{} ({})", e.name, e.entity_type))
            .collect();
        println!("  entities: {}", names.join(", "));
    }
    println!("  confidence: {:.2}", record.confidence);

    let chunks: &[usize] = if record.cited_chunks.is_empty() {
        &record.supporting_chunks
    } else {
        &record.cited_chunks
    };
    let label = if record.cited_chunks.is_empty() { "support" } else { "cited" };
    if chunks.is_empty() {
        println!("  sources: no direct match found");
        return;
    }
    for &idx in chunks {
        if let Some(snippet) = result.snippets.get(idx) {
            let preview = textwrap::fill(snippet, config.ui.wrap_width.saturating_sub(8).max(20));
            let first_line = preview.lines().next().unwrap_or("");
            println!("  {label} #{}: {first_line}…", idx + 1);
        }
    }
}

async fn export(
    rest: &str,
    client: &BackendClient,
    session: &mut SessionState,
) -> anyhow::Result<()> {
    let out_dir = std::env::current_dir()?;
    if rest.eq_ignore_ascii_case("answer") || rest.is_empty() {
        let Some(result) = session.result() else {
            anyhow::bail!("no answer to export");
        };
        commands::export_answer(result, &out_dir)?;
        return Ok(());
    }

    let kind: ExportKind = rest.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let Some(index_id) = session.index_id().map(String::from) else {
        anyhow::bail!("no session to export from; upload documents first");
    };
    commands::export(client, kind, &index_id, &out_dir).await?;
    Ok(())
}

async fn refresh_pipeline(
    rest: &str,
    client: &BackendClient,
    session: &mut SessionState,
) -> anyhow::Result<()> {
    if rest.eq_ignore_ascii_case("info") {
        let info = client.pipeline_info().await?;
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        let Some(index_id) = session.index_id().map(String::from) else {
            anyhow::bail!("no session; upload documents first");
        };
        if let Ok(status) = client.upload_status(&index_id).await {
            session.set_processing(status);
        }
        match client.pipeline_visualization(&index_id).await {
            Ok(metrics) => println!("{}", serde_json::to_string_pretty(&metrics)?),
            // Older backends do not expose stage metrics; the ingestion
            // panel still renders from the status snapshot.
            Err(err) => tracing::debug!(%err, "pipeline visualization unavailable"),
        }
    }
    session.view.change_tab(Tab::Pipeline);
    Ok(())
}

async fn clear(client: &BackendClient, session: &mut SessionState) -> anyhow::Result<()> {
    if let Some(index_id) = session.index_id().map(String::from) {
        commands::clear(client, &index_id).await?;
    }
    session.reset();
    Ok(())
}
