//! One-shot subcommand implementations.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use raglens_core::client::{BackendClient, ExportKind, UploadFile};
use raglens_core::config::RagLensConfig;
use raglens_core::types::{QueryRequest, QueryResult};

use crate::panels::{self, Style};

/// Upload documents, wait for processing, and print the session summary.
///
/// Returns the backend's index id so callers can chain a query.
pub async fn upload(client: &BackendClient, paths: &[PathBuf]) -> anyhow::Result<String> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        files.push(UploadFile { filename, bytes });
    }

    let response = client.upload(files).await?;
    println!("Uploaded {} file(s); session {}", paths.len(), response.index_id);

    let status = client
        .wait_for_completion(&response.index_id, |status| {
            print!(
                "\r  {} ({}%)        ",
                status.current_stage,
                overall_progress(status)
            );
            let _ = std::io::stdout().flush();
        })
        .await?;
    println!(
        "\rProcessed: {} chunks, {} entities, {} graph edges",
        status.total_chunks, status.total_entities, status.total_graph_edges
    );
    Ok(response.index_id)
}

fn overall_progress(status: &raglens_core::types::SessionProcessingStatus) -> u32 {
    if status.documents.is_empty() {
        return 0;
    }
    let total: u32 = status.documents.iter().map(|d| u32::from(d.progress)).sum();
    total / status.documents.len() as u32
}

/// Submit one query and print the answer panel.
pub async fn query(
    client: &BackendClient,
    config: &RagLensConfig,
    text: &str,
    index_id: Option<String>,
    style: Style,
) -> anyhow::Result<QueryResult> {
    let request = QueryRequest::new(text, index_id, config.query.top_k);
    let result = client.query(&request).await?;
    print!("{}", panels::render_answer(&result, config.ui.wrap_width, style));
    Ok(result)
}

/// Print backend health.
pub async fn status(client: &BackendClient) -> anyhow::Result<()> {
    let status = client.status().await?;
    println!("{} — {} (v{})", status.status, status.message, status.version);
    Ok(())
}

/// Fetch a server-side export artifact and write it next to the caller.
pub async fn export(
    client: &BackendClient,
    kind: ExportKind,
    session_id: &str,
    out_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let data = client.export(kind, session_id).await?;
    let filename = if data.filename.is_empty() {
        format!("{kind}-{session_id}.json")
    } else {
        data.filename.clone()
    };
    let path = out_dir.join(filename);
    let body = serde_json::to_string_pretty(&data.content)?;
    tokio::fs::write(&path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(path)
}

/// Save the current answer as a local JSON export.
pub fn export_answer(result: &QueryResult, out_dir: &Path) -> anyhow::Result<PathBuf> {
    let now = chrono::Utc::now();
    let export = raglens_core::export::answer_export(result, now);
    let path = out_dir.join(raglens_core::export::answer_export_filename(now));
    let body = serde_json::to_string_pretty(&export)?;
    std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(path)
}

/// Clear the backend session.
pub async fn clear(client: &BackendClient, index_id: &str) -> anyhow::Result<()> {
    client.clear(index_id).await?;
    println!("Session {index_id} cleared.");
    Ok(())
}
