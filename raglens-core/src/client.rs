//! HTTP client for the RAG backend.
//!
//! A thin typed wrapper over the backend's REST surface: document upload,
//! upload-status polling, query submission, artifact export, pipeline
//! metrics, and session clearing. Everything else in this crate works on
//! the in-memory [`QueryResult`] this client produces.
//!
//! Timeouts are per-operation: uploads acknowledge quickly (~30s) while
//! queries may run retrieval and generation synchronously (~120s). Upload
//! processing is tracked by polling `/upload-status/{id}` until a terminal
//! state; a 404 there means the session is not registered yet and is
//! retried silently until the poll deadline.

use std::time::Duration;

use reqwest::multipart;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::BackendConfig;
use crate::error::{ApiError, ConfigError};
use crate::types::{
    ExportData, QueryRequest, QueryResult, SessionProcessingStatus, StatusResponse, UploadResponse,
};

/// A file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Server-side export artifact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Chunks,
    Entities,
    Graph,
    Trace,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportKind::Chunks => "chunks",
            ExportKind::Entities => "entities",
            ExportKind::Graph => "graph",
            ExportKind::Trace => "trace",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chunks" => Ok(ExportKind::Chunks),
            "entities" => Ok(ExportKind::Entities),
            "graph" => Ok(ExportKind::Graph),
            "trace" => Ok(ExportKind::Trace),
            other => Err(format!("unknown export kind: {other}")),
        }
    }
}

/// Typed client for one backend origin.
pub struct BackendClient {
    http: Client,
    base_url: Url,
    upload_timeout: Duration,
    query_timeout: Duration,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl BackendClient {
    /// Create a client from backend configuration.
    ///
    /// Fails only when the configured base URL does not parse.
    pub fn new(config: &BackendConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            http: Client::new(),
            base_url,
            upload_timeout: Duration::from_secs(config.upload_timeout_secs),
            query_timeout: Duration::from_secs(config.query_timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
        })
    }

    /// The backend origin this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Url {
        // Base URLs are origins; a join failure would mean a path segment
        // with illegal characters, which all call sites avoid by construction.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// `GET /status` — backend health check.
    pub async fn status(&self) -> Result<StatusResponse, ApiError> {
        let response = self
            .http
            .get(self.endpoint("status"))
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.query_timeout))?;
        decode(check(response, "status").await?).await
    }

    /// `POST /upload` — submit documents as a multipart request.
    ///
    /// Returns quickly with the opaque `index_id`; actual processing is
    /// asynchronous on the backend and observed via
    /// [`wait_for_completion`](Self::wait_for_completion).
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse, ApiError> {
        let mut form = multipart::Form::new();
        for file in files {
            debug!(filename = %file.filename, bytes = file.bytes.len(), "attaching upload file");
            let part = multipart::Part::bytes(file.bytes).file_name(file.filename);
            form = form.part("files", part);
        }

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.upload_timeout))?;
        decode(check(response, "upload").await?).await
    }

    /// `GET /upload-status/{session_id}` — one ingestion status snapshot.
    pub async fn upload_status(
        &self,
        session_id: &str,
    ) -> Result<SessionProcessingStatus, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("upload-status/{session_id}")))
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.upload_timeout))?;
        decode(check(response, "upload session").await?).await
    }

    /// Poll upload status until a terminal state or the poll deadline.
    ///
    /// `on_status` observes every non-terminal snapshot (for progress
    /// display). Transient 404s — the session not registered yet — are
    /// retried silently; reaching the deadline escalates to
    /// [`ApiError::PollTimeout`]; a terminal `error` status becomes
    /// [`ApiError::Processing`].
    pub async fn wait_for_completion(
        &self,
        session_id: &str,
        mut on_status: impl FnMut(&SessionProcessingStatus),
    ) -> Result<SessionProcessingStatus, ApiError> {
        let deadline = tokio::time::Instant::now() + self.poll_timeout;

        loop {
            match self.upload_status(session_id).await {
                Ok(status) if status.is_completed() => return Ok(status),
                Ok(status) if status.is_terminal() => {
                    return Err(ApiError::Processing {
                        detail: status
                            .error_message
                            .unwrap_or_else(|| "backend reported an error".to_string()),
                    });
                }
                Ok(status) => {
                    debug!(
                        stage = %status.current_stage,
                        overall = %status.overall_status,
                        "upload still processing"
                    );
                    on_status(&status);
                }
                Err(ApiError::NotFound { .. }) => {
                    debug!(session_id, "upload session not registered yet, retrying");
                }
                Err(other) => return Err(other),
            }

            if tokio::time::Instant::now() + self.poll_interval > deadline {
                return Err(ApiError::PollTimeout {
                    timeout_secs: self.poll_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// `POST /query-enhanced` — submit a query and decode the full result.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResult, ApiError> {
        debug!(query = %request.query, top_k = request.top_k, "submitting query");
        let response = self
            .http
            .post(self.endpoint("query-enhanced"))
            .json(request)
            .timeout(self.query_timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.query_timeout))?;
        decode(check(response, "query").await?).await
    }

    /// `POST /export/{kind}/{session_id}` — fetch a server-side artifact.
    pub async fn export(
        &self,
        kind: ExportKind,
        session_id: &str,
    ) -> Result<ExportData, ApiError> {
        let response = self
            .http
            .post(self.endpoint(&format!("export/{kind}/{session_id}")))
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.query_timeout))?;
        decode(check(response, "export").await?).await
    }

    /// `GET /pipeline-visualization/{session_id}` — stage metrics for the
    /// pipeline view. The shape varies with backend version, so this stays
    /// loosely typed.
    pub async fn pipeline_visualization(
        &self,
        session_id: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("pipeline-visualization/{session_id}")))
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.query_timeout))?;
        decode(check(response, "pipeline visualization").await?).await
    }

    /// `GET /pipeline-info` — static pipeline stage descriptions.
    pub async fn pipeline_info(&self) -> Result<serde_json::Value, ApiError> {
        let response = self
            .http
            .get(self.endpoint("pipeline-info"))
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.query_timeout))?;
        decode(check(response, "pipeline info").await?).await
    }

    /// `POST /clear?index_id=...` — discard the backend session.
    pub async fn clear(&self, index_id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.endpoint("clear"))
            .query(&[("index_id", index_id)])
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.upload_timeout))?;
        check(response, "session").await?;
        Ok(())
    }
}

/// Map reqwest transport failures onto the API error taxonomy.
fn map_transport_error(err: reqwest::Error, timeout: Duration) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    } else if err.is_connect() {
        ApiError::Connection {
            message: err.to_string(),
        }
    } else {
        ApiError::RequestFailed {
            message: err.to_string(),
        }
    }
}

/// Convert non-success statuses into typed errors, extracting the backend's
/// `{"detail": ...}` message when present.
async fn check(response: Response, resource: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound {
            resource: resource.to_string(),
        });
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or(body);
    warn!(status = status.as_u16(), %detail, "backend returned an error");
    Err(ApiError::Backend {
        status: status.as_u16(),
        detail,
    })
}

/// Decode a JSON body, mapping failures to `ResponseParse`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError::ResponseParse {
        message: e.to_string(),
    })
}
