//! Configuration system for RagLens.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment. Configuration is loaded from
//! `~/.config/raglens/config.toml` and/or `.raglens/config.toml` in the
//! workspace directory; environment variables use the `RAGLENS_` prefix with
//! `__` as the section separator (`RAGLENS_BACKEND__BASE_URL`, ...).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for the RagLens client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagLensConfig {
    pub backend: BackendConfig,
    pub query: QueryConfig,
    pub ui: UiConfig,
}

/// Where the backend lives and how patient the client is with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Origin of the RAG backend.
    pub base_url: String,
    /// Timeout for the upload request itself (the processing that follows
    /// is tracked by polling, not by this request).
    pub upload_timeout_secs: u64,
    /// Timeout for query submission; the backend may run retrieval and
    /// generation synchronously, so this is generous.
    pub query_timeout_secs: u64,
    /// Interval between upload-status polls.
    pub poll_interval_ms: u64,
    /// Overall deadline for upload processing to reach a terminal state.
    pub poll_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            upload_timeout_secs: 30,
            query_timeout_secs: 120,
            poll_interval_ms: 1000,
            poll_timeout_secs: 300,
        }
    }
}

/// Query submission defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// How many chunks the backend should retrieve per query.
    pub top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Whether panels use ANSI colors.
    pub color: bool,
    /// Wrap width for panel text.
    pub wrap_width: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: true,
            wrap_width: 100,
        }
    }
}

/// Load configuration with full layering.
///
/// Layers, later wins: built-in defaults, the user-level config file, the
/// workspace-level config file, `RAGLENS_*` environment variables, then
/// explicit overrides.
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&RagLensConfig>,
) -> Result<RagLensConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(RagLensConfig::default()));

    // User-level config
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "raglens", "raglens") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".raglens").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Environment variables (RAGLENS_BACKEND__BASE_URL, RAGLENS_QUERY__TOP_K, ...)
    figment = figment.merge(Env::prefixed("RAGLENS_").split("__"));

    // Explicit overrides
    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Check whether any RagLens configuration file exists (user-level or
/// workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(config_dir) = directories::ProjectDirs::from("dev", "raglens", "raglens") {
        if config_dir.config_dir().join("config.toml").exists() {
            return true;
        }
    }

    if let Some(ws) = workspace {
        if ws.join(".raglens").join("config.toml").exists() {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_values() {
        let config = RagLensConfig::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.backend.upload_timeout_secs, 30);
        assert_eq!(config.backend.query_timeout_secs, 120);
        assert_eq!(config.backend.poll_interval_ms, 1000);
        assert_eq!(config.query.top_k, 5);
        assert!(config.ui.color);
    }

    #[test]
    fn test_toml_layer_overrides_defaults() {
        let toml = r#"
            [backend]
            base_url = "http://rag.internal:9000"

            [query]
            top_k = 10
        "#;
        let config: RagLensConfig = Figment::from(Serialized::defaults(RagLensConfig::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap();
        assert_eq!(config.backend.base_url, "http://rag.internal:9000");
        assert_eq!(config.query.top_k, 10);
        // Untouched sections keep defaults.
        assert_eq!(config.backend.query_timeout_secs, 120);
        assert_eq!(config.ui.wrap_width, 100);
    }

    #[test]
    fn test_workspace_config_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".raglens");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[backend]\nbase_url = \"http://localhost:4242\"\n",
        )
        .unwrap();

        assert!(config_exists(Some(dir.path())));
        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:4242");
    }

    #[test]
    fn test_explicit_overrides_win() {
        let overrides = RagLensConfig {
            query: QueryConfig { top_k: 3 },
            ..Default::default()
        };
        let config = load_config(None, Some(&overrides)).unwrap();
        assert_eq!(config.query.top_k, 3);
    }
}
