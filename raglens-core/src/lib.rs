//! # RagLens Core
//!
//! Core library for the RagLens explainable-RAG client.
//! Provides the typed data model for the backend's JSON shapes, the
//! evidence grounding engine (sentence segmentation, entity matching,
//! evidence linking, confidence scoring), cross-panel view state, and the
//! backend HTTP client.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod grounding;
pub mod highlight;
pub mod session;
pub mod types;
pub mod view;

// Re-export commonly used types at the crate root.
pub use client::{BackendClient, ExportKind, UploadFile};
pub use config::{load_config, RagLensConfig};
pub use error::{ApiError, ConfigError, RagLensError, Result};
pub use grounding::{ground_answer, GroundingResult};
pub use session::SessionState;
pub use types::{
    ChunkReference, Citation, Entity, GraphData, QueryRequest, QueryResult,
    SessionProcessingStatus, UploadResponse,
};
pub use view::{Tab, ViewState};
