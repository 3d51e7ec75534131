//! MiniRAG engine: HTTP client for the RAG backend and effect execution.
mod backend;
mod engine;
mod types;

pub use backend::{BackendSettings, RagBackend, ReqwestBackend};
pub use engine::{EngineError, EngineHandle};
pub use types::{
    BackendError, EngineEvent, FailureKind, QueryResponse, RequestToken, UploadResponse,
    UploadSource,
};
