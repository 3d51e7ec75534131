use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Caller-chosen token echoed back on the matching [`EngineEvent`].
pub type RequestToken = u64;

/// Body of an ingestion request. Exactly one form field is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    Text(String),
    File(PathBuf),
}

/// Success body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    pub chunks: u64,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Success body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

impl QueryResponse {
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.answer, self.sources.unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub(crate) query: &'a str,
}

/// Failure body the backend may attach to a non-success status.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        token: RequestToken,
        result: Result<UploadResponse, BackendError>,
    },
    QueryCompleted {
        token: RequestToken,
        result: Result<QueryResponse, BackendError>,
    },
    TimerElapsed {
        token: RequestToken,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Non-success status, with the backend's `error` text when present.
    Rejected { status: u16, error: Option<String> },
    Timeout,
    Network,
    Decode,
    File,
}

impl FailureKind {
    /// Transport and parse failures, as opposed to a structured rejection.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FailureKind::Rejected { .. })
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Rejected {
                status,
                error: Some(error),
            } => write!(f, "http status {status} ({error})"),
            FailureKind::Rejected { status, error: None } => write!(f, "http status {status}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::File => write!(f, "unreadable file"),
        }
    }
}
