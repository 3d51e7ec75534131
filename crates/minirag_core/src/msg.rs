use crate::{IngestionMode, RequestId, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked one of the ingestion mode tabs.
    ModeSelected(IngestionMode),
    /// User edited the ingestion text area.
    IngestTextChanged(String),
    /// User picked a file, or cleared the picker.
    FileSelected(Option<SelectedFile>),
    /// User clicked the index button.
    IngestSubmitted,
    /// Backend answered (or failed to answer) an upload.
    UploadFinished {
        request: RequestId,
        result: Result<UploadReceipt, UploadFailure>,
    },
    /// User edited the query field.
    QueryChanged(String),
    /// Enter pressed in the query field; `modifier` is Shift held.
    EnterPressed { modifier: bool },
    /// User asked the current query field contents.
    AskSubmitted,
    /// Backend answered (or failed to answer) a question.
    AnswerReceived {
        request: RequestId,
        result: Result<QueryAnswer, QueryFailure>,
    },
    /// Auto-clear timer for a status alert fired.
    AlertExpired { generation: u64 },
    /// The session is ending; outstanding work should be abandoned.
    SessionClosed,
}

/// Successful upload as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub chunks: u64,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// Non-success status; `error` is the backend's message when it sent one.
    Rejected { error: Option<String> },
    /// Could not reach the backend or make sense of its reply.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    Status(u16),
    Transport,
}
