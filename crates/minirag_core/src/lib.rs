//! MiniRAG core: pure state machine and view-model helpers for the
//! ingestion panel and the chat transcript.
mod alert;
mod autogrow;
mod citation;
mod config;
mod effect;
mod ingest;
mod msg;
mod state;
mod transcript;
mod update;
mod view_model;

pub use alert::{Alert, AlertKind, AlertNotifier};
pub use autogrow::InputAutoGrow;
pub use citation::Citation;
pub use config::{ChatConfig, ALERT_CLEAR_DELAY, CITATION_PREVIEW_CHARS};
pub use effect::Effect;
pub use ingest::{
    IngestValidation, IngestionForm, IngestionMode, IngestionPayload, SelectedFile,
    NO_FILE_LABEL,
};
pub use msg::{Msg, QueryAnswer, QueryFailure, UploadFailure, UploadReceipt};
pub use state::{AppState, RequestId};
pub use transcript::{
    Answer, AssistantState, ChatMessage, ChatTranscript, MessageBody, MessageId, Role,
};
pub use update::update;
pub use view_model::{
    AlertView, AppViewModel, CitationView, MessageStatus, MessageView, APOLOGY_TEXT,
    THINKING_TEXT,
};
