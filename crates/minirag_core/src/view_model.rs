use crate::{
    AlertKind, AppState, AssistantState, ChatMessage, Citation, IngestionMode, MessageBody,
    MessageId, Role,
};

/// Shown in an assistant entry while its answer is outstanding.
pub const THINKING_TEXT: &str = "Thinking...";
/// Shown in an assistant entry whose request failed.
pub const APOLOGY_TEXT: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub mode: IngestionMode,
    pub text_section_visible: bool,
    pub file_section_visible: bool,
    pub ingest_text: String,
    pub file_label: String,
    pub submit_enabled: bool,
    pub submit_loading: bool,
    pub status: Option<AlertView>,
    pub messages: Vec<MessageView>,
    /// Newest entry; the message list stays scrolled to it.
    pub scroll_anchor: Option<MessageId>,
    pub query_text: String,
    pub query_rows: u16,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertView {
    pub text: String,
    pub kind: AlertKind,
    /// Changes every time an alert is raised, even with identical text.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Sent,
    Pending,
    Resolved,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub role: Role,
    pub status: MessageStatus,
    pub lines: Vec<String>,
    pub citations: Vec<CitationView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationView {
    pub label: String,
    pub preview: String,
    pub full_text: String,
}

pub(crate) fn build(state: &AppState, dirty: bool) -> AppViewModel {
    let ingest = &state.ingest;
    let busy = ingest.is_busy();
    let preview_chars = state.config.citation_preview_chars;

    AppViewModel {
        mode: ingest.mode(),
        text_section_visible: ingest.text_section_visible(),
        file_section_visible: ingest.file_section_visible(),
        ingest_text: ingest.text().to_string(),
        file_label: ingest.file_label().to_string(),
        submit_enabled: !busy,
        submit_loading: busy,
        status: state.alert.current().map(|alert| AlertView {
            text: alert.text.clone(),
            kind: alert.kind,
            generation: state.alert.generation(),
        }),
        messages: state
            .transcript
            .iter()
            .map(|message| message_view(message, preview_chars))
            .collect(),
        scroll_anchor: state.transcript.latest(),
        query_text: state.composer.text.clone(),
        query_rows: state.composer.height.rows(),
        dirty,
    }
}

fn message_view(message: &ChatMessage, preview_chars: usize) -> MessageView {
    let (status, lines, citations) = match &message.body {
        MessageBody::User(text) => (MessageStatus::Sent, split_lines(text), Vec::new()),
        MessageBody::Assistant(AssistantState::Pending) => (
            MessageStatus::Pending,
            vec![THINKING_TEXT.to_string()],
            Vec::new(),
        ),
        MessageBody::Assistant(AssistantState::Resolved(answer)) => (
            MessageStatus::Resolved,
            answer.lines.clone(),
            answer
                .citations
                .iter()
                .map(|citation| citation_view(citation, preview_chars))
                .collect(),
        ),
        MessageBody::Assistant(AssistantState::Failed) => (
            MessageStatus::Failed,
            vec![APOLOGY_TEXT.to_string()],
            Vec::new(),
        ),
    };

    MessageView {
        id: message.id,
        role: message.role(),
        status,
        lines,
        citations,
    }
}

fn citation_view(citation: &Citation, preview_chars: usize) -> CitationView {
    CitationView {
        label: citation.label(),
        preview: citation.preview(preview_chars),
        full_text: citation.source_text.clone(),
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(ToOwned::to_owned).collect()
}
