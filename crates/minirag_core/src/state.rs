use std::collections::BTreeMap;
use std::fmt;

use crate::view_model::{self, AppViewModel};
use crate::{AlertNotifier, ChatConfig, ChatTranscript, IngestionForm, InputAutoGrow, MessageId};

/// Token issued for every upload or question sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// The multi-line query field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Composer {
    pub(crate) text: String,
    pub(crate) height: InputAutoGrow,
}

impl Composer {
    pub(crate) fn set(&mut self, text: String) {
        self.height.fit(&text);
        self.text = text;
    }

    pub(crate) fn insert_newline(&mut self) {
        self.text.push('\n');
        self.height.fit(&self.text);
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.height.reset();
    }
}

/// Everything one page session holds. Owned by the dispatch loop and only
/// ever changed through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) config: ChatConfig,
    pub(crate) ingest: IngestionForm,
    pub(crate) transcript: ChatTranscript,
    pub(crate) alert: AlertNotifier,
    pub(crate) composer: Composer,
    /// Questions awaiting an answer, keyed by their request token.
    pub(crate) pending_answers: BTreeMap<RequestId, MessageId>,
    next_request: u64,
    closed: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChatConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn ingest(&self) -> &IngestionForm {
        &self.ingest
    }

    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    pub fn alert(&self) -> &AlertNotifier {
        &self.alert
    }

    pub fn query_text(&self) -> &str {
        &self.composer.text
    }

    pub fn pending_answer_count(&self) -> usize {
        self.pending_answers.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self, self.dirty)
    }

    /// Returns whether anything changed since the last call, and resets it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn next_request(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }
}
