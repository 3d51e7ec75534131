use std::path::{Path, PathBuf};

use crate::RequestId;

/// Label shown next to the file picker when the selection is cleared.
pub const NO_FILE_LABEL: &str = "No file selected";

/// Which ingestion input is active. Exactly one section is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestionMode {
    #[default]
    Text,
    File,
}

/// A file chosen in the picker. Only the path and display name are
/// recorded; contents are read when the upload actually runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

/// What gets sent to the upload endpoint. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionPayload {
    Text(String),
    File(SelectedFile),
}

/// Local reasons a submission never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestValidation {
    EmptyText,
    NoFile,
}

impl IngestValidation {
    pub fn message(self) -> &'static str {
        match self {
            IngestValidation::EmptyText => "Please enter text.",
            IngestValidation::NoFile => "Please select a file.",
        }
    }
}

/// The ingestion panel: mode tabs, both inputs and the submit control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngestionForm {
    mode: IngestionMode,
    text: String,
    file: Option<SelectedFile>,
    file_label: String,
    in_flight: Option<RequestId>,
}

impl IngestionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> IngestionMode {
        self.mode
    }

    pub fn switch_mode(&mut self, mode: IngestionMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }

    pub fn text_section_visible(&self) -> bool {
        self.mode == IngestionMode::Text
    }

    pub fn file_section_visible(&self) -> bool {
        self.mode == IngestionMode::File
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn file_label(&self) -> &str {
        &self.file_label
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.file_label = match &file {
            Some(file) => file.name.clone(),
            None => NO_FILE_LABEL.to_string(),
        };
        self.file = file;
    }

    /// Builds the payload for the active mode, or says why it cannot.
    pub fn payload(&self) -> Result<IngestionPayload, IngestValidation> {
        match self.mode {
            IngestionMode::Text if self.text.is_empty() => Err(IngestValidation::EmptyText),
            IngestionMode::Text => Ok(IngestionPayload::Text(self.text.clone())),
            IngestionMode::File => self
                .file
                .clone()
                .map(IngestionPayload::File)
                .ok_or(IngestValidation::NoFile),
        }
    }

    /// True while the submit control is disabled.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub(crate) fn begin(&mut self, request: RequestId) {
        self.in_flight = Some(request);
    }

    /// Re-enables the submit control if `request` is the one in flight.
    pub(crate) fn finish(&mut self, request: RequestId) -> bool {
        if self.in_flight != Some(request) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub(crate) fn clear_inputs(&mut self) {
        self.text.clear();
        self.file = None;
        self.file_label.clear();
    }
}
