use std::time::Duration;

/// How long a status alert stays visible before clearing itself.
pub const ALERT_CLEAR_DELAY: Duration = Duration::from_secs(5);

/// Number of characters of a source passage shown on a citation chip.
pub const CITATION_PREVIEW_CHARS: usize = 60;

/// Presentation constants that shape what the view model shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub alert_clear_delay: Duration,
    pub citation_preview_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            alert_clear_delay: ALERT_CLEAR_DELAY,
            citation_preview_chars: CITATION_PREVIEW_CHARS,
        }
    }
}
