/// Emphasis of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Progress,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub text: String,
    pub kind: AlertKind,
}

/// Single-slot status line.
///
/// Every `show` bumps the generation. A pending clear only applies if its
/// generation is still current, so a newer alert restarts the delay instead
/// of being erased by an older timer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlertNotifier {
    current: Option<Alert>,
    generation: u64,
}

impl AlertNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever is showing and returns the new generation.
    pub fn show(&mut self, text: impl Into<String>, kind: AlertKind) -> u64 {
        self.generation += 1;
        self.current = Some(Alert {
            text: text.into(),
            kind,
        });
        self.generation
    }

    /// Clears the alert if `generation` is still the one showing.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.current.is_none() {
            return false;
        }
        self.current = None;
        true
    }

    pub fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
